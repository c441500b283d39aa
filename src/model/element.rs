use super::Parameter;
use crate::host::ElementRef;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub id: u64,
    pub global_id: String,
    pub entity_type: String,
    pub name: String,
    pub tag: Option<String>,
    pub type_id: Option<u64>,
    pub storey_id: Option<u64>,
    pub parameters: Vec<Parameter>,
}

impl Element {
    #[must_use]
    pub fn new(id: u64, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            global_id: String::new(),
            entity_type: entity_type.into(),
            name: String::new(),
            tag: None,
            type_id: None,
            storey_id: None,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.insert_parameter(parameter);
        self
    }

    /// Adds a parameter unless one with the same name is already present.
    /// Returns whether it was added.
    pub fn insert_parameter(&mut self, parameter: Parameter) -> bool {
        if self.parameter(&parameter.name).is_some() {
            return false;
        }
        self.parameters.push(parameter);
        true
    }

    /// Name for list display: the element name, or `#id` when unnamed.
    #[must_use]
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("#{}", self.id)
        } else {
            self.name.clone()
        }
    }
}

impl ElementRef for Element {
    type Parameter = Parameter;

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}
