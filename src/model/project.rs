use super::Element;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IfcProject {
    pub name: String,
    pub schema: String,
    pub file_path: String,
    pub storeys: Vec<Storey>,
    pub elements: Vec<Element>, // sorted by id
}

#[derive(Debug, Clone, Serialize)]
pub struct Storey {
    pub id: u64,
    pub name: String,
    pub elevation: f64,
    pub element_count: usize,
}

impl IfcProject {
    #[must_use]
    pub fn new(name: String, schema: String, file_path: String) -> Self {
        Self {
            name,
            schema,
            file_path,
            storeys: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Replaces the element list, keeping it ordered by id for lookups.
    pub fn set_elements(&mut self, mut elements: Vec<Element>) {
        elements.sort_by_key(|e| e.id);
        self.elements = elements;
    }

    #[must_use]
    pub fn element(&self, id: u64) -> Option<&Element> {
        self.elements
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|index| &self.elements[index])
    }

    #[must_use]
    pub fn total_elements(&self) -> usize {
        self.elements.len()
    }

    /// Storey name for an element, `-` when it is not spatially contained.
    #[must_use]
    pub fn storey_name(&self, element: &Element) -> String {
        element
            .storey_id
            .and_then(|id| self.storeys.iter().find(|s| s.id == id))
            .map_or_else(|| "-".to_string(), |s| s.name.clone())
    }

    /// Ids of all elements of the given entity type (case-insensitive), in id order.
    #[must_use]
    pub fn ids_of_entity_type(&self, entity_type: &str) -> Vec<u64> {
        self.elements
            .iter()
            .filter(|e| e.entity_type.eq_ignore_ascii_case(entity_type))
            .map(|e| e.id)
            .collect()
    }
}
