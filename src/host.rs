//! Capability interface between the summing core and whatever model hosts
//! the elements.
//!
//! The resolver and aggregator only ever see these traits, so any model that
//! can list an element's parameters and render a parameter as text can be
//! summed. [`crate::model`] provides the IFC implementation.

use serde::Serialize;

/// How a parameter stores its value in the host model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StorageKind {
    Double,
    Integer,
    String,
    Other,
}

impl StorageKind {
    /// Only doubles and integers take part in summing.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Double | Self::Integer)
    }
}

/// A named, typed attribute of an element.
pub trait ParameterRef {
    fn name(&self) -> &str;

    fn storage_kind(&self) -> StorageKind;

    /// Host-formatted value, possibly carrying a unit suffix (`"500 mm"`).
    /// `None` when the parameter has no value.
    fn display_string(&self) -> Option<&str>;
}

/// A host object carrying named parameters.
pub trait ElementRef {
    type Parameter: ParameterRef;

    /// All parameters of the element, in host order.
    fn parameters(&self) -> &[Self::Parameter];

    /// Looks up a parameter by exact, case-sensitive name.
    fn parameter(&self, name: &str) -> Option<&Self::Parameter> {
        self.parameters().iter().find(|p| p.name() == name)
    }
}

/// Source of the elements the user currently has selected.
pub trait HostSelection {
    type Element: ElementRef;

    fn selected_elements(&self) -> Vec<&Self::Element>;
}
