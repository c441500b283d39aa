use crate::host::{ParameterRef, StorageKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub storage: StorageKind,
    pub display: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, storage: StorageKind, display: Option<String>) -> Self {
        Self {
            name: name.into(),
            storage,
            display,
        }
    }

    #[must_use]
    pub fn double(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self::new(name, StorageKind::Double, Some(display.into()))
    }

    #[must_use]
    pub fn integer(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self::new(name, StorageKind::Integer, Some(display.into()))
    }

    #[must_use]
    pub fn text(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self::new(name, StorageKind::String, Some(display.into()))
    }
}

impl ParameterRef for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn storage_kind(&self) -> StorageKind {
        self.storage
    }

    fn display_string(&self) -> Option<&str> {
        self.display.as_deref()
    }
}
