pub mod element;
pub mod parameter;
pub mod project;
pub mod selection;

pub use element::Element;
pub use parameter::Parameter;
pub use project::{IfcProject, Storey};
pub use selection::{Selection, SelectionView};
