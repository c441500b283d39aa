//! # Sum Parameters
//!
//! Sums the numeric parameters that a set of selected elements have in
//! common, with a user-chosen display rounding and a ratio coefficient.
//!
//! ## Features
//!
//! - Resolve parameters shared by every selected element
//! - Sum display values, keep the unit label, round half to even
//! - Ratio coefficient (0.0001 .. 10000) for quick unit conversion
//! - Settings persisted as JSON between sessions
//! - IFC files (IFC2x3 and IFC4) as the element source
//! - Terminal UI, plain-text table, CSV and JSON export
//!
//! ## Example
//!
//! ```no_run
//! use sum_parameters::model::Selection;
//! use sum_parameters::parser::parse_ifc_file;
//! use sum_parameters::settings::Settings;
//! use sum_parameters::sum::SumSession;
//!
//! let project = parse_ifc_file("model.ifc").expect("Failed to parse");
//! let selection = Selection::from_ids(project.ids_of_entity_type("IFCWALL"));
//!
//! let mut session = SumSession::new(Settings::default());
//! session.refresh_from(&selection.view(&project));
//! for summary in session.summaries() {
//!     println!("{}: {} {}", summary.name, session.format_sum(summary), summary.unit_label);
//! }
//! ```

pub mod clipboard;
pub mod error;
pub mod export;
pub mod headless;
pub mod host;
pub mod logging;
pub mod model;
pub mod parser;
pub mod settings;
pub mod sum;
pub mod ui;
