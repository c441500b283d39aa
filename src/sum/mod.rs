//! Summing numeric parameters shared by a set of elements.
//!
//! [`resolve_common_parameters`] picks the parameters, [`aggregate`] sums one
//! of them, and [`SumSession`] keeps the resulting table in step with the
//! user's ratio and rounding choices.

pub mod resolver;
pub mod session;
pub mod summary;
pub mod value;

pub use resolver::resolve_common_parameters;
pub use session::{SumSession, MAX_ROUNDING, MIN_ROUNDING, RATIO_CHOICES};
pub use summary::{aggregate, coefficient, round_display, ParameterSummary};
pub use value::{parse_display_value, unit_label};
