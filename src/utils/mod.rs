//! Utility modules.
//!
//! - [`validate_field_name`]: check that a searchable field name is a plain identifier
//! - [`truncate_with_ellipsis`]: fit text into a terminal column

mod display;
mod validate;

pub use display::{single_line, truncate_with_ellipsis};
pub use validate::{validate_field_name, ValidationError};
