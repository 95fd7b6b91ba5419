//! Setup-time validation.

mod validate;

pub use validate::{
    ensure_valid, stock_errors, validate_catalog, validate_config, validate_job, validate_wall,
    wall_errors, ValidationResult,
};
