//! Configuration utility types.
//!
//! | Module  | Purpose                          |
//! |---------|----------------------------------|
//! | `error` | Configuration error types        |
//! | `field` | Type-safe config field paths     |

mod error;
mod field;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
