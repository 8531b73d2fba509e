use thiserror::Error;

use crate::env::get_var_from;

/// Errors related to application configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more environment variables required by the application are not set.
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    /// A variable is set but its value cannot be used.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Reads every variable in `names` through `lookup`.
///
/// Values come back in the order of `names`. If any are missing, all the
/// missing names are reported in one error rather than failing on the first.
pub fn require_all<F>(lookup: F, names: &[&str]) -> Result<Vec<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = Vec::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        match get_var_from(&lookup, name) {
            Ok(v) => values.push(v),
            Err(e) => missing.push(e.0),
        }
    }

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(ConfigError::MissingEnvVars(missing))
    }
}
