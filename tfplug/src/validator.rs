//! Attribute validators
//!
//! Validators run during `validate_config` against known configuration
//! values. Null and unknown values are skipped by the caller.

use crate::types::{AttributePath, Diagnostic, Dynamic};

pub trait Validator: Send + Sync {
    fn description(&self) -> String;

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>);
}

/// Restricts a string to a fixed set of values
pub struct StringOneOf {
    allowed: Vec<String>,
}

impl StringOneOf {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        format!("value must be one of: {:?}", self.allowed)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        if let Some(s) = value.as_string() {
            if !self.allowed.iter().any(|a| a == s) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Match",
                        format!(
                            "Attribute {} value must be one of: {:?}, got: {:?}",
                            path, self.allowed, s
                        ),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
    }
}

pub struct StringLength {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for StringLength {
    fn description(&self) -> String {
        format!("string length must be within {:?}..{:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(s) = value.as_string() else {
            return;
        };
        let len = s.chars().count();

        if let Some(min) = self.min {
            if len < min {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Length",
                        format!("{} must have minimum length of {}, got {}", path, min, len),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
        if let Some(max) = self.max {
            if len > max {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Attribute Value Length",
                        format!("{} must have maximum length of {}, got {}", path, max, len),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
    }
}

pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validator for NumberRange {
    fn description(&self) -> String {
        format!("number must be within {:?}..{:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(n) = value.as_number() else {
            return;
        };

        let below = self.min.is_some_and(|min| n < min);
        let above = self.max.is_some_and(|max| n > max);
        if below || above {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid Attribute Value",
                    format!(
                        "{} must be between {} and {}, got {}",
                        path,
                        self.min.map_or("-inf".to_string(), |m| m.to_string()),
                        self.max.map_or("+inf".to_string(), |m| m.to_string()),
                        n
                    ),
                )
                .with_attribute(path.clone()),
            );
        }
    }
}
