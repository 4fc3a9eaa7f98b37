//! Field validation for building input

use std::fmt;

use serde::Serialize;

/// Rule a field failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    MinSize(usize),
    MaxSize(usize),
    Positive,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "Required"),
            Rule::MinSize(n) => write!(f, "MinSize({})", n),
            Rule::MaxSize(n) => write!(f, "MaxSize({})", n),
            Rule::Positive => write!(f, "Positive"),
        }
    }
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

/// All violations found for an input, in field declaration order.
///
/// Displays as the first violation's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn first(&self) -> Option<&FieldViolation> {
        self.0.first()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(violation) => write!(f, "{}", violation.message),
            None => write!(f, "validation failed"),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects violations while rules are checked field by field.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required<T>(&mut self, field: &'static str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.push(field, Rule::Required, format!("{} can not be empty", field));
        }
        self
    }

    /// Length bounds in characters, checked only when the value is present.
    pub fn size(&mut self, field: &'static str, value: &Option<String>, min: usize, max: usize) -> &mut Self {
        if let Some(value) = value {
            let len = value.chars().count();
            if len < min {
                self.push(field, Rule::MinSize(min), format!("{} minimum size is {}", field, min));
            } else if len > max {
                self.push(field, Rule::MaxSize(max), format!("{} maximum size is {}", field, max));
            }
        }
        self
    }

    pub fn positive(&mut self, field: &'static str, value: &Option<i32>) -> &mut Self {
        if let Some(value) = value {
            if *value <= 0 {
                self.push(field, Rule::Positive, format!("{} must be greater than zero", field));
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            for violation in &self.violations {
                tracing::debug!(field = violation.field, rule = %violation.rule, "{}", violation.message);
            }
            Err(ValidationErrors(std::mem::take(&mut self.violations)))
        }
    }

    fn push(&mut self, field: &'static str, rule: Rule, message: String) {
        self.violations.push(FieldViolation { field, rule, message });
    }
}
