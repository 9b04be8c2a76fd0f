//! Field-level request validation.
//!
//! Rules are evaluated independently: every failing rule contributes its
//! message, so a missing field reports both "required" and "empty".

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Field name to failure messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// Starts a rule chain for a text field.
    pub fn rule_for<'a>(&'a mut self, field: &'a str, value: Option<&'a str>) -> TextRules<'a> {
        TextRules {
            errors: self,
            field,
            value,
        }
    }

    /// Rejects the nil UUID.
    pub fn not_nil(&mut self, field: &str, value: Uuid, message: &str) {
        if value.is_nil() {
            self.add(field, message);
        }
    }
}

/// Rule chain over an optional text value.
///
/// `length` and `matches` only look at present values, leaving absence to
/// `not_null`/`not_empty`.
pub struct TextRules<'a> {
    errors: &'a mut ValidationErrors,
    field: &'a str,
    value: Option<&'a str>,
}

impl<'a> TextRules<'a> {
    pub fn not_null(self, message: &str) -> Self {
        if self.value.is_none() {
            self.errors.add(self.field, message);
        }
        self
    }

    /// Fails on absent, empty or whitespace-only values.
    pub fn not_empty(self, message: &str) -> Self {
        if self.value.map_or(true, |value| value.trim().is_empty()) {
            self.errors.add(self.field, message);
        }
        self
    }

    /// Inclusive character-count bounds.
    pub fn length(self, min: usize, max: usize, message: &str) -> Self {
        if let Some(value) = self.value {
            let count = value.chars().count();
            if count < min || count > max {
                self.errors.add(self.field, message);
            }
        }
        self
    }

    pub fn matches(self, pattern: &Regex, message: &str) -> Self {
        if let Some(value) = self.value {
            if !pattern.is_match(value) {
                self.errors.add(self.field, message);
            }
        }
        self
    }
}

/// Treats blank optional inputs as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
