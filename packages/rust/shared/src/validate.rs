//! Validation utilities: JSON kind assertions, uniqueness and
//! cross-collection reference checks.
//!
//! Every check is fail-fast: the first violation found is returned.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde_json::{Map, Value};

use crate::error::{DocsiteError, Result};
use crate::types::{Category, Element};

/// The JSON kind a schema field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Array,
    Boolean,
}

impl FieldKind {
    /// Whether `value` is of this kind. `null` matches nothing.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Boolean => value.is_boolean(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized top-level fields of `metadata.json` and their required kinds.
pub const SETTINGS_SCHEMA: &[(&str, FieldKind)] = &[
    ("baseurl", FieldKind::String),
    ("elements", FieldKind::Array),
    ("categories", FieldKind::Array),
    ("showDemoTester", FieldKind::Boolean),
    ("absoluteBaseurl", FieldKind::String),
    ("footerText", FieldKind::String),
    ("markdownExtensions", FieldKind::Array),
    ("siteName", FieldKind::String),
    ("brandColor", FieldKind::String),
    ("showBuildStatus", FieldKind::Boolean),
];

/// Name of a value's JSON kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Assert that `value`, if present, is of the `expected` kind.
pub fn assert_type(expected: FieldKind, field: &str, value: Option<&Value>) -> Result<()> {
    match value {
        Some(v) if !expected.matches(v) => Err(DocsiteError::TypeMismatch {
            field: field.to_string(),
            expected,
            actual: kind_name(v),
        }),
        _ => Ok(()),
    }
}

/// Check every recognized field of a merged config map against
/// [`SETTINGS_SCHEMA`]. Unrecognized keys are not inspected.
pub fn validate_settings(config: &Map<String, Value>) -> Result<()> {
    for (field, kind) in SETTINGS_SCHEMA {
        assert_type(*kind, field, config.get(*field))?;
    }
    Ok(())
}

/// Fail on the first item whose `key` was already seen.
pub fn assert_unique<'a, T, K, F>(items: &'a [T], key: F, label: &str) -> Result<()>
where
    F: Fn(&'a T) -> K,
    K: Eq + Hash + fmt::Display,
{
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        let value = key(item);
        if seen.contains(&value) {
            return Err(DocsiteError::DuplicateKey {
                label: label.to_string(),
                value: value.to_string(),
            });
        }
        seen.insert(value);
    }

    Ok(())
}

/// Fail on the first element (in collection order) whose category is not
/// among `categories`. Elements without a category are skipped.
pub fn assert_categories_exist(elements: &[Element], categories: &[Category]) -> Result<()> {
    let names: HashSet<&str> = categories.iter().map(|c| c.name.as_str()).collect();

    for el in elements {
        if let Some(category) = el.category_name() {
            if !names.contains(category) {
                return Err(DocsiteError::UnknownCategory {
                    element: el.name.clone(),
                    category: category.to_string(),
                });
            }
        }
    }

    Ok(())
}
