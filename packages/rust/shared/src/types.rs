//! Core domain types: elements, categories and site pages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocsiteError, Result};
use crate::validate::{FieldKind, assert_type};

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// Where an element record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElementOrigin {
    /// Declared in `metadata.json` (or appended to it).
    #[default]
    User,
    /// Injected by the defaulting step (the demo tester).
    BuiltIn,
}

/// A documented unit (e.g. a UI component) in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique element name.
    pub name: String,
    /// Directory the element's pages are rendered into. Unique.
    pub page_dir_name: String,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Name of the category this element belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Skip demo page generation for this element.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_demo: bool,
    /// Position within the owning category, set by linking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_in_category: Option<usize>,
    /// Whether the record came from `metadata.json` or was injected built-in.
    #[serde(skip)]
    pub origin: ElementOrigin,
    /// Everything else the extractor or a context provider attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    pub fn new(name: impl Into<String>, page_dir_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page_dir_name: page_dir_name.into(),
            display_name: None,
            category: None,
            disable_demo: false,
            index_in_category: None,
            origin: ElementOrigin::User,
            extra: Map::new(),
        }
    }

    /// The referenced category name. An empty name counts as no category.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_built_in(&self) -> bool {
        self.origin == ElementOrigin::BuiltIn
    }

    pub fn demo_enabled(&self) -> bool {
        !self.disable_demo
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A named grouping of elements, used for navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Linked elements in original order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Category {
    pub fn new(name: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            display_name,
            elements: Vec::new(),
        }
    }

    /// Normalize a raw category record into `{name, displayName}`.
    /// Any other input field is dropped.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| DocsiteError::category("category has to be an object"))?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| DocsiteError::category("category name has to be a string"))?;

        let display_name = obj.get("displayName");
        assert_type(FieldKind::String, "displayName", display_name)?;

        Ok(Self::new(
            name,
            display_name.and_then(Value::as_str).map(String::from),
        ))
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// A standalone site page (e.g. `getting-started.md`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Page identifier in dash-case; also its URL segment.
    pub name: String,
    /// Source file, when the page came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl PageDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }
}

/// A page as it appears in the site menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMenuEntry {
    #[serde(flatten)]
    pub page: PageDescriptor,
    pub url: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn category_normalization_drops_extra_fields() {
        let raw = json!({"name": "forms", "displayName": "Forms", "icon": "form.svg"});
        let cat = Category::from_raw(&raw).expect("normalize");
        assert_eq!(cat.name, "forms");
        assert_eq!(cat.display_name.as_deref(), Some("Forms"));
        assert!(cat.elements.is_empty());

        let json = serde_json::to_value(&cat).expect("serialize");
        assert_eq!(json, json!({"name": "forms", "displayName": "Forms", "elements": []}));
    }

    #[test]
    fn category_requires_string_name() {
        let err = Category::from_raw(&json!({"displayName": "Forms"})).unwrap_err();
        assert!(matches!(err, DocsiteError::InvalidCategory { .. }));

        let err = Category::from_raw(&json!({"name": 3})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid category: category name has to be a string"
        );

        let err = Category::from_raw(&json!("forms")).unwrap_err();
        assert!(err.to_string().contains("has to be an object"));
    }

    #[test]
    fn category_display_name_must_be_string() {
        let err = Category::from_raw(&json!({"name": "forms", "displayName": 1})).unwrap_err();
        assert!(matches!(err, DocsiteError::TypeMismatch { .. }));
    }

    #[test]
    fn element_serialization_flattens_extra() {
        let mut el = Element::new("button", "button");
        el.category = Some("forms".into());
        el.index_in_category = Some(0);
        el.extra.insert("install".into(), json!("./button"));

        let json = serde_json::to_value(&el).expect("serialize");
        assert_eq!(
            json,
            json!({
                "name": "button",
                "pageDirName": "button",
                "category": "forms",
                "indexInCategory": 0,
                "install": "./button",
            })
        );
    }

    #[test]
    fn origin_stays_out_of_json() {
        let mut el = Element::new("demo-tester", "demo-tester");
        el.origin = ElementOrigin::BuiltIn;
        assert!(el.is_built_in());

        let json = serde_json::to_value(&el).expect("serialize");
        assert_eq!(json, json!({"name": "demo-tester", "pageDirName": "demo-tester"}));

        let back: Element = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.origin, ElementOrigin::User);
    }

    #[test]
    fn empty_category_counts_as_none() {
        let mut el = Element::new("icon", "icon");
        el.category = Some(String::new());
        assert_eq!(el.category_name(), None);
    }

    #[test]
    fn menu_entry_serializes_flat() {
        let entry = PageMenuEntry {
            page: PageDescriptor::named("getting-started"),
            url: "/docs/getting-started/".into(),
            title: "Getting Started".into(),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(
            json,
            json!({
                "name": "getting-started",
                "url": "/docs/getting-started/",
                "title": "Getting Started",
            })
        );
    }
}
