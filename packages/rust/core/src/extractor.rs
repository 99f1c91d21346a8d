//! Element extraction: turning raw `metadata.json` entries into canonical
//! [`Element`] records.
//!
//! The assembler is generic over [`ElementExtractor`], so richer extractors
//! (reading element sources, package manifests, ...) can be plugged in.
//! [`BasicExtractor`] only normalizes what the record itself declares.

use std::future::Future;

use serde_json::Value;

use docsite_shared::{DocsiteError, Element, FieldKind, Result, assert_type};

/// Produces a canonical element from one raw record.
///
/// Implementations run on spawned tasks, one per record.
pub trait ElementExtractor: Send + Sync + 'static {
    fn extract(&self, raw: Value) -> impl Future<Output = Result<Element>> + Send;
}

/// Extractor that reads the canonical fields straight from the record.
///
/// `pageDirName` and `displayName` default to `name`; every other key is
/// carried through in [`Element::extra`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicExtractor;

impl ElementExtractor for BasicExtractor {
    async fn extract(&self, raw: Value) -> Result<Element> {
        extract_basic(raw)
    }
}

fn extract_basic(raw: Value) -> Result<Element> {
    let Value::Object(mut fields) = raw else {
        return Err(DocsiteError::element("element has to be an object"));
    };

    let name = match fields.shift_remove("name") {
        Some(Value::String(name)) => name,
        _ => return Err(DocsiteError::element("element name has to be a string")),
    };

    for (key, kind) in [
        ("pageDirName", FieldKind::String),
        ("displayName", FieldKind::String),
        ("category", FieldKind::String),
        ("disableDemo", FieldKind::Boolean),
    ] {
        assert_type(kind, key, fields.get(key))?;
    }

    let take_string = |fields: &mut serde_json::Map<String, Value>, key: &str| {
        fields
            .shift_remove(key)
            .and_then(|v| v.as_str().map(String::from))
    };

    let page_dir_name = take_string(&mut fields, "pageDirName").unwrap_or_else(|| name.clone());
    let display_name = take_string(&mut fields, "displayName").unwrap_or_else(|| name.clone());
    let category = take_string(&mut fields, "category");
    let disable_demo = fields
        .shift_remove("disableDemo")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    // Assigned by linking, never taken from input.
    fields.shift_remove("indexInCategory");

    let mut element = Element::new(name, page_dir_name);
    element.display_name = Some(display_name);
    element.category = category;
    element.disable_demo = disable_demo;
    element.extra = fields;

    Ok(element)
}
