//! Appending element records to `metadata.json`.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use docsite_shared::{
    DocsiteError, FieldKind, Result, load_base_config, metadata_path, validate::kind_name,
};

/// Append `element` to the `elements` array of `<dir>/metadata.json` and
/// rewrite the file with 4-space indentation.
///
/// Neither defaults nor validation are applied; a duplicate element is only
/// caught by the next full load.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn add_element(dir: &Path, element: Value) -> Result<()> {
    let mut config = load_base_config(dir)?;

    let fields = config
        .as_object_mut()
        .ok_or_else(|| DocsiteError::shape("config has to be an object"))?;

    let elements = fields
        .entry("elements")
        .or_insert_with(|| Value::Array(Vec::new()));
    if elements.is_null() {
        *elements = Value::Array(Vec::new());
    }

    let actual = kind_name(elements);
    let Value::Array(items) = elements else {
        return Err(DocsiteError::TypeMismatch {
            field: "elements".into(),
            expected: FieldKind::Array,
            actual,
        });
    };
    items.push(element);
    let count = items.len();

    let path = metadata_path(dir);
    let content = to_json_indented(&config)?;
    std::fs::write(&path, content).map_err(|e| DocsiteError::io(&path, e))?;

    info!(path = %path.display(), elements = count, "element added");
    Ok(())
}

fn to_json_indented(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
