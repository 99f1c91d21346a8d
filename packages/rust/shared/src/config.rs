//! Site configuration: loading `metadata.json` and layering defaults.
//!
//! Precedence is built-in defaults < `metadata.json` < CLI overrides,
//! merged key by key. A key present at a higher layer replaces the lower
//! value wholesale; nested arrays and objects are never deep-merged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::{DocsiteError, Result};
use crate::types::ElementOrigin;
use crate::validate::validate_settings;

/// Name of the base configuration file, looked up in the site directory.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Environment variable pointing at the generator's install root.
pub const INSTALL_DIR_ENV: &str = "DOCSITE_HOME";

/// Keys always injected by the defaulting step and never read from the file.
const INTERNAL_KEYS: &[&str] = &[
    "_includesDir",
    "_layoutsDir",
    "_pagesDir",
    "_templatesDir",
    "_devEnv",
];

/// Keys computed during assembly; a value for them in the file is dropped.
const DERIVED_KEYS: &[&str] = &["totalElements", "elementsWithDemo", "pagesMenu"];

const DEMO_TESTER_NAME: &str = "demo-tester";
const DEMO_TESTER_DISPLAY_NAME: &str = "Demo Tester";

// ---------------------------------------------------------------------------
// Install layout
// ---------------------------------------------------------------------------

/// Directory holding the generator's bundled assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the install root from `DOCSITE_HOME`, falling back to the
    /// directory of the running executable, then to `.`.
    pub fn discover() -> Self {
        if let Some(dir) = std::env::var_os(INSTALL_DIR_ENV).filter(|v| !v.is_empty()) {
            return Self::new(dir);
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self::new(exe_dir.unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn includes_dir(&self) -> PathBuf {
        self.root.join("includes")
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.root.join("layouts")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn demo_tester_dir(&self) -> PathBuf {
        self.root.join(DEMO_TESTER_NAME)
    }
}

// ---------------------------------------------------------------------------
// Settings (typed view of the merged config)
// ---------------------------------------------------------------------------

/// Scalar site settings after defaulting and validation.
///
/// Unrecognized keys from `metadata.json` are kept in `extra` and written
/// back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(rename = "_includesDir")]
    pub includes_dir: PathBuf,
    #[serde(rename = "_layoutsDir")]
    pub layouts_dir: PathBuf,
    #[serde(rename = "_pagesDir")]
    pub pages_dir: PathBuf,
    #[serde(rename = "_templatesDir")]
    pub templates_dir: PathBuf,
    #[serde(rename = "_devEnv")]
    pub dev_env: bool,

    /// Path prefix for every generated URL.
    pub baseurl: String,
    /// Inject the built-in demo tester element.
    pub show_demo_tester: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_baseurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    /// File extensions treated as markdown pages, with the leading dot.
    pub markdown_extensions: Vec<String>,
    pub site_name: String,
    pub brand_color: String,
    pub show_build_status: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteSettings {
    /// Built-in defaults, the lowest-precedence layer.
    pub fn defaults(layout: &InstallLayout) -> Self {
        Self {
            includes_dir: layout.includes_dir(),
            layouts_dir: layout.layouts_dir(),
            pages_dir: layout.pages_dir(),
            templates_dir: layout.templates_dir(),
            dev_env: false,
            baseurl: String::new(),
            show_demo_tester: true,
            absolute_baseurl: None,
            footer_text: None,
            markdown_extensions: default_markdown_extensions(),
            site_name: default_site_name(),
            brand_color: default_brand_color(),
            show_build_status: true,
            extra: Map::new(),
        }
    }
}

fn default_markdown_extensions() -> Vec<String> {
    vec![".md".into()]
}
fn default_site_name() -> String {
    "Docs".into()
}
fn default_brand_color() -> String {
    "#07C5F2".into()
}

// ---------------------------------------------------------------------------
// CLI overrides
// ---------------------------------------------------------------------------

/// Highest-precedence layer, usually built from command-line flags.
/// `None` fields leave lower layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(rename = "_includesDir", skip_serializing_if = "Option::is_none")]
    pub includes_dir: Option<PathBuf>,
    #[serde(rename = "_layoutsDir", skip_serializing_if = "Option::is_none")]
    pub layouts_dir: Option<PathBuf>,
    #[serde(rename = "_pagesDir", skip_serializing_if = "Option::is_none")]
    pub pages_dir: Option<PathBuf>,
    #[serde(rename = "_templatesDir", skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    #[serde(rename = "_devEnv", skip_serializing_if = "Option::is_none")]
    pub dev_env: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_demo_tester: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_baseurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_build_status: Option<bool>,
}

impl ConfigOverrides {
    fn to_layer(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Effective config (defaulter output)
// ---------------------------------------------------------------------------

/// A raw element record awaiting extraction, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEntry {
    pub raw: Value,
    pub origin: ElementOrigin,
}

impl ElementEntry {
    pub fn user(raw: Value) -> Self {
        Self {
            raw,
            origin: ElementOrigin::User,
        }
    }

    fn demo_tester(layout: &InstallLayout) -> Self {
        let mut raw = Map::new();
        raw.insert("name".into(), DEMO_TESTER_NAME.into());
        raw.insert("displayName".into(), DEMO_TESTER_DISPLAY_NAME.into());
        raw.insert(
            "install".into(),
            layout.demo_tester_dir().to_string_lossy().into_owned().into(),
        );

        Self {
            raw: Value::Object(raw),
            origin: ElementOrigin::BuiltIn,
        }
    }
}

/// Merged, validated configuration with element and category records
/// still in raw form.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub settings: SiteSettings,
    pub elements: Vec<ElementEntry>,
    pub categories: Vec<Value>,
}

impl EffectiveConfig {
    /// Whether the built-in demo tester was injected.
    pub fn has_demo_tester(&self) -> bool {
        self.elements
            .iter()
            .any(|e| e.origin == ElementOrigin::BuiltIn)
    }
}

// ---------------------------------------------------------------------------
// Loading and defaulting
// ---------------------------------------------------------------------------

/// Path of `metadata.json` inside a site directory.
pub fn metadata_path(dir: &Path) -> PathBuf {
    dir.join(METADATA_FILE_NAME)
}

/// Read and parse `metadata.json` from `dir`. No schema validation.
pub fn load_base_config(dir: &Path) -> Result<Value> {
    let path = metadata_path(dir);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(DocsiteError::ConfigNotFound { path, source });
        }
        Err(e) => return Err(DocsiteError::io(&path, e)),
    };

    let value = serde_json::from_str(&content)
        .map_err(|source| DocsiteError::InvalidJson { path: path.clone(), source })?;

    debug!(?path, "loaded base config");
    Ok(value)
}

/// Merge defaults, the loaded file and CLI overrides, validate the result,
/// and inject the demo tester when enabled.
#[instrument(skip_all, fields(root = %layout.root().display()))]
pub fn apply_defaults(
    loaded: Option<Value>,
    overrides: &ConfigOverrides,
    layout: &InstallLayout,
) -> Result<EffectiveConfig> {
    let file_layer = match loaded {
        None => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(DocsiteError::shape("config has to be an object")),
    };

    let mut merged = default_layer(layout)?;
    merge_layer(&mut merged, strip_reserved_keys(file_layer));
    merge_layer(&mut merged, overrides.to_layer()?);

    validate_settings(&merged)?;

    let elements = take_array(&mut merged, "elements");
    let categories = take_array(&mut merged, "categories");

    let settings: SiteSettings = serde_json::from_value(Value::Object(merged))
        .map_err(|e| DocsiteError::shape(e.to_string()))?;

    let mut elements: Vec<ElementEntry> = elements.into_iter().map(ElementEntry::user).collect();
    if settings.show_demo_tester {
        debug!("injecting demo tester element");
        elements.push(ElementEntry::demo_tester(layout));
    }

    Ok(EffectiveConfig {
        settings,
        elements,
        categories,
    })
}

fn default_layer(layout: &InstallLayout) -> Result<Map<String, Value>> {
    let mut layer = match serde_json::to_value(SiteSettings::defaults(layout))? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    layer.insert("elements".into(), Value::Array(Vec::new()));
    layer.insert("categories".into(), Value::Array(Vec::new()));
    Ok(layer)
}

fn merge_layer(base: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        base.insert(key, value);
    }
}

fn strip_reserved_keys(mut layer: Map<String, Value>) -> Map<String, Value> {
    for key in INTERNAL_KEYS {
        if layer.shift_remove(*key).is_some() {
            warn!(key, "ignoring internal key set in {METADATA_FILE_NAME}");
        }
    }
    for key in DERIVED_KEYS {
        if layer.shift_remove(*key).is_some() {
            warn!(key, "ignoring derived key set in {METADATA_FILE_NAME}");
        }
    }
    layer
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match map.shift_remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
