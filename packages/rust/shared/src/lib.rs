//! Shared types, error model, and configuration for docsite.
//!
//! This crate is the foundation depended on by the other docsite crates.
//! It provides:
//! - [`DocsiteError`] — the unified error type
//! - Domain types ([`Element`], [`Category`], [`PageDescriptor`], [`PageMenuEntry`])
//! - Configuration loading and defaulting ([`load_base_config`], [`apply_defaults`])
//! - Validation helpers ([`assert_type`], [`assert_unique`], [`assert_categories_exist`])

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ConfigOverrides, EffectiveConfig, ElementEntry, INSTALL_DIR_ENV, InstallLayout,
    METADATA_FILE_NAME, SiteSettings, apply_defaults, load_base_config, metadata_path,
};
pub use error::{DocsiteError, Result};
pub use types::{Category, Element, ElementOrigin, PageDescriptor, PageMenuEntry};
pub use validate::{
    FieldKind, SETTINGS_SCHEMA, assert_categories_exist, assert_type, assert_unique,
    validate_settings,
};
