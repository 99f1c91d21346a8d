//! Config assembler.
//!
//! Loads `metadata.json`, applies defaults and overrides, extracts every
//! element, normalizes categories, validates uniqueness and references,
//! links elements into categories, then computes the derived fields.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use docsite_shared::{
    Category, ConfigOverrides, DocsiteError, EffectiveConfig, Element, ElementEntry,
    InstallLayout, PageMenuEntry, Result, SiteSettings, apply_defaults, assert_categories_exist,
    assert_unique, load_base_config,
};

use crate::extractor::ElementExtractor;
use crate::link::link_elements_with_categories;

/// The fully assembled site configuration.
///
/// Serializes as one flat object: the settings keys followed by the
/// linked collections and the derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledConfig {
    #[serde(flatten)]
    pub settings: SiteSettings,
    pub elements: Vec<Element>,
    pub categories: Vec<Category>,
    /// Number of user-declared elements (the demo tester is not counted).
    pub total_elements: usize,
    /// Elements that get a demo page, in original order.
    pub elements_with_demo: Vec<Element>,
    /// Sorted page menu; `None` until the config is enriched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_menu: Option<Vec<PageMenuEntry>>,
}

impl AssembledConfig {
    /// Recompute the views derived from `elements`: category element
    /// lists and `elements_with_demo`.
    pub(crate) fn rebuild_views(&mut self) {
        let categories = std::mem::take(&mut self.categories);
        self.categories = link_elements_with_categories(&mut self.elements, categories);
        self.elements_with_demo = demo_elements(&self.elements);
    }
}

/// Assemble the site config from `<dir>/metadata.json` and `overrides`.
///
/// Assertion and validation errors come back unchanged; anything else is
/// wrapped once in [`DocsiteError::InvalidMetadataFile`].
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn get_config<E: ElementExtractor>(
    dir: &Path,
    overrides: &ConfigOverrides,
    layout: &InstallLayout,
    extractor: Arc<E>,
) -> Result<AssembledConfig> {
    load_and_assemble(dir, overrides, layout, extractor)
        .await
        .map_err(DocsiteError::wrap_metadata)
}

async fn load_and_assemble<E: ElementExtractor>(
    dir: &Path,
    overrides: &ConfigOverrides,
    layout: &InstallLayout,
    extractor: Arc<E>,
) -> Result<AssembledConfig> {
    let loaded = load_base_config(dir)?;
    let effective = apply_defaults(Some(loaded), overrides, layout)?;
    assemble(effective, extractor).await
}

/// Run extraction, validation, linking and counting over an already
/// defaulted config.
#[instrument(skip_all, fields(elements = effective.elements.len(), categories = effective.categories.len()))]
pub async fn assemble<E: ElementExtractor>(
    effective: EffectiveConfig,
    extractor: Arc<E>,
) -> Result<AssembledConfig> {
    let EffectiveConfig {
        settings,
        elements,
        categories,
    } = effective;

    let mut elements = extract_elements(extractor, elements).await?;
    debug!(count = elements.len(), "elements extracted");

    let categories = categories
        .iter()
        .map(Category::from_raw)
        .collect::<Result<Vec<_>>>()?;

    assert_unique(&elements, |el| el.name.as_str(), "element names")?;
    assert_unique(
        &elements,
        |el| el.page_dir_name.as_str(),
        "element page directory names",
    )?;
    assert_unique(&categories, |cat| cat.name.as_str(), "category names")?;
    assert_categories_exist(&elements, &categories)?;

    let categories = link_elements_with_categories(&mut elements, categories);

    let total_elements = elements.iter().filter(|el| !el.is_built_in()).count();
    let elements_with_demo = demo_elements(&elements);

    info!(
        total_elements,
        categories = categories.len(),
        with_demo = elements_with_demo.len(),
        "config assembled"
    );

    Ok(AssembledConfig {
        settings,
        elements,
        categories,
        total_elements,
        elements_with_demo,
        pages_menu: None,
    })
}

fn demo_elements(elements: &[Element]) -> Vec<Element> {
    elements
        .iter()
        .filter(|el| el.demo_enabled())
        .cloned()
        .collect()
}

/// Extract every entry on its own task and collect the results in input
/// order. All tasks are awaited; the first failure in input order wins.
async fn extract_elements<E: ElementExtractor>(
    extractor: Arc<E>,
    entries: Vec<ElementEntry>,
) -> Result<Vec<Element>> {
    let handles: Vec<_> = entries
        .into_iter()
        .map(|entry| {
            let extractor = Arc::clone(&extractor);
            tokio::spawn(async move {
                let mut element = extractor.extract(entry.raw).await?;
                element.origin = entry.origin;
                Ok::<_, DocsiteError>(element)
            })
        })
        .collect();

    let mut elements = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for handle in handles {
        match handle.await {
            Ok(Ok(element)) => elements.push(element),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(e) => {
                first_error
                    .get_or_insert(DocsiteError::Extraction(format!("extractor task failed: {e}")));
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(elements),
    }
}
