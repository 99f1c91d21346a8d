//! Full-config enrichment.
//!
//! Adds rendering context to the assembled elements through a
//! [`ContextProvider`] and derives the sorted page menu.

use std::future::Future;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use docsite_shared::{DocsiteError, Element, PageDescriptor, PageMenuEntry, Result};

use crate::assembler::AssembledConfig;

/// Extra template context for one element, merged into [`Element::extra`].
pub type ElementContext = Map<String, Value>;

/// Element keys a context provider may not overwrite.
const RESERVED_KEYS: &[&str] = &[
    "name",
    "pageDirName",
    "displayName",
    "category",
    "disableDemo",
    "indexInCategory",
];

// ---------------------------------------------------------------------------
// Context providers
// ---------------------------------------------------------------------------

/// Computes rendering context for elements.
///
/// Both methods return one context per input element, in input order.
pub trait ContextProvider: Send + Sync {
    /// Context for every element's documentation page.
    fn element_context(
        &self,
        elements: &[Element],
        baseurl: &str,
        show_build_status: bool,
    ) -> impl Future<Output = Result<Vec<ElementContext>>> + Send;

    /// Context for the demo pages of demo-enabled elements.
    fn demo_context(
        &self,
        elements: &[Element],
        baseurl: &str,
        show_build_status: bool,
    ) -> impl Future<Output = Result<Vec<ElementContext>>> + Send;
}

/// Provider that derives page URLs from `baseurl` and `pageDirName`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardContext;

impl ContextProvider for StandardContext {
    async fn element_context(
        &self,
        elements: &[Element],
        baseurl: &str,
        show_build_status: bool,
    ) -> Result<Vec<ElementContext>> {
        Ok(elements
            .iter()
            .map(|el| {
                let mut ctx = Map::new();
                ctx.insert("url".into(), format!("{baseurl}/{}/", el.page_dir_name).into());
                ctx.insert("showBuildStatus".into(), show_build_status.into());
                ctx
            })
            .collect())
    }

    async fn demo_context(
        &self,
        elements: &[Element],
        baseurl: &str,
        _show_build_status: bool,
    ) -> Result<Vec<ElementContext>> {
        Ok(elements
            .iter()
            .map(|el| {
                let mut ctx = Map::new();
                ctx.insert(
                    "demoUrl".into(),
                    format!("{baseurl}/{}/demo/", el.page_dir_name).into(),
                );
                ctx
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Add element and demo context, then build the page menu from `pages`.
///
/// The two provider calls run concurrently and are both awaited before any
/// context is applied; the element-context error is reported first.
#[instrument(skip_all, fields(elements = config.elements.len(), pages = pages.len()))]
pub async fn get_full_config<P: ContextProvider>(
    mut config: AssembledConfig,
    pages: Vec<PageDescriptor>,
    provider: &P,
) -> Result<AssembledConfig> {
    let baseurl = config.settings.baseurl.clone();
    let show_build_status = config.settings.show_build_status;

    let (element_ctx, demo_ctx) = tokio::join!(
        provider.element_context(&config.elements, &baseurl, show_build_status),
        provider.demo_context(&config.elements_with_demo, &baseurl, show_build_status),
    );
    let element_ctx = element_ctx?;
    let demo_ctx = demo_ctx?;

    check_len("element", element_ctx.len(), config.elements.len())?;
    check_len("demo", demo_ctx.len(), config.elements_with_demo.len())?;

    for (el, ctx) in config.elements.iter_mut().zip(element_ctx) {
        apply_context(el, ctx);
    }
    for (el, ctx) in config
        .elements
        .iter_mut()
        .filter(|el| el.demo_enabled())
        .zip(demo_ctx)
    {
        apply_context(el, ctx);
    }
    config.rebuild_views();

    let menu = build_pages_menu(&baseurl, pages);
    info!(menu_entries = menu.len(), "config enriched");
    config.pages_menu = Some(menu);

    Ok(config)
}

/// Drop the `index` page, attach `url` and `title`, sort by name.
pub fn build_pages_menu(baseurl: &str, pages: Vec<PageDescriptor>) -> Vec<PageMenuEntry> {
    let mut menu: Vec<PageMenuEntry> = pages
        .into_iter()
        .filter(|p| p.name != "index")
        .map(|page| PageMenuEntry {
            url: format!("{baseurl}/{}/", page.name),
            title: title_from_dash_case(&page.name),
            page,
        })
        .collect();

    menu.sort_by(|a, b| a.page.name.cmp(&b.page.name));
    debug!(entries = menu.len(), "pages menu built");
    menu
}

/// `getting-started` → `Getting Started`.
pub fn title_from_dash_case(name: &str) -> String {
    name.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn apply_context(el: &mut Element, ctx: ElementContext) {
    for (key, value) in ctx {
        if RESERVED_KEYS.contains(&key.as_str()) {
            warn!(element = %el.name, key = %key, "context provider tried to overwrite an element field");
            continue;
        }
        el.extra.insert(key, value);
    }
}

fn check_len(kind: &str, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        return Ok(());
    }
    Err(DocsiteError::Enrichment(format!(
        "{kind} context provider returned {got} entries for {expected} elements"
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use docsite_shared::{ConfigOverrides, InstallLayout, apply_defaults};

    use super::*;
    use crate::assembler::assemble;
    use crate::extractor::BasicExtractor;

    async fn assembled(metadata: Value) -> AssembledConfig {
        let effective = apply_defaults(
            Some(metadata),
            &ConfigOverrides::default(),
            &InstallLayout::new("/opt/docsite"),
        )
        .expect("defaults");
        assemble(effective, Arc::new(BasicExtractor))
            .await
            .expect("assemble")
    }

    #[test]
    fn pages_menu_excludes_index_and_sorts() {
        let pages = vec![
            PageDescriptor::named("index"),
            PageDescriptor::named("b"),
            PageDescriptor::named("a"),
        ];
        let menu = build_pages_menu("/docs", pages);

        let json = serde_json::to_value(&menu).expect("serialize");
        assert_eq!(
            json,
            json!([
                {"name": "a", "url": "/docs/a/", "title": "A"},
                {"name": "b", "url": "/docs/b/", "title": "B"},
            ])
        );
    }

    #[test]
    fn menu_sort_is_bytewise() {
        let pages = vec![PageDescriptor::named("b"), PageDescriptor::named("B")];
        let menu = build_pages_menu("", pages);
        assert_eq!(menu[0].page.name, "B");
        assert_eq!(menu[0].url, "/B/");
    }

    #[test]
    fn dash_case_titles() {
        assert_eq!(title_from_dash_case("getting-started"), "Getting Started");
        assert_eq!(title_from_dash_case("faq"), "Faq");
        assert_eq!(title_from_dash_case("api--reference"), "Api Reference");
    }

    #[tokio::test]
    async fn context_reaches_every_view() {
        let cfg = assembled(json!({
            "baseurl": "/kit",
            "categories": [{"name": "forms"}],
            "elements": [
                {"name": "button", "category": "forms"},
                {"name": "grid", "disableDemo": true},
            ],
        }))
        .await;

        let full = get_full_config(cfg, vec![PageDescriptor::named("usage")], &StandardContext)
            .await
            .expect("enrich");

        let button = &full.categories[0].elements[0];
        assert_eq!(button.extra["url"], "/kit/button/");
        assert_eq!(button.extra["demoUrl"], "/kit/button/demo/");
        assert_eq!(button.extra["showBuildStatus"], true);

        let grid = &full.elements[1];
        assert_eq!(grid.extra["url"], "/kit/grid/");
        assert!(!grid.extra.contains_key("demoUrl"));

        let demo_names: Vec<_> = full
            .elements_with_demo
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(demo_names, vec!["button", "demo-tester"]);
        assert!(full.elements_with_demo.iter().all(|e| e.extra.contains_key("demoUrl")));

        let menu = full.pages_menu.as_deref().expect("menu set");
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].url, "/kit/usage/");
        assert_eq!(menu[0].title, "Usage");
    }

    #[tokio::test]
    async fn empty_menu_is_still_emitted() {
        let cfg = assembled(json!({"showDemoTester": false})).await;
        let full = get_full_config(cfg, vec![PageDescriptor::named("index")], &StandardContext)
            .await
            .expect("enrich");

        assert_eq!(full.pages_menu, Some(Vec::new()));
        let json = serde_json::to_value(&full).expect("serialize");
        assert_eq!(json["pagesMenu"], json!([]));
    }

    /// Provider whose demo call fails and which tries to rename elements.
    struct BrokenDemo;

    impl ContextProvider for BrokenDemo {
        async fn element_context(
            &self,
            elements: &[Element],
            _baseurl: &str,
            _show_build_status: bool,
        ) -> Result<Vec<ElementContext>> {
            Ok(elements
                .iter()
                .map(|_| {
                    let mut ctx = Map::new();
                    ctx.insert("name".into(), "renamed".into());
                    ctx
                })
                .collect())
        }

        async fn demo_context(
            &self,
            _elements: &[Element],
            _baseurl: &str,
            _show_build_status: bool,
        ) -> Result<Vec<ElementContext>> {
            Err(DocsiteError::Enrichment("demo renderer unavailable".into()))
        }
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let cfg = assembled(json!({"elements": [{"name": "button"}]})).await;
        let err = get_full_config(cfg, Vec::new(), &BrokenDemo)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("demo renderer unavailable"));
    }

    #[test]
    fn reserved_keys_are_not_overwritten() {
        let mut el = Element::new("button", "button");
        let mut ctx = Map::new();
        ctx.insert("name".into(), "renamed".into());
        ctx.insert("url".into(), "/button/".into());
        apply_context(&mut el, ctx);

        assert_eq!(el.name, "button");
        assert!(!el.extra.contains_key("name"));
        assert_eq!(el.extra["url"], "/button/");
    }
}
