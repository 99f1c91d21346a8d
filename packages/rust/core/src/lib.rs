//! Config assembly pipeline for docsite.
//!
//! This crate turns `metadata.json` plus CLI overrides into a validated,
//! linked [`AssembledConfig`], enriches it for rendering, and owns the one
//! write path back into `metadata.json` ([`add_element`]).

pub mod append;
pub mod assembler;
pub mod enrichment;
pub mod extractor;
pub mod link;
pub mod pages;

pub use append::add_element;
pub use assembler::{AssembledConfig, assemble, get_config};
pub use enrichment::{ContextProvider, ElementContext, StandardContext, get_full_config};
pub use extractor::{BasicExtractor, ElementExtractor};
pub use link::link_elements_with_categories;
pub use pages::discover_pages;
