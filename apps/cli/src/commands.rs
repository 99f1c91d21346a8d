//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use docsite_core::{
    AssembledConfig, BasicExtractor, StandardContext, add_element, discover_pages, get_config,
    get_full_config,
};
use docsite_shared::{ConfigOverrides, INSTALL_DIR_ENV, InstallLayout};
use serde_json::{Map, Value};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsite — configuration for element documentation sites.
#[derive(Parser)]
#[command(
    name = "docsite",
    version,
    about = "Assemble and edit the metadata.json of a documentation site.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Directory containing metadata.json.
    #[arg(long, default_value = ".", global = true)]
    pub dir: PathBuf,

    /// Install root holding includes/, layouts/, pages/, templates/.
    #[arg(long, env = INSTALL_DIR_ENV, global = true)]
    pub install_dir: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the assembled config as JSON.
    Config {
        /// Also add element context and the pages menu.
        #[arg(long)]
        full: bool,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Validate metadata.json and print a short summary.
    Check {
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Append an element to metadata.json.
    Add {
        /// Element name.
        name: String,

        /// Human-readable name.
        #[arg(long)]
        display_name: Option<String>,

        /// Category the element belongs to.
        #[arg(long)]
        category: Option<String>,

        /// Directory name for the element's pages.
        #[arg(long)]
        page_dir_name: Option<String>,

        /// Install source (package name or path).
        #[arg(long)]
        install: Option<String>,
    },
}

/// Flags that override values from metadata.json.
#[derive(Args, Debug, Default)]
pub(crate) struct OverrideArgs {
    /// Path prefix for generated URLs.
    #[arg(long)]
    pub baseurl: Option<String>,

    /// Absolute site URL.
    #[arg(long)]
    pub absolute_baseurl: Option<String>,

    /// Footer text.
    #[arg(long)]
    pub footer_text: Option<String>,

    /// Site name.
    #[arg(long)]
    pub site_name: Option<String>,

    /// Brand color.
    #[arg(long)]
    pub brand_color: Option<String>,

    /// Do not inject the demo tester element.
    #[arg(long)]
    pub no_demo_tester: bool,

    /// Hide build status badges.
    #[arg(long)]
    pub hide_build_status: bool,

    /// Markdown page extension, with the leading dot (repeatable).
    #[arg(long = "markdown-ext")]
    pub markdown_extensions: Vec<String>,

    /// Development mode.
    #[arg(long)]
    pub dev: bool,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            baseurl: args.baseurl,
            absolute_baseurl: args.absolute_baseurl,
            footer_text: args.footer_text,
            site_name: args.site_name,
            brand_color: args.brand_color,
            show_demo_tester: args.no_demo_tester.then_some(false),
            show_build_status: args.hide_build_status.then_some(false),
            markdown_extensions: (!args.markdown_extensions.is_empty())
                .then_some(args.markdown_extensions),
            dev_env: args.dev.then_some(true),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsite=info",
        1 => "docsite=debug",
        _ => "docsite=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let layout = cli
        .install_dir
        .map(InstallLayout::new)
        .unwrap_or_else(InstallLayout::discover);

    match cli.command {
        Command::Config { full, overrides } => {
            cmd_config(&cli.dir, &layout, overrides.into(), full).await
        }
        Command::Check { overrides } => cmd_check(&cli.dir, &layout, overrides.into()).await,
        Command::Add {
            name,
            display_name,
            category,
            page_dir_name,
            install,
        } => {
            let element = element_record(name, display_name, category, page_dir_name, install);
            cmd_add(&cli.dir, element)
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn assemble(
    dir: &Path,
    layout: &InstallLayout,
    overrides: &ConfigOverrides,
) -> Result<AssembledConfig> {
    let config = get_config(dir, overrides, layout, Arc::new(BasicExtractor))
        .await
        .wrap_err_with(|| format!("failed to assemble config in {}", dir.display()))?;
    Ok(config)
}

async fn cmd_config(
    dir: &Path,
    layout: &InstallLayout,
    overrides: ConfigOverrides,
    full: bool,
) -> Result<()> {
    let mut config = assemble(dir, layout, &overrides).await?;

    if full {
        let pages = discover_pages(
            &config.settings.pages_dir,
            &config.settings.markdown_extensions,
        )?;
        config = get_full_config(config, pages, &StandardContext).await?;
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn cmd_check(dir: &Path, layout: &InstallLayout, overrides: ConfigOverrides) -> Result<()> {
    let config = assemble(dir, layout, &overrides).await?;

    info!(
        elements = config.total_elements,
        categories = config.categories.len(),
        "metadata.json is valid"
    );
    println!(
        "{} elements, {} categories",
        config.total_elements,
        config.categories.len()
    );
    Ok(())
}

fn cmd_add(dir: &Path, element: Value) -> Result<()> {
    add_element(dir, element)
        .wrap_err_with(|| format!("failed to add element in {}", dir.display()))?;
    println!("  Element added to {}", dir.join("metadata.json").display());
    Ok(())
}

/// Build the raw element record written by `add`, omitting unset fields.
fn element_record(
    name: String,
    display_name: Option<String>,
    category: Option<String>,
    page_dir_name: Option<String>,
    install: Option<String>,
) -> Value {
    let mut record = Map::new();
    record.insert("name".into(), name.into());

    for (key, value) in [
        ("displayName", display_name),
        ("category", category),
        ("pageDirName", page_dir_name),
        ("install", install),
    ] {
        if let Some(value) = value {
            record.insert(key.into(), value.into());
        }
    }

    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serde_json::json;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn override_flags_map_to_overrides() {
        let cli = Cli::parse_from([
            "docsite",
            "config",
            "--baseurl",
            "/docs",
            "--no-demo-tester",
            "--markdown-ext",
            ".md",
            "--markdown-ext",
            ".markdown",
        ]);
        let Command::Config { full, overrides } = cli.command else {
            panic!("expected config command");
        };
        assert!(!full);

        let overrides = ConfigOverrides::from(overrides);
        assert_eq!(overrides.baseurl.as_deref(), Some("/docs"));
        assert_eq!(overrides.show_demo_tester, Some(false));
        assert_eq!(overrides.show_build_status, None);
        assert_eq!(
            overrides.markdown_extensions,
            Some(vec![".md".to_string(), ".markdown".to_string()])
        );
        assert_eq!(overrides.dev_env, None);
    }

    #[test]
    fn element_record_omits_unset_fields() {
        let record = element_record("wk-tab".into(), None, Some("layout".into()), None, None);
        assert_eq!(record, json!({"name": "wk-tab", "category": "layout"}));
    }
}
