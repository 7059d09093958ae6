//! lod CLI tool
//!
//! Command-line interface for annotating rendered page content with entity links and emitting
//! JSON-LD with lod-core.
//!
//! ## Commands
//!
//! - `slug <text>`: Print the URL slug of a name
//! - `url <name>`: Print the absolute identifier of an indexed entity
//! - `annotate <input>`: Number paragraphs/blockquotes and link entity mentions
//! - `references <input>`: Annotate, then print the paragraph → references JSON
//! - `graph <name>`: Print the JSON-LD page graph for a dataset record
//! - `mentions <input>`: Annotate, then print the JSON-LD mentions log
//!
//! Inputs ending in `.md` are rendered from markdown first. `LOD_SITE_URL` and `LOD_BASE_URL`
//! override the config file's `site_url`/`base_url`.

use clap::{Args, Parser, Subcommand};
use lod_core::{
    load_records, markup::markdown_to_html, slugify, DataRecord, EntityIndex, Filters, LodError,
    Page, SiteConfig,
};
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "lod")]
#[command(author, version, about = "Link entity mentions and emit JSON-LD for static sites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SiteArgs {
    /// Site configuration (.toml, .yml/.yaml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset of entity records (.json or .yml/.yaml)
    #[arg(short, long)]
    dataset: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URL slug for a name
    Slug {
        text: String,
    },

    /// Print the absolute identifier of an indexed entity
    Url {
        #[command(flatten)]
        site: SiteArgs,

        /// Entity name as it appears in the dataset
        name: String,
    },

    /// Assign paragraph/blockquote ids and link entity mentions
    Annotate {
        #[command(flatten)]
        site: SiteArgs,

        /// Rendered HTML (or markdown) content
        input: PathBuf,
    },

    /// Annotate content and print the paragraph references JSON
    References {
        #[command(flatten)]
        site: SiteArgs,

        input: PathBuf,
    },

    /// Print the JSON-LD page graph for a dataset record
    Graph {
        #[command(flatten)]
        site: SiteArgs,

        /// Name of the record to describe
        name: String,
    },

    /// Annotate content and print the JSON-LD mentions log
    Mentions {
        #[command(flatten)]
        site: SiteArgs,

        input: PathBuf,

        /// Site-relative URL of the page the content belongs to
        #[arg(long, default_value = "/")]
        page_url: String,
    },
}

struct Site {
    config: SiteConfig,
    records: Vec<DataRecord>,
    index: EntityIndex,
}

impl Site {
    fn load(args: &SiteArgs) -> Result<Site, LodError> {
        let mut config = match args.config {
            Some(ref path) => SiteConfig::from_path(path)?,
            None => SiteConfig::default(),
        };
        if let Ok(site_url) = std::env::var("LOD_SITE_URL") {
            config.site_url = site_url;
        }
        if let Ok(base_url) = std::env::var("LOD_BASE_URL") {
            config.base_url = base_url;
        }
        let config = config.normalized()?;
        let records = load_records(&args.dataset)?;
        let index = EntityIndex::from_records(&records, config.conflict_policy)?;
        tracing::info!(
            "Indexed {} entities from {} records",
            index.len(),
            records.len()
        );
        Ok(Site {
            config,
            records,
            index,
        })
    }

    fn filters(&self) -> Result<Filters<'_>, LodError> {
        Filters::new(&self.config, &self.index)
    }
}

fn read_content(path: &Path) -> Result<String, LodError> {
    let content = read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("md") | Some("markdown") => markdown_to_html(&content),
        _ => Ok(content),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Slug { text } => {
            println!("{}", slugify(&text));
        }

        Commands::Url { site, name } => {
            let site = Site::load(&site)?;
            let collection = site
                .index
                .resolve(&name)
                .ok_or_else(|| LodError::NotFound(format!("entity '{name}'")))?;
            println!("{}", site.filters()?.entity_url(&name, collection));
        }

        Commands::Annotate { site, input } => {
            let site = Site::load(&site)?;
            let content = read_content(&input)?;
            println!("{}", site.filters()?.annotate_and_assign_ids(&content)?);
        }

        Commands::References { site, input } => {
            let site = Site::load(&site)?;
            let filters = site.filters()?;
            let annotated = filters.annotate_and_assign_ids(&read_content(&input)?)?;
            println!("{}", filters.paragraph_references(&annotated)?);
        }

        Commands::Graph { site, name } => {
            let site = Site::load(&site)?;
            let record = site
                .records
                .iter()
                .find(|record| record.name == name)
                .ok_or_else(|| LodError::NotFound(format!("record '{name}'")))?;
            let page = Page::from_record(record, &site.config);
            println!("{}", site.filters()?.page_graph(&page)?);
        }

        Commands::Mentions {
            site,
            input,
            page_url,
        } => {
            let site = Site::load(&site)?;
            let filters = site.filters()?;
            let page = Page {
                content: filters.annotate_and_assign_ids(&read_content(&input)?)?,
                url: page_url,
                context: site.config.context.clone(),
                ..Default::default()
            };
            println!("{}", filters.mentions_graph(&page)?);
        }
    }

    Ok(())
}
