//! Episodic - a static site generator for webcast and podcast sites.

mod build;
mod cli;
mod config;
mod data;
mod generator;
mod init;
mod listing;
mod logger;
mod render;
mod report;
mod seo;
mod serve;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use data::{
    SiteData,
    validate::{Summary, validate_episodes},
};
use init::new_site;
use listing::{FilterState, ListingView, TagCatalog};
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Init { .. } => new_site(config),
        Commands::Build { .. } => build_site(config).map(|_| ()),
        Commands::Serve { .. } => {
            let data = build_site(config)?;
            serve_site(config, data)
        }
        Commands::Validate => validate_site(config),
        Commands::Episodes {
            tag,
            query,
            tags,
            json,
        } => list_episodes(config, tag.as_deref(), query.as_deref(), *tags, *json),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

/// Check the archive. Fails when any issue is found.
///
/// Episodes are read without the load-time uniqueness check so duplicate ids
/// show up as issues instead of a load error.
fn validate_site(config: &SiteConfig) -> Result<()> {
    let episodes = data::load_episodes(&config.build.content.join(data::EPISODES_FILE))?;
    let issues = validate_episodes(&episodes);
    print!("{}", report::validation_report(&issues, &Summary::of(&episodes)));

    if !issues.is_empty() {
        bail!("validation failed with {} issue(s)", issues.len());
    }
    Ok(())
}

/// Print the filtered listing, or the tag catalog with `--tags`.
fn list_episodes(
    config: &SiteConfig,
    tag: Option<&str>,
    query: Option<&str>,
    tags: bool,
    json: bool,
) -> Result<()> {
    let data = SiteData::load(&config.build.content)?;

    if tags {
        let catalog = TagCatalog::from_episodes(&data.episodes);
        if json {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        } else {
            print!("{}", report::tag_table(&catalog));
        }
        return Ok(());
    }

    let state = FilterState::new(tag, query.unwrap_or_default());
    let view = ListingView::derive(&data, state);
    if json {
        println!("{}", serde_json::to_string_pretty(&view.visible)?);
    } else {
        print!("{}", report::episode_table(&view));
    }
    Ok(())
}
