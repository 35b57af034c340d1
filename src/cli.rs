//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Episodic static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to site root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to site root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Assets directory path (relative to site root)
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Config file name (default: episodic.toml)
    #[arg(short = 'C', long, default_value = "episodic.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// enable rss feed generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub rss: Option<bool>,

    /// enable sitemap generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Override base URL for the site.
    ///
    /// Useful for preview deployments where the public URL differs from
    /// the one in episodic.toml:
    ///   episodic build --base-url "https://preview.example.com"
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a template site
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Load and validate the data, then render the whole site
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the site. Rebuild on change automatically
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Check episode, host and blog data for consistency
    Validate,

    /// List episodes matching a tag and/or search query
    Episodes {
        /// Only episodes carrying this exact tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Case-insensitive search over title, description, tags and guest names
        #[arg(short, long)]
        query: Option<String>,

        /// Print the tag catalog with episode counts instead
        #[arg(long)]
        tags: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Build arguments of `build` or `serve`, if any.
    pub fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => {
                Some(build_args)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from(["episodic", "build", "--minify", "false", "--rss"]);
        let args = cli.build_args().unwrap();
        assert_eq!(args.minify, Some(false));
        assert_eq!(args.rss, Some(true));
        assert_eq!(args.sitemap, None);
        assert!(matches!(cli.command, Commands::Build { .. }));
    }

    #[test]
    fn test_parse_serve_options() {
        let cli = Cli::parse_from(["episodic", "-r", "site", "serve", "-p", "8080", "-w", "false"]);
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        match cli.command {
            Commands::Serve { port, watch, .. } => {
                assert_eq!(port, Some(8080));
                assert_eq!(watch, Some(false));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_episodes_filter() {
        let cli = Cli::parse_from(["episodic", "episodes", "--tag", "AI & Agents", "-q", "mcp"]);
        match cli.command {
            Commands::Episodes { tag, query, tags, json } => {
                assert_eq!(tag.as_deref(), Some("AI & Agents"));
                assert_eq!(query.as_deref(), Some("mcp"));
                assert!(!tags);
                assert!(!json);
            }
            _ => panic!("expected episodes"),
        }
        assert_eq!(
            Cli::parse_from(["episodic", "validate"]).config,
            PathBuf::from("episodic.toml")
        );
    }
}
