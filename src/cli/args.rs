//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::ContentType;

/// Route, slug and static artifact consistency engine
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Content export directory path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file path (default: catalog.toml)
    #[arg(short = 'C', long, global = true, default_value = "catalog.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check CMS slugs for missing, malformed and duplicate values
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },

    /// Fill gaps in the exported static tree with shell pages
    #[command(visible_alias = "s")]
    Synthesize {
        #[command(flatten)]
        args: SynthArgs,
    },

    /// Validate, synthesize, copy redirect rules and verify the output tree
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: SynthArgs,
    },

    /// Rewrite defective slugs with the canonical policy (dry run by default)
    Repair {
        #[command(flatten)]
        args: RepairArgs,
    },

    /// Show the routing decision for request paths
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },

    /// Compose the canonical URL of a page
    Compose {
        /// Locale code (e.g. zh-CN)
        locale: String,

        /// Content type of the page
        #[arg(value_enum, value_name = "TYPE")]
        content_type: ContentType,

        /// Page slug (the brand slug for brand pages, else the item slug)
        slug: String,

        /// Brand the item belongs to (products, solutions, support)
        #[arg(short, long)]
        brand: Option<String>,
    },

    /// Preview the output tree behind the edge router
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Validate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Content type to scan. If omitted, scans every type.
    #[arg(value_enum, value_name = "TYPE")]
    pub content_type: Option<ContentType>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Shared arguments for Synthesize and Build commands
#[derive(clap::Args, Debug, Clone)]
pub struct SynthArgs {
    /// Read the `locales × brands × items` manifest from a JSON file
    /// instead of deriving it from the content exports
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Write the artifact manifest (file path, key, origin) as JSON
    #[arg(long = "manifest-out", value_hint = clap::ValueHint::FilePath)]
    pub manifest_out: Option<PathBuf>,
}

/// Repair command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RepairArgs {
    /// Content type to repair
    #[arg(value_enum, value_name = "TYPE")]
    pub content_type: ContentType,

    /// Write repaired slugs back to the content exports
    #[arg(short, long)]
    pub apply: bool,

    /// Skip the confirmation prompt when applying
    #[arg(short, long)]
    pub yes: bool,
}

/// Route command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RouteArgs {
    /// Request paths (may include a query string)
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,

    /// Apply locale-prefix enforcement like the edge server does
    #[arg(short, long)]
    pub edge: bool,

    /// Accept-Language header to negotiate with (implies --edge)
    #[arg(long, value_name = "HEADER")]
    pub accept_language: Option<String>,

    /// Locale cookie value to negotiate with (implies --edge)
    #[arg(long, value_name = "LOCALE")]
    pub cookie: Option<String>,
}

impl RouteArgs {
    pub fn is_edge(&self) -> bool {
        self.edge || self.accept_language.is_some() || self.cookie.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::parse_from(["catalog-routes", "validate", "product", "--json"]);
        match cli.command {
            Commands::Validate { args } => {
                assert_eq!(args.content_type, Some(ContentType::Product));
                assert!(args.json);
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["catalog-routes", "synthesize", "-o", "dist", "-v"]);
        assert_eq!(cli.output, Some(PathBuf::from("dist")));
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("catalog.toml"));
    }

    #[test]
    fn test_route_hints_imply_edge() {
        let cli = Cli::parse_from(["catalog-routes", "route", "/brands", "--cookie", "en"]);
        match cli.command {
            Commands::Route { args } => assert!(args.is_edge()),
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn test_parse_compose() {
        let cli = Cli::parse_from([
            "catalog-routes", "compose", "en", "product", "55555", "--brand", "cree",
        ]);
        match cli.command {
            Commands::Compose { locale, content_type, slug, brand } => {
                assert_eq!(locale, "en");
                assert_eq!(content_type, ContentType::Product);
                assert_eq!(slug, "55555");
                assert_eq!(brand.as_deref(), Some("cree"));
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn test_repair_requires_type() {
        assert!(Cli::try_parse_from(["catalog-routes", "repair"]).is_err());
        assert!(Cli::try_parse_from(["catalog-routes", "repair", "widget"]).is_err());
    }
}
