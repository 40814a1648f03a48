//! Project configuration management for `catalog.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[site]`    | Supported locales, default locale, cookie name   |
//! | `[route]`   | Admin, back-office, API and asset prefixes       |
//! | `[content]` | Content export directory and repository cache    |
//! | `[synth]`   | Output tree, template probe, redirects, verify   |
//! | `[repair]`  | Slug repair policy and audit log                 |
//! | `[serve]`   | Edge preview server (interface, port)            |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    CacheConfig, ContentConfig, RepairConfig, RouteConfig, ServeConfig, SiteSectionConfig,
    SynthConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    log,
    utils::path::{normalize_path, resolve_in_root},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing catalog.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Locale settings
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Router prefixes
    #[serde(default)]
    pub route: RouteConfig,

    /// Content repository settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Artifact synthesis settings
    #[serde(default)]
    pub synth: SynthConfig,

    /// Slug repair settings
    #[serde(default)]
    pub repair: RepairConfig,

    /// Edge preview server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory; without a config file every
    /// section takes its defaults and the root is the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        config.apply_command_options(cli);
        config.normalize_paths(&root);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Output tree (absolute after loading).
    pub fn output_dir(&self) -> &Path {
        &self.synth.output
    }

    /// Content export directory (absolute after loading).
    pub fn content_dir(&self) -> &Path {
        &self.content.dir
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply global and command-specific CLI overrides.
    fn apply_command_options(&mut self, cli: &Cli) {
        Self::update_option(&mut self.content.dir, cli.content.as_ref());
        Self::update_option(&mut self.synth.output, cli.output.as_ref());

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.root = root.clone();
        if !self.config_path.as_os_str().is_empty() {
            self.config_path = normalize_path(&self.config_path);
        }

        self.content.dir = resolve_in_root(&self.content.dir, &root);
        self.synth.output = normalize_path(&root.join(&self.synth.output));
        self.synth.redirects = normalize_path(&root.join(&self.synth.redirects));
        self.repair.audit_log = resolve_in_root(&self.repair.audit_log, &root);
        // template_candidates and must_exist stay relative to the output dir
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.route.validate(&mut diag);
        self.content.validate(&mut diag);
        self.synth.validate(&mut diag);

        if self.site.title.trim().is_empty() {
            diag.warn(FieldPath::new("site.title"), "empty title in the embedded shell page");
        }

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Parsed config rooted at `root`, with paths normalized like a real load.
#[cfg(test)]
pub fn test_config_at(root: &Path, extra: &str) -> SiteConfig {
    let mut config = test_parse_config(extra);
    config.normalize_paths(root);
    config
}

// ============================================================================
// tests
// ============================================================================
