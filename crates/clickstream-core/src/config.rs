//! Configuration types for the clickstream transform.
//!
//! [`Config::load`] layers the embedded defaults, an optional TOML file and
//! `CLICKSTREAM__`-prefixed environment variables (`CLICKSTREAM__TRANSFORM__PROJECT_ID`).
//! [`Config::defaults`] returns the embedded defaults without touching the
//! filesystem or environment (useful in tests).

use serde::Deserialize;
use std::path::Path;

use crate::dataset::InputFormat;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[transform]
project_id       = ""
parse_user_agent = true

[input]
format = "auto"

[logging]
filter = "info"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[transform]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    /// Written to `project_id` when the raw record has none.
    #[serde(default)]
    pub project_id: String,
    /// Fill the `device.ua_*` attributes by decoding `web_info`.
    #[serde(default = "default_parse_user_agent")]
    pub parse_user_agent: bool,
    /// Extra raw source paths per canonical target, consulted before the
    /// built-in sources.
    #[serde(default)]
    pub aliases: Vec<AliasRule>,
}

/// One `[[transform.aliases]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasRule {
    /// Canonical target path, e.g. `device.web_info`.
    pub target: String,
    /// Raw source paths, tried in order.
    pub sources: Vec<String>,
}

fn default_parse_user_agent() -> bool { true }

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            parse_user_agent: default_parse_user_agent(),
            aliases: Vec::new(),
        }
    }
}

impl TransformConfig {
    /// Configured extra sources for `target`, in declaration order.
    pub fn aliases_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .filter(move |rule| rule.target == target)
            .flat_map(|rule| rule.sources.iter().map(String::as_str))
    }
}

/// `[input]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub format: InputFormat,
}

/// `[logging]` section. Read by the driver only; the core never installs a
/// subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the built-in defaults, overlaid with `path` (if given) and the
    /// environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix("CLICKSTREAM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
