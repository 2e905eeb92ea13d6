use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME};
use crate::convert::DateTimeConverter;
use crate::dialect::Dialect;
use crate::filters::{FilterCompiler, FilterParser, ParserLimits, PropertyNames};

// =============================================================================
// File Configuration Structures (JSON)
// =============================================================================

/// Decoder property names (all optional)
#[derive(Debug, Default, Deserialize)]
pub struct PropertyNamesFileConfig {
    pub condition: Option<String>,
    pub rules: Option<String>,
    pub field: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub type_tag: Option<String>,
    pub data: Option<String>,
}

/// Decoder settings from file
#[derive(Debug, Default, Deserialize)]
pub struct ParserFileConfig {
    pub names: Option<PropertyNamesFileConfig>,
    pub max_json_bytes: Option<usize>,
    pub max_depth: Option<usize>,
    pub max_rules: Option<usize>,
}

/// Date parsing settings from file
#[derive(Debug, Default, Deserialize)]
pub struct DatesFileConfig {
    /// Extra chrono formats tried after rule-level formats
    pub formats: Option<Vec<String>>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub dialect: Option<Dialect>,
    pub parser: Option<ParserFileConfig>,
    pub dates: Option<DatesFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if other.dialect.is_some() {
            tracing::trace!(dialect = ?other.dialect, "Merging dialect");
            self.dialect = other.dialect;
        }

        // Parser (with nested names)
        if let Some(parser) = other.parser {
            let current = self.parser.get_or_insert_with(ParserFileConfig::default);
            if parser.max_json_bytes.is_some() {
                tracing::trace!(max_json_bytes = ?parser.max_json_bytes, "Merging parser.max_json_bytes");
                current.max_json_bytes = parser.max_json_bytes;
            }
            if parser.max_depth.is_some() {
                tracing::trace!(max_depth = ?parser.max_depth, "Merging parser.max_depth");
                current.max_depth = parser.max_depth;
            }
            if parser.max_rules.is_some() {
                tracing::trace!(max_rules = ?parser.max_rules, "Merging parser.max_rules");
                current.max_rules = parser.max_rules;
            }
            if let Some(names) = parser.names {
                let current_names = current
                    .names
                    .get_or_insert_with(PropertyNamesFileConfig::default);
                for (slot, value) in [
                    (&mut current_names.condition, names.condition),
                    (&mut current_names.rules, names.rules),
                    (&mut current_names.field, names.field),
                    (&mut current_names.operator, names.operator),
                    (&mut current_names.value, names.value),
                    (&mut current_names.type_tag, names.type_tag),
                    (&mut current_names.data, names.data),
                ] {
                    if value.is_some() {
                        *slot = value;
                    }
                }
            }
        }

        // Dates
        if let Some(dates) = other.dates {
            let current = self.dates.get_or_insert_with(DatesFileConfig::default);
            if dates.formats.is_some() {
                tracing::trace!(formats = ?dates.formats, "Merging dates.formats");
                current.formats = dates.formats;
            }
        }
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Decoder configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserConfig {
    pub names: PropertyNames,
    pub limits: ParserLimits,
}

/// Date parsing configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatesConfig {
    pub formats: Vec<String>,
}

/// Resolved application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub dialect: Dialect,
    pub parser: ParserConfig,
    pub dates: DatesConfig,
}

impl AppConfig {
    /// Load configuration with layering: defaults -> config files -> CLI/env
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.filterql/filterql.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::resolve(file_config, cli)
    }

    /// Layer a merged file config under CLI/env overrides
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_parser = file_config.parser.unwrap_or_default();
        let file_names = file_parser.names.unwrap_or_default();
        let file_dates = file_config.dates.unwrap_or_default();

        let dialect = cli.dialect.or(file_config.dialect).unwrap_or_default();

        let defaults = PropertyNames::default();
        let names = PropertyNames {
            condition: file_names.condition.unwrap_or(defaults.condition),
            rules: file_names.rules.unwrap_or(defaults.rules),
            field: file_names.field.unwrap_or(defaults.field),
            operator: file_names.operator.unwrap_or(defaults.operator),
            value: file_names.value.unwrap_or(defaults.value),
            type_tag: file_names.type_tag.unwrap_or(defaults.type_tag),
            data: file_names.data.unwrap_or(defaults.data),
        };

        let default_limits = ParserLimits::default();
        let limits = ParserLimits {
            max_json_bytes: file_parser
                .max_json_bytes
                .unwrap_or(default_limits.max_json_bytes),
            max_depth: file_parser.max_depth.unwrap_or(default_limits.max_depth),
            max_rules: file_parser.max_rules.unwrap_or(default_limits.max_rules),
        };

        let config = Self {
            dialect,
            parser: ParserConfig { names, limits },
            dates: DatesConfig {
                formats: file_dates.formats.unwrap_or_default(),
            },
        };
        config.validate()?;

        tracing::debug!(
            dialect = %config.dialect,
            max_json_bytes = config.parser.limits.max_json_bytes,
            max_depth = config.parser.limits.max_depth,
            max_rules = config.parser.limits.max_rules,
            date_formats = config.dates.formats.len(),
            "Configuration resolved"
        );

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let limits = &self.parser.limits;
        for (key, value) in [
            ("parser.max_json_bytes", limits.max_json_bytes),
            ("parser.max_depth", limits.max_depth),
            ("parser.max_rules", limits.max_rules),
        ] {
            if value == 0 {
                anyhow::bail!("{} must be greater than 0", key);
            }
        }

        let names = &self.parser.names;
        for (key, value) in [
            ("parser.names.condition", &names.condition),
            ("parser.names.rules", &names.rules),
            ("parser.names.field", &names.field),
            ("parser.names.operator", &names.operator),
            ("parser.names.value", &names.value),
            ("parser.names.type", &names.type_tag),
            ("parser.names.data", &names.data),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", key);
            }
        }

        if names.condition == names.field || names.condition == names.rules {
            anyhow::bail!("parser.names.condition must differ from field and rules");
        }

        for format in &self.dates.formats {
            if format.trim().is_empty() {
                anyhow::bail!("dates.formats must not contain empty formats");
            }
        }

        Ok(())
    }

    /// Decoder configured with these names and limits
    pub fn parser(&self) -> FilterParser {
        FilterParser::new()
            .with_names(self.parser.names.clone())
            .with_limits(self.parser.limits)
    }

    /// Compiler for the configured dialect, with extra date formats applied
    pub fn compiler(&self) -> FilterCompiler {
        let mut compiler = FilterCompiler::new(self.dialect);
        if !self.dates.formats.is_empty() {
            for tag in ["date", "datetime"] {
                compiler.register_converter(
                    tag,
                    DateTimeConverter::with_formats(self.dates.formats.clone()),
                );
            }
        }
        compiler
    }
}

/// Expand `~` and `~/` to the home directory
fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else {
        PathBuf::from(path)
    }
}

/// Get the profile config path (~/.filterql/filterql.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
