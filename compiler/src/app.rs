//! Core application

use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG, STDIN_PATH};
use crate::dialect::Dialect;

pub struct CoreApp;

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Commands::Dialects => {
                print!("{}", render_dialects());
                Ok(())
            }
            Commands::Compile { input, pretty } => {
                let config = AppConfig::load(&cli_config)?;
                let document = read_input(&input)?;
                let output = compile_document(&config, &document, pretty)?;
                println!("{}", output);
                Ok(())
            }
        }
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

/// Read the filter document from a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        tracing::debug!("Reading filter document from stdin");
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read filter document from stdin")?;
        return Ok(content);
    }

    tracing::debug!(path = %path.display(), "Reading filter document");
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read filter document: {}", path.display()))
}

/// Decode, compile and serialize one filter document as `{"sql", "params"}`
pub fn compile_document(config: &AppConfig, document: &str, pretty: bool) -> Result<String> {
    let tree = config
        .parser()
        .parse_str(document)
        .context("Failed to decode filter document")?;
    let compiled = config
        .compiler()
        .build(&tree)
        .context("Failed to compile filter")?;

    tracing::info!(
        dialect = %config.dialect,
        params = compiled.params.len(),
        "Filter compiled"
    );

    let output = if pretty {
        serde_json::to_string_pretty(&compiled)
    } else {
        serde_json::to_string(&compiled)
    };
    output.context("Failed to serialize compiled filter")
}

/// One line per dialect: name, quoted sample field, first placeholders
fn render_dialects() -> String {
    let mut out = String::new();
    for dialect in Dialect::ALL {
        let provider = dialect.provider();
        let _ = writeln!(
            out,
            "{:<10} {:<16} {}, {}",
            dialect.name(),
            provider.format_field_name("Name"),
            provider.format_parameter_name(0),
            provider.format_parameter_name(1),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOCUMENT: &str = r#"{
        "condition": "AND",
        "rules": [
            {"field": "Name", "operator": "equal", "value": "John"},
            {"field": "Age", "operator": "greater", "value": "18", "type": "integer"}
        ]
    }"#;

    #[test]
    fn test_compile_document_default_dialect() {
        let output = compile_document(&AppConfig::default(), DOCUMENT, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            json!({"sql": "[Name] = @p0 AND [Age] > @p1", "params": ["John", 18]})
        );
    }

    #[test]
    fn test_compile_document_postgres_pretty() {
        let config = AppConfig {
            dialect: Dialect::Postgres,
            ..Default::default()
        };
        let output = compile_document(&config, DOCUMENT, true).unwrap();
        assert!(output.contains('\n'));
        assert!(output.contains("\\\"Name\\\" = $1"));
    }

    #[test]
    fn test_compile_document_reports_decode_error() {
        let err = compile_document(&AppConfig::default(), "[]", false).unwrap_err();
        assert!(err.to_string().contains("Failed to decode filter document"));
    }

    #[test]
    fn test_compile_document_reports_compile_error() {
        let doc = r#"{"condition": "AND", "rules": [{"field": "x", "operator": "near", "value": 1}]}"#;
        let err = compile_document(&AppConfig::default(), doc, false).unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported operator: near"));
    }

    #[test]
    fn test_compile_document_rejects_integer_overflow() {
        let doc = r#"{"condition": "AND", "rules": [
            {"field": "Id", "operator": "equal", "value": 9223372036854775808, "type": "integer"}
        ]}"#;
        let err = compile_document(&AppConfig::default(), doc, false).unwrap_err();
        assert!(format!("{:#}", err).contains("out of range"));
    }

    #[test]
    fn test_read_input_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut temp_file, DOCUMENT.as_bytes()).unwrap();
        assert_eq!(read_input(temp_file.path()).unwrap(), DOCUMENT);
        assert!(read_input(Path::new("/nonexistent/filter.json")).is_err());
    }

    #[test]
    fn test_render_dialects() {
        let listing = render_dialects();
        assert_eq!(listing.lines().count(), Dialect::ALL.len());
        assert!(listing.contains("postgres"));
        assert!(listing.contains("$1, $2"));
        assert!(listing.contains("@p0, @p1"));
    }
}
