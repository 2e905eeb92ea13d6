// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths, identifiers and log targets)
pub const APP_NAME_LOWER: &str = "filterql";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".filterql";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "filterql.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FILTERQL_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FILTERQL_LOG";

/// Environment variable for the target dialect
pub const ENV_DIALECT: &str = "FILTERQL_DIALECT";

// =============================================================================
// Logging Defaults
// =============================================================================

/// Log filter used when neither FILTERQL_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "warn,filterql=info";

// =============================================================================
// Input
// =============================================================================

/// `--input` value meaning standard input
pub const STDIN_PATH: &str = "-";
