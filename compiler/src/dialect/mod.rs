//! Dialect layer for multi-target output
//!
//! One `FormatProvider` per target query surface: SQL Server, MySQL,
//! PostgreSQL, SQLite, Oracle and the Dynamic LINQ expression language.

mod linq_dialect;
mod mysql_dialect;
mod oracle_dialect;
mod postgres_dialect;
mod provider;
mod sqlite_dialect;
mod sqlserver_dialect;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

pub use linq_dialect::DynamicLinqDialect;
pub use mysql_dialect::MySqlDialect;
pub use oracle_dialect::OracleDialect;
pub use postgres_dialect::PostgresDialect;
pub use provider::{
    ComparisonOp, DateUnit, FormatProvider, LikeKind, MembershipBinding, quote_segments,
};
pub use sqlite_dialect::SqliteDialect;
pub use sqlserver_dialect::SqlServerDialect;

/// Built-in dialect identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(alias = "mssql")]
    SqlServer,
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
    Oracle,
    #[serde(rename = "linq", alias = "dynamic-linq")]
    DynamicLinq,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Self::SqlServer,
        Self::MySql,
        Self::Postgres,
        Self::Sqlite,
        Self::Oracle,
        Self::DynamicLinq,
    ];

    /// Get the format provider for this dialect
    pub fn provider(&self) -> Arc<dyn FormatProvider> {
        match self {
            Dialect::SqlServer => Arc::new(SqlServerDialect),
            Dialect::MySql => Arc::new(MySqlDialect),
            Dialect::Postgres => Arc::new(PostgresDialect),
            Dialect::Sqlite => Arc::new(SqliteDialect),
            Dialect::Oracle => Arc::new(OracleDialect),
            Dialect::DynamicLinq => Arc::new(DynamicLinqDialect),
        }
    }

    /// Get the dialect name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::SqlServer => "sqlserver",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Oracle => "oracle",
            Dialect::DynamicLinq => "linq",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "oracle" => Ok(Dialect::Oracle),
            "linq" | "dynamic-linq" => Ok(Dialect::DynamicLinq),
            _ => Err(format!(
                "Invalid dialect '{}'. Valid options: sqlserver, mysql, postgres, sqlite, oracle, linq",
                s
            )),
        }
    }
}
