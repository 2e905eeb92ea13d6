//! SQLite dialect implementation

use super::provider::{ComparisonOp, DateUnit, FormatProvider, quote_segments};

/// SQLite dialect
pub struct SqliteDialect;

impl FormatProvider for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn format_field_name(&self, name: &str) -> String {
        quote_segments(name, '"', '"')
    }

    fn format_parameter_name(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn parameter_prefix(&self) -> &'static str {
        "?"
    }

    fn date_diff(
        &self,
        unit: DateUnit,
        field: &str,
        op: ComparisonOp,
        param: &str,
    ) -> Option<String> {
        // julianday() differences are in fractional days; calendar units have no
        // fixed length and are not supported
        let seconds = unit.fixed_seconds()?;
        Some(format!(
            "CAST((julianday('now') - julianday({})) * 86400 / {} AS INTEGER) {} {}",
            field,
            seconds,
            op.sql(),
            param
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.format_parameter_name(0), "?");
        assert_eq!(dialect.format_parameter_name(5), "?");
    }

    #[test]
    fn test_null_and_empty_checks() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.null_check("\"a\"", false), "\"a\" IS NULL");
        assert_eq!(dialect.null_check("\"a\"", true), "\"a\" IS NOT NULL");
        assert_eq!(dialect.empty_check("\"a\"", false), "\"a\" = ''");
        assert_eq!(dialect.empty_check("\"a\"", true), "\"a\" <> ''");
    }

    #[test]
    fn test_between() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.between("\"age\"", "?", "?", true),
            "\"age\" NOT BETWEEN ? AND ?"
        );
    }

    #[test]
    fn test_date_diff_hours() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.date_diff(DateUnit::Hour, "\"ts\"", ComparisonOp::Lt, "?"),
            Some(
                "CAST((julianday('now') - julianday(\"ts\")) * 86400 / 3600 AS INTEGER) < ?"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_date_diff_calendar_unit_unsupported() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.date_diff(DateUnit::Month, "\"ts\"", ComparisonOp::Eq, "?"),
            None
        );
    }
}
