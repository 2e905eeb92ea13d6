//! Oracle dialect implementation

use super::provider::{ComparisonOp, DateUnit, FormatProvider, quote_segments};

/// Oracle dialect with named `:pN` bind variables
pub struct OracleDialect;

impl FormatProvider for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn format_field_name(&self, name: &str) -> String {
        quote_segments(name, '"', '"')
    }

    fn format_parameter_name(&self, index: usize) -> String {
        format!(":p{}", index)
    }

    fn parameter_prefix(&self) -> &'static str {
        ":p"
    }

    fn empty_check(&self, field: &str, negated: bool) -> String {
        // Oracle stores '' as NULL
        self.null_check(field, negated)
    }

    fn date_diff(
        &self,
        unit: DateUnit,
        field: &str,
        op: ComparisonOp,
        param: &str,
    ) -> Option<String> {
        let months = format!("MONTHS_BETWEEN(SYSDATE, {})", field);
        let expr = match unit {
            DateUnit::Year => format!("TRUNC({} / 12)", months),
            DateUnit::Quarter => format!("TRUNC({} / 3)", months),
            DateUnit::Month => format!("TRUNC({})", months),
            fixed => {
                let seconds = fixed.fixed_seconds()?;
                format!(
                    "TRUNC((SYSDATE - CAST({} AS DATE)) * 86400 / {})",
                    field, seconds
                )
            }
        };
        Some(format!("{} {} {}", expr, op.sql(), param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_named() {
        let dialect = OracleDialect;
        assert_eq!(dialect.format_parameter_name(0), ":p0");
        assert_eq!(dialect.format_parameter_name(3), ":p3");
    }

    #[test]
    fn test_empty_check_is_null_check() {
        let dialect = OracleDialect;
        assert_eq!(dialect.empty_check("\"NOTE\"", false), "\"NOTE\" IS NULL");
        assert_eq!(dialect.empty_check("\"NOTE\"", true), "\"NOTE\" IS NOT NULL");
    }

    #[test]
    fn test_date_diff_month() {
        let dialect = OracleDialect;
        assert_eq!(
            dialect.date_diff(DateUnit::Month, "\"HIRED\"", ComparisonOp::Ge, ":p0"),
            Some("TRUNC(MONTHS_BETWEEN(SYSDATE, \"HIRED\")) >= :p0".to_string())
        );
    }

    #[test]
    fn test_date_diff_day() {
        let dialect = OracleDialect;
        assert_eq!(
            dialect.date_diff(DateUnit::Day, "\"HIRED\"", ComparisonOp::Eq, ":p1"),
            Some("TRUNC((SYSDATE - CAST(\"HIRED\" AS DATE)) * 86400 / 86400) = :p1".to_string())
        );
    }
}
