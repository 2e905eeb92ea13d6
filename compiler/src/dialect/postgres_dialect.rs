//! PostgreSQL dialect implementation

use super::provider::{
    ComparisonOp, DateUnit, FormatProvider, MembershipBinding, quote_segments,
};

/// PostgreSQL dialect
pub struct PostgresDialect;

impl FormatProvider for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn format_field_name(&self, name: &str) -> String {
        quote_segments(name, '"', '"')
    }

    fn format_parameter_name(&self, index: usize) -> String {
        // PostgreSQL placeholders are 1-based
        format!("${}", index + 1)
    }

    fn parameter_prefix(&self) -> &'static str {
        "$"
    }

    fn membership_binding(&self) -> MembershipBinding {
        MembershipBinding::NativeList
    }

    fn membership(&self, field: &str, params: &[String], negated: bool) -> String {
        let param = params.first().map(String::as_str).unwrap_or_default();
        if negated {
            format!("{} <> ALL({})", field, param)
        } else {
            format!("{} = ANY({})", field, param)
        }
    }

    fn date_diff(
        &self,
        unit: DateUnit,
        field: &str,
        op: ComparisonOp,
        param: &str,
    ) -> Option<String> {
        let age = format!("AGE(NOW(), {})", field);
        let expr = match unit {
            DateUnit::Year => format!("EXTRACT(YEAR FROM {})", age),
            DateUnit::Month => format!(
                "(EXTRACT(YEAR FROM {age}) * 12 + EXTRACT(MONTH FROM {age}))",
                age = age
            ),
            DateUnit::Quarter => format!(
                "FLOOR((EXTRACT(YEAR FROM {age}) * 12 + EXTRACT(MONTH FROM {age})) / 3)",
                age = age
            ),
            fixed => {
                let seconds = fixed.fixed_seconds()?;
                format!(
                    "FLOOR(EXTRACT(EPOCH FROM (NOW() - {})) / {})",
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
    use crate::dialect::LikeKind;

    #[test]
    fn test_placeholder() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.format_parameter_name(0), "$1");
        assert_eq!(dialect.format_parameter_name(4), "$5");
    }

    #[test]
    fn test_field_quoting() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.format_field_name("public.users"),
            "\"public\".\"users\""
        );
    }

    #[test]
    fn test_like_uses_pipes() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.like("\"name\"", "$1", LikeKind::BeginsWith, false),
            "\"name\" LIKE $1 || '%'"
        );
    }

    #[test]
    fn test_membership_native_array() {
        let dialect = PostgresDialect;
        let params = vec!["$2".to_string()];
        assert_eq!(dialect.membership_binding(), MembershipBinding::NativeList);
        assert_eq!(dialect.membership("\"id\"", &params, false), "\"id\" = ANY($2)");
        assert_eq!(dialect.membership("\"id\"", &params, true), "\"id\" <> ALL($2)");
    }

    #[test]
    fn test_date_diff_fixed_unit() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.date_diff(DateUnit::Day, "\"created\"", ComparisonOp::Le, "$1"),
            Some("FLOOR(EXTRACT(EPOCH FROM (NOW() - \"created\")) / 86400) <= $1".to_string())
        );
    }

    #[test]
    fn test_date_diff_year() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.date_diff(DateUnit::Year, "\"born\"", ComparisonOp::Ge, "$1"),
            Some("EXTRACT(YEAR FROM AGE(NOW(), \"born\")) >= $1".to_string())
        );
    }
}
