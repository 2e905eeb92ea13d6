//! SQL Server dialect implementation

use super::provider::{ComparisonOp, DateUnit, FormatProvider, LikeKind, quote_segments};

/// SQL Server (T-SQL) dialect
pub struct SqlServerDialect;

impl FormatProvider for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn format_field_name(&self, name: &str) -> String {
        quote_segments(name, '[', ']')
    }

    fn format_parameter_name(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn parameter_prefix(&self) -> &'static str {
        "@p"
    }

    fn like(&self, field: &str, param: &str, kind: LikeKind, negated: bool) -> String {
        // T-SQL concatenates with +
        let mut pattern = String::new();
        if kind.leading_wildcard() {
            pattern.push_str("'%' + ");
        }
        pattern.push_str(param);
        if kind.trailing_wildcard() {
            pattern.push_str(" + '%'");
        }
        let not = if negated { "NOT " } else { "" };
        format!("{} {}LIKE {}", field, not, pattern)
    }

    fn date_diff(
        &self,
        unit: DateUnit,
        field: &str,
        op: ComparisonOp,
        param: &str,
    ) -> Option<String> {
        Some(format!(
            "DATEDIFF({}, {}, GETDATE()) {} {}",
            unit.as_str(),
            field,
            op.sql(),
            param
        ))
    }
}
