//! MySQL / MariaDB dialect implementation

use super::provider::{ComparisonOp, DateUnit, FormatProvider, LikeKind, quote_segments};

/// MySQL dialect
pub struct MySqlDialect;

impl FormatProvider for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn format_field_name(&self, name: &str) -> String {
        quote_segments(name, '`', '`')
    }

    fn format_parameter_name(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn parameter_prefix(&self) -> &'static str {
        "?"
    }

    fn like(&self, field: &str, param: &str, kind: LikeKind, negated: bool) -> String {
        // || is logical OR unless PIPES_AS_CONCAT is set
        let mut parts = Vec::with_capacity(3);
        if kind.leading_wildcard() {
            parts.push("'%'");
        }
        parts.push(param);
        if kind.trailing_wildcard() {
            parts.push("'%'");
        }
        let not = if negated { "NOT " } else { "" };
        format!("{} {}LIKE CONCAT({})", field, not, parts.join(", "))
    }

    fn date_diff(
        &self,
        unit: DateUnit,
        field: &str,
        op: ComparisonOp,
        param: &str,
    ) -> Option<String> {
        Some(format!(
            "TIMESTAMPDIFF({}, {}, NOW()) {} {}",
            unit.as_str().to_uppercase(),
            field,
            op.sql(),
            param
        ))
    }
}
