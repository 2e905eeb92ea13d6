//! Dynamic LINQ expression dialect
//!
//! Targets an in-memory expression language (System.Linq.Dynamic syntax):
//! member access instead of quoted identifiers, `@N` ordinals, C# operators,
//! and string methods instead of LIKE.

use super::provider::{ComparisonOp, DateUnit, FormatProvider, LikeKind, MembershipBinding};

/// Dynamic LINQ expression dialect
pub struct DynamicLinqDialect;

impl FormatProvider for DynamicLinqDialect {
    fn name(&self) -> &'static str {
        "linq"
    }

    fn and_operator(&self) -> &'static str {
        "&&"
    }

    fn or_operator(&self) -> &'static str {
        "||"
    }

    fn format_field_name(&self, name: &str) -> String {
        // Member paths are used verbatim
        name.trim().to_string()
    }

    fn format_parameter_name(&self, index: usize) -> String {
        format!("@{}", index)
    }

    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    fn comparison_token(&self, op: ComparisonOp) -> &'static str {
        match op {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            other => other.sql(),
        }
    }

    fn between(&self, field: &str, low: &str, high: &str, negated: bool) -> String {
        if negated {
            format!("({} < {} || {} > {})", field, low, field, high)
        } else {
            format!("({} >= {} && {} <= {})", field, low, field, high)
        }
    }

    fn like(&self, field: &str, param: &str, kind: LikeKind, negated: bool) -> String {
        let method = match kind {
            LikeKind::Contains => "Contains",
            LikeKind::BeginsWith => "StartsWith",
            LikeKind::EndsWith => "EndsWith",
        };
        let not = if negated { "!" } else { "" };
        format!("{}{}.{}({})", not, field, method, param)
    }

    fn membership_binding(&self) -> MembershipBinding {
        MembershipBinding::NativeList
    }

    fn membership(&self, field: &str, params: &[String], negated: bool) -> String {
        let param = params.first().map(String::as_str).unwrap_or_default();
        let not = if negated { "!" } else { "" };
        format!("{}{}.Contains({})", not, param, field)
    }

    fn null_check(&self, field: &str, negated: bool) -> String {
        if negated {
            format!("{} != null", field)
        } else {
            format!("{} == null", field)
        }
    }

    fn empty_check(&self, field: &str, negated: bool) -> String {
        if negated {
            format!("{} != \"\"", field)
        } else {
            format!("{} == \"\"", field)
        }
    }

    fn date_diff(
        &self,
        unit: DateUnit,
        field: &str,
        op: ComparisonOp,
        param: &str,
    ) -> Option<String> {
        let span = format!("(DateTime.Now - {})", field);
        let expr = match unit {
            DateUnit::Day => format!("Int32({}.TotalDays)", span),
            DateUnit::Week => format!("Int32({}.TotalDays / 7)", span),
            DateUnit::Hour => format!("Int32({}.TotalHours)", span),
            DateUnit::Minute => format!("Int32({}.TotalMinutes)", span),
            DateUnit::Second => format!("Int32({}.TotalSeconds)", span),
            DateUnit::Year | DateUnit::Quarter | DateUnit::Month => return None,
        };
        Some(format!("{} {} {}", expr, self.comparison_token(op), param))
    }
}
