//! `date_diff`: whole intervals elapsed between a date field and now
//!
//! Metadata `interval` names the unit and is required. Metadata `comparison`
//! picks the operator and defaults to `=`. The value is always bound as an
//! integer, whatever the rule's type tag says.

use super::{RuleOutput, RuleTransformer, TransformContext, require_scalar};
use crate::dialect::{ComparisonOp, DateUnit};
use crate::error::{FilterError, Result};
use crate::filters::FilterRule;
use crate::value::Value;

pub const INTERVAL_KEY: &str = "interval";
pub const COMPARISON_KEY: &str = "comparison";

const INTEGER_TAG: &str = "integer";

#[derive(Debug, Clone, Copy)]
pub struct DateDiffTransformer;

impl DateDiffTransformer {
    fn interval(rule: &FilterRule) -> Result<DateUnit> {
        match rule.metadata_value(INTERVAL_KEY) {
            None => Err(FilterError::metadata(rule, INTERVAL_KEY, "is required")),
            Some(Value::Text(raw)) => raw
                .parse::<DateUnit>()
                .map_err(|reason| FilterError::metadata(rule, INTERVAL_KEY, reason)),
            Some(other) => Err(FilterError::metadata(
                rule,
                INTERVAL_KEY,
                format!("must be a string, got {}", other.type_name()),
            )),
        }
    }

    fn comparison(rule: &FilterRule) -> Result<ComparisonOp> {
        match rule.metadata_value(COMPARISON_KEY) {
            None => Ok(ComparisonOp::Eq),
            Some(Value::Text(raw)) => raw
                .parse::<ComparisonOp>()
                .map_err(|reason| FilterError::metadata(rule, COMPARISON_KEY, reason)),
            Some(other) => Err(FilterError::metadata(
                rule,
                COMPARISON_KEY,
                format!("must be a string, got {}", other.type_name()),
            )),
        }
    }
}

impl RuleTransformer for DateDiffTransformer {
    fn transform(
        &self,
        rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        let unit = Self::interval(rule)?;
        let op = Self::comparison(rule)?;
        let raw = require_scalar(rule)?;
        let amount = ctx
            .conversions()
            .convert_value(raw, INTEGER_TAG, rule.metadata())?;

        let provider = ctx.provider();
        let sql = provider
            .date_diff(unit, field, op, &ctx.param(0))
            .ok_or_else(|| {
                FilterError::metadata(
                    rule,
                    INTERVAL_KEY,
                    format!("'{}' is not supported by the {} dialect", unit, provider.name()),
                )
            })?;
        Ok(RuleOutput::new(sql, vec![amount]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::transform::test_support::run;

    #[test]
    fn test_date_diff_sqlserver() {
        let rule = FilterRule::new("Created", "date_diff", "7")
            .unwrap()
            .with_type("date")
            .with_metadata(INTERVAL_KEY, "Days")
            .with_metadata(COMPARISON_KEY, "<=");
        let out = run(&DateDiffTransformer, Dialect::SqlServer, &rule, 0).unwrap();
        assert_eq!(out.sql, "DATEDIFF(day, [Created], GETDATE()) <= @p0");
        assert_eq!(out.params, vec![Value::Int(7)]);
    }

    #[test]
    fn test_comparison_defaults_to_equal() {
        let rule = FilterRule::new("Created", "date_diff", 2)
            .unwrap()
            .with_metadata(INTERVAL_KEY, "month");
        let out = run(&DateDiffTransformer, Dialect::SqlServer, &rule, 3).unwrap();
        assert_eq!(out.sql, "DATEDIFF(month, [Created], GETDATE()) = @p3");
    }

    #[test]
    fn test_missing_interval() {
        let rule = FilterRule::new("Created", "date_diff", 2).unwrap();
        let err = run(&DateDiffTransformer, Dialect::SqlServer, &rule, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Operator date_diff: metadata 'interval' is required"
        );
    }

    #[test]
    fn test_bad_interval_and_comparison() {
        let rule = FilterRule::new("Created", "date_diff", 2)
            .unwrap()
            .with_metadata(INTERVAL_KEY, "fortnight");
        let err = run(&DateDiffTransformer, Dialect::SqlServer, &rule, 0).unwrap_err();
        assert_eq!(err.category(), "metadata");

        let rule = FilterRule::new("Created", "date_diff", 2)
            .unwrap()
            .with_metadata(INTERVAL_KEY, "day")
            .with_metadata(COMPARISON_KEY, "~");
        let err = run(&DateDiffTransformer, Dialect::SqlServer, &rule, 0).unwrap_err();
        assert!(matches!(err, FilterError::Metadata { ref key, .. } if key == COMPARISON_KEY));
    }

    #[test]
    fn test_unsupported_unit_for_dialect() {
        let rule = FilterRule::new("Created", "date_diff", 1)
            .unwrap()
            .with_metadata(INTERVAL_KEY, "year");
        let err = run(&DateDiffTransformer, Dialect::DynamicLinq, &rule, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Operator date_diff: metadata 'interval' 'year' is not supported by the linq dialect"
        );
    }

    #[test]
    fn test_value_must_be_integer() {
        let rule = FilterRule::new("Created", "date_diff", "soon")
            .unwrap()
            .with_metadata(INTERVAL_KEY, "day");
        let err = run(&DateDiffTransformer, Dialect::SqlServer, &rule, 0).unwrap_err();
        assert_eq!(err.category(), "conversion");
    }
}
