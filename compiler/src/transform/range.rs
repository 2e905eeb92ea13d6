//! Range operators (`between`, `not_between`)

use super::{RuleOutput, RuleTransformer, TransformContext};
use crate::convert::end_of_day;
use crate::error::{FilterError, Result};
use crate::filters::FilterRule;
use crate::value::Value;

/// Type tag whose upper bound is stretched to the end of its day
const DATE_TAG: &str = "date";

/// Two consecutive slots for the lower and upper bound
#[derive(Debug, Clone, Copy)]
pub struct RangeTransformer {
    negated: bool,
}

impl RangeTransformer {
    pub fn new(negated: bool) -> Self {
        Self { negated }
    }
}

impl RuleTransformer for RangeTransformer {
    fn transform(
        &self,
        rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        let raw = match rule.value() {
            Value::Null => return Err(FilterError::missing_value(rule)),
            Value::List(list) => list,
            other => return Err(FilterError::invalid_shape(rule, "a list of 2 values", other)),
        };
        if raw.len() != 2 {
            return Err(FilterError::invalid_arity(rule, "exactly 2 values", raw.len()));
        }

        let mut bounds = Vec::with_capacity(2);
        for bound in raw.iter() {
            if bound.is_null() {
                return Err(FilterError::missing_value(rule));
            }
            bounds.push(ctx.convert_value(rule, bound)?);
        }

        if rule.type_tag().trim().eq_ignore_ascii_case(DATE_TAG)
            && let Some(upper) = bounds.pop()
        {
            bounds.push(end_of_day(upper));
        }

        let sql = ctx
            .provider()
            .between(field, &ctx.param(0), &ctx.param(1), self.negated);
        Ok(RuleOutput::new(sql, bounds))
    }
}
