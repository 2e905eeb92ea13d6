//! Binary comparison operators

use super::{RuleOutput, RuleTransformer, TransformContext, require_scalar};
use crate::dialect::ComparisonOp;
use crate::error::Result;
use crate::filters::FilterRule;

/// `field <op> param` with exactly one scalar value
#[derive(Debug, Clone, Copy)]
pub struct ComparisonTransformer {
    op: ComparisonOp,
}

impl ComparisonTransformer {
    pub fn new(op: ComparisonOp) -> Self {
        Self { op }
    }
}

impl RuleTransformer for ComparisonTransformer {
    fn transform(
        &self,
        rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        let raw = require_scalar(rule)?;
        let value = ctx.convert_value(rule, raw)?;
        let sql = ctx.provider().comparison(field, self.op, &ctx.param(0));
        Ok(RuleOutput::new(sql, vec![value]))
    }
}
