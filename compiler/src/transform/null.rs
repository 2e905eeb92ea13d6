//! Null and empty checks; these bind no parameters and ignore the value

use super::{RuleOutput, RuleTransformer, TransformContext};
use crate::error::Result;
use crate::filters::FilterRule;

#[derive(Debug, Clone, Copy)]
pub struct NullCheckTransformer {
    negated: bool,
}

impl NullCheckTransformer {
    pub fn new(negated: bool) -> Self {
        Self { negated }
    }
}

impl RuleTransformer for NullCheckTransformer {
    fn transform(
        &self,
        _rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        Ok(RuleOutput::bare(ctx.provider().null_check(field, self.negated)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EmptyCheckTransformer {
    negated: bool,
}

impl EmptyCheckTransformer {
    pub fn new(negated: bool) -> Self {
        Self { negated }
    }
}

impl RuleTransformer for EmptyCheckTransformer {
    fn transform(
        &self,
        _rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        Ok(RuleOutput::bare(ctx.provider().empty_check(field, self.negated)))
    }
}
