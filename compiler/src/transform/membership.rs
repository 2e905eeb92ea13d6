//! Membership operators (`in`, `not_in`)

use super::{RuleOutput, RuleTransformer, TransformContext, require_values};
use crate::dialect::MembershipBinding;
use crate::error::Result;
use crate::filters::FilterRule;
use crate::value::{Value, ValueList};

/// Membership test bound per element or as one list parameter
#[derive(Debug, Clone, Copy)]
pub struct MembershipTransformer {
    negated: bool,
}

impl MembershipTransformer {
    pub fn new(negated: bool) -> Self {
        Self { negated }
    }
}

impl RuleTransformer for MembershipTransformer {
    fn transform(
        &self,
        rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        let raw = Value::List(ValueList::untyped(require_values(rule)?));
        let converted = ctx.convert_value(rule, &raw)?;
        let provider = ctx.provider();

        match provider.membership_binding() {
            MembershipBinding::PerElement => {
                let items = match converted {
                    Value::List(list) => list.into_items(),
                    other => vec![other],
                };
                let names: Vec<String> = (0..items.len()).map(|i| ctx.param(i)).collect();
                let sql = provider.membership(field, &names, self.negated);
                Ok(RuleOutput::new(sql, items))
            }
            MembershipBinding::NativeList => {
                let sql = provider.membership(field, &[ctx.param(0)], self.negated);
                Ok(RuleOutput::new(sql, vec![converted]))
            }
        }
    }
}
