//! Text matching operators
//!
//! Wildcards are placed around the bound parameter in the fragment, never
//! spliced into the value. Several values are combined inside one pair of
//! parentheses: OR for positive matches, AND for negated ones.

use super::{RuleOutput, RuleTransformer, TransformContext, require_values};
use crate::dialect::LikeKind;
use crate::error::Result;
use crate::filters::FilterRule;

#[derive(Debug, Clone, Copy)]
pub struct TextMatchTransformer {
    kind: LikeKind,
    negated: bool,
}

impl TextMatchTransformer {
    pub fn new(kind: LikeKind, negated: bool) -> Self {
        Self { kind, negated }
    }
}

impl RuleTransformer for TextMatchTransformer {
    fn transform(
        &self,
        rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        let provider = ctx.provider();
        let values = require_values(rule)?;

        let mut fragments = Vec::with_capacity(values.len());
        let mut params = Vec::with_capacity(values.len());
        for (offset, raw) in values.iter().enumerate() {
            params.push(ctx.convert_value(rule, raw)?);
            fragments.push(provider.like(field, &ctx.param(offset), self.kind, self.negated));
        }

        let sql = if fragments.len() == 1 {
            fragments.remove(0)
        } else {
            let joiner = if self.negated {
                provider.and_operator()
            } else {
                provider.or_operator()
            };
            format!("({})", fragments.join(&format!(" {} ", joiner)))
        };
        Ok(RuleOutput::new(sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::error::FilterError;
    use crate::transform::test_support::run;
    use crate::value::Value;

    #[test]
    fn test_contains_single_value_sqlserver() {
        let rule = FilterRule::new("Name", "contains", "oh").unwrap();
        let out = run(
            &TextMatchTransformer::new(LikeKind::Contains, false),
            Dialect::SqlServer,
            &rule,
            0,
        )
        .unwrap();
        assert_eq!(out.sql, "[Name] LIKE '%' + @p0 + '%'");
        assert_eq!(out.params, vec![Value::from("oh")]);
    }

    #[test]
    fn test_contains_many_values_joined_with_or() {
        let rule = FilterRule::new("Name", "contains", Value::list(["a", "b"])).unwrap();
        let out = run(
            &TextMatchTransformer::new(LikeKind::Contains, false),
            Dialect::SqlServer,
            &rule,
            0,
        )
        .unwrap();
        assert_eq!(
            out.sql,
            "([Name] LIKE '%' + @p0 + '%' OR [Name] LIKE '%' + @p1 + '%')"
        );
        assert_eq!(out.params.len(), 2);
    }

    #[test]
    fn test_negated_values_joined_with_and() {
        let rule = FilterRule::new("Name", "not_begins_with", Value::list(["x", "y"])).unwrap();
        let out = run(
            &TextMatchTransformer::new(LikeKind::BeginsWith, true),
            Dialect::Postgres,
            &rule,
            0,
        )
        .unwrap();
        assert_eq!(
            out.sql,
            "(\"Name\" NOT LIKE $1 || '%' AND \"Name\" NOT LIKE $2 || '%')"
        );
    }

    #[test]
    fn test_ends_with_mysql_concat() {
        let rule = FilterRule::new("Email", "ends_with", "@example.com").unwrap();
        let out = run(
            &TextMatchTransformer::new(LikeKind::EndsWith, false),
            Dialect::MySql,
            &rule,
            0,
        )
        .unwrap();
        assert_eq!(out.sql, "`Email` LIKE CONCAT('%', ?)");
    }

    #[test]
    fn test_linq_uses_string_methods() {
        let rule = FilterRule::new("Name", "contains", Value::list(["a", "b"])).unwrap();
        let out = run(
            &TextMatchTransformer::new(LikeKind::Contains, false),
            Dialect::DynamicLinq,
            &rule,
            0,
        )
        .unwrap();
        assert_eq!(out.sql, "(Name.Contains(@0) || Name.Contains(@1))");
    }

    #[test]
    fn test_wildcards_in_value_are_not_escaped() {
        let rule = FilterRule::new("Code", "begins_with", "50%").unwrap();
        let out = run(
            &TextMatchTransformer::new(LikeKind::BeginsWith, false),
            Dialect::Sqlite,
            &rule,
            0,
        )
        .unwrap();
        assert_eq!(out.params, vec![Value::from("50%")]);
    }

    #[test]
    fn test_missing_value() {
        let rule = FilterRule::new("Name", "contains", Value::Null).unwrap();
        let err = run(
            &TextMatchTransformer::new(LikeKind::Contains, false),
            Dialect::Sqlite,
            &rule,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::MissingValue { .. }));
    }
}
