//! Filter compiler
//!
//! Walks a filter tree depth-first and hands each rule to the transformer for
//! its operator. One parameter cursor is threaded through the whole walk, so
//! placeholder numbering is global across nesting levels.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::types::FilterGroup;
use crate::convert::{TypeConversionService, TypeConverter};
use crate::dialect::{Dialect, FormatProvider};
use crate::error::{FilterError, Result};
use crate::transform::{RuleTransformer, TransformContext, TransformerRegistry};
use crate::value::Value;

/// Query fragment and the values bound to its placeholders, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledFilter {
    pub sql: String,
    pub params: Vec<Value>,
    #[serde(skip)]
    placeholders: Vec<String>,
}

impl CompiledFilter {
    /// True when the tree produced no condition at all
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Placeholder names, one per parameter
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// `(placeholder, value)` pairs for named or ordinal binding
    ///
    /// Positional dialects repeat `?`; bind those by order.
    pub fn named_params(&self) -> Vec<(&str, &Value)> {
        self.placeholders
            .iter()
            .map(String::as_str)
            .zip(self.params.iter())
            .collect()
    }
}

/// Compiles filter trees for one dialect
///
/// Owns its format provider, transformer registry and conversion service.
/// Configure through `&mut self`, then share freely; `build` only reads.
pub struct FilterCompiler {
    provider: Arc<dyn FormatProvider>,
    transformers: TransformerRegistry,
    conversions: TypeConversionService,
}

impl fmt::Debug for FilterCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCompiler")
            .field("dialect", &self.provider.name())
            .field("transformers", &self.transformers)
            .field("conversions", &self.conversions)
            .finish()
    }
}

impl FilterCompiler {
    /// Compiler for a built-in dialect with the default operators and converters
    pub fn new(dialect: Dialect) -> Self {
        Self::with_provider(dialect.provider())
    }

    /// Compiler for a custom format provider
    pub fn with_provider(provider: Arc<dyn FormatProvider>) -> Self {
        tracing::debug!(dialect = provider.name(), "Created filter compiler");
        Self {
            provider,
            transformers: TransformerRegistry::with_builtins(),
            conversions: TypeConversionService::new(),
        }
    }

    pub fn provider(&self) -> &dyn FormatProvider {
        self.provider.as_ref()
    }

    pub fn transformers(&self) -> &TransformerRegistry {
        &self.transformers
    }

    pub fn conversions(&self) -> &TypeConversionService {
        &self.conversions
    }

    /// Add or replace the transformer for an operator
    pub fn register_transformer(
        &mut self,
        operator: &str,
        transformer: impl RuleTransformer + 'static,
    ) -> &mut Self {
        self.transformers.register(operator, transformer);
        self
    }

    /// Add or replace the converter for a type tag
    pub fn register_converter(
        &mut self,
        type_tag: &str,
        converter: impl TypeConverter + 'static,
    ) -> &mut Self {
        self.conversions.register_converter(type_tag, converter);
        self
    }

    /// Compile a filter tree
    ///
    /// Any rule failure aborts the whole build.
    pub fn build(&self, root: &FilterGroup) -> Result<CompiledFilter> {
        let (sql, params, consumed) = self.build_group(root, 0)?;
        debug_assert_eq!(consumed, params.len());

        let placeholders = (0..params.len())
            .map(|i| self.provider.format_parameter_name(i))
            .collect();

        tracing::debug!(
            dialect = self.provider.name(),
            params = params.len(),
            "Compiled filter"
        );

        Ok(CompiledFilter {
            sql,
            params,
            placeholders,
        })
    }

    fn combinator(&self, group: &FilterGroup) -> Result<&'static str> {
        let condition = group.condition().trim();
        if condition.eq_ignore_ascii_case("and") {
            Ok(self.provider.and_operator())
        } else if condition.eq_ignore_ascii_case("or") {
            Ok(self.provider.or_operator())
        } else {
            Err(FilterError::UnsupportedCondition(condition.to_string()))
        }
    }

    /// Compile one group starting at `cursor`; returns the cursor after it
    fn build_group(
        &self,
        group: &FilterGroup,
        mut cursor: usize,
    ) -> Result<(String, Vec<Value>, usize)> {
        let joiner = format!(" {} ", self.combinator(group)?);
        let mut parts: Vec<String> = Vec::with_capacity(group.rules().len() + group.groups().len());
        let mut params = Vec::new();

        for rule in group.rules() {
            let transformer = self.transformers.get(rule.operator())?;
            let field = self.provider.format_field_name(rule.field());
            let ctx = TransformContext::new(self.provider.as_ref(), &self.conversions, cursor);
            let output = transformer.transform(rule, &field, &ctx)?;

            tracing::trace!(
                field = rule.field(),
                operator = rule.operator(),
                cursor,
                params = output.params.len(),
                "Transformed rule"
            );

            cursor += output.params.len();
            parts.push(output.sql);
            params.extend(output.params);
        }

        for nested in group.groups() {
            let (sql, nested_params, next) = self.build_group(nested, cursor)?;
            cursor = next;
            if sql.is_empty() {
                continue;
            }
            parts.push(format!("({})", sql));
            params.extend(nested_params);
        }

        Ok((parts.join(&joiner), params, cursor))
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
