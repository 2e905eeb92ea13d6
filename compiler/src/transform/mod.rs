//! Rule transformers
//!
//! A transformer turns one rule into a fragment and the parameter values it
//! binds. The registry maps operator names to transformers; lookups are
//! case-insensitive.

mod comparison;
mod date_diff;
mod membership;
mod null;
mod range;
mod text;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::convert::{TypeConversionService, metadata_formats};
use crate::dialect::{ComparisonOp, FormatProvider, LikeKind};
use crate::error::{FilterError, Result};
use crate::filters::FilterRule;
use crate::value::Value;

pub use comparison::ComparisonTransformer;
pub use date_diff::{COMPARISON_KEY, DateDiffTransformer, INTERVAL_KEY};
pub use membership::MembershipTransformer;
pub use null::{EmptyCheckTransformer, NullCheckTransformer};
pub use range::RangeTransformer;
pub use text::TextMatchTransformer;

/// Fragment and bound values produced for one rule
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutput {
    pub sql: String,
    pub params: Vec<Value>,
}

impl RuleOutput {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Fragment that binds no parameters
    pub fn bare(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Everything a transformer may use while handling one rule
///
/// `first_index` is the global parameter position of the rule's first slot.
pub struct TransformContext<'a> {
    provider: &'a dyn FormatProvider,
    conversions: &'a TypeConversionService,
    first_index: usize,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        provider: &'a dyn FormatProvider,
        conversions: &'a TypeConversionService,
        first_index: usize,
    ) -> Self {
        Self {
            provider,
            conversions,
            first_index,
        }
    }

    pub fn provider(&self) -> &'a dyn FormatProvider {
        self.provider
    }

    pub fn conversions(&self) -> &'a TypeConversionService {
        self.conversions
    }

    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Placeholder for the rule's slot at `offset`
    pub fn param(&self, offset: usize) -> String {
        self.provider.format_parameter_name(self.first_index + offset)
    }

    /// Convert the rule's value under its own type tag and metadata
    pub fn convert(&self, rule: &FilterRule) -> Result<Value> {
        self.convert_value(rule, rule.value())
    }

    /// Convert an arbitrary value under the rule's type tag and metadata
    ///
    /// Malformed date format metadata is reported against its key before
    /// any conversion runs.
    pub fn convert_value(&self, rule: &FilterRule, value: &Value) -> Result<Value> {
        metadata_formats(rule.metadata())
            .map_err(|e| FilterError::metadata(rule, e.key, e.reason()))?;
        self.conversions
            .convert_value(value, rule.type_tag(), rule.metadata())
    }
}

/// Strategy for one operator
pub trait RuleTransformer: Send + Sync {
    /// Produce the fragment for `rule`; `field` is already quoted for the dialect
    fn transform(&self, rule: &FilterRule, field: &str, ctx: &TransformContext<'_>)
    -> Result<RuleOutput>;
}

impl<F> RuleTransformer for F
where
    F: Fn(&FilterRule, &str, &TransformContext<'_>) -> Result<RuleOutput> + Send + Sync,
{
    fn transform(
        &self,
        rule: &FilterRule,
        field: &str,
        ctx: &TransformContext<'_>,
    ) -> Result<RuleOutput> {
        self(rule, field, ctx)
    }
}

/// Operator name to transformer mapping
#[derive(Clone, Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn RuleTransformer>>,
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("operators", &self.operators())
            .finish()
    }
}

impl TransformerRegistry {
    /// Registry with no operators
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in operator
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        for (name, op) in [
            ("equal", ComparisonOp::Eq),
            ("not_equal", ComparisonOp::Ne),
            ("less", ComparisonOp::Lt),
            ("less_or_equal", ComparisonOp::Le),
            ("greater", ComparisonOp::Gt),
            ("greater_or_equal", ComparisonOp::Ge),
        ] {
            registry.register(name, ComparisonTransformer::new(op));
        }

        registry.register("between", RangeTransformer::new(false));
        registry.register("not_between", RangeTransformer::new(true));
        registry.register("in", MembershipTransformer::new(false));
        registry.register("not_in", MembershipTransformer::new(true));

        for (name, kind, negated) in [
            ("contains", LikeKind::Contains, false),
            ("not_contains", LikeKind::Contains, true),
            ("begins_with", LikeKind::BeginsWith, false),
            ("not_begins_with", LikeKind::BeginsWith, true),
            ("ends_with", LikeKind::EndsWith, false),
            ("not_ends_with", LikeKind::EndsWith, true),
        ] {
            registry.register(name, TextMatchTransformer::new(kind, negated));
        }

        registry.register("is_null", NullCheckTransformer::new(false));
        registry.register("is_not_null", NullCheckTransformer::new(true));
        registry.register("is_empty", EmptyCheckTransformer::new(false));
        registry.register("is_not_empty", EmptyCheckTransformer::new(true));
        registry.register("date_diff", DateDiffTransformer);

        registry
    }

    /// Register a transformer, replacing any previous one for the operator
    pub fn register(&mut self, operator: &str, transformer: impl RuleTransformer + 'static) {
        self.register_arc(operator, Arc::new(transformer));
    }

    pub fn register_arc(&mut self, operator: &str, transformer: Arc<dyn RuleTransformer>) {
        let key = operator.trim().to_lowercase();
        tracing::trace!(operator = %key, "Registered transformer");
        self.transformers.insert(key, transformer);
    }

    /// Look up the transformer for an operator
    pub fn get(&self, operator: &str) -> Result<&dyn RuleTransformer> {
        self.transformers
            .get(&operator.trim().to_lowercase())
            .map(|t| t.as_ref())
            .ok_or_else(|| FilterError::UnsupportedOperator(operator.to_string()))
    }

    pub fn contains(&self, operator: &str) -> bool {
        self.transformers
            .contains_key(&operator.trim().to_lowercase())
    }

    /// Registered operator names, sorted
    pub fn operators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Scalar value of a single-value operator, rejecting null, lists and maps
pub(crate) fn require_scalar<'v>(rule: &'v FilterRule) -> Result<&'v Value> {
    match rule.value() {
        Value::Null => Err(FilterError::missing_value(rule)),
        Value::List(list) => Err(FilterError::invalid_arity(rule, "exactly 1 value", list.len())),
        map @ Value::Map(_) => Err(FilterError::invalid_shape(rule, "a scalar", map)),
        scalar => Ok(scalar),
    }
}

/// Values of a multi-value operator; a scalar counts as a one-element list
///
/// A null element is a missing value: it would bind as SQL NULL and make
/// the predicate unknown for every row.
pub(crate) fn require_values(rule: &FilterRule) -> Result<Vec<Value>> {
    match rule.value() {
        Value::Null => Err(FilterError::missing_value(rule)),
        Value::List(list) if list.is_empty() => {
            Err(FilterError::invalid_arity(rule, "at least 1 value", 0))
        }
        Value::List(list) if list.items().iter().any(Value::is_null) => {
            Err(FilterError::missing_value(rule))
        }
        Value::List(list) => Ok(list.items().to_vec()),
        map @ Value::Map(_) => Err(FilterError::invalid_shape(rule, "a scalar or a list", map)),
        scalar => Ok(vec![scalar.clone()]),
    }
}
