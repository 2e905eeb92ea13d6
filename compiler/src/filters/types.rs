//! Filter tree definitions
//!
//! A `FilterGroup` owns its rules and nested groups outright. Trees are built
//! by the caller (or the decoder), compiled once, then dropped.

use std::collections::BTreeMap;

use crate::error::{FilterError, Result};
use crate::value::Value;

/// Operator-specific configuration attached to a rule
pub type Metadata = BTreeMap<String, Value>;

/// A single leaf condition
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRule {
    field: String,
    operator: String,
    value: Value,
    type_tag: String,
    metadata: Metadata,
}

impl FilterRule {
    /// Create a rule, rejecting an empty field or operator
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let field = field.into();
        let operator = operator.into();
        if field.trim().is_empty() {
            return Err(FilterError::EmptyRequired("rule field"));
        }
        if operator.trim().is_empty() {
            return Err(FilterError::EmptyRequired("rule operator"));
        }
        Ok(Self {
            field,
            operator,
            value: value.into(),
            type_tag: String::new(),
            metadata: Metadata::new(),
        })
    }

    /// Set the type tag the value is converted to (empty = pass-through)
    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = type_tag.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Look up a metadata entry, treating an explicit null as absent
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key).filter(|v| !v.is_null())
    }
}

/// Logical combination of rules and nested groups
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    condition: String,
    rules: Vec<FilterRule>,
    groups: Vec<FilterGroup>,
}

impl FilterGroup {
    /// Create an empty group, rejecting an empty condition
    pub fn new(condition: impl Into<String>) -> Result<Self> {
        let condition = condition.into();
        if condition.trim().is_empty() {
            return Err(FilterError::EmptyRequired("group condition"));
        }
        Ok(Self {
            condition,
            rules: Vec::new(),
            groups: Vec::new(),
        })
    }

    pub fn and() -> Self {
        Self {
            condition: "AND".to_string(),
            rules: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn or() -> Self {
        Self {
            condition: "OR".to_string(),
            rules: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: FilterRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_group(mut self, group: FilterGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn push_rule(&mut self, rule: FilterRule) {
        self.rules.push(rule);
    }

    pub fn push_group(&mut self, group: FilterGroup) {
        self.groups.push(group);
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    /// True when the group has neither rules nor nested groups
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_rejects_empty_field() {
        let err = FilterRule::new("", "equal", "x").unwrap_err();
        assert_eq!(err, FilterError::EmptyRequired("rule field"));
    }

    #[test]
    fn rule_rejects_blank_operator() {
        let err = FilterRule::new("Name", "  ", "x").unwrap_err();
        assert_eq!(err, FilterError::EmptyRequired("rule operator"));
    }

    #[test]
    fn rule_defaults_to_pass_through() {
        let rule = FilterRule::new("Name", "equal", "John").unwrap();
        assert_eq!(rule.type_tag(), "");
        assert!(rule.metadata().is_empty());
        assert_eq!(rule.value(), &Value::from("John"));
    }

    #[test]
    fn rule_metadata_null_is_absent() {
        let rule = FilterRule::new("Created", "date_diff", 3)
            .unwrap()
            .with_metadata("interval", Value::Null);
        assert!(rule.metadata_value("interval").is_none());
    }

    #[test]
    fn group_rejects_empty_condition() {
        let err = FilterGroup::new("").unwrap_err();
        assert_eq!(err, FilterError::EmptyRequired("group condition"));
    }

    #[test]
    fn group_builders_preserve_order() {
        let group = FilterGroup::and()
            .with_rule(FilterRule::new("A", "is_null", Value::Null).unwrap())
            .with_rule(FilterRule::new("B", "is_null", Value::Null).unwrap())
            .with_group(FilterGroup::or());
        assert_eq!(group.rules()[0].field(), "A");
        assert_eq!(group.rules()[1].field(), "B");
        assert_eq!(group.groups().len(), 1);
        assert!(!group.is_empty());
        assert!(FilterGroup::or().is_empty());
    }
}
