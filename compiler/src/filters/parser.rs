//! Filter parsing
//!
//! Decodes JSON filter documents (jQuery QueryBuilder layout by default) into
//! a `FilterGroup` tree with size, depth and rule-count limits.

use serde_json::{Map, Value as JsonValue};

use super::types::{FilterGroup, FilterRule, Metadata};
use crate::error::{FilterError, Result};
use crate::value::Value;

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum nesting depth of groups, root included
pub const MAX_FILTER_DEPTH: usize = 32;

/// Maximum number of rules across the whole tree
pub const MAX_FILTER_RULES: usize = 500;

/// JSON property names used by the decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub condition: String,
    pub rules: String,
    pub field: String,
    pub operator: String,
    pub value: String,
    pub type_tag: String,
    pub data: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            condition: "condition".to_string(),
            rules: "rules".to_string(),
            field: "field".to_string(),
            operator: "operator".to_string(),
            value: "value".to_string(),
            type_tag: "type".to_string(),
            data: "data".to_string(),
        }
    }
}

/// Decoder limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    pub max_json_bytes: usize,
    pub max_depth: usize,
    pub max_rules: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_json_bytes: MAX_FILTER_JSON_SIZE,
            max_depth: MAX_FILTER_DEPTH,
            max_rules: MAX_FILTER_RULES,
        }
    }
}

/// JSON to filter tree decoder
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    names: PropertyNames,
    limits: ParserLimits,
}

impl FilterParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(mut self, names: PropertyNames) -> Self {
        self.names = names;
        self
    }

    pub fn with_limits(mut self, limits: ParserLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn names(&self) -> &PropertyNames {
        &self.names
    }

    pub fn limits(&self) -> ParserLimits {
        self.limits
    }

    /// Parse a filter document from JSON text
    ///
    /// Validates JSON size, then decodes the tree.
    pub fn parse_str(&self, json_str: &str) -> Result<FilterGroup> {
        if json_str.len() > self.limits.max_json_bytes {
            return Err(FilterError::Decode(format!(
                "Filter JSON exceeds maximum size of {} bytes",
                self.limits.max_json_bytes
            )));
        }

        let doc: JsonValue =
            serde_json::from_str(json_str).map_err(|e| FilterError::Decode(e.to_string()))?;
        self.parse_value(&doc)
    }

    /// Decode an already-parsed JSON document
    pub fn parse_value(&self, doc: &JsonValue) -> Result<FilterGroup> {
        let root = match doc {
            JsonValue::Null => {
                return Err(FilterError::Decode("Filter root is missing".to_string()));
            }
            JsonValue::Object(obj) if obj.contains_key(&self.names.condition) => obj,
            JsonValue::Object(_) => {
                return Err(FilterError::Decode(format!(
                    "Filter root must be a group with a '{}' property",
                    self.names.condition
                )));
            }
            other => {
                return Err(FilterError::Decode(format!(
                    "Filter root must be an object, got {}",
                    json_type(other)
                )));
            }
        };

        let mut rule_count = 0;
        let group = self.parse_group(root, 1, &mut rule_count)?;
        tracing::debug!(rules = rule_count, "Decoded filter document");
        Ok(group)
    }

    fn parse_group(
        &self,
        obj: &Map<String, JsonValue>,
        depth: usize,
        rule_count: &mut usize,
    ) -> Result<FilterGroup> {
        if depth > self.limits.max_depth {
            return Err(FilterError::Decode(format!(
                "Filter nesting exceeds maximum depth of {}",
                self.limits.max_depth
            )));
        }

        let condition = match obj.get(&self.names.condition) {
            Some(JsonValue::String(s)) => s.as_str(),
            Some(JsonValue::Null) | None => "",
            Some(other) => {
                return Err(FilterError::Decode(format!(
                    "'{}' must be a string, got {}",
                    self.names.condition,
                    json_type(other)
                )));
            }
        };
        let mut group = FilterGroup::new(condition)?;

        let entries = match obj.get(&self.names.rules) {
            None | Some(JsonValue::Null) => return Ok(group),
            Some(JsonValue::Array(entries)) => entries,
            Some(other) => {
                return Err(FilterError::Decode(format!(
                    "'{}' must be an array, got {}",
                    self.names.rules,
                    json_type(other)
                )));
            }
        };

        for entry in entries {
            let JsonValue::Object(child) = entry else {
                return Err(FilterError::Decode(format!(
                    "'{}' entries must be objects, got {}",
                    self.names.rules,
                    json_type(entry)
                )));
            };
            if child.contains_key(&self.names.condition) {
                group.push_group(self.parse_group(child, depth + 1, rule_count)?);
            } else {
                *rule_count += 1;
                if *rule_count > self.limits.max_rules {
                    return Err(FilterError::Decode(format!(
                        "Maximum {} rules allowed",
                        self.limits.max_rules
                    )));
                }
                group.push_rule(self.parse_rule(child)?);
            }
        }

        Ok(group)
    }

    fn parse_rule(&self, obj: &Map<String, JsonValue>) -> Result<FilterRule> {
        let field = self.optional_str(obj, &self.names.field)?.unwrap_or_default();
        let operator = self
            .optional_str(obj, &self.names.operator)?
            .unwrap_or_default();
        let value = obj
            .get(&self.names.value)
            .cloned()
            .map(Value::from)
            .unwrap_or_default();

        let mut rule = FilterRule::new(field, operator, value)?;

        if let Some(type_tag) = self.optional_str(obj, &self.names.type_tag)? {
            rule = rule.with_type(type_tag);
        }

        match obj.get(&self.names.data) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Object(data)) => {
                let metadata: Metadata = data
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                    .collect();
                rule = rule.with_metadata_map(metadata);
            }
            Some(other) => {
                return Err(FilterError::Decode(format!(
                    "'{}' must be an object, got {}",
                    self.names.data,
                    json_type(other)
                )));
            }
        }

        Ok(rule)
    }

    fn optional_str<'a>(
        &self,
        obj: &'a Map<String, JsonValue>,
        key: &str,
    ) -> Result<Option<&'a str>> {
        match obj.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FilterError::Decode(format!(
                "'{}' must be a string, got {}",
                key,
                json_type(other)
            ))),
        }
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
