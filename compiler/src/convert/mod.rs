//! Type conversion service
//!
//! Coerces raw rule values to the representation named by a rule's type tag.
//! Lists are converted element by element and come back typed to the
//! converter's target kind.

mod builtins;
mod datetime;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{FilterError, Result};
use crate::filters::Metadata;
use crate::value::{Value, ValueKind, ValueList};

pub use builtins::{
    BooleanConverter, DecimalConverter, FloatConverter, IntegerConverter, TextConverter,
    TimeConverter, UuidConverter,
};
pub use datetime::{
    DEFAULT_DATE_FORMATS, DateTimeConverter, FormatMetadataError, end_of_day, metadata_formats,
    parse_datetime,
};

/// Metadata key holding a single custom date format
pub const DATE_FORMAT_KEY: &str = "date_format";

/// Metadata key holding a list of custom date formats
pub const DATE_FORMATS_KEY: &str = "date_formats";

/// Converts one raw scalar to a target representation
pub trait TypeConverter: Send + Sync {
    /// Kind of value this converter produces
    fn target(&self) -> ValueKind;

    /// Convert a non-null scalar; the error string becomes the failure cause
    fn convert(&self, value: &Value, metadata: &Metadata) -> std::result::Result<Value, String>;
}

/// Registry of type converters keyed by case-insensitive type tag
#[derive(Clone)]
pub struct TypeConversionService {
    converters: HashMap<String, Arc<dyn TypeConverter>>,
}

impl Default for TypeConversionService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeConversionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConversionService")
            .field("tags", &self.tags())
            .finish()
    }
}

impl TypeConversionService {
    /// Service with the built-in converters registered
    pub fn new() -> Self {
        let mut service = Self::empty();
        service.register_builtins();
        service
    }

    /// Service with no converters
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    fn register_builtins(&mut self) {
        let text = Arc::new(TextConverter);
        let integer = Arc::new(IntegerConverter);
        let float = Arc::new(FloatConverter);
        let boolean = Arc::new(BooleanConverter);
        let datetime = Arc::new(DateTimeConverter::default());
        let uuid = Arc::new(UuidConverter);

        for tag in ["string", "text"] {
            self.register_arc(tag, text.clone());
        }
        for tag in ["integer", "int", "long"] {
            self.register_arc(tag, integer.clone());
        }
        for tag in ["double", "float", "number"] {
            self.register_arc(tag, float.clone());
        }
        for tag in ["boolean", "bool"] {
            self.register_arc(tag, boolean.clone());
        }
        for tag in ["date", "datetime"] {
            self.register_arc(tag, datetime.clone());
        }
        for tag in ["uuid", "guid"] {
            self.register_arc(tag, uuid.clone());
        }
        self.register_converter("decimal", DecimalConverter);
        self.register_converter("time", TimeConverter);
    }

    /// Register a converter for a type tag; the last registration wins
    pub fn register_converter(&mut self, type_tag: &str, converter: impl TypeConverter + 'static) {
        self.register_arc(type_tag, Arc::new(converter));
    }

    pub fn register_arc(&mut self, type_tag: &str, converter: Arc<dyn TypeConverter>) {
        let key = type_tag.trim().to_lowercase();
        tracing::trace!(type_tag = %key, kind = %converter.target(), "Registered converter");
        self.converters.insert(key, converter);
    }

    pub fn has_converter(&self, type_tag: &str) -> bool {
        self.converters.contains_key(&type_tag.trim().to_lowercase())
    }

    /// Registered type tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// True for list values; text, null, scalars and maps are not collections
    pub fn is_collection(value: &Value) -> bool {
        matches!(value, Value::List(_))
    }

    /// Convert a value to the representation named by `type_tag`
    ///
    /// Null values and empty tags pass through unchanged. List elements are
    /// converted independently; a null element stays null.
    pub fn convert_value(&self, value: &Value, type_tag: &str, metadata: &Metadata) -> Result<Value> {
        let tag = type_tag.trim();
        if value.is_null() || tag.is_empty() {
            return Ok(value.clone());
        }

        let converter = self
            .converters
            .get(&tag.to_lowercase())
            .ok_or_else(|| FilterError::conversion(value, tag, "no converter registered"))?;

        tracing::trace!(type_tag = tag, value = %value, "Converting value");

        match value {
            Value::List(list) => {
                let items = list
                    .iter()
                    .map(|item| Self::convert_one(converter.as_ref(), item, tag, metadata))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(ValueList::typed(converter.target(), items)))
            }
            scalar => Self::convert_one(converter.as_ref(), scalar, tag, metadata),
        }
    }

    fn convert_one(
        converter: &dyn TypeConverter,
        value: &Value,
        tag: &str,
        metadata: &Metadata,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        converter
            .convert(value, metadata)
            .map_err(|cause| FilterError::conversion(value, tag, cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_null_passes_through() {
        let service = TypeConversionService::new();
        let out = service
            .convert_value(&Value::Null, "integer", &Metadata::new())
            .unwrap();
        assert_eq!(out, Value::Null);
    }

    #[test]
    fn test_empty_tag_passes_through() {
        let service = TypeConversionService::new();
        let raw = Value::from("42");
        assert_eq!(service.convert_value(&raw, "", &Metadata::new()).unwrap(), raw);
        assert_eq!(service.convert_value(&raw, "  ", &Metadata::new()).unwrap(), raw);
    }

    #[test]
    fn test_scalar_conversion() {
        let service = TypeConversionService::new();
        let out = service
            .convert_value(&Value::from("42"), "Integer", &Metadata::new())
            .unwrap();
        assert_eq!(out, Value::Int(42));
    }

    #[test]
    fn test_list_is_converted_and_typed() {
        let service = TypeConversionService::new();
        let raw = Value::list(["1", "2", "3"]);
        let out = service.convert_value(&raw, "int", &Metadata::new()).unwrap();
        let list = out.as_list().unwrap();
        assert_eq!(list.element(), Some(ValueKind::Int));
        assert_eq!(list.items(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_list_element_failure_reports_element() {
        let service = TypeConversionService::new();
        let raw = Value::list(["1", "two"]);
        let err = service.convert_value(&raw, "integer", &Metadata::new()).unwrap_err();
        match err {
            FilterError::Conversion {
                value, type_tag, ..
            } => {
                assert_eq!(value, "two");
                assert_eq!(type_tag, "integer");
            }
            other => panic!("expected conversion error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_is_conversion_error() {
        let service = TypeConversionService::new();
        let err = service
            .convert_value(&Value::from("x"), "money", &Metadata::new())
            .unwrap_err();
        assert_eq!(err.category(), "conversion");
    }

    #[test]
    fn test_date_list_typed_to_datetime() {
        let service = TypeConversionService::new();
        let raw = Value::list(["2024-01-01", "01/31/2024"]);
        let out = service.convert_value(&raw, "date", &Metadata::new()).unwrap();
        let list = out.as_list().unwrap();
        assert_eq!(list.element(), Some(ValueKind::DateTime));
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(list.items()[1], Value::DateTime(expected));
    }

    struct Upper;

    impl TypeConverter for Upper {
        fn target(&self) -> ValueKind {
            ValueKind::Text
        }

        fn convert(&self, value: &Value, _metadata: &Metadata) -> std::result::Result<Value, String> {
            Ok(Value::Text(value.to_string().to_uppercase()))
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut service = TypeConversionService::new();
        service.register_converter("STRING", Upper);
        let out = service
            .convert_value(&Value::from("abc"), "string", &Metadata::new())
            .unwrap();
        assert_eq!(out, Value::from("ABC"));
    }

    #[test]
    fn test_is_collection() {
        assert!(TypeConversionService::is_collection(&Value::list([1])));
        assert!(!TypeConversionService::is_collection(&Value::from("abc")));
        assert!(!TypeConversionService::is_collection(&Value::Null));
        assert!(!TypeConversionService::is_collection(&Value::Int(1)));
        assert!(!TypeConversionService::is_collection(&Value::Map(Default::default())));
    }

    #[test]
    fn test_builtin_tags_registered() {
        let service = TypeConversionService::new();
        for tag in ["string", "integer", "double", "decimal", "boolean", "date", "datetime", "time", "uuid"] {
            assert!(service.has_converter(tag), "missing {}", tag);
        }
        assert!(TypeConversionService::empty().tags().is_empty());
    }
}
