//! Built-in scalar converters

use std::str::FromStr;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use uuid::Uuid;

use super::TypeConverter;
use crate::filters::Metadata;
use crate::value::{Value, ValueKind};

/// Time-of-day formats, tried in order
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

fn unsupported(value: &Value) -> String {
    format!("unsupported source type {}", value.type_name())
}

/// Any scalar to its canonical text
pub struct TextConverter;

impl TypeConverter for TextConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Text
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Text(s) => Ok(Value::Text(s.clone())),
            Value::List(_) | Value::Map(_) | Value::Null => Err(unsupported(value)),
            scalar => Ok(Value::Text(scalar.to_string())),
        }
    }
}

/// 64-bit signed integers
pub struct IntegerConverter;

impl TypeConverter for IntegerConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Int
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Float(x) => {
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                    Ok(Value::Int(*x as i64))
                } else {
                    Err(format!("{} is not a whole number", x))
                }
            }
            Value::Decimal(d) => {
                if d.fract().is_zero() {
                    d.to_i64()
                        .map(Value::Int)
                        .ok_or_else(|| format!("{} is out of range", d))
                } else {
                    Err(format!("{} is not a whole number", d))
                }
            }
            Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string()),
            other => Err(unsupported(other)),
        }
    }
}

/// 64-bit floating point
pub struct FloatConverter;

impl TypeConverter for FloatConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Float
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Float(x) => Ok(Value::Float(*x)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::Decimal(d) => d
                .to_f64()
                .map(Value::Float)
                .ok_or_else(|| format!("{} is out of range", d)),
            Value::Text(s) => {
                let parsed = s.trim().parse::<f64>().map_err(|e| e.to_string())?;
                if parsed.is_finite() {
                    Ok(Value::Float(parsed))
                } else {
                    Err("value is not a finite number".to_string())
                }
            }
            other => Err(unsupported(other)),
        }
    }
}

/// Exact decimals
pub struct DecimalConverter;

impl TypeConverter for DecimalConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Decimal
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Decimal(d) => Ok(Value::Decimal(*d)),
            Value::Int(i) => Ok(Value::Decimal(Decimal::from(*i))),
            Value::Float(x) => Decimal::from_f64(*x)
                .map(Value::Decimal)
                .ok_or_else(|| format!("{} cannot be represented as a decimal", x)),
            Value::Text(s) => {
                let trimmed = s.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map(Value::Decimal)
                    .map_err(|e| e.to_string())
            }
            other => Err(unsupported(other)),
        }
    }
}

/// Booleans from common UI spellings
pub struct BooleanConverter;

impl TypeConverter for BooleanConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Int(i) => Ok(Value::Bool(*i != 0)),
            Value::Float(x) => Ok(Value::Bool(*x != 0.0)),
            Value::Decimal(d) => Ok(Value::Bool(!d.is_zero())),
            Value::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(format!("'{}' is not a recognized boolean", s)),
            },
            other => Err(unsupported(other)),
        }
    }
}

/// UUIDs in any textual form accepted by `Uuid::parse_str`
pub struct UuidConverter;

impl TypeConverter for UuidConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Uuid
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Uuid(u) => Ok(Value::Uuid(*u)),
            Value::Text(s) => Uuid::parse_str(s.trim())
                .map(Value::Uuid)
                .map_err(|e| e.to_string()),
            other => Err(unsupported(other)),
        }
    }
}

/// Time of day
pub struct TimeConverter;

impl TypeConverter for TimeConverter {
    fn target(&self) -> ValueKind {
        ValueKind::Time
    }

    fn convert(&self, value: &Value, _metadata: &Metadata) -> Result<Value, String> {
        match value {
            Value::Time(t) => Ok(Value::Time(*t)),
            Value::DateTime(dt) => Ok(Value::Time(dt.time())),
            Value::Text(s) => {
                let trimmed = s.trim();
                TIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
                    .map(Value::Time)
                    .ok_or_else(|| format!("'{}' does not match any time format", s))
            }
            other => Err(unsupported(other)),
        }
    }
}
