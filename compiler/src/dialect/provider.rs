//! Format provider trait for multi-dialect output
//!
//! A provider supplies the syntax primitives of one target query surface.
//! Transformers stay dialect-agnostic and ask the provider for the text.

use std::fmt;
use std::str::FromStr;

/// Binary comparison operators shared by all dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// ANSI SQL token
    pub fn sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Self::Eq),
            "<>" | "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(format!(
                "'{}' is not a comparison. Valid options: =, <>, <, <=, >, >=",
                other
            )),
        }
    }
}

/// Position of the wildcard in a text-matching pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeKind {
    Contains,
    BeginsWith,
    EndsWith,
}

impl LikeKind {
    pub fn leading_wildcard(&self) -> bool {
        matches!(self, Self::Contains | Self::EndsWith)
    }

    pub fn trailing_wildcard(&self) -> bool {
        matches!(self, Self::Contains | Self::BeginsWith)
    }
}

/// How membership operators bind their values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipBinding {
    /// One parameter slot per element: `f IN (p0, p1, ...)`
    PerElement,
    /// One list-shaped parameter holding every element
    NativeList,
}

/// Interval unit for date-difference operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateUnit {
    pub const ALL: [DateUnit; 8] = [
        Self::Year,
        Self::Quarter,
        Self::Month,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }

    /// Length in seconds for fixed-length units
    pub fn fixed_seconds(&self) -> Option<u32> {
        match self {
            Self::Week => Some(604_800),
            Self::Day => Some(86_400),
            Self::Hour => Some(3_600),
            Self::Minute => Some(60),
            Self::Second => Some(1),
            Self::Year | Self::Quarter | Self::Month => None,
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == singular)
            .ok_or_else(|| {
                format!(
                    "'{}' is not an interval. Valid options: year, quarter, month, week, day, hour, minute, second",
                    s
                )
            })
    }
}

/// Syntax primitives for one target dialect
///
/// Required methods cover quoting and placeholders. Operator hooks default to
/// ANSI SQL and are overridden where a dialect differs.
pub trait FormatProvider: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    fn and_operator(&self) -> &'static str {
        "AND"
    }

    fn or_operator(&self) -> &'static str {
        "OR"
    }

    /// Quote a field name, segment-wise for dotted names
    fn format_field_name(&self, name: &str) -> String;

    /// Generate the placeholder for a 0-based parameter position
    ///
    /// - SQL Server: `@p0`, `@p1`
    /// - PostgreSQL: `$1`, `$2`
    /// - MySQL/SQLite: always `?`
    fn format_parameter_name(&self, index: usize) -> String;

    /// Raw placeholder marker (`@p`, `$`, `?`, ...)
    fn parameter_prefix(&self) -> &'static str;

    fn comparison_token(&self, op: ComparisonOp) -> &'static str {
        op.sql()
    }

    fn comparison(&self, field: &str, op: ComparisonOp, param: &str) -> String {
        format!("{} {} {}", field, self.comparison_token(op), param)
    }

    fn between(&self, field: &str, low: &str, high: &str, negated: bool) -> String {
        let not = if negated { "NOT " } else { "" };
        format!("{} {}BETWEEN {} AND {}", field, not, low, high)
    }

    /// Text matching with the pattern assembled around the parameter
    ///
    /// Default uses ANSI `||` concatenation.
    fn like(&self, field: &str, param: &str, kind: LikeKind, negated: bool) -> String {
        let mut pattern = String::new();
        if kind.leading_wildcard() {
            pattern.push_str("'%' || ");
        }
        pattern.push_str(param);
        if kind.trailing_wildcard() {
            pattern.push_str(" || '%'");
        }
        let not = if negated { "NOT " } else { "" };
        format!("{} {}LIKE {}", field, not, pattern)
    }

    fn membership_binding(&self) -> MembershipBinding {
        MembershipBinding::PerElement
    }

    /// Membership test; `params` holds one name per element for
    /// `PerElement` binding or a single name for `NativeList`
    fn membership(&self, field: &str, params: &[String], negated: bool) -> String {
        let not = if negated { "NOT " } else { "" };
        format!("{} {}IN ({})", field, not, params.join(", "))
    }

    fn null_check(&self, field: &str, negated: bool) -> String {
        if negated {
            format!("{} IS NOT NULL", field)
        } else {
            format!("{} IS NULL", field)
        }
    }

    fn empty_check(&self, field: &str, negated: bool) -> String {
        if negated {
            format!("{} <> ''", field)
        } else {
            format!("{} = ''", field)
        }
    }

    /// Difference between now and the field in whole `unit`s, compared to
    /// the parameter. `None` when the dialect has no syntax for the unit.
    fn date_diff(&self, unit: DateUnit, field: &str, op: ComparisonOp, param: &str)
    -> Option<String>;
}

/// Quote each dot-separated segment of a name, doubling embedded closers
///
/// Every segment is quoted, so a name can never close its own identifier.
pub fn quote_segments(name: &str, open: char, close: char) -> String {
    name.split('.')
        .map(|segment| {
            let segment = segment.trim();
            let escaped = segment.replace(close, &format!("{}{}", close, close));
            format!("{}{}{}", open, escaped, close)
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_segments_simple() {
        assert_eq!(quote_segments("Name", '[', ']'), "[Name]");
        assert_eq!(quote_segments("Name", '"', '"'), "\"Name\"");
    }

    #[test]
    fn test_quote_segments_dotted() {
        assert_eq!(quote_segments("dbo.Users.Name", '[', ']'), "[dbo].[Users].[Name]");
        assert_eq!(quote_segments("u.name", '`', '`'), "`u`.`name`");
    }

    #[test]
    fn test_quote_segments_escapes_closer() {
        assert_eq!(quote_segments("we]ird", '[', ']'), "[we]]ird]");
        assert_eq!(quote_segments("a\"b", '"', '"'), "\"a\"\"b\"");
    }

    #[test]
    fn test_quote_segments_escapes_wrapped_input() {
        assert_eq!(
            quote_segments("[a] = 1 OR [b]", '[', ']'),
            "[[a]] = 1 OR [b]]]"
        );
        assert_eq!(
            quote_segments("\"a\" = 1 OR \"b\"", '"', '"'),
            "\"\"\"a\"\" = 1 OR \"\"b\"\"\""
        );
        assert_eq!(quote_segments("[dbo].Name", '[', ']'), "[[dbo]]].[Name]");
    }

    #[test]
    fn test_comparison_op_parse() {
        assert_eq!("=".parse::<ComparisonOp>(), Ok(ComparisonOp::Eq));
        assert_eq!("!=".parse::<ComparisonOp>(), Ok(ComparisonOp::Ne));
        assert_eq!(" >= ".parse::<ComparisonOp>(), Ok(ComparisonOp::Ge));
        assert!("~".parse::<ComparisonOp>().is_err());
    }

    #[test]
    fn test_date_unit_parse() {
        assert_eq!("Day".parse::<DateUnit>(), Ok(DateUnit::Day));
        assert_eq!("MONTHS".parse::<DateUnit>(), Ok(DateUnit::Month));
        assert!("fortnight".parse::<DateUnit>().is_err());
    }

    #[test]
    fn test_like_kind_wildcards() {
        assert!(LikeKind::Contains.leading_wildcard());
        assert!(LikeKind::Contains.trailing_wildcard());
        assert!(!LikeKind::BeginsWith.leading_wildcard());
        assert!(!LikeKind::EndsWith.trailing_wildcard());
    }
}
