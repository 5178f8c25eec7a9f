//! Data types
//!
//! The `<name>` symbols of a value grammar and the token-level rule each
//! one applies to a single component value.

use std::fmt;

use styleval_css::{is_color, AngleUnit, Component, ComponentValue, LengthUnit, TimeUnit};

/// Keywords that can never be a `<custom-ident>`
const RESERVED_IDENTS: &[&str] = &["initial", "inherit", "unset", "default"];

/// A data type symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `<length>`: a dimension with a length unit, or unitless zero
    Length,
    /// `<percentage>`
    Percentage,
    /// `<length-percentage>`
    LengthPercentage,
    /// `<number>`
    Number,
    /// `<integer>`
    Integer,
    /// `<angle>`: deg, grad, rad or turn
    Angle,
    /// `<time>`: s or ms
    Time,
    /// `<color>`: named color, hex literal, rgb()/rgba()/hsl()/hsla()
    Color,
    /// `<url>`: url(...) either bare or quoted
    Url,
    /// `<resource>`: resource("path")
    Resource,
    /// `<string>`
    String,
    /// `<custom-ident>`
    CustomIdent,
}

impl DataType {
    /// Look up a data type by the name used between angle brackets
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(DataType::Length),
            "percentage" => Some(DataType::Percentage),
            "length-percentage" => Some(DataType::LengthPercentage),
            "number" => Some(DataType::Number),
            "integer" => Some(DataType::Integer),
            "angle" => Some(DataType::Angle),
            "time" => Some(DataType::Time),
            "color" => Some(DataType::Color),
            "url" => Some(DataType::Url),
            "resource" => Some(DataType::Resource),
            "string" => Some(DataType::String),
            "custom-ident" => Some(DataType::CustomIdent),
            _ => None,
        }
    }

    /// The name used between angle brackets
    pub fn name(self) -> &'static str {
        match self {
            DataType::Length => "length",
            DataType::Percentage => "percentage",
            DataType::LengthPercentage => "length-percentage",
            DataType::Number => "number",
            DataType::Integer => "integer",
            DataType::Angle => "angle",
            DataType::Time => "time",
            DataType::Color => "color",
            DataType::Url => "url",
            DataType::Resource => "resource",
            DataType::String => "string",
            DataType::CustomIdent => "custom-ident",
        }
    }

    /// Check whether a single component value is an instance of this type
    pub fn matches(self, component: &Component) -> bool {
        let value = &component.value;
        match self {
            DataType::Length => is_length(value),
            DataType::Percentage => matches!(value, ComponentValue::Percentage(_)),
            DataType::LengthPercentage => {
                is_length(value) || matches!(value, ComponentValue::Percentage(_))
            }
            DataType::Number => matches!(value, ComponentValue::Number { .. }),
            DataType::Integer => matches!(value, ComponentValue::Number { is_integer: true, .. }),
            DataType::Angle => matches!(
                value,
                ComponentValue::Dimension { unit, .. } if AngleUnit::from_str(unit).is_some()
            ),
            DataType::Time => matches!(
                value,
                ComponentValue::Dimension { unit, .. } if TimeUnit::from_str(unit).is_some()
            ),
            DataType::Color => is_color(component),
            DataType::Url => match value {
                ComponentValue::Url(_) => true,
                ComponentValue::Function { name, args } => {
                    name.eq_ignore_ascii_case("url") && is_single_string(args)
                }
                _ => false,
            },
            DataType::Resource => matches!(
                value,
                ComponentValue::Function { name, args }
                    if name.eq_ignore_ascii_case("resource") && is_single_string(args)
            ),
            DataType::String => matches!(value, ComponentValue::String(_)),
            DataType::CustomIdent => matches!(
                value,
                ComponentValue::Ident(name)
                    if !RESERVED_IDENTS.iter().any(|r| r.eq_ignore_ascii_case(name))
            ),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

fn is_length(value: &ComponentValue) -> bool {
    match value {
        ComponentValue::Dimension { unit, .. } => LengthUnit::from_str(unit).is_some(),
        ComponentValue::Number { value, .. } => *value == 0.0,
        _ => false,
    }
}

fn is_single_string(args: &[Component]) -> bool {
    matches!(args, [only] if matches!(only.value, ComponentValue::String(_)))
}
