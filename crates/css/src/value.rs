//! Value recognition
//!
//! Unit tables and color literals used by the data-type rules of the
//! value matcher.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

use crate::component::{Component, ComponentValue};

/// Length units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Pixels
    Px,
    /// Em units (relative to font-size)
    Em,
    /// Rem units (relative to root font-size)
    Rem,
    /// Viewport width percentage
    Vw,
    /// Viewport height percentage
    Vh,
    /// Viewport minimum
    Vmin,
    /// Viewport maximum
    Vmax,
    /// Centimeters
    Cm,
    /// Millimeters
    Mm,
    /// Inches
    In,
    /// Points (1/72 inch)
    Pt,
    /// Picas (12 points)
    Pc,
    /// Character width (width of '0')
    Ch,
    /// x-height (height of 'x')
    Ex,
}

impl LengthUnit {
    /// Parse a unit string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "px" => Some(LengthUnit::Px),
            "em" => Some(LengthUnit::Em),
            "rem" => Some(LengthUnit::Rem),
            "vw" => Some(LengthUnit::Vw),
            "vh" => Some(LengthUnit::Vh),
            "vmin" => Some(LengthUnit::Vmin),
            "vmax" => Some(LengthUnit::Vmax),
            "cm" => Some(LengthUnit::Cm),
            "mm" => Some(LengthUnit::Mm),
            "in" => Some(LengthUnit::In),
            "pt" => Some(LengthUnit::Pt),
            "pc" => Some(LengthUnit::Pc),
            "ch" => Some(LengthUnit::Ch),
            "ex" => Some(LengthUnit::Ex),
            _ => None,
        }
    }
}

/// Angle units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Deg,
    Grad,
    Rad,
    Turn,
}

impl AngleUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deg" => Some(AngleUnit::Deg),
            "grad" => Some(AngleUnit::Grad),
            "rad" => Some(AngleUnit::Rad),
            "turn" => Some(AngleUnit::Turn),
            _ => None,
        }
    }
}

/// Time units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" => Some(TimeUnit::Seconds),
            "ms" => Some(TimeUnit::Milliseconds),
            _ => None,
        }
    }
}

/// Whether a component is a color: a name, a hex literal or one of the
/// rgb()/rgba()/hsl()/hsla() functions with well-formed arguments.
///
/// Only the shape is checked; channel values are not range-limited.
pub fn is_color(component: &Component) -> bool {
    match &component.value {
        ComponentValue::Ident(name) => is_named_color(name),
        ComponentValue::Hash(hex) => is_hex_color(hex),
        ComponentValue::Function { name, args } => {
            let Some(values) = color_arguments(args) else {
                return false;
            };
            match name.to_ascii_lowercase().as_str() {
                "rgb" | "rgba" => is_rgb(&values),
                "hsl" | "hsla" => is_hsl(&values),
                _ => false,
            }
        }
        _ => false,
    }
}

/// Hex color digits (without #): 3, 4, 6 or 8 of them
pub fn is_hex_color(hex: &str) -> bool {
    matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn is_named_color(name: &str) -> bool {
    NAMED_COLORS.contains(name.to_ascii_lowercase().as_str())
}

/// Collect function arguments, accepting either all-comma or all-space
/// separation. Returns None for malformed separator placement.
fn color_arguments(args: &[Component]) -> Option<Vec<&ComponentValue>> {
    let has_commas = args.iter().any(|a| a.value == ComponentValue::Comma);
    let mut values = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        let expect_comma = has_commas && i % 2 == 1;
        match (&arg.value, expect_comma) {
            (ComponentValue::Comma, true) => {}
            (ComponentValue::Comma, false) | (_, true) => return None,
            (value, false) => values.push(value),
        }
    }
    if has_commas && args.len() % 2 == 0 {
        // trailing comma
        return None;
    }
    Some(values)
}

/// Number or percentage; used for rgb channels and every alpha
fn is_channel(value: &ComponentValue) -> bool {
    matches!(value, ComponentValue::Number { .. } | ComponentValue::Percentage(_))
}

fn has_alpha_slot(values: &[&ComponentValue]) -> bool {
    (3..=4).contains(&values.len()) && values.get(3).is_none_or(|alpha| is_channel(alpha))
}

fn is_rgb(values: &[&ComponentValue]) -> bool {
    has_alpha_slot(values) && values[..3].iter().all(|v| is_channel(v))
}

fn is_hsl(values: &[&ComponentValue]) -> bool {
    if !has_alpha_slot(values) {
        return false;
    }
    let hue = match values[0] {
        ComponentValue::Number { .. } => true,
        ComponentValue::Dimension { unit, .. } => AngleUnit::from_str(unit).is_some(),
        _ => false,
    };
    hue && is_channel(values[1]) && is_channel(values[2])
}

/// Named colors
static NAMED_COLORS: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    let mut m = FxHashSet::default();
    m.insert("transparent");

    // Basic colors
    m.insert("black");
    m.insert("white");
    m.insert("red");
    m.insert("green");
    m.insert("blue");
    m.insert("yellow");
    m.insert("cyan");
    m.insert("aqua");
    m.insert("magenta");
    m.insert("fuchsia");

    // Grays
    m.insert("gray");
    m.insert("grey");
    m.insert("silver");
    m.insert("darkgray");
    m.insert("darkgrey");
    m.insert("lightgray");
    m.insert("lightgrey");
    m.insert("dimgray");
    m.insert("dimgrey");
    m.insert("gainsboro");
    m.insert("slategray");
    m.insert("slategrey");
    m.insert("lightslategray");
    m.insert("lightslategrey");
    m.insert("darkslategray");
    m.insert("darkslategrey");

    // Reds and pinks
    m.insert("maroon");
    m.insert("darkred");
    m.insert("crimson");
    m.insert("firebrick");
    m.insert("indianred");
    m.insert("lightcoral");
    m.insert("salmon");
    m.insert("darksalmon");
    m.insert("lightsalmon");
    m.insert("tomato");
    m.insert("orangered");
    m.insert("coral");
    m.insert("pink");
    m.insert("lightpink");
    m.insert("hotpink");
    m.insert("deeppink");
    m.insert("mediumvioletred");
    m.insert("palevioletred");

    // Oranges and yellows
    m.insert("orange");
    m.insert("darkorange");
    m.insert("gold");
    m.insert("lightyellow");
    m.insert("lemonchiffon");
    m.insert("lightgoldenrodyellow");
    m.insert("papayawhip");
    m.insert("moccasin");
    m.insert("peachpuff");
    m.insert("palegoldenrod");
    m.insert("khaki");
    m.insert("darkkhaki");
    m.insert("goldenrod");
    m.insert("darkgoldenrod");

    // Greens
    m.insert("lime");
    m.insert("limegreen");
    m.insert("lightgreen");
    m.insert("palegreen");
    m.insert("darkgreen");
    m.insert("forestgreen");
    m.insert("seagreen");
    m.insert("mediumseagreen");
    m.insert("darkseagreen");
    m.insert("lightseagreen");
    m.insert("springgreen");
    m.insert("mediumspringgreen");
    m.insert("mediumaquamarine");
    m.insert("olive");
    m.insert("olivedrab");
    m.insert("darkolivegreen");
    m.insert("yellowgreen");
    m.insert("lawngreen");
    m.insert("chartreuse");
    m.insert("greenyellow");

    // Blues and cyans
    m.insert("navy");
    m.insert("darkblue");
    m.insert("mediumblue");
    m.insert("midnightblue");
    m.insert("royalblue");
    m.insert("steelblue");
    m.insert("dodgerblue");
    m.insert("deepskyblue");
    m.insert("cornflowerblue");
    m.insert("skyblue");
    m.insert("lightskyblue");
    m.insert("lightblue");
    m.insert("powderblue");
    m.insert("lightsteelblue");
    m.insert("cadetblue");
    m.insert("teal");
    m.insert("darkcyan");
    m.insert("lightcyan");
    m.insert("aquamarine");
    m.insert("turquoise");
    m.insert("mediumturquoise");
    m.insert("darkturquoise");
    m.insert("paleturquoise");

    // Purples
    m.insert("purple");
    m.insert("darkmagenta");
    m.insert("darkviolet");
    m.insert("darkorchid");
    m.insert("mediumorchid");
    m.insert("orchid");
    m.insert("violet");
    m.insert("plum");
    m.insert("thistle");
    m.insert("lavender");
    m.insert("indigo");
    m.insert("rebeccapurple");
    m.insert("mediumpurple");
    m.insert("blueviolet");
    m.insert("slateblue");
    m.insert("darkslateblue");
    m.insert("mediumslateblue");

    // Browns
    m.insert("brown");
    m.insert("saddlebrown");
    m.insert("sienna");
    m.insert("chocolate");
    m.insert("peru");
    m.insert("sandybrown");
    m.insert("burlywood");
    m.insert("tan");
    m.insert("rosybrown");
    m.insert("wheat");
    m.insert("navajowhite");
    m.insert("bisque");
    m.insert("blanchedalmond");
    m.insert("cornsilk");

    // Whites
    m.insert("snow");
    m.insert("honeydew");
    m.insert("mintcream");
    m.insert("azure");
    m.insert("aliceblue");
    m.insert("ghostwhite");
    m.insert("whitesmoke");
    m.insert("seashell");
    m.insert("beige");
    m.insert("oldlace");
    m.insert("floralwhite");
    m.insert("ivory");
    m.insert("antiquewhite");
    m.insert("linen");
    m.insert("lavenderblush");
    m.insert("mistyrose");

    m
});
