//! Color resolution and desaturation.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Recognized colors form a closed set: the named color keywords, hex colors
//! and the `rgb()`/`rgba()`/`hsl()`/`hsla()` functions. Anything else is left
//! alone by callers.

use crate::generate::generate_values;
use crate::parser::Value;
use crate::parser::css_parser::is_hex_color_digits;
use crate::tokenizer::{CSSToken, CSSTokenizer};

/// An sRGB color without alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// [§ 5.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits." The alpha digits are discarded.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !is_hex_color_digits(hex) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 | 4 => Some(Self {
                r: channel(&hex[0..1].repeat(2))?,
                g: channel(&hex[1..2].repeat(2))?,
                b: channel(&hex[2..3].repeat(2))?,
            }),
            _ => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// ASCII case-insensitive lookup in the named color table.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        NAMED_COLORS
            .binary_search_by(|(candidate, _)| (*candidate).cmp(name.as_str()))
            .ok()
            .map(|index| NAMED_COLORS[index].1)
    }

    /// Lowercase `rrggbb` digits, no `#`.
    #[must_use]
    pub fn to_hex_digits(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Functions whose arguments describe a color.
pub const COLOR_FUNCTIONS: &[&str] = &["hsl", "hsla", "rgb", "rgba"];

/// Whether `name` is a recognized color function, ASCII case-insensitively.
#[must_use]
pub fn is_color_function(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    COLOR_FUNCTIONS.binary_search(&name.as_str()).is_ok()
}

/// Whether `name` is a named color keyword, ASCII case-insensitively.
#[must_use]
pub fn is_named_color(name: &str) -> bool {
    Rgb::from_named(name).is_some()
}

/// Resolve a style tree value to a color.
///
/// Returns `None` for values outside the recognized set, including functions
/// whose arguments use `var()`, `calc()` or relative color syntax.
#[must_use]
pub fn to_rgb(value: &Value) -> Option<Rgb> {
    match value {
        Value::Identifier(name) => Rgb::from_named(name),
        Value::HexColor(digits) => Rgb::from_hex(digits),
        Value::FunctionCall { name, args } => parse_color_function(name, args),
        Value::Other(_) => None,
    }
}

/// Project a color onto the gray axis.
///
/// Uses the integer Rec. 601 luma `(299 R + 587 G + 114 B + 500) / 1000`.
/// The weights sum to 1000, so a gray maps to itself and the projection is
/// idempotent.
#[must_use]
pub fn grayscale(rgb: Rgb) -> Rgb {
    let luma = (299 * u32::from(rgb.r) + 587 * u32::from(rgb.g) + 114 * u32::from(rgb.b) + 500)
        / 1000;
    let gray = u8::try_from(luma).unwrap_or(u8::MAX);
    Rgb::new(gray, gray, gray)
}

/// The grayscale projection of `rgb` as six lowercase hex digits, no `#`.
#[must_use]
pub fn grayscale_hex(rgb: Rgb) -> String {
    grayscale(rgb).to_hex_digits()
}

/// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
/// [§ 7 The HSL Functions](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
///
/// Per CSS Color 4, rgb()/rgba() and hsl()/hsla() are aliases.
fn parse_color_function(name: &str, args: &[Value]) -> Option<Rgb> {
    if !is_color_function(name) {
        return None;
    }
    // Nested functions (var(), calc(), ...) cannot be resolved statically.
    if args.iter().any(|arg| matches!(arg, Value::FunctionCall { .. })) {
        return None;
    }
    let vals = extract_color_args(&generate_values(args))?;
    if vals.len() < 3 || vals.len() > 4 {
        return None;
    }
    match name.to_ascii_lowercase().as_str() {
        "rgb" | "rgba" => parse_rgb(&vals),
        _ => parse_hsl(&vals),
    }
}

/// A numeric value extracted from a color function argument.
#[derive(Debug, Clone, Copy)]
enum ColorArg {
    Number(f64),
    Percentage(f64),
    /// An angle already converted to degrees.
    Degrees(f64),
}

/// Extract numeric arguments from a color function's argument text,
/// skipping whitespace, commas and the `/` before alpha.
///
/// Returns `None` if anything else appears, such as `none` or `from`.
fn extract_color_args(text: &str) -> Option<Vec<ColorArg>> {
    let mut tokenizer = CSSTokenizer::new(text);
    tokenizer.run();

    let mut result = Vec::new();
    for spanned in tokenizer.tokens() {
        match &spanned.token {
            CSSToken::Number { value, .. } => result.push(ColorArg::Number(*value)),
            CSSToken::Percentage { value } => result.push(ColorArg::Percentage(*value)),
            // [§ 7.1](https://www.w3.org/TR/css-values-4/#angles)
            // "deg: Degrees. There are 360 degrees in a full circle."
            CSSToken::Dimension { value, unit } => {
                let degrees = match unit.to_ascii_lowercase().as_str() {
                    "deg" => *value,
                    "grad" => value * 360.0 / 400.0,
                    "rad" => value.to_degrees(),
                    "turn" => value * 360.0,
                    _ => return None,
                };
                result.push(ColorArg::Degrees(degrees));
            }
            CSSToken::Whitespace | CSSToken::Comma | CSSToken::Delim('/') | CSSToken::EOF => {}
            _ => return None,
        }
    }
    Some(result)
}

/// "rgb() = rgb( <percentage>{3} [ / <alpha-value> ]? ) |
///          rgb( <number>{3} [ / <alpha-value> ]? )"
///
/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
fn parse_rgb(vals: &[ColorArg]) -> Option<Rgb> {
    Some(Rgb {
        r: color_channel_to_u8(vals[0])?,
        g: color_channel_to_u8(vals[1])?,
        b: color_channel_to_u8(vals[2])?,
    })
}

/// "hsl() = hsl( <hue> <percentage> <percentage> [ / <alpha-value> ]? )"
///
/// "<hue> is a <number> or <angle>, interpreted as degrees."
fn parse_hsl(vals: &[ColorArg]) -> Option<Rgb> {
    let hue = match vals[0] {
        ColorArg::Number(v) | ColorArg::Degrees(v) => v,
        ColorArg::Percentage(_) => return None,
    };
    let fraction = |arg: ColorArg| match arg {
        ColorArg::Percentage(v) | ColorArg::Number(v) => Some(v / 100.0),
        ColorArg::Degrees(_) => None,
    };
    let (r, g, b) = hsl_to_rgb(hue, fraction(vals[1])?, fraction(vals[2])?);
    Some(Rgb { r, g, b })
}

/// Numbers are clamped to 0-255; percentages map 0%-100% to 0-255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn color_channel_to_u8(arg: ColorArg) -> Option<u8> {
    let v = match arg {
        ColorArg::Number(n) => n,
        // "100% = 255"
        ColorArg::Percentage(p) => p * 255.0 / 100.0,
        ColorArg::Degrees(_) => return None,
    };
    Some(v.round().clamp(0.0, 255.0) as u8)
}

/// [§ 7.1 Converting HSL Colors to sRGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
///
/// - hue: angle in degrees (wraps)
/// - saturation: 0.0-1.0
/// - lightness: 0.0-1.0
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        5 => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };

    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

    (to_u8(r1), to_u8(g1), to_u8(b1))
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
///
/// The 147 named colors, sorted by name for binary search.
pub const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("aliceblue", Rgb::new(240, 248, 255)),
    ("antiquewhite", Rgb::new(250, 235, 215)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("aquamarine", Rgb::new(127, 255, 212)),
    ("azure", Rgb::new(240, 255, 255)),
    ("beige", Rgb::new(245, 245, 220)),
    ("bisque", Rgb::new(255, 228, 196)),
    ("black", Rgb::new(0, 0, 0)),
    ("blanchedalmond", Rgb::new(255, 235, 205)),
    ("blue", Rgb::new(0, 0, 255)),
    ("blueviolet", Rgb::new(138, 43, 226)),
    ("brown", Rgb::new(165, 42, 42)),
    ("burlywood", Rgb::new(222, 184, 135)),
    ("cadetblue", Rgb::new(95, 158, 160)),
    ("chartreuse", Rgb::new(127, 255, 0)),
    ("chocolate", Rgb::new(210, 105, 30)),
    ("coral", Rgb::new(255, 127, 80)),
    ("cornflowerblue", Rgb::new(100, 149, 237)),
    ("cornsilk", Rgb::new(255, 248, 220)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("darkblue", Rgb::new(0, 0, 139)),
    ("darkcyan", Rgb::new(0, 139, 139)),
    ("darkgoldenrod", Rgb::new(184, 134, 11)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("darkgreen", Rgb::new(0, 100, 0)),
    ("darkgrey", Rgb::new(169, 169, 169)),
    ("darkkhaki", Rgb::new(189, 183, 107)),
    ("darkmagenta", Rgb::new(139, 0, 139)),
    ("darkolivegreen", Rgb::new(85, 107, 47)),
    ("darkorange", Rgb::new(255, 140, 0)),
    ("darkorchid", Rgb::new(153, 50, 204)),
    ("darkred", Rgb::new(139, 0, 0)),
    ("darksalmon", Rgb::new(233, 150, 122)),
    ("darkseagreen", Rgb::new(143, 188, 143)),
    ("darkslateblue", Rgb::new(72, 61, 139)),
    ("darkslategray", Rgb::new(47, 79, 79)),
    ("darkslategrey", Rgb::new(47, 79, 79)),
    ("darkturquoise", Rgb::new(0, 206, 209)),
    ("darkviolet", Rgb::new(148, 0, 211)),
    ("deeppink", Rgb::new(255, 20, 147)),
    ("deepskyblue", Rgb::new(0, 191, 255)),
    ("dimgray", Rgb::new(105, 105, 105)),
    ("dimgrey", Rgb::new(105, 105, 105)),
    ("dodgerblue", Rgb::new(30, 144, 255)),
    ("firebrick", Rgb::new(178, 34, 34)),
    ("floralwhite", Rgb::new(255, 250, 240)),
    ("forestgreen", Rgb::new(34, 139, 34)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("gainsboro", Rgb::new(220, 220, 220)),
    ("ghostwhite", Rgb::new(248, 248, 255)),
    ("gold", Rgb::new(255, 215, 0)),
    ("goldenrod", Rgb::new(218, 165, 32)),
    ("gray", Rgb::new(128, 128, 128)),
    ("green", Rgb::new(0, 128, 0)),
    ("greenyellow", Rgb::new(173, 255, 47)),
    ("grey", Rgb::new(128, 128, 128)),
    ("honeydew", Rgb::new(240, 255, 240)),
    ("hotpink", Rgb::new(255, 105, 180)),
    ("indianred", Rgb::new(205, 92, 92)),
    ("indigo", Rgb::new(75, 0, 130)),
    ("ivory", Rgb::new(255, 255, 240)),
    ("khaki", Rgb::new(240, 230, 140)),
    ("lavender", Rgb::new(230, 230, 250)),
    ("lavenderblush", Rgb::new(255, 240, 245)),
    ("lawngreen", Rgb::new(124, 252, 0)),
    ("lemonchiffon", Rgb::new(255, 250, 205)),
    ("lightblue", Rgb::new(173, 216, 230)),
    ("lightcoral", Rgb::new(240, 128, 128)),
    ("lightcyan", Rgb::new(224, 255, 255)),
    ("lightgoldenrodyellow", Rgb::new(250, 250, 210)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("lightgreen", Rgb::new(144, 238, 144)),
    ("lightgrey", Rgb::new(211, 211, 211)),
    ("lightpink", Rgb::new(255, 182, 193)),
    ("lightsalmon", Rgb::new(255, 160, 122)),
    ("lightseagreen", Rgb::new(32, 178, 170)),
    ("lightskyblue", Rgb::new(135, 206, 250)),
    ("lightslategray", Rgb::new(119, 136, 153)),
    ("lightslategrey", Rgb::new(119, 136, 153)),
    ("lightsteelblue", Rgb::new(176, 196, 222)),
    ("lightyellow", Rgb::new(255, 255, 224)),
    ("lime", Rgb::new(0, 255, 0)),
    ("limegreen", Rgb::new(50, 205, 50)),
    ("linen", Rgb::new(250, 240, 230)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("mediumaquamarine", Rgb::new(102, 205, 170)),
    ("mediumblue", Rgb::new(0, 0, 205)),
    ("mediumorchid", Rgb::new(186, 85, 211)),
    ("mediumpurple", Rgb::new(147, 112, 219)),
    ("mediumseagreen", Rgb::new(60, 179, 113)),
    ("mediumslateblue", Rgb::new(123, 104, 238)),
    ("mediumspringgreen", Rgb::new(0, 250, 154)),
    ("mediumturquoise", Rgb::new(72, 209, 204)),
    ("mediumvioletred", Rgb::new(199, 21, 133)),
    ("midnightblue", Rgb::new(25, 25, 112)),
    ("mintcream", Rgb::new(245, 255, 250)),
    ("mistyrose", Rgb::new(255, 228, 225)),
    ("moccasin", Rgb::new(255, 228, 181)),
    ("navajowhite", Rgb::new(255, 222, 173)),
    ("navy", Rgb::new(0, 0, 128)),
    ("oldlace", Rgb::new(253, 245, 230)),
    ("olive", Rgb::new(128, 128, 0)),
    ("olivedrab", Rgb::new(107, 142, 35)),
    ("orange", Rgb::new(255, 165, 0)),
    ("orangered", Rgb::new(255, 69, 0)),
    ("orchid", Rgb::new(218, 112, 214)),
    ("palegoldenrod", Rgb::new(238, 232, 170)),
    ("palegreen", Rgb::new(152, 251, 152)),
    ("paleturquoise", Rgb::new(175, 238, 238)),
    ("palevioletred", Rgb::new(219, 112, 147)),
    ("papayawhip", Rgb::new(255, 239, 213)),
    ("peachpuff", Rgb::new(255, 218, 185)),
    ("peru", Rgb::new(205, 133, 63)),
    ("pink", Rgb::new(255, 192, 203)),
    ("plum", Rgb::new(221, 160, 221)),
    ("powderblue", Rgb::new(176, 224, 230)),
    ("purple", Rgb::new(128, 0, 128)),
    ("red", Rgb::new(255, 0, 0)),
    ("rosybrown", Rgb::new(188, 143, 143)),
    ("royalblue", Rgb::new(65, 105, 225)),
    ("saddlebrown", Rgb::new(139, 69, 19)),
    ("salmon", Rgb::new(250, 128, 114)),
    ("sandybrown", Rgb::new(244, 164, 96)),
    ("seagreen", Rgb::new(46, 139, 87)),
    ("seashell", Rgb::new(255, 245, 238)),
    ("sienna", Rgb::new(160, 82, 45)),
    ("silver", Rgb::new(192, 192, 192)),
    ("skyblue", Rgb::new(135, 206, 235)),
    ("slateblue", Rgb::new(106, 90, 205)),
    ("slategray", Rgb::new(112, 128, 144)),
    ("slategrey", Rgb::new(112, 128, 144)),
    ("snow", Rgb::new(255, 250, 250)),
    ("springgreen", Rgb::new(0, 255, 127)),
    ("steelblue", Rgb::new(70, 130, 180)),
    ("tan", Rgb::new(210, 180, 140)),
    ("teal", Rgb::new(0, 128, 128)),
    ("thistle", Rgb::new(216, 191, 216)),
    ("tomato", Rgb::new(255, 99, 71)),
    ("turquoise", Rgb::new(64, 224, 208)),
    ("violet", Rgb::new(238, 130, 238)),
    ("wheat", Rgb::new(245, 222, 179)),
    ("white", Rgb::new(255, 255, 255)),
    ("whitesmoke", Rgb::new(245, 245, 245)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("yellowgreen", Rgb::new(154, 205, 50)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_table_is_sorted_and_complete() {
        assert_eq!(NAMED_COLORS.len(), 147);
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_red_projects_to_4c() {
        assert_eq!(grayscale_hex(Rgb::new(255, 0, 0)), "4c4c4c");
    }

    #[test]
    fn test_gray_is_fixed_point() {
        for v in [0_u8, 1, 76, 128, 254, 255] {
            assert_eq!(grayscale(Rgb::new(v, v, v)), Rgb::new(v, v, v));
        }
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(Rgb::from_hex("f00"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("#F00A"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("00ff0080"), Some(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::from_hex("12345"), None);
        assert_eq!(Rgb::from_hex("ggg"), None);
    }

    fn call(name: &str, args: &str) -> Value {
        Value::FunctionCall {
            name: name.to_string(),
            args: vec![Value::Other(args.to_string())],
        }
    }

    #[test]
    fn test_rgb_function_syntaxes() {
        assert_eq!(to_rgb(&call("rgb", "255, 0, 0")), Some(Rgb::new(255, 0, 0)));
        assert_eq!(to_rgb(&call("RGBA", "100%,0%,0%,0.5")), Some(Rgb::new(255, 0, 0)));
        assert_eq!(to_rgb(&call("rgb", "0 128 0 / 50%")), Some(Rgb::new(0, 128, 0)));
        assert_eq!(to_rgb(&call("rgb", "300, -5, 0")), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_hsl_function_units() {
        let red = Some(Rgb::new(255, 0, 0));
        assert_eq!(to_rgb(&call("hsl", "0, 100%, 50%")), red);
        assert_eq!(to_rgb(&call("hsl", "360deg 100% 50%")), red);
        assert_eq!(to_rgb(&call("hsla", "1turn, 100%, 50%, .2")), red);
        assert_eq!(to_rgb(&call("hsl", "120 100% 25%")), Some(Rgb::new(0, 128, 0)));
    }

    #[test]
    fn test_unresolvable_values() {
        assert_eq!(to_rgb(&call("rgb", "none 0 0")), None);
        assert_eq!(to_rgb(&call("rgb", "1, 2")), None);
        assert_eq!(to_rgb(&call("lab", "50 0 0")), None);
        assert_eq!(to_rgb(&Value::Identifier("transparent".to_string())), None);
        assert_eq!(to_rgb(&Value::Identifier("currentColor".to_string())), None);
        assert_eq!(to_rgb(&Value::Other("12px".to_string())), None);
        let nested = Value::FunctionCall {
            name: "rgb".to_string(),
            args: vec![Value::FunctionCall {
                name: "var".to_string(),
                args: vec![Value::Other("--c".to_string())],
            }],
        };
        assert_eq!(to_rgb(&nested), None);
    }

    #[test]
    fn test_named_lookup_is_case_insensitive() {
        assert_eq!(Rgb::from_named("Red"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_named("GREY"), Some(Rgb::new(128, 128, 128)));
    }
}
