//! Integration tests for color resolution and the grayscale projection.

use quickcheck_macros::quickcheck;
use sepia_css::color::{NAMED_COLORS, Rgb, grayscale, is_color_function, is_named_color};
use sepia_css::{Value, grayscale_hex, parse_stylesheet, to_rgb};

fn first_value(css: &str) -> Value {
    let sheet = parse_stylesheet(&format!("a{{color:{css}}}")).expect("valid css");
    let rule = sheet.rules[0].as_style().expect("style rule");
    rule.declarations[0].value[0].clone()
}

#[test]
fn test_parsed_values_resolve() {
    assert_eq!(to_rgb(&first_value("red")), Some(Rgb::new(255, 0, 0)));
    assert_eq!(to_rgb(&first_value("#0f0")), Some(Rgb::new(0, 255, 0)));
    assert_eq!(to_rgb(&first_value("rgba(0,0,255,.5)")), Some(Rgb::new(0, 0, 255)));
    assert_eq!(to_rgb(&first_value("hsl(0 0% 100%)")), Some(Rgb::new(255, 255, 255)));
    assert_eq!(to_rgb(&first_value("rgb(var(--r), 0, 0)")), None);
    assert_eq!(to_rgb(&first_value("inherit")), None);
}

#[test]
fn test_known_projections() {
    assert_eq!(grayscale_hex(Rgb::new(255, 0, 0)), "4c4c4c");
    assert_eq!(grayscale_hex(Rgb::new(0, 128, 0)), "4b4b4b");
    assert_eq!(grayscale_hex(Rgb::new(0, 0, 255)), "1d1d1d");
    assert_eq!(grayscale_hex(Rgb::new(255, 255, 255)), "ffffff");
    assert_eq!(grayscale_hex(Rgb::new(0, 0, 0)), "000000");
}

#[test]
fn test_every_named_color_resolves() {
    for (name, rgb) in NAMED_COLORS {
        assert!(is_named_color(name));
        assert_eq!(Rgb::from_named(&name.to_ascii_uppercase()), Some(*rgb));
    }
    assert!(!is_named_color("transparent"));
    assert!(is_color_function("RGBA"));
    assert!(!is_color_function("hwb"));
}

#[quickcheck]
fn prop_grayscale_is_idempotent(r: u8, g: u8, b: u8) -> bool {
    let once = grayscale(Rgb::new(r, g, b));
    grayscale(once) == once
}

#[quickcheck]
fn prop_grayscale_has_equal_channels(r: u8, g: u8, b: u8) -> bool {
    let gray = grayscale(Rgb::new(r, g, b));
    gray.r == gray.g && gray.g == gray.b
}

#[quickcheck]
fn prop_grayscale_hex_roundtrips_through_from_hex(r: u8, g: u8, b: u8) -> bool {
    let hex = grayscale_hex(Rgb::new(r, g, b));
    Rgb::from_hex(&hex) == Some(grayscale(Rgb::new(r, g, b)))
}
