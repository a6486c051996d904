use sepia_css::color::{Rgb, grayscale_hex, is_color_function, to_rgb};
use sepia_css::{NodeKind, Stylesheet, Value, walk_values};
use sepia_dom::DomTree;

use super::StylePass;
use crate::config::PassKind;
use crate::report::RewriteReport;

/// Replaces every recognized color value with its gray projection, written
/// as a six-digit hex color.
///
/// Values that are not recognized colors (`currentColor`, `var()`, relative
/// color syntax) are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecolorPass;

impl RecolorPass {
    /// The replacement for a single value, if it is a color.
    #[must_use]
    pub fn recolor(value: &Value) -> Option<Value> {
        let rgb = match value {
            Value::Identifier(_) => to_rgb(value)?,
            Value::HexColor(digits) => Rgb::from_hex(digits)?,
            Value::FunctionCall { name, .. } if is_color_function(name) => to_rgb(value)?,
            Value::FunctionCall { .. } | Value::Other(_) => return None,
        };
        let gray = Value::HexColor(grayscale_hex(rgb));
        (gray != *value).then_some(gray)
    }
}

impl StylePass for RecolorPass {
    fn kind(&self) -> PassKind {
        PassKind::Grayscale
    }

    fn rewrites_inline_styles(&self) -> bool {
        true
    }

    fn rewrite(&mut self, sheet: &mut Stylesheet, _tree: &mut DomTree, report: &mut RewriteReport) {
        walk_values(
            sheet,
            &[NodeKind::Identifier, NodeKind::HexColor, NodeKind::FunctionCall],
            |value, cursor| {
                if let Some(gray) = Self::recolor(value) {
                    cursor.replace(gray);
                    report.colors_rewritten += 1;
                }
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sepia_css::{generate, parse_stylesheet};

    fn recolor(css: &str) -> (String, usize) {
        let mut sheet = parse_stylesheet(css).expect("valid css");
        let mut report = RewriteReport::default();
        RecolorPass.rewrite(&mut sheet, &mut DomTree::new(), &mut report);
        (generate(&sheet), report.colors_rewritten)
    }

    #[test]
    fn test_named_hex_and_functions() {
        assert_eq!(
            recolor("a{color:red;background:#00F8;border-color:rgb(0,128,0)}"),
            (
                "a{color:#4c4c4c;background:#1d1d1d;border-color:#4b4b4b}".to_string(),
                3
            )
        );
    }

    #[test]
    fn test_colors_nested_in_other_functions() {
        assert_eq!(
            recolor("a{background:linear-gradient(to right, RED, hsl(240 100% 50%))}").0,
            "a{background:linear-gradient(to right, #4c4c4c, #1d1d1d)}"
        );
    }

    #[test]
    fn test_unrecognized_values_are_kept() {
        let css = "a{color:currentColor;fill:var(--c);--x:red;width:calc(1px + 2px)}";
        assert_eq!(recolor(css), (css.to_string(), 0));
    }

    #[test]
    fn test_gray_hex_is_not_counted_again() {
        assert_eq!(recolor("a{color:#4c4c4c}").1, 0);
        assert_eq!(recolor("a{color:#4C4C4C}").1, 1);
    }
}
