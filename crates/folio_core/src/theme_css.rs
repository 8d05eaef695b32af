//! Theme tokens as CSS custom properties.

use crate::model::document::ThemeConfig;

const DEFAULT_SURFACE: &str = "#ffffff";
const DEFAULT_TESTIMONIAL_BACKGROUND: &str = "#ffffff";
const DEFAULT_TESTIMONIAL_ROLE: &str = "#a8a29e";

/// Returns `(property, value)` pairs for every non-empty theme token, in a
/// stable order.
pub fn css_variables(theme: &ThemeConfig) -> Vec<(&'static str, String)> {
    let colors = &theme.colors;
    let sizes = &theme.font_sizes;
    let styles = &theme.element_styles;

    let candidates: [(&'static str, &str); 21] = [
        ("--color-bg", colors.background.as_str()),
        ("--color-text", colors.text.as_str()),
        ("--color-accent", colors.accent.as_str()),
        ("--color-secondary", colors.secondary.as_str()),
        (
            "--color-surface",
            non_empty_or(colors.surface.as_deref(), DEFAULT_SURFACE),
        ),
        (
            "--color-testimonial-bg",
            non_empty_or(
                colors.testimonial_background.as_deref(),
                DEFAULT_TESTIMONIAL_BACKGROUND,
            ),
        ),
        (
            "--color-testimonial-role",
            non_empty_or(colors.testimonial_role.as_deref(), DEFAULT_TESTIMONIAL_ROLE),
        ),
        ("--font-serif", theme.fonts.serif.as_str()),
        ("--font-sans", theme.fonts.sans.as_str()),
        ("--font-size-base", sizes.base.as_str()),
        ("--font-size-title", sizes.title.as_str()),
        ("--font-size-subtitle", sizes.subtitle.as_str()),
        ("--font-size-caption", sizes.caption.as_str()),
        ("--elem-title-font", styles.title.font.as_str()),
        ("--elem-title-color", styles.title.color.as_str()),
        ("--elem-subtitle-font", styles.subtitle.font.as_str()),
        ("--elem-subtitle-color", styles.subtitle.color.as_str()),
        ("--elem-text-font", styles.text.font.as_str()),
        ("--elem-text-color", styles.text.color.as_str()),
        ("--elem-caption-font", styles.caption.font.as_str()),
        ("--elem-caption-color", styles.caption.color.as_str()),
    ];

    candidates
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(name, value)| (name, value.to_string()))
        .collect()
}

/// Renders the variables as a `:root { ... }` block.
pub fn render_root_stylesheet(theme: &ThemeConfig) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in css_variables(theme) {
        css.push_str("  ");
        css.push_str(name);
        css.push_str(": ");
        css.push_str(&value);
        css.push_str(";\n");
    }
    css.push('}');
    css.push('\n');
    css
}

fn non_empty_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => fallback,
    }
}
