//! Defensive merge of a stored document into the compiled-in defaults.
//!
//! # Responsibility
//! - Turn any JSON value (partial, stale, malformed or empty) into a complete
//!   `PortfolioDocument`.
//!
//! # Invariants
//! - Never fails and never panics.
//! - A key overrides its default only when the JSON type matches.
//! - Missing or non-array lists keep the default list; lists are never null.
//! - `profile.bio` is always a list of strings.

use crate::model::defaults::initial_document;
use crate::model::document::{
    Album, Contact, ElementStyle, ElementStyles, HomeContent, PageContent, Photo,
    PortfolioDocument, Profile, Testimonial, TextWork, ThemeColors, ThemeConfig, ThemeFontSizes,
    ThemeFonts,
};
use serde_json::{Map, Value};

/// Merges `incoming` over the default document.
pub fn merge_with_defaults(incoming: &Value) -> PortfolioDocument {
    merge_over(incoming, initial_document())
}

/// Merges `incoming` over an explicit base document.
pub fn merge_over(incoming: &Value, base: PortfolioDocument) -> PortfolioDocument {
    let Some(root) = incoming.as_object() else {
        return base;
    };
    let root = Fields(Some(root));

    PortfolioDocument {
        profile: merge_profile(root.object("profile"), base.profile),
        albums: root.list("albums", album_from).unwrap_or(base.albums),
        writings: root.list("writings", writing_from).unwrap_or(base.writings),
        testimonials: root
            .list("testimonials", testimonial_from)
            .unwrap_or(base.testimonials),
        theme: merge_theme(root.object("theme"), base.theme),
        home: merge_home(root.object("home"), base.home),
        portfolio_page: merge_page(root.object("portfolioPage"), base.portfolio_page),
        writings_page: merge_page(root.object("writingsPage"), base.writings_page),
    }
}

/// Read-only view over an optional JSON object.
#[derive(Clone, Copy)]
struct Fields<'a>(Option<&'a Map<String, Value>>);

impl<'a> Fields<'a> {
    fn get(self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|map| map.get(key))
    }

    fn object(self, key: &str) -> Fields<'a> {
        Fields(self.get(key).and_then(Value::as_object))
    }

    fn string(self, key: &str, default: String) -> String {
        match self.get(key) {
            Some(Value::String(value)) => value.clone(),
            _ => default,
        }
    }

    /// Explicit `null` clears the field; other mismatches keep the default.
    fn opt_string(self, key: &str, default: Option<String>) -> Option<String> {
        match self.get(key) {
            Some(Value::String(value)) => Some(value.clone()),
            Some(Value::Null) => None,
            _ => default,
        }
    }

    fn opt_u32(self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(Value::as_u64)
            .and_then(|value| u32::try_from(value).ok())
    }

    /// `None` when the key is not an array; non-object elements are dropped.
    fn list<T>(self, key: &str, build: fn(Fields<'_>) -> T) -> Option<Vec<T>> {
        let items = self.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| build(Fields(Some(item))))
                .collect(),
        )
    }
}

fn merge_profile(fields: Fields<'_>, base: Profile) -> Profile {
    let contact = fields.object("contact");
    Profile {
        name: fields.string("name", base.name),
        role: fields.string("role", base.role),
        bio: normalize_bio(fields.get("bio"), base.bio),
        contact: Contact {
            email: contact.string("email", base.contact.email),
            instagram: contact.string("instagram", base.contact.instagram),
            linkedin: contact.opt_string("linkedin", base.contact.linkedin),
        },
        profile_image: fields.string("profileImage", base.profile_image),
    }
}

/// Arrays keep their string paragraphs, a lone string becomes one paragraph.
fn normalize_bio(value: Option<&Value>, default: Vec<String>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(text)) => vec![text.clone()],
        _ => default,
    }
}

fn merge_theme(fields: Fields<'_>, base: ThemeConfig) -> ThemeConfig {
    let colors = fields.object("colors");
    let fonts = fields.object("fonts");
    let sizes = fields.object("fontSizes");
    let styles = fields.object("elementStyles");

    ThemeConfig {
        colors: ThemeColors {
            background: colors.string("background", base.colors.background),
            text: colors.string("text", base.colors.text),
            accent: colors.string("accent", base.colors.accent),
            secondary: colors.string("secondary", base.colors.secondary),
            surface: colors.opt_string("surface", base.colors.surface),
            testimonial_background: colors
                .opt_string("testimonialBackground", base.colors.testimonial_background),
            testimonial_role: colors.opt_string("testimonialRole", base.colors.testimonial_role),
        },
        fonts: ThemeFonts {
            serif: fonts.string("serif", base.fonts.serif),
            sans: fonts.string("sans", base.fonts.sans),
        },
        font_sizes: ThemeFontSizes {
            base: sizes.string("base", base.font_sizes.base),
            title: sizes.string("title", base.font_sizes.title),
            subtitle: sizes.string("subtitle", base.font_sizes.subtitle),
            caption: sizes.string("caption", base.font_sizes.caption),
        },
        element_styles: ElementStyles {
            title: merge_element(styles.object("title"), base.element_styles.title),
            subtitle: merge_element(styles.object("subtitle"), base.element_styles.subtitle),
            text: merge_element(styles.object("text"), base.element_styles.text),
            caption: merge_element(styles.object("caption"), base.element_styles.caption),
        },
        hero_image: fields.opt_string("heroImage", base.hero_image),
    }
}

fn merge_element(fields: Fields<'_>, base: ElementStyle) -> ElementStyle {
    ElementStyle {
        font: fields.string("font", base.font),
        color: fields.string("color", base.color),
    }
}

fn merge_home(fields: Fields<'_>, base: HomeContent) -> HomeContent {
    HomeContent {
        hero_title: fields.string("heroTitle", base.hero_title),
        hero_subtitle: fields.string("heroSubtitle", base.hero_subtitle),
        welcome_label: fields.string("welcomeLabel", base.welcome_label),
        intro_title: fields.string("introTitle", base.intro_title),
        intro_description: fields.string("introDescription", base.intro_description),
    }
}

fn merge_page(fields: Fields<'_>, base: PageContent) -> PageContent {
    PageContent {
        title: fields.string("title", base.title),
        description: fields.string("description", base.description),
    }
}

fn album_from(fields: Fields<'_>) -> Album {
    Album {
        id: fields.string("id", String::new()),
        title: fields.string("title", String::new()),
        description: fields.string("description", String::new()),
        date: fields.string("date", String::new()),
        cover_image: fields.string("coverImage", String::new()),
        photos: fields.list("photos", photo_from).unwrap_or_default(),
    }
}

fn photo_from(fields: Fields<'_>) -> Photo {
    Photo {
        id: fields.string("id", String::new()),
        src: fields.string("src", String::new()),
        alt: fields.string("alt", String::new()),
        caption: fields.opt_string("caption", None),
        width: fields.opt_u32("width"),
        height: fields.opt_u32("height"),
        pdf_url: fields.opt_string("pdfUrl", None),
    }
}

fn writing_from(fields: Fields<'_>) -> TextWork {
    TextWork {
        id: fields.string("id", String::new()),
        title: fields.string("title", String::new()),
        category: fields.string("category", String::new()),
        excerpt: fields.string("excerpt", String::new()),
        content: fields.string("content", String::new()),
        date: fields.string("date", String::new()),
        cover_image: fields.opt_string("coverImage", None),
    }
}

fn testimonial_from(fields: Fields<'_>) -> Testimonial {
    Testimonial {
        id: fields.string("id", String::new()),
        name: fields.string("name", String::new()),
        role: fields.opt_string("role", None),
        text: fields.string("text", String::new()),
        avatar: fields.string("avatar", String::new()),
    }
}
