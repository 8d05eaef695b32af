//! Aggregate portfolio document.
//!
//! # Responsibility
//! - Define every section of the site content as one serializable tree.
//!
//! # Invariants
//! - JSON keys are camelCase, matching the stored document.
//! - Lists are never null; `bio` is always a list of strings.

use serde::{Deserialize, Serialize};

/// Fixed row identifier of the single stored document.
pub const DOCUMENT_ROW_ID: &str = "main";

/// Entire site content, read and written as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDocument {
    pub profile: Profile,
    pub albums: Vec<Album>,
    pub writings: Vec<TextWork>,
    pub testimonials: Vec<Testimonial>,
    pub theme: ThemeConfig,
    pub home: HomeContent,
    pub portfolio_page: PageContent,
    pub writings_page: PageContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role: String,
    /// Ordered biography paragraphs.
    pub bio: Vec<String>,
    pub contact: Contact,
    pub profile_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub instagram: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-form label such as `2023` or `2022 - Atual`.
    pub date: String,
    pub cover_image: String,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    /// Image URL, optionally carrying a `pos=X,Y` focal-point directive.
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Attached document shown alongside the photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

/// Well-known writing categories; any other label is accepted as-is.
pub const WRITING_CATEGORIES: &[&str] = &["Crônica", "Poesia", "Artigo", "Ensaio"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextWork {
    pub id: String,
    pub title: String,
    pub category: String,
    pub excerpt: String,
    /// HTML body.
    pub content: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub text: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub welcome_label: String,
    pub intro_title: String,
    pub intro_description: String,
}

/// Header copy of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
    pub font_sizes: ThemeFontSizes,
    pub element_styles: ElementStyles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub background: String,
    pub text: String,
    pub accent: String,
    pub secondary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonial_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFonts {
    pub serif: String,
    pub sans: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFontSizes {
    /// Writing body text.
    pub base: String,
    pub title: String,
    /// Categories and dates.
    pub subtitle: String,
    /// Photo captions.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyles {
    pub title: ElementStyle,
    pub subtitle: ElementStyle,
    pub text: ElementStyle,
    pub caption: ElementStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    pub font: String,
    pub color: String,
}

impl PortfolioDocument {
    /// Finds an album by id.
    pub fn album(&self, id: &str) -> Option<&Album> {
        self.albums.iter().find(|album| album.id == id)
    }

    /// Finds a writing by id.
    pub fn writing(&self, id: &str) -> Option<&TextWork> {
        self.writings.iter().find(|work| work.id == id)
    }
}
