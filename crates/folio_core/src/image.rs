//! Focal-point image references.
//!
//! An image reference is a plain URL that may carry a `pos=X,Y` query
//! parameter, where X and Y are percentages of width and height. Renderers
//! strip the directive to get the raw URL and use the percentages as the CSS
//! object/background position of a cropped image.
//!
//! # Invariants
//! - Stripping a directive never leaves a query string starting with `&`.
//! - Encoded percentages are whole numbers in `0..=100`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static FOCAL_DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&])pos=([\d.]+),([\d.]+)").expect("valid focal regex"));

/// CSS position used when an image has no directive.
pub const CENTERED_POSITION: &str = "50% 50%";

/// Anchor point inside an image, in percent of width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    /// Builds a point, clamping both axes to `0..=100`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    /// Converts a click at `(offset_x, offset_y)` inside a rendered box of
    /// `width` x `height` into percentages.
    ///
    /// Returns `None` for an empty box.
    pub fn from_click(offset_x: f64, offset_y: f64, width: f64, height: f64) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return None;
        }
        Some(Self::new(offset_x / width * 100.0, offset_y / height * 100.0))
    }

    /// CSS `object-position` / `background-position` value, e.g. `30% 70%`.
    pub fn css_position(&self) -> String {
        format!("{}% {}%", self.x, self.y)
    }

    fn rounded(&self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

impl Display for FocalPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (x, y) = self.rounded();
        write!(f, "{x},{y}")
    }
}

/// Image reference split into its raw URL and optional focal point.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    /// URL without the focal directive.
    pub src: String,
    pub focal: Option<FocalPoint>,
}

impl ImageRef {
    /// Position for cropped rendering; centered when no focal point is set.
    pub fn css_position(&self) -> String {
        self.focal
            .map(|point| point.css_position())
            .unwrap_or_else(|| CENTERED_POSITION.to_string())
    }
}

/// Splits `raw` into the clean URL and its focal point.
///
/// The first well-formed directive wins; every directive is stripped from
/// `src`. Empty input yields an empty `src`.
pub fn parse_image_ref(raw: &str) -> ImageRef {
    let mut focal = None;
    let mut src = raw.to_string();
    let mut search_from = 0;

    while let Some(caps) = FOCAL_DIRECTIVE_RE.captures_at(&src, search_from) {
        let (Some(whole), Some(sep)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let x = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
        let y = caps.get(3).and_then(|m| m.as_str().parse::<f64>().ok());
        let (Some(x), Some(y)) = (x, y) else {
            // `1.2.3` style values are not a directive; keep them and look further.
            search_from = whole.end();
            continue;
        };
        if focal.is_none() {
            focal = Some(FocalPoint { x, y });
        }

        let range = whole.range();
        let promotes_query = sep.as_str() == "?";
        let mut next = String::with_capacity(src.len());
        next.push_str(&src[..range.start]);
        let rest = &src[range.end..];
        match rest.strip_prefix('&') {
            Some(tail) if promotes_query => {
                next.push('?');
                next.push_str(tail);
            }
            _ => next.push_str(rest),
        }
        src = next;
        search_from = range.start;
    }

    ImageRef { src, focal }
}

/// Re-encodes `raw` with `point`, replacing any existing directive.
pub fn with_focal_point(raw: &str, point: FocalPoint) -> String {
    let clean = parse_image_ref(raw).src;
    let separator = if clean.contains('?') { '&' } else { '?' };
    format!("{clean}{separator}pos={point}")
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 50.0;
    }
    value.clamp(0.0, 100.0)
}
