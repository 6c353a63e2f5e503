//! Frame/addon classification and display-attribute filtering.
//!
//! Classification works off the merchandise's parent-product title: the
//! lens and photochromic extras live in dedicated products ("Lenses",
//! "Add Ons") whose titles match a fixed marker list. Renaming those
//! products breaks classification, so the marker list is a single named
//! constant and [`classify_title`] the only place it is consulted.

use framecart_core::attributes::{keys, LineAttribute};

/// Lowercased title fragments that mark a line as an addon.
pub const ADDON_TITLE_MARKERS: [&str; 6] =
    ["lenses", "lens", "add ons", "add-ons", "add on", "addon"];

/// What a cart line represents for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Frame,
    LensAddon,
    PhotochromicAddon,
}

impl LineKind {
    #[must_use]
    pub fn is_addon(self) -> bool {
        !matches!(self, LineKind::Frame)
    }
}

/// Classifies a line by its parent-product title.
///
/// A title matching (or containing) any addon marker is an addon;
/// photochromic addons are told apart by their own title. Everything else
/// is a frame.
#[must_use]
pub fn classify_title(product_title: &str) -> LineKind {
    let title = product_title.to_lowercase();
    let is_addon = ADDON_TITLE_MARKERS
        .iter()
        .any(|marker| title == *marker || title.contains(marker));
    if !is_addon {
        return LineKind::Frame;
    }
    if title.contains("photochromic") || title.contains("photo") {
        LineKind::PhotochromicAddon
    } else {
        LineKind::LensAddon
    }
}

/// Filters a line's attributes down to what the cart page shows.
///
/// Frame lines keep everything. Addon lines keep at most the one attribute
/// for their kind plus the associated-frame link; the rest still exists in
/// the external cart but is not surfaced.
#[must_use]
pub fn display_attributes(kind: LineKind, attributes: &[LineAttribute]) -> Vec<LineAttribute> {
    let kind_key = match kind {
        LineKind::Frame => return attributes.to_vec(),
        LineKind::LensAddon => keys::LENS_CONFIGURATION,
        LineKind::PhotochromicAddon => keys::LENS_PHOTOCHROMIC_TYPE,
    };

    attributes
        .iter()
        .filter(|attribute| {
            attribute.key == kind_key
                || attribute.key == keys::ASSOCIATED_FRAME
                || attribute.key == "associated frame"
        })
        .cloned()
        .collect()
}
