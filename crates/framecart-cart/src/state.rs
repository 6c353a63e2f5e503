//! Persisted cart state: the external cart id, the cached display items
//! and the frame↔addon association table.
//!
//! The browser original kept this in cookies and localStorage under fixed
//! key names; here it is one JSON document behind the [`StateStore`] trait
//! so the reconciler can be driven deterministically in tests.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::LineKind;
use crate::error::CartError;
use framecart_core::attributes::LineAttribute;

/// One line of the locally displayed cart, derived from an external line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub line_id: String,
    pub variant_id: String,
    pub product_title: String,
    pub variant_title: String,
    pub quantity: u32,
    /// Price as the decimal string the API returned.
    pub price: String,
    pub currency_code: String,
    pub is_addon: bool,
    pub attributes: Vec<LineAttribute>,
}

/// The persisted side-cache. Field names are the fixed storage keys and
/// survive page reloads within the same profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(rename = "shopify_cart_id")]
    pub cart_id: Option<String>,
    #[serde(rename = "cart_items", default)]
    pub items: Vec<DisplayItem>,
    /// Frame variant id → addon variant ids added alongside it.
    #[serde(rename = "frame_addon_associations", default)]
    pub associations: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CartState {
    /// Records a frame's addon associations, stripping each addon id from
    /// any other frame's entry first so an addon is only ever owned once.
    pub fn associate(&mut self, frame_variant_id: &str, addon_variant_ids: Vec<String>) {
        for addon_id in &addon_variant_ids {
            self.purge_addon(addon_id);
        }
        if addon_variant_ids.is_empty() {
            self.associations.remove(frame_variant_id);
        } else {
            self.associations
                .insert(frame_variant_id.to_string(), addon_variant_ids);
        }
    }

    /// Addon variant ids recorded for a frame.
    #[must_use]
    pub fn addons_for(&self, frame_variant_id: &str) -> Vec<String> {
        self.associations
            .get(frame_variant_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Deletes a frame's association entry, returning its addon ids.
    pub fn remove_frame_entry(&mut self, frame_variant_id: &str) -> Vec<String> {
        self.associations
            .remove(frame_variant_id)
            .unwrap_or_default()
    }

    /// Strips an addon id from whichever frame entry referenced it,
    /// deleting the entry when it becomes empty.
    pub fn purge_addon(&mut self, addon_variant_id: &str) {
        self.associations.retain(|_, addons| {
            addons.retain(|id| id != addon_variant_id);
            !addons.is_empty()
        });
    }

    /// Drops association entries that reference variant ids no longer in
    /// the cart, keeping the table consistent after a full replace.
    pub fn purge_missing(&mut self, present_variant_ids: &HashSet<String>) {
        self.associations.retain(|frame_id, addons| {
            if !present_variant_ids.contains(frame_id) {
                return false;
            }
            addons.retain(|id| present_variant_ids.contains(id));
            !addons.is_empty()
        });
    }

    /// Looks up a cached item by its external line id.
    #[must_use]
    pub fn item_by_line_id(&self, line_id: &str) -> Option<&DisplayItem> {
        self.items.iter().find(|item| item.line_id == line_id)
    }

    /// The cascade for removing a line: the line itself plus, for a frame,
    /// every cached addon line whose variant id is in its association
    /// entry.
    #[must_use]
    pub fn removal_cascade(&self, item: &DisplayItem) -> Vec<String> {
        let mut line_ids = vec![item.line_id.clone()];
        if !item.is_addon {
            let addon_ids = self.addons_for(&item.variant_id);
            line_ids.extend(
                self.items
                    .iter()
                    .filter(|candidate| {
                        candidate.is_addon && addon_ids.contains(&candidate.variant_id)
                    })
                    .map(|candidate| candidate.line_id.clone()),
            );
        }
        line_ids
    }
}

/// Builds a display item from an external cart line with its attributes
/// already filtered for the line's kind.
#[must_use]
pub fn display_item(line: &framecart_storefront::CartLine, kind: LineKind) -> DisplayItem {
    DisplayItem {
        line_id: line.id.clone(),
        variant_id: line.merchandise.id.clone(),
        product_title: line.merchandise.product.title.clone(),
        variant_title: line.merchandise.title.clone(),
        quantity: line.quantity,
        price: line.merchandise.price.amount.clone(),
        currency_code: line.merchandise.price.currency_code.clone(),
        is_addon: kind.is_addon(),
        attributes: crate::classify::display_attributes(kind, &line.attributes),
    }
}

/// Load/save boundary for the persisted state.
pub trait StateStore {
    /// Loads the persisted state, or a default when none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the backing storage cannot be read.
    fn load(&self) -> Result<CartState, CartError>;

    /// Persists the state.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the backing storage cannot be written.
    fn save(&self, state: &CartState) -> Result<(), CartError>;
}

/// File-backed store, one JSON document per profile.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<CartState, CartError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CartState::default());
            }
            Err(e) => {
                return Err(CartError::StateIo {
                    path: self.path.display().to_string(),
                    source: e,
                });
            }
        };
        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                // A corrupt document behaves like no document, the same way
                // the browser original treated an unparsable cookie.
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cart state unreadable, starting from empty state"
                );
                Ok(CartState::default())
            }
        }
    }

    fn save(&self, state: &CartState) -> Result<(), CartError> {
        let mut stamped = state.clone();
        stamped.saved_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(&stamped)?;
        std::fs::write(&self.path, content).map_err(|e| CartError::StateIo {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<CartState>,
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<CartState, CartError> {
        Ok(self.inner.lock().expect("state lock poisoned").clone())
    }

    fn save(&self, state: &CartState) -> Result<(), CartError> {
        *self.inner.lock().expect("state lock poisoned") = state.clone();
        Ok(())
    }
}
