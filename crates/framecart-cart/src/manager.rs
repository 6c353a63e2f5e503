//! The cart reconciler.
//!
//! Owns the storefront client plus the persisted local state and keeps the
//! displayed cart converging to the external source of truth: every
//! successful mutation or fetch fully replaces the cached item list rather
//! than patching it, and associations are recorded before any external
//! call so they survive a cart-create fallback.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use framecart_core::attributes::LineAttribute;
use framecart_core::normalize_variant_id;
use framecart_storefront::{Cart, CartLineInput, StorefrontClient, StorefrontError};

use crate::classify::classify_title;
use crate::error::CartError;
use crate::state::{display_item, CartState, DisplayItem, StateStore};

/// One lens or photochromic extra submitted alongside a frame.
#[derive(Debug, Clone)]
pub struct AddonSubmission {
    /// Bare numeric or fully qualified variant id.
    pub variant_id: String,
    pub attributes: Vec<LineAttribute>,
}

/// A frame plus its addons, submitted together from the configurator.
#[derive(Debug, Clone)]
pub struct FrameSubmission {
    /// Bare numeric or fully qualified variant id.
    pub variant_id: String,
    pub quantity: u32,
    pub attributes: Vec<LineAttribute>,
    pub addons: Vec<AddonSubmission>,
}

/// Reconciles the external cart with the persisted local view.
pub struct CartManager<S: StateStore> {
    client: StorefrontClient,
    store: S,
    state: CartState,
    checkout_url: Option<String>,
}

impl<S: StateStore> CartManager<S> {
    /// Creates a manager, loading any previously persisted state.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the state store cannot be read.
    pub fn new(client: StorefrontClient, store: S) -> Result<Self, CartError> {
        let state = store.load()?;
        Ok(Self {
            client,
            store,
            state,
            checkout_url: None,
        })
    }

    /// The locally displayed cart items.
    #[must_use]
    pub fn items(&self) -> &[DisplayItem] {
        &self.state.items
    }

    #[must_use]
    pub fn cart_id(&self) -> Option<&str> {
        self.state.cart_id.as_deref()
    }

    /// Hosted checkout redirect URL from the last known cart.
    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref()
    }

    /// Recorded addon variant ids for a frame variant.
    #[must_use]
    pub fn addons_for(&self, frame_variant_id: &str) -> Vec<String> {
        self.state.addons_for(frame_variant_id)
    }

    /// Sum of the displayed line prices, for the order summary.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.state
            .items
            .iter()
            .map(|item| {
                Decimal::from_str(&item.price).unwrap_or(Decimal::ZERO)
                    * Decimal::from(item.quantity)
            })
            .sum()
    }

    /// Adds a frame and its addons to the external cart in one operation.
    ///
    /// The frame→addon association is recorded and persisted before the
    /// external call is made. When adding to a previously saved cart fails
    /// because the cart id is stale, a brand-new cart is created once; no
    /// further retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns `CartError` for invalid variant ids or external failures.
    pub async fn add_frame_with_addons(
        &mut self,
        submission: FrameSubmission,
    ) -> Result<(), CartError> {
        let frame_variant_id = normalize_variant_id(&submission.variant_id)?;
        let mut addon_variant_ids = Vec::with_capacity(submission.addons.len());
        for addon in &submission.addons {
            addon_variant_ids.push(normalize_variant_id(&addon.variant_id)?);
        }

        // Record the association first so it survives whichever way the
        // external call resolves.
        self.state
            .associate(&frame_variant_id, addon_variant_ids.clone());
        self.store.save(&self.state)?;

        let mut lines = Vec::with_capacity(1 + submission.addons.len());
        lines.push(
            CartLineInput::new(frame_variant_id, submission.quantity.max(1))
                .with_attributes(submission.attributes.clone()),
        );
        for (addon, variant_id) in submission.addons.iter().zip(addon_variant_ids) {
            lines.push(CartLineInput::new(variant_id, 1).with_attributes(addon.attributes.clone()));
        }

        let cart = match self.state.cart_id.clone() {
            Some(cart_id) => match self.client.add_lines(&cart_id, &lines).await {
                Ok(cart) => cart,
                Err(
                    e @ (StorefrontError::UserErrors { .. } | StorefrontError::CartNotFound),
                ) => {
                    // Stale cart id: fall back to a fresh cart, once.
                    tracing::warn!(error = %e, "cart rejected the add, creating a new cart");
                    self.client.create_cart(&lines).await?
                }
                Err(e) => return Err(e.into()),
            },
            None => self.client.create_cart(&lines).await?,
        };

        self.apply_cart(&cart)
    }

    /// Removes a line, cascading from a frame to its associated addons.
    ///
    /// The multi-line removal goes to the external cart as a single call.
    /// If the external call fails, the same cascade is applied to the
    /// local cache anyway so the displayed cart matches what the user
    /// asked for, and the error is returned for the caller to surface;
    /// the next successful fetch reconverges with the external state.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownLine` for an id not in the local view,
    /// `CartError::NoActiveCart` without a saved cart, or the external
    /// failure after the local cascade has been applied.
    pub async fn remove_line(&mut self, line_id: &str) -> Result<(), CartError> {
        let item = self
            .state
            .item_by_line_id(line_id)
            .cloned()
            .ok_or_else(|| CartError::UnknownLine(line_id.to_string()))?;
        let cart_id = self
            .state
            .cart_id
            .clone()
            .ok_or(CartError::NoActiveCart)?;

        let line_ids = self.state.removal_cascade(&item);

        match self.client.remove_lines(&cart_id, &line_ids).await {
            Ok(cart) => {
                self.forget_associations(&item);
                self.apply_cart(&cart)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    line_count = line_ids.len(),
                    "external remove failed, applying the cascade locally"
                );
                self.state
                    .items
                    .retain(|candidate| !line_ids.contains(&candidate.line_id));
                self.forget_associations(&item);
                self.store.save(&self.state)?;
                Err(e.into())
            }
        }
    }

    /// Re-fetches the external cart and rebuilds the local view from it.
    ///
    /// A successful fetch fully replaces the cached items; a cart that no
    /// longer exists clears the local state.
    ///
    /// # Errors
    ///
    /// Returns `CartError` on transport failures; the cache is left
    /// untouched so the page stays usable.
    pub async fn refresh(&mut self) -> Result<(), CartError> {
        let Some(cart_id) = self.state.cart_id.clone() else {
            self.state.items.clear();
            self.state.associations.clear();
            self.store.save(&self.state)?;
            return Ok(());
        };

        match self.client.fetch_cart(&cart_id).await {
            Ok(cart) => self.apply_cart(&cart),
            Err(StorefrontError::CartNotFound) => {
                tracing::warn!(cart_id, "saved cart no longer exists, clearing local state");
                self.state = CartState::default();
                self.checkout_url = None;
                self.store.save(&self.state)?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rebuilds local state from a fetched cart: the item list is replaced
    /// wholesale and associations referencing departed variants purged.
    fn apply_cart(&mut self, cart: &Cart) -> Result<(), CartError> {
        self.state.cart_id = Some(cart.id.clone());
        self.checkout_url = Some(cart.checkout_url.clone());

        self.state.items = cart
            .line_nodes()
            .map(|line| display_item(line, classify_title(&line.merchandise.product.title)))
            .collect();

        let present: HashSet<String> = self
            .state
            .items
            .iter()
            .map(|item| item.variant_id.clone())
            .collect();
        self.state.purge_missing(&present);

        self.store.save(&self.state)
    }

    /// Drops the association bookkeeping for a removed line.
    fn forget_associations(&mut self, item: &DisplayItem) {
        if item.is_addon {
            self.state.purge_addon(&item.variant_id);
        } else {
            self.state.remove_frame_entry(&item.variant_id);
        }
    }
}
