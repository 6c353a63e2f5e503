//! Storefront cart API response and input types.
//!
//! ## Observed response shape
//!
//! Cart lines arrive as a GraphQL connection (`edges`/`node`); merchandise
//! is always a `ProductVariant` with its parent product's title inlined —
//! the reconciler classifies lines by that parent title. Monetary amounts
//! are decimal strings exactly as the API returns them; they are passed
//! through untouched.

use serde::{Deserialize, Serialize};

pub use framecart_core::attributes::LineAttribute;

/// A monetary amount as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal string, e.g. `"129.00"`.
    pub amount: String,
    /// ISO 4217 code, e.g. `"GBP"`.
    pub currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub total_amount: Money,
}

/// Parent-product reference inlined on each variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    pub title: String,
}

/// The purchasable variant a cart line points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    /// Variant global id, `gid://shopify/ProductVariant/...`.
    pub id: String,
    /// Variant display title, e.g. `"Tortoise"`.
    pub title: String,
    pub price: Money,
    pub product: ProductRef,
}

/// One line of the external cart. Read-only from this system's point of
/// view: local display state is always re-derived from a fresh fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
    pub merchandise: Merchandise,
    #[serde(default)]
    pub attributes: Vec<LineAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineEdge {
    pub node: CartLine,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartLines {
    #[serde(default)]
    pub edges: Vec<CartLineEdge>,
}

/// A cart as returned by every cart query and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub cost: CartCost,
    #[serde(default)]
    pub lines: CartLines,
}

impl Cart {
    /// Iterates the cart's lines without the connection wrapper.
    pub fn line_nodes(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.edges.iter().map(|edge| &edge.node)
    }
}

/// Input for `cartCreate` / `cartLinesAdd`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<LineAttribute>>,
}

impl CartLineInput {
    #[must_use]
    pub fn new(merchandise_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            merchandise_id: merchandise_id.into(),
            quantity,
            attributes: None,
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<LineAttribute>) -> Self {
        if !attributes.is_empty() {
            self.attributes = Some(attributes);
        }
        self
    }
}

/// Input for `cartLinesUpdate`.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineUpdateInput {
    pub id: String,
    pub quantity: u32,
}

/// A mutation-level user error (`userErrors` in the payload).
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Shared payload shape of every cart mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<Cart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}
