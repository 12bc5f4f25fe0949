//! Display state derived from the product collection.
//!
//! Rendering is total: every call rebuilds the whole state from the slice it is
//! given, and nothing here holds on to products between calls.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::product::{Product, ProductId};

pub const DELETE_ACTION_ID: &str = "product.delete.v1";
pub const DEFAULT_EMPTY_PLACEHOLDER: &str = "No products in the catalog. Add one to get started.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    Empty,
    Populated,
}

/// Delete button attached to one rendered product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteAffordance {
    pub action_id: String,
    pub label: String,
    pub product_id: ProductId,
}

impl DeleteAffordance {
    fn for_product(product_id: ProductId) -> Self {
        Self {
            action_id: DELETE_ACTION_ID.to_string(),
            label: "Delete".to_string(),
            product_id,
        }
    }

    /// Hands the tagged id to `callback`. The affordance never mutates anything itself.
    pub fn trigger<F, T>(&self, callback: F) -> T
    where
        F: FnOnce(ProductId) -> T,
    {
        callback(self.product_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemFragment {
    pub block_id: String,
    pub product_id: ProductId,
    pub name: String,
    pub price_label: String,
    pub description: String,
    pub id_label: String,
    pub delete: DeleteAffordance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub state: ListState,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub items: Vec<ItemFragment>,
}

impl DisplayState {
    pub fn list_visible(&self) -> bool {
        self.state == ListState::Populated
    }

    pub fn placeholder_visible(&self) -> bool {
        self.state == ListState::Empty
    }

    pub fn item(&self, product_id: ProductId) -> Option<&ItemFragment> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn delete_affordance(&self, product_id: ProductId) -> Option<&DeleteAffordance> {
        self.item(product_id).map(|item| &item.delete)
    }
}

#[derive(Clone, Debug)]
pub struct ViewRenderer {
    currency_symbol: String,
    empty_placeholder: String,
}

impl Default for ViewRenderer {
    fn default() -> Self {
        Self::new("$")
    }
}

impl ViewRenderer {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            empty_placeholder: DEFAULT_EMPTY_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_empty_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_placeholder = placeholder.into();
        self
    }

    pub fn render(&self, products: &[Product]) -> DisplayState {
        if products.is_empty() {
            return DisplayState {
                state: ListState::Empty,
                count: 0,
                placeholder: Some(self.empty_placeholder.clone()),
                items: Vec::new(),
            };
        }

        DisplayState {
            state: ListState::Populated,
            count: products.len(),
            placeholder: None,
            items: products.iter().map(|product| self.render_item(product)).collect(),
        }
    }

    fn render_item(&self, product: &Product) -> ItemFragment {
        ItemFragment {
            block_id: format!("product.item.{}", product.id),
            product_id: product.id,
            name: product.name.clone(),
            price_label: format_price(product.price, &self.currency_symbol),
            description: product.description.clone(),
            id_label: format!("ID: {}", product.id),
            delete: DeleteAffordance::for_product(product.id),
        }
    }
}

/// Formats `price` with exactly two decimals, rounding half away from zero.
pub fn format_price(price: Decimal, currency_symbol: &str) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{currency_symbol}{rounded:.2}")
}
