pub mod defaults;

use std::collections::HashSet;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::product::{Product, ProductId};
use crate::errors::{CatalogError, ProductValidationError};

use self::defaults::{numbered, INITIAL_PRODUCTS, PREDEFINED_TEMPLATES, RESET_PRODUCTS};

/// Signal emitted by every mutation that changed the collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogChange {
    Added(ProductId),
    Removed(ProductId),
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Product),
    NotFound,
}

/// Owns the ordered product collection and the id counter for one session.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    products: Vec<Product>,
    next_id: u64,
    revision: u64,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::initial()
    }
}

impl CatalogStore {
    /// Session start state: five products with ids 1-5, next id 6.
    pub fn initial() -> Self {
        Self {
            products: numbered(&INITIAL_PRODUCTS),
            next_id: INITIAL_PRODUCTS.len() as u64 + 1,
            revision: 0,
        }
    }

    /// Builds a store over an existing collection. Ids must be unique; the
    /// counter starts one past the highest id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        if let Some(duplicate) = products.iter().find(|product| !seen.insert(product.id)) {
            return Err(CatalogError::DuplicateProductId(duplicate.id));
        }

        let next_id = match products.iter().map(|product| product.id).max() {
            Some(highest) => {
                highest.0.checked_add(1).ok_or(CatalogError::IdsExhausted(highest))?
            }
            None => 1,
        };
        Ok(Self { products, next_id, revision: 0 })
    }

    pub fn add(
        &mut self,
        name: &str,
        price: Option<Decimal>,
        description: &str,
    ) -> Result<CatalogChange, ProductValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::MissingName);
        }

        let price = match price {
            Some(price) if price > Decimal::ZERO => price,
            _ => return Err(ProductValidationError::InvalidPrice),
        };

        let description = description.trim();
        if description.is_empty() {
            return Err(ProductValidationError::MissingDescription);
        }

        let id = ProductId(self.next_id);
        let Some(following) = self.next_id.checked_add(1) else {
            return Err(ProductValidationError::IdsExhausted);
        };
        self.next_id = following;
        self.products.push(Product {
            id,
            name: name.to_string(),
            price,
            description: description.to_string(),
        });

        info!(
            event_name = "catalog.product.added",
            product_id = %id,
            product_name = name,
            count = self.products.len(),
            "product added"
        );
        Ok(self.changed(CatalogChange::Added(id)))
    }

    /// Adds one of the predefined templates, picked uniformly at random.
    pub fn add_predefined<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Result<CatalogChange, ProductValidationError> {
        let template = PREDEFINED_TEMPLATES[rng.gen_range(0..PREDEFINED_TEMPLATES.len())];
        let change = self.add(template.name, Some(template.price()), template.description)?;

        info!(
            event_name = "catalog.product.predefined_added",
            product_name = template.name,
            "predefined product added"
        );
        Ok(change)
    }

    pub fn remove(&mut self, id: ProductId) -> RemoveOutcome {
        let Some(position) = self.products.iter().position(|product| product.id == id) else {
            info!(
                event_name = "catalog.product.remove_missed",
                product_id = %id,
                "no product found with id"
            );
            return RemoveOutcome::NotFound;
        };

        let removed = self.products.remove(position);
        info!(
            event_name = "catalog.product.removed",
            product_id = %id,
            count = self.products.len(),
            "product removed"
        );
        self.changed(CatalogChange::Removed(id));
        RemoveOutcome::Removed(removed)
    }

    /// Restores the three-product baseline (ids 1-3, next id 4), whatever the
    /// session started with.
    pub fn reset(&mut self) -> CatalogChange {
        self.products = numbered(&RESET_PRODUCTS);
        self.next_id = RESET_PRODUCTS.len() as u64 + 1;

        info!(
            event_name = "catalog.reset",
            count = self.products.len(),
            "catalog reset to baseline products"
        );
        self.changed(CatalogChange::Reset)
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn next_id(&self) -> ProductId {
        ProductId(self.next_id)
    }

    /// Number of changes applied since the store was built.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn changed(&mut self, change: CatalogChange) -> CatalogChange {
        self.revision = self.revision.wrapping_add(1);
        change
    }
}
