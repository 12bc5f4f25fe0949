//! Routes user intents through the store and keeps the rendered view in step.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::catalog::{CatalogChange, CatalogStore, RemoveOutcome};
use crate::config::CatalogConfig;
use crate::domain::product::ProductId;
use crate::errors::ProductValidationError;
use crate::view::{DisplayState, ViewRenderer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogIntent {
    AddPredefined,
    /// Raw form fields; `price` is parsed with [`parse_price`].
    AddCustom { name: String, price: String, description: String },
    Delete(ProductId),
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Added { product_id: ProductId, name: String },
    Removed { product_id: ProductId, name: String },
    NotFound { product_id: ProductId },
    Reset { count: usize },
    Rejected { reason: ProductValidationError },
}

impl Notice {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { product_id, name } => write!(f, "Added \"{name}\" (ID {product_id})."),
            Self::Removed { product_id, name } => {
                write!(f, "Removed \"{name}\" (ID {product_id}).")
            }
            Self::NotFound { product_id } => write!(f, "No product found with ID {product_id}."),
            Self::Reset { count } => write!(f, "Catalog reset to {count} products."),
            Self::Rejected { reason } => f.write_str(reason.user_message()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub notice: Notice,
    /// True when the collection changed and `display` was re-rendered.
    pub changed: bool,
    pub display: DisplayState,
}

/// One user session: the store, its renderer and the last rendered state.
pub struct CatalogSession {
    store: CatalogStore,
    renderer: ViewRenderer,
    rng: StdRng,
    display: DisplayState,
}

impl CatalogSession {
    pub fn new(renderer: ViewRenderer, rng: StdRng) -> Self {
        Self::with_store(CatalogStore::initial(), renderer, rng)
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(ViewRenderer::new(config.currency_symbol.clone()), rng)
    }

    pub fn with_store(store: CatalogStore, renderer: ViewRenderer, rng: StdRng) -> Self {
        let display = renderer.render(store.list());
        info!(
            event_name = "catalog.session.started",
            count = store.list().len(),
            next_id = %store.next_id(),
            "catalog session started"
        );
        Self { store, renderer, rng, display }
    }

    pub fn dispatch(&mut self, intent: CatalogIntent) -> DispatchOutcome {
        match intent {
            CatalogIntent::AddPredefined => {
                let result = self.store.add_predefined(&mut self.rng);
                self.after_add(result)
            }
            CatalogIntent::AddCustom { name, price, description } => {
                let result = self.store.add(&name, parse_price(&price), &description);
                self.after_add(result)
            }
            CatalogIntent::Delete(product_id) => match self.store.remove(product_id) {
                RemoveOutcome::Removed(product) => {
                    self.rerender(Notice::Removed { product_id, name: product.name })
                }
                RemoveOutcome::NotFound => self.unchanged(Notice::NotFound { product_id }),
            },
            CatalogIntent::Reset => {
                let change = self.store.reset();
                let notice = self.notice_for(change);
                self.rerender(notice)
            }
        }
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    fn after_add(
        &mut self,
        result: Result<CatalogChange, ProductValidationError>,
    ) -> DispatchOutcome {
        match result {
            Ok(change) => {
                let notice = self.notice_for(change);
                self.rerender(notice)
            }
            Err(reason) => {
                info!(
                    event_name = "catalog.product.rejected",
                    field = reason.field(),
                    "product add rejected"
                );
                self.unchanged(Notice::Rejected { reason })
            }
        }
    }

    fn notice_for(&self, change: CatalogChange) -> Notice {
        match change {
            CatalogChange::Added(product_id) => {
                let name = self.store.find(product_id).map(|product| product.name.clone());
                Notice::Added { product_id, name: name.unwrap_or_default() }
            }
            CatalogChange::Removed(product_id) => {
                Notice::Removed { product_id, name: String::new() }
            }
            CatalogChange::Reset => Notice::Reset { count: self.store.list().len() },
        }
    }

    fn rerender(&mut self, notice: Notice) -> DispatchOutcome {
        self.display = self.renderer.render(self.store.list());
        DispatchOutcome { notice, changed: true, display: self.display.clone() }
    }

    fn unchanged(&self, notice: Notice) -> DispatchOutcome {
        DispatchOutcome { notice, changed: false, display: self.display.clone() }
    }
}

/// Reads a price typed into a form. Blank or non-numeric text counts as missing.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Decimal>().ok()
}
