pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod session;
pub mod view;

pub use catalog::{CatalogChange, CatalogStore, RemoveOutcome};
pub use domain::product::{Product, ProductId};
pub use errors::{CatalogError, ProductValidationError};
pub use session::{CatalogIntent, CatalogSession, DispatchOutcome, Notice};
pub use view::{DeleteAffordance, DisplayState, ItemFragment, ListState, ViewRenderer};
