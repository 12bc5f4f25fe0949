use serde::Serialize;
use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductValidationError {
    #[error("product name is empty")]
    MissingName,
    #[error("product price is missing or not positive")]
    InvalidPrice,
    #[error("product description is empty")]
    MissingDescription,
    #[error("no product ids left to issue")]
    IdsExhausted,
}

/// Problems with a product collection handed to the store from outside.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product id {0} appears more than once")]
    DuplicateProductId(ProductId),
    #[error("product id {0} leaves no room for further ids")]
    IdsExhausted(ProductId),
}

impl ProductValidationError {
    /// Text shown to the user when an add is rejected.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingName => "Please enter a name for the product.",
            Self::InvalidPrice => "Please enter a valid price for the product.",
            Self::MissingDescription => "Please enter a description for the product.",
            Self::IdsExhausted => "The catalog cannot take any more products.",
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingName => "name",
            Self::InvalidPrice => "price",
            Self::MissingDescription => "description",
            Self::IdsExhausted => "id",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::ProductId;
    use crate::errors::{CatalogError, ProductValidationError};

    #[test]
    fn each_rejection_names_its_field() {
        assert_eq!(ProductValidationError::MissingName.field(), "name");
        assert_eq!(ProductValidationError::InvalidPrice.field(), "price");
        assert_eq!(ProductValidationError::MissingDescription.field(), "description");
    }

    #[test]
    fn user_message_differs_from_diagnostic_text() {
        let error = ProductValidationError::InvalidPrice;

        assert_eq!(error.to_string(), "product price is missing or not positive");
        assert_eq!(error.user_message(), "Please enter a valid price for the product.");
    }

    #[test]
    fn catalog_errors_name_the_offending_id() {
        assert_eq!(
            CatalogError::DuplicateProductId(ProductId(2)).to_string(),
            "product id 2 appears more than once"
        );
    }
}
