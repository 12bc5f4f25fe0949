//! Fixed product sets: the session start set, the reset baseline and the
//! templates used for predefined picks.

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductTemplate {
    pub name: &'static str,
    /// Price in hundredths.
    pub price_cents: i64,
    pub description: &'static str,
}

impl ProductTemplate {
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }

    fn into_product(self, id: u64) -> Product {
        Product {
            id: ProductId(id),
            name: self.name.to_string(),
            price: self.price(),
            description: self.description.to_string(),
        }
    }
}

const GAMING_LAPTOP: ProductTemplate = ProductTemplate {
    name: "Gaming Laptop",
    price_cents: 129_999,
    description: "High-performance laptop for gaming and demanding work.",
};

const ANDROID_SMARTPHONE: ProductTemplate = ProductTemplate {
    name: "Android Smartphone",
    price_cents: 49_999,
    description: "Smartphone with a high-resolution camera and AMOLED display.",
};

const DIGITAL_TABLET: ProductTemplate = ProductTemplate {
    name: "Digital Tablet",
    price_cents: 34_999,
    description: "Tablet for reading, browsing and multimedia tasks.",
};

const WIRELESS_HEADPHONES: ProductTemplate = ProductTemplate {
    name: "Wireless Headphones",
    price_cents: 19_999,
    description: "Headphones with noise cancellation and Bluetooth connectivity.",
};

const SPORTS_SMARTWATCH: ProductTemplate = ProductTemplate {
    name: "Sports Smartwatch",
    price_cents: 24_999,
    description: "Smartwatch with heart-rate monitor and built-in GPS.",
};

pub const INITIAL_PRODUCTS: [ProductTemplate; 5] = [
    GAMING_LAPTOP,
    ANDROID_SMARTPHONE,
    DIGITAL_TABLET,
    WIRELESS_HEADPHONES,
    SPORTS_SMARTWATCH,
];

pub const RESET_PRODUCTS: [ProductTemplate; 3] = [GAMING_LAPTOP, ANDROID_SMARTPHONE, DIGITAL_TABLET];

pub const PREDEFINED_TEMPLATES: [ProductTemplate; 5] = [
    ProductTemplate {
        name: "4K Monitor",
        price_cents: 39_999,
        description: "27-inch monitor with 4K resolution and a 144Hz refresh rate.",
    },
    ProductTemplate {
        name: "Mechanical Keyboard",
        price_cents: 8_999,
        description: "Mechanical keyboard with RGB backlight and tactile switches.",
    },
    ProductTemplate {
        name: "Wireless Mouse",
        price_cents: 5_999,
        description: "Ergonomic mouse with a high-precision sensor and long battery life.",
    },
    ProductTemplate {
        name: "Bluetooth Speaker",
        price_cents: 12_999,
        description: "Portable speaker with stereo sound and water resistance.",
    },
    ProductTemplate {
        name: "HD Webcam",
        price_cents: 7_999,
        description: "Webcam with built-in microphone and autofocus.",
    },
];

/// Materializes a template set with ids numbered from 1 in order.
pub fn numbered(templates: &[ProductTemplate]) -> Vec<Product> {
    templates
        .iter()
        .zip(1u64..)
        .map(|(template, id)| template.into_product(id))
        .collect()
}
