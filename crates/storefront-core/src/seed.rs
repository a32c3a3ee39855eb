//! # Seed Data
//!
//! Fixed records used when local storage holds nothing usable:
//! eight catalog products, six categories and the administrator account.

use chrono::{DateTime, Utc};

use crate::types::{Category, Product, ProductDetails, User};
use crate::ADMIN_EMAIL;

/// Id of the built-in administrator.
pub const ADMIN_ID: &str = "1";

const IMAGE_BASE: &str = "https://images.pexels.com/photos";

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    rupees: i64,
    original_rupees: i64,
    photos: &'static [u32],
    category: &'static str,
    description: &'static str,
    highlights: &'static [&'static str],
    reviews: u32,
    rating: f64,
    is_new: bool,
    sizes: &'static [&'static str],
}

const SEED_PRODUCTS: [SeedProduct; 8] = [
    SeedProduct {
        id: "1",
        name: "Skarfix-Plus Brightening Face Serum",
        rupees: 499,
        original_rupees: 599,
        photos: &[3685530, 3762879, 4041392, 3735747],
        category: "Serum",
        description: "Advanced brightening serum for radiant skin with kojic acid and vitamin C",
        highlights: &[
            "Reduces dark spots",
            "Brightens skin tone",
            "Lightweight formula",
            "Kojic acid formula",
        ],
        reviews: 245,
        rating: 4.5,
        is_new: true,
        sizes: &["15ml", "30ml"],
    },
    SeedProduct {
        id: "2",
        name: "Shadow A Gel SPF 50+ Sunscreen",
        rupees: 525,
        original_rupees: 550,
        photos: &[4041391, 3762875, 3685523],
        category: "Sunscreen",
        description: "Broad spectrum sun protection gel with SPF 50+",
        highlights: &[
            "SPF 50+",
            "Water resistant",
            "Non-greasy formula",
            "Broad spectrum protection",
        ],
        reviews: 189,
        rating: 4.3,
        is_new: false,
        sizes: &["50ml", "100ml"],
    },
    SeedProduct {
        id: "3",
        name: "Nigrfix Cream 50g",
        rupees: 429,
        original_rupees: 450,
        photos: &[3762879, 3685530, 4041392],
        category: "Cream",
        description: "Intensive skin lightening cream for pigmentation",
        highlights: &[
            "Reduces pigmentation",
            "Gentle formula",
            "Clinically tested",
            "Long-lasting results",
        ],
        reviews: 1137,
        rating: 4.6,
        is_new: false,
        sizes: &["25g", "50g"],
    },
    SeedProduct {
        id: "4",
        name: "Foobetik Foot Cream",
        rupees: 499,
        original_rupees: 550,
        photos: &[3735747, 3762879],
        category: "Foot Care",
        description: "Specialized foot care cream for dry and cracked feet",
        highlights: &[
            "Moisturizes dry feet",
            "Repairs cracked heels",
            "Long-lasting",
            "Antifungal properties",
        ],
        reviews: 676,
        rating: 4.4,
        is_new: false,
        sizes: &["50g", "100g"],
    },
    SeedProduct {
        id: "5",
        name: "Gentle Face Wash",
        rupees: 299,
        original_rupees: 350,
        photos: &[4041392, 3685530, 3762879],
        category: "Face Wash",
        description: "Gentle daily face wash for all skin types",
        highlights: &[
            "Gentle cleansing",
            "Suitable for all skin types",
            "pH balanced",
            "No harsh chemicals",
        ],
        reviews: 432,
        rating: 4.2,
        is_new: false,
        sizes: &["100ml", "200ml"],
    },
    SeedProduct {
        id: "6",
        name: "Anti-Acne Serum",
        rupees: 599,
        original_rupees: 699,
        photos: &[3685523, 4041391, 3735747],
        category: "Serum",
        description: "Powerful anti-acne serum with salicylic acid",
        highlights: &[
            "Reduces acne",
            "Controls oil",
            "Salicylic acid formula",
            "Fast results",
        ],
        reviews: 567,
        rating: 4.7,
        is_new: true,
        sizes: &["15ml", "30ml"],
    },
    SeedProduct {
        id: "7",
        name: "Moisturizing Cream",
        rupees: 399,
        original_rupees: 450,
        photos: &[3762875, 3685530, 4041392],
        category: "Cream",
        description: "Daily moisturizing cream for soft and smooth skin",
        highlights: &[
            "Deep moisturization",
            "Non-greasy",
            "24-hour hydration",
            "Suitable for all skin types",
        ],
        reviews: 789,
        rating: 4.5,
        is_new: false,
        sizes: &["50g", "100g"],
    },
    SeedProduct {
        id: "8",
        name: "Exfoliating Face Wash",
        rupees: 349,
        original_rupees: 399,
        photos: &[3735747, 3685523],
        category: "Face Wash",
        description: "Exfoliating face wash with micro-beads for deep cleansing",
        highlights: &[
            "Deep cleansing",
            "Removes dead skin",
            "Micro-bead formula",
            "Refreshing",
        ],
        reviews: 234,
        rating: 4.1,
        is_new: false,
        sizes: &["100ml", "200ml"],
    },
];

const SEED_CATEGORIES: [(&str, &str, &str); 6] = [
    ("1", "Sunscreen", "UV protection products"),
    ("2", "Serum", "Concentrated treatments"),
    ("3", "Cream", "Moisturizing creams"),
    ("4", "Face Wash", "Cleansing products"),
    ("5", "Foot Care", "Foot care solutions"),
    ("6", "Body Care", "Body care products"),
];

fn photo_url(photo: u32, width: u32) -> String {
    format!("{IMAGE_BASE}/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w={width}")
}

impl SeedProduct {
    fn to_product(&self) -> Product {
        let images: Vec<String> = self.photos.iter().map(|p| photo_url(*p, 500)).collect();
        Product {
            id: self.id.to_string(),
            name: self.name.to_string(),
            price_paise: self.rupees * 100,
            original_price_paise: Some(self.original_rupees * 100),
            image: images.first().cloned().unwrap_or_default(),
            additional_images: images.iter().skip(1).cloned().collect(),
            images,
            category: self.category.to_string(),
            description: self.description.to_string(),
            key_highlights: self.highlights.iter().map(|h| h.to_string()).collect(),
            reviews: self.reviews,
            rating: self.rating,
            in_stock: true,
            sizes: self.sizes.iter().map(|s| s.to_string()).collect(),
            is_on_sale: true,
            is_new: self.is_new,
            details: ProductDetails {
                brand: Some("Fixderma".to_string()),
                country_of_origin: Some("India".to_string()),
                ..ProductDetails::default()
            },
        }
    }
}

/// The fallback catalog.
pub fn products() -> Vec<Product> {
    SEED_PRODUCTS.iter().map(SeedProduct::to_product).collect()
}

/// The static category list. Categories are never persisted.
pub fn categories() -> Vec<Category> {
    SEED_CATEGORIES
        .iter()
        .map(|(id, name, description)| Category {
            id: id.to_string(),
            name: name.to_string(),
            image: photo_url(3685530, 300),
            description: description.to_string(),
        })
        .collect()
}

/// The administrator account with an already-hashed password.
pub fn admin_user(password_hash: String, now: DateTime<Utc>) -> User {
    User {
        id: ADMIN_ID.to_string(),
        name: "Admin User".to_string(),
        email: ADMIN_EMAIL.to_string(),
        password_hash,
        phone: "+91-9876543210".to_string(),
        address: "123 Admin Street, Mumbai, India".to_string(),
        is_admin: true,
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_product;

    #[test]
    fn test_seed_products_are_valid_and_unique() {
        let products = products();
        assert_eq!(products.len(), 8);
        for p in &products {
            validate_product(p).unwrap();
            assert_eq!(p.image, p.images[0]);
            assert_eq!(p.additional_images.len(), p.images.len() - 1);
        }
        let mut ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_first_seed_product() {
        let serum = &products()[0];
        assert_eq!(serum.id, "1");
        assert_eq!(serum.price_paise, 49900);
        assert_eq!(serum.category, "Serum");
        assert_eq!(serum.discount_percent(), Some(17));
    }

    #[test]
    fn test_every_product_category_exists() {
        let categories = categories();
        assert_eq!(categories.len(), 6);
        for p in products() {
            assert!(categories.iter().any(|c| p.in_category(&c.name)), "{}", p.category);
        }
    }
}
