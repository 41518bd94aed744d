//! Catalog fixtures
//!
//! Generated from a fixed seed so a fresh store always starts with the same
//! catalog.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::entity::Product;

pub const MOCK_PRODUCT_COUNT: usize = 200;

const FIXTURE_SEED: u64 = 0x5EED_CA7A_1060;
const FIXTURE_SUBMITTER: &str = "User A";

const CATEGORIES: [&str; 7] = [
    "Electronics",
    "Clothing",
    "Home",
    "Beauty",
    "Sports",
    "Books",
    "Kids",
];
const BRANDS: [&str; 8] = [
    "Apple", "Samsung", "Nike", "Zara", "IKEA", "L'Oréal", "Adidas", "Sony",
];
const COLORS: [&str; 6] = [
    "#252525", "#f5f5f5", "#f44336", "#2196f3", "#4caf50", "#ffeb3b",
];
const ADJECTIVES: [&str; 8] = [
    "New",
    "Elegant",
    "Powerful",
    "Smart",
    "Stylish",
    "Comfortable",
    "Modern",
    "Classy",
];

fn noun_for(category: &str) -> &'static str {
    match category {
        "Electronics" => "phone",
        "Clothing" => "shirt",
        "Home" => "sofa",
        "Beauty" => "cream",
        "Sports" => "sneakers",
        "Books" => "book",
        "Kids" => "toy",
        _ => "product",
    }
}

/// Rounds to one decimal place
pub(crate) fn round_rating(raw: f64) -> f64 {
    (raw * 10.0).round() / 10.0
}

/// The 200 products `prod_1..prod_200` the catalog is seeded with
pub fn mock_products() -> Vec<Product> {
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);

    (0..MOCK_PRODUCT_COUNT)
        .map(|i| {
            let number = i + 1;
            let category = CATEGORIES[i % CATEGORIES.len()];
            let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
            let original_price = rng.gen_range(20_000..500_000) as f64;
            let discount = rng.gen_range(0.1..0.6);
            let color_count = rng.gen_range(1..=3);
            let colors = (0..color_count)
                .map(|_| COLORS[rng.gen_range(0..COLORS.len())].to_string())
                .collect();

            Product {
                id: format!("prod_{}", number),
                name: format!("{} {}", adjective, noun_for(category)),
                description: format!(
                    "Detailed description of product #{}. Well made and a great fit for your needs.",
                    number
                ),
                image: format!("https://source.unsplash.com/random/400x400?product&sig={}", i),
                price: (original_price * (1.0 - discount)).floor(),
                original_price,
                category: category.to_string(),
                brand: BRANDS[i % BRANDS.len()].to_string(),
                colors,
                rating: round_rating(rng.gen_range(3.5..=5.0)),
                reviews: rng.gen_range(0..200),
                submitted_by: FIXTURE_SUBMITTER.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shape() {
        let products = mock_products();

        assert_eq!(products.len(), MOCK_PRODUCT_COUNT);
        assert_eq!(products[0].id, "prod_1");
        assert_eq!(products[199].id, "prod_200");
        assert_eq!(products[7].category, "Electronics");
        assert_eq!(products[8].brand, "Apple");
    }

    #[test]
    fn test_fixture_values_in_range() {
        for p in mock_products() {
            assert!((20_000.0..500_000.0).contains(&p.original_price), "{}", p.id);
            assert!(p.price < p.original_price, "{}", p.id);
            assert!(p.price >= (p.original_price * 0.4).floor(), "{}", p.id);
            assert!((3.5..=5.0).contains(&p.rating), "{}", p.id);
            assert!((1..=3).contains(&p.colors.len()), "{}", p.id);
            assert!(p.reviews < 200);
            assert_eq!(p.submitted_by, "User A");
        }
    }

    #[test]
    fn test_fixtures_are_stable() {
        assert_eq!(mock_products(), mock_products());
    }

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(4.26), 4.3);
        assert_eq!(round_rating(3.5), 3.5);
    }
}
