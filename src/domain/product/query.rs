//! In-memory catalog filtering and sorting
//!
//! The store has no query support, so the whole catalog is loaded and scanned.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

use super::entity::Product;

/// Catalog sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    RatingDesc,
    PriceAsc,
    PriceDesc,
    /// Most recently listed first
    Newest,
}

impl FromStr for SortOption {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating-desc" => Ok(Self::RatingDesc),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            other => Err(DomainError::validation(format!(
                "Unknown sort option '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingDesc => write!(f, "rating-desc"),
            Self::PriceAsc => write!(f, "price-asc"),
            Self::PriceDesc => write!(f, "price-desc"),
            Self::Newest => write!(f, "newest"),
        }
    }
}

/// Catalog filter; empty selections match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive match on name or description
    pub search: String,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    /// Matches products having any of these colors
    pub colors: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: SortOption,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        let search = self.search.trim().to_lowercase();
        self.matches_search(product, &search)
            && self.matches_facets(product)
            && self.matches_price(product)
    }

    fn matches_search(&self, product: &Product, needle: &str) -> bool {
        needle.is_empty()
            || product.name.to_lowercase().contains(needle)
            || product.description.to_lowercase().contains(needle)
    }

    fn matches_facets(&self, product: &Product) -> bool {
        let category = self.categories.is_empty() || self.categories.contains(&product.category);
        let brand = self.brands.is_empty() || self.brands.contains(&product.brand);
        let color = self.colors.is_empty() || product.colors.iter().any(|c| self.colors.contains(c));

        category && brand && color
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }

    /// Filters then sorts `products`, which must be in listing order
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let needle = self.search.trim().to_lowercase();

        let mut filtered: Vec<Product> = products
            .into_iter()
            .filter(|p| {
                self.matches_search(p, &needle) && self.matches_facets(p) && self.matches_price(p)
            })
            .collect();

        match self.sort {
            SortOption::RatingDesc => filtered.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortOption::PriceAsc => filtered.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOption::PriceDesc => filtered.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOption::Newest => filtered.reverse(),
        }

        filtered
    }
}

/// Distinct filter values present in a catalog, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogFacets {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub colors: Vec<String>,
}

impl CatalogFacets {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            categories: distinct(products.iter().map(|p| p.category.as_str())),
            brands: distinct(products.iter().map(|p| p.brand.as_str())),
            colors: distinct(products.iter().flat_map(|p| p.colors.iter().map(String::as_str))),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();

    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
