//! Client-side product filtering.

use crate::catalog::Product;
use crate::ids::CategoryId;

/// Filter applied to a product listing.
///
/// Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive fragment of the product name.
    pub text: Option<String>,
    /// Only products in this category.
    pub category: Option<CategoryId>,
}

impl ProductFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match on a name fragment.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.trim().is_empty() {
            None
        } else {
            Some(text.trim().to_lowercase())
        };
        self
    }

    /// Match on a category.
    pub fn category(mut self, id: impl Into<CategoryId>) -> Self {
        self.category = Some(id.into());
        self
    }

    /// Check whether a product passes the filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref text) = self.text {
            if !product.name.to_lowercase().contains(text.as_str()) {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if product.category_id.as_ref() != Some(category) {
                return false;
            }
        }
        true
    }

    /// Apply the filter, keeping listing order.
    pub fn apply<'a>(&'a self, products: &'a [Product]) -> impl Iterator<Item = &'a Product> + 'a {
        products.iter().filter(move |p| self.matches(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Product> {
        let mut apple = Product::new("1", "Apple", 1.20);
        apple.category_id = Some(CategoryId::new("pome"));
        let mut pear = Product::new("2", "Pear", 1.50);
        pear.category_id = Some(CategoryId::new("pome"));
        let mut pineapple = Product::new("3", "Pineapple", 3.00);
        pineapple.category_id = Some(CategoryId::new("tropical"));
        vec![apple, pear, pineapple]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let products = listing();
        assert_eq!(ProductFilter::new().apply(&products).count(), 3);
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        let products = listing();
        let filter = ProductFilter::new().text("APPLE");
        let names: Vec<_> = filter.apply(&products).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Pineapple"]);
    }

    #[test]
    fn test_category_and_text_combine() {
        let products = listing();
        let filter = ProductFilter::new().text("apple").category("pome");
        let names: Vec<_> = filter.apply(&products).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apple"]);
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let filter = ProductFilter::new().text("   ");
        assert!(filter.text.is_none());
    }
}
