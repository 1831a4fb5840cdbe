//! Product catalog module.
//!
//! Contains the product and category shapes served by the backend, and the
//! filters the storefront applies to them.

mod category;
mod filter;
mod product;

pub use category::Category;
pub use filter::ProductFilter;
pub use product::{Product, ProductSnapshot};
