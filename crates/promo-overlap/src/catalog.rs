//! Product → category lookup used for cross-scope comparisons.

use std::collections::HashMap;

use crate::response::ProductRecord;

/// Category membership and display names for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub product_name: String,
    pub category_id: String,
    pub category_name: String,
}

/// Read-only index from product id to [`ProductInfo`].
///
/// Built once per validation pass from the active product list. Products
/// without an id or a category id cannot take part in category comparisons
/// and are left out.
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    by_id: HashMap<String, ProductInfo>,
}

impl ProductIndex {
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let by_id = products
            .iter()
            .filter_map(|p| {
                let id = p.id.as_deref().filter(|s| !s.is_empty())?;
                let category_id = p.category_id.as_deref().filter(|s| !s.is_empty())?;
                Some((
                    id.to_string(),
                    ProductInfo {
                        product_name: p.name.clone().unwrap_or_default(),
                        category_id: category_id.to_string(),
                        category_name: p.category_name.clone().unwrap_or_default(),
                    },
                ))
            })
            .collect();
        Self { by_id }
    }

    pub fn get(&self, product_id: &str) -> Option<&ProductInfo> {
        self.by_id.get(product_id)
    }

    /// The product's info if it belongs to `category_id`.
    pub fn in_category(&self, product_id: &str, category_id: &str) -> Option<&ProductInfo> {
        self.get(product_id)
            .filter(|info| info.category_id == category_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
