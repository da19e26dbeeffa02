use std::collections::HashMap;

use crate::{
    domain::repositories::sku_map::SkuMap,
    errors::{Result, SkuMappingUnavailable},
};

/// In-memory SKU table, keyed by the product id a particular store knows an
/// application SKU by.
#[derive(Debug, Clone, Default)]
pub struct StoreSkuMap {
    store_to_app: HashMap<String, String>,
}

impl StoreSkuMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from a JSON object of `{"app_sku": "store_sku"}` pairs.
    pub fn from_json(text: &str) -> Result<Self> {
        let pairs: HashMap<String, String> = serde_json::from_str(text).map_err(|e| {
            SkuMappingUnavailable::with_debug("expected a JSON object of SKU strings", &e)
        })?;
        let mut map = Self::new();
        for (app_sku, store_sku) in pairs {
            map.map_sku(&app_sku, &store_sku);
        }
        Ok(map)
    }

    /// Registers `store_sku` as the store's id for `app_sku`. An earlier
    /// store id for the same `app_sku` stops resolving.
    pub fn map_sku(&mut self, app_sku: &str, store_sku: &str) -> &mut Self {
        self.store_to_app.retain(|_, app| app != app_sku);
        self.store_to_app
            .insert(store_sku.to_owned(), app_sku.to_owned());
        self
    }

    pub fn with_sku(mut self, app_sku: &str, store_sku: &str) -> Self {
        self.map_sku(app_sku, store_sku);
        self
    }

    pub fn len(&self) -> usize {
        self.store_to_app.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store_to_app.is_empty()
    }
}

impl SkuMap for StoreSkuMap {
    fn app_sku(&self, store_sku: &str) -> Option<String> {
        self.store_to_app.get(store_sku).cloned()
    }
}
