use std::sync::Arc;

use tracing::debug;

/// Lookup from a store-specific product id to the SKU the application
/// uses.
///
/// A miss is `None`, not an error: it normally means the store id already
/// is the application SKU. Implementations are shared read-only between
/// normalizer calls and must tolerate concurrent reads.
pub trait SkuMap: Send + Sync {
    fn app_sku(&self, store_sku: &str) -> Option<String>;

    /// The mapped application SKU, or `store_sku` itself when there is no
    /// mapping. Normalizers never fail on a miss.
    fn app_sku_or_store(&self, store_sku: String) -> String {
        match self.app_sku(&store_sku) {
            Some(app_sku) => app_sku,
            None => {
                debug!(sku = %store_sku, "No SKU mapping; keeping store product id.");
                store_sku
            }
        }
    }
}

impl<M: SkuMap + ?Sized> SkuMap for Arc<M> {
    fn app_sku(&self, store_sku: &str) -> Option<String> {
        (**self).app_sku(store_sku)
    }
}

impl<M: SkuMap + ?Sized> SkuMap for &M {
    fn app_sku(&self, store_sku: &str) -> Option<String> {
        (**self).app_sku(store_sku)
    }
}
