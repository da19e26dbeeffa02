use crate::{
    data::document::Document,
    domain::entities::{
        listing_payload::ListingPayload, platform::Platform, purchase::Purchase,
        sku_details::SkuDetails,
    },
    errors::Result,
};

/// Turns raw store payloads into store-neutral records.
///
/// One implementation exists per store family; pick it with
/// [`NormalizerConfig::build`](crate::config::NormalizerConfig::build).
/// The only error a purchase can fail with is a payload that is not JSON;
/// anything else degrades to default field values.
pub trait Normalizer: Send + Sync {
    fn platform(&self) -> Platform;

    /// Normalizes an already-parsed purchase payload.
    fn normalize_purchase_document(&self, document: &Document) -> Purchase;

    /// Normalizes a purchase payload given as JSON text.
    fn normalize_purchase(&self, payload: &str) -> Result<Purchase> {
        Ok(self.normalize_purchase_document(&Document::parse(payload)?))
    }

    fn normalize_listing(&self, payload: ListingPayload) -> Result<SkuDetails>;

    /// Debug purchase for editor mode and tests, with no store involved.
    fn create_from_sku(&self, sku: &str, developer_payload: &str) -> Purchase {
        Purchase::from_sku(sku, developer_payload)
    }

    fn purchase_to_json(&self, purchase: &Purchase) -> String {
        purchase.to_json()
    }
}
