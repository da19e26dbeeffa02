use crate::{
    config::NormalizerConfig,
    data::document::Document,
    domain::{
        entities::{
            listing_payload::ListingPayload, platform::Platform, purchase::Purchase,
            sku_details::SkuDetails,
        },
        repositories::{normalizer::Normalizer, sku_map::SkuMap},
    },
    errors::Result,
};

/// Entry point for store bridges: owns the normalizer selected for the
/// running platform.
pub struct IapNormalizerUtil {
    normalizer: Box<dyn Normalizer>,
}

impl IapNormalizerUtil {
    pub fn new<M: SkuMap + 'static>(config: &NormalizerConfig, sku_map: M) -> Self {
        Self {
            normalizer: config.build(sku_map),
        }
    }

    /// Like [`IapNormalizerUtil::new`], with configuration from
    /// [`NormalizerConfig::load`].
    pub fn from_env<M: SkuMap + 'static>(sku_map: M) -> Result<Self> {
        Ok(Self::new(&NormalizerConfig::load()?, sku_map))
    }

    pub fn platform(&self) -> Platform {
        self.normalizer.platform()
    }

    pub fn normalize_purchase(&self, payload: &str) -> Result<Purchase> {
        self.normalizer.normalize_purchase(payload)
    }

    pub fn normalize_purchase_document(&self, document: &Document) -> Purchase {
        self.normalizer.normalize_purchase_document(document)
    }

    pub fn normalize_listing(&self, payload: impl Into<ListingPayload>) -> Result<SkuDetails> {
        self.normalizer.normalize_listing(payload.into())
    }

    pub fn create_from_sku(&self, sku: &str, developer_payload: &str) -> Purchase {
        self.normalizer.create_from_sku(sku, developer_payload)
    }

    pub fn purchase_to_json(&self, purchase: &Purchase) -> String {
        self.normalizer.purchase_to_json(purchase)
    }
}
