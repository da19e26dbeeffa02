use crate::{
    data::document::Document,
    domain::{
        entities::{
            listing_payload::ListingPayload, platform::Platform, product_listing::ProductListing,
            purchase::Purchase, sku_details::SkuDetails,
        },
        repositories::{normalizer::Normalizer, sku_map::SkuMap},
    },
    errors::Result,
};

/// Windows Phone Store. Listings come from the native SDK record and carry
/// no subscription data; product ids are mapped back to application SKUs.
pub(crate) struct WindowsNormalizerImpl<M: SkuMap> {
    sku_map: M,
}

impl<M: SkuMap> WindowsNormalizerImpl<M> {
    pub(crate) fn new(sku_map: M) -> Self {
        Self { sku_map }
    }
}

impl<M: SkuMap> Normalizer for WindowsNormalizerImpl<M> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn normalize_purchase_document(&self, document: &Document) -> Purchase {
        let mut purchase = Purchase::from_document(document);
        purchase.sku = self.sku_map.app_sku_or_store(purchase.sku);
        purchase
    }

    fn normalize_listing(&self, payload: ListingPayload) -> Result<SkuDetails> {
        let listing = match payload {
            ListingPayload::Native(listing) => listing,
            ListingPayload::Document(document) => ProductListing::from_document(&document),
            ListingPayload::Json(text) => ProductListing::from_document(&Document::parse(&text)?),
        };
        Ok(SkuDetails {
            sku: self.sku_map.app_sku_or_store(listing.product_id),
            title: listing.name,
            description: listing.description,
            price: listing.formatted_price,
            ..Default::default()
        })
    }
}
