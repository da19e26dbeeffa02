use tracing::warn;

use crate::{
    data::document::Document,
    domain::{
        entities::{
            listing_payload::ListingPayload,
            platform::Platform,
            purchase::Purchase,
            sku_details::{SkuDetails, SubscriptionTerms},
        },
        repositories::normalizer::Normalizer,
    },
    errors::{IapNormalizerError, Result},
};

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Google Play and Amazon Appstore. Both deliver purchases as flat JSON and
/// listings as JSON with the store's own listing object embedded as text in
/// the `json` field; product ids are already application SKUs.
pub(crate) struct AndroidNormalizerImpl {
    platform: Platform,
}

impl AndroidNormalizerImpl {
    pub(crate) fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Normalizer for AndroidNormalizerImpl {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn normalize_purchase_document(&self, document: &Document) -> Purchase {
        Purchase::from_document(document)
    }

    fn normalize_listing(&self, payload: ListingPayload) -> Result<SkuDetails> {
        let document = match payload {
            ListingPayload::Json(text) => Document::parse(&text)?,
            ListingPayload::Document(document) => document,
            native @ ListingPayload::Native(_) => {
                return Err(IapNormalizerError::UnsupportedPayload {
                    platform: self.platform,
                    kind: native.kind(),
                })
            }
        };
        Ok(parse_listing(&document))
    }
}

/// Reads the top-level listing fields, then the pricing and subscription
/// fields from the embedded store listing.
pub(crate) fn parse_listing(document: &Document) -> SkuDetails {
    let mut details = read_listing_fields(document);
    if details.json.is_empty() {
        return details;
    }
    let listing = match Document::parse(&details.json) {
        Ok(listing) => listing,
        Err(e) => {
            warn!(sku = %details.sku, error = %e, "Ignoring unreadable embedded listing JSON.");
            return details;
        }
    };

    details.currency_code = listing.get_string("price_currency_code");
    details.price_value = listing.get_float("price_amount_micros") / MICROS_PER_UNIT;
    details.subscription = SubscriptionTerms {
        subscription_period: listing.get_string("subscriptionPeriod"),
        free_trial_period: listing.get_string("freeTrialPeriod"),
        introductory_price: listing.get_string("introductoryPrice"),
        introductory_price_value: listing
            .find_float("introductoryPriceAmountMicros")
            .map(|micros| micros / MICROS_PER_UNIT),
        introductory_price_period: listing.get_string("introductoryPricePeriod"),
        introductory_price_cycles: listing
            .find_long("introductoryPriceCycles")
            .and_then(|cycles| u32::try_from(cycles).ok()),
    };
    if let Some(product_id) = listing.find_string("productId").filter(|s| !s.is_empty()) {
        details.sku = product_id;
    }
    details
}

/// Fields every store bridge reports at the top level of a listing.
pub(crate) fn read_listing_fields(document: &Document) -> SkuDetails {
    SkuDetails {
        item_type: document.get_string("itemType"),
        sku: document.get_string("sku"),
        product_type: document.get_string("type"),
        price: document.get_string("price"),
        title: document.get_string("title"),
        description: document.get_string("description"),
        json: document.get_string("json"),
        ..Default::default()
    }
}
