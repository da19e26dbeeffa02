use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::AppleEditorDefaults,
    data::{
        apple_receipt::original_transaction_id,
        document::Document,
        repositories::android_normalizer_impl::read_listing_fields,
        subscription_period::normalize_period,
    },
    domain::{
        entities::{
            listing_payload::ListingPayload,
            platform::Platform,
            purchase::Purchase,
            sku_details::{SkuDetails, SubscriptionTerms},
        },
        repositories::{normalizer::Normalizer, sku_map::SkuMap},
    },
    errors::{IapNormalizerError, Result},
};

/// Apple App Store.
///
/// Product ids are mapped back to application SKUs, and the purchase token
/// is replaced by the original transaction id carried in the receipt.
/// Listing prices arrive in major units; subscription periods arrive as a
/// raw StoreKit count and unit and are collapsed to ISO 8601.
pub(crate) struct AppleNormalizerImpl<M: SkuMap> {
    sku_map: M,
    editor_defaults: AppleEditorDefaults,
}

impl<M: SkuMap> AppleNormalizerImpl<M> {
    pub(crate) fn new(sku_map: M, editor_defaults: AppleEditorDefaults) -> Self {
        Self {
            sku_map,
            editor_defaults,
        }
    }

    fn parse_listing(&self, document: &Document) -> SkuDetails {
        let mut details = read_listing_fields(document);
        details.currency_code = document.get_string("currencyCode");
        details.price_value = document.get_float("priceValue");
        details.sku = self.sku_map.app_sku_or_store(details.sku);
        if details.json.is_empty() {
            return details;
        }
        match Document::parse(&details.json) {
            Ok(listing) => {
                if let Some(terms) = subscription_terms(&listing) {
                    details.subscription = terms;
                }
            }
            Err(e) => {
                warn!(sku = %details.sku, error = %e, "Ignoring unreadable embedded listing JSON.");
            }
        }
        details
    }
}

impl<M: SkuMap> Normalizer for AppleNormalizerImpl<M> {
    fn platform(&self) -> Platform {
        Platform::Apple
    }

    fn normalize_purchase_document(&self, document: &Document) -> Purchase {
        let mut purchase = Purchase::from_document(document);
        purchase.sku = self.sku_map.app_sku_or_store(purchase.sku);
        match original_transaction_id(&purchase.receipt) {
            Ok(transaction_id) => purchase.token = transaction_id,
            Err(e) => warn!(
                sku = %purchase.sku,
                error = %e,
                cause = e.debug().unwrap_or_default(),
                "Keeping payload token; receipt did not yield an original transaction id."
            ),
        }
        purchase
    }

    fn normalize_listing(&self, payload: ListingPayload) -> Result<SkuDetails> {
        let document = match payload {
            ListingPayload::Document(document) => document,
            ListingPayload::Json(text) => Document::parse(&text)?,
            native @ ListingPayload::Native(_) => {
                return Err(IapNormalizerError::UnsupportedPayload {
                    platform: Platform::Apple,
                    kind: native.kind(),
                })
            }
        };
        Ok(self.parse_listing(&document))
    }

    /// Fills in the store name, item type and a random order id when they are
    /// empty, so code that relies on them also runs in the editor.
    fn create_from_sku(&self, sku: &str, developer_payload: &str) -> Purchase {
        let mut purchase = Purchase::from_sku(sku, developer_payload);
        if purchase.appstore_name.is_empty() {
            purchase.appstore_name = self.editor_defaults.store_name.clone();
        }
        if purchase.item_type.is_empty() {
            purchase.item_type = self.editor_defaults.item_type.clone();
        }
        if purchase.order_id.is_empty() {
            purchase.order_id = Uuid::new_v4().to_string();
        }
        debug!(sku, order_id = %purchase.order_id, "Created editor purchase.");
        purchase
    }
}

/// StoreKit reports periods as a count plus a unit token. Note the key
/// names: the introductory offer's count is under `introductoryPricePeriod`
/// and its unit under `introductoryPriceCycles`.
///
/// The introductory period is a single unit (`P1W`, `P1M`) and the count
/// goes only into `introductory_price_cycles`, so a 3-month offer reads as
/// three cycles of `P1M`.
///
/// Returns `None` when there is no positive subscription cycle count or its
/// unit is unknown, i.e. the product is not a subscription.
fn subscription_terms(listing: &Document) -> Option<SubscriptionTerms> {
    let cycles = listing.find_int("subscriptionCycles")?;
    let unit = listing.get_string("subscriptionPeriod");
    let mut terms = SubscriptionTerms {
        subscription_period: normalize_period(cycles, &unit)?,
        // StoreKit expresses trials as a zero-priced introductory offer.
        free_trial_period: String::new(),
        ..Default::default()
    };

    let intro_cycles = listing
        .find_int("introductoryPricePeriod")
        .and_then(|c| u32::try_from(c).ok())
        .filter(|c| *c > 0);
    if let Some(intro_cycles) = intro_cycles {
        terms.introductory_price = listing.get_string("introductoryPriceFormatted");
        terms.introductory_price_value = listing.find_float("introductoryPriceValue");
        terms.introductory_price_cycles = Some(intro_cycles);
        let intro_unit = listing.get_string("introductoryPriceCycles");
        if !intro_unit.is_empty() {
            terms.introductory_price_period = normalize_period(1, &intro_unit).unwrap_or_default();
        }
    }
    Some(terms)
}
