use std::fmt;

use serde::Serialize;

/// A catalog listing for one product, in store-neutral form.
///
/// The six subscription fields stay at their defaults for one-time
/// products. Period fields are ISO 8601 durations (`P1W`, `P3D`, `P1Y`) or
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuDetails {
    pub(crate) item_type: String,
    pub(crate) sku: String,
    #[serde(rename = "type")]
    pub(crate) product_type: String,
    pub(crate) price: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) json: String,
    pub(crate) currency_code: String,
    pub(crate) price_value: f64,
    #[serde(flatten)]
    pub(crate) subscription: SubscriptionTerms,
}

/// Subscription-only pricing, grouped so normalizers can fill it in one
/// step or leave it at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionTerms {
    pub(crate) subscription_period: String,
    pub(crate) free_trial_period: String,
    pub(crate) introductory_price: String,
    pub(crate) introductory_price_value: Option<f64>,
    pub(crate) introductory_price_period: String,
    pub(crate) introductory_price_cycles: Option<u32>,
}

impl SkuDetails {
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Store-neutral SKU used by application code.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Localized price, ready for display.
    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Store-specific listing JSON the other fields were read from.
    pub fn json(&self) -> &str {
        &self.json
    }

    /// ISO 4217 currency code.
    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// Price in major currency units (e.g. 2.99, not 2990000 micros).
    pub fn price_value(&self) -> f64 {
        self.price_value
    }

    pub fn subscription_period(&self) -> &str {
        &self.subscription.subscription_period
    }

    pub fn free_trial_period(&self) -> &str {
        &self.subscription.free_trial_period
    }

    pub fn introductory_price(&self) -> &str {
        &self.subscription.introductory_price
    }

    pub fn introductory_price_value(&self) -> Option<f64> {
        self.subscription.introductory_price_value
    }

    pub fn introductory_price_period(&self) -> &str {
        &self.subscription.introductory_price_period
    }

    pub fn introductory_price_cycles(&self) -> Option<u32> {
        self.subscription.introductory_price_cycles
    }

    pub fn is_subscription(&self) -> bool {
        !self.subscription.subscription_period.is_empty()
    }
}

impl fmt::Display for SkuDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SkuDetails: type = {}, SKU = {}, title = {}, price = {}, description = {}, \
             priceValue = {}, currency = {}, subscriptionPeriod = {}, freeTrialPeriod = {}, \
             introductoryPrice = {}, introductoryPricePeriod = {}, introductoryPriceCycles = {}]",
            self.item_type,
            self.sku,
            self.title,
            self.price,
            self.description,
            self.price_value,
            self.currency_code,
            self.subscription.subscription_period,
            self.subscription.free_trial_period,
            self.subscription.introductory_price,
            self.subscription.introductory_price_period,
            self.subscription
                .introductory_price_cycles
                .map(|c| c.to_string())
                .unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn one_time_product_is_not_a_subscription() {
        let details = SkuDetails {
            sku: "gold".to_owned(),
            ..Default::default()
        };
        assert!(!details.is_subscription());
        assert_eq!(details.subscription, SubscriptionTerms::default());
    }

    #[test]
    fn serializes_flat_camel_case() {
        let details = SkuDetails {
            sku: "premium".to_owned(),
            product_type: "subs".to_owned(),
            price_value: 2.99,
            subscription: SubscriptionTerms {
                subscription_period: "P1W".to_owned(),
                introductory_price_cycles: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["type"], json!("subs"));
        assert_eq!(value["priceValue"], json!(2.99));
        assert_eq!(value["subscriptionPeriod"], json!("P1W"));
        assert_eq!(value["introductoryPriceCycles"], json!(1));
        assert_eq!(value["introductoryPriceValue"], json!(null));
    }

    #[test]
    fn display_summary() {
        let details = SkuDetails {
            item_type: "inapp".to_owned(),
            sku: "gold".to_owned(),
            title: "Gold".to_owned(),
            price: "$0.99".to_owned(),
            price_value: 0.99,
            currency_code: "USD".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            details.to_string(),
            "[SkuDetails: type = inapp, SKU = gold, title = Gold, price = $0.99, description = , \
             priceValue = 0.99, currency = USD, subscriptionPeriod = , freeTrialPeriod = , \
             introductoryPrice = , introductoryPricePeriod = , introductoryPriceCycles = ]"
        );
    }
}
