use std::fmt;

use chrono::{DateTime, Utc};

use crate::data::document::Document;

pub const ITEM_TYPE_INAPP: &str = "inapp";
pub const ITEM_TYPE_SUBS: &str = "subs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// One-time product (consumable or not).
    InApp,
    /// Auto-renewing subscription.
    Subs,
}

impl ItemType {
    /// Matches case-insensitively, since some bridges report `"InApp"`.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case(ITEM_TYPE_INAPP) {
            Some(ItemType::InApp)
        } else if token.eq_ignore_ascii_case(ITEM_TYPE_SUBS) {
            Some(ItemType::Subs)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::InApp => ITEM_TYPE_INAPP,
            ItemType::Subs => ITEM_TYPE_SUBS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PurchaseState {
    Purchased = 0,
    Canceled = 1,
    Refunded = 2,
}

impl TryFrom<i32> for PurchaseState {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PurchaseState::Purchased),
            1 => Ok(PurchaseState::Canceled),
            2 => Ok(PurchaseState::Refunded),
            other => Err(other),
        }
    }
}

/// One completed in-app purchase, in store-neutral form.
///
/// Built once by a [`Normalizer`](crate::domain::repositories::normalizer::Normalizer)
/// from a single store payload and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Purchase {
    pub(crate) item_type: String,
    pub(crate) order_id: String,
    pub(crate) package_name: String,
    pub(crate) sku: String,
    pub(crate) purchase_time: i64,
    pub(crate) purchase_state: i32,
    pub(crate) developer_payload: String,
    pub(crate) token: String,
    pub(crate) original_json: String,
    pub(crate) signature: String,
    pub(crate) appstore_name: String,
    pub(crate) receipt: String,
}

impl Purchase {
    /// Builds a purchase carrying only a SKU and developer payload, for use
    /// outside a live store (editor, tests).
    pub fn from_sku(sku: &str, developer_payload: &str) -> Self {
        Self {
            sku: sku.to_owned(),
            developer_payload: developer_payload.to_owned(),
            ..Default::default()
        }
    }

    /// Reads every persisted field straight from the payload, with empty or
    /// zero defaults for anything missing.
    pub(crate) fn from_document(document: &Document) -> Self {
        Self {
            item_type: document.get_string("itemType"),
            order_id: document.get_string("orderId"),
            package_name: document.get_string("packageName"),
            sku: document.get_string("sku"),
            purchase_time: document.get_long("purchaseTime"),
            purchase_state: document.get_int("purchaseState"),
            developer_payload: document.get_string("developerPayload"),
            token: document.get_string("token"),
            original_json: document.get_string("originalJson"),
            signature: document.get_string("signature"),
            appstore_name: document.get_string("appstoreName"),
            receipt: document.get_string("receipt"),
        }
    }

    /// Serializes the persisted fields. The output reads back through the
    /// Google Play normalizer into an identical record.
    pub fn to_json(&self) -> String {
        let mut document = Document::new();
        document
            .set("itemType", self.item_type.as_str())
            .set("orderId", self.order_id.as_str())
            .set("packageName", self.package_name.as_str())
            .set("sku", self.sku.as_str())
            .set("purchaseTime", self.purchase_time)
            .set("purchaseState", self.purchase_state)
            .set("developerPayload", self.developer_payload.as_str())
            .set("token", self.token.as_str())
            .set("originalJson", self.original_json.as_str())
            .set("signature", self.signature.as_str())
            .set("appstoreName", self.appstore_name.as_str())
            .set("receipt", self.receipt.as_str());
        document.serialize()
    }

    /// `inapp` or `subs`.
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn item_type_kind(&self) -> Option<ItemType> {
        ItemType::from_token(&self.item_type)
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Package name (Android) or bundle id (iOS) the purchase originated
    /// from.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Store-neutral SKU used by application code.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Milliseconds since the Unix epoch.
    pub fn purchase_time(&self) -> i64 {
        self.purchase_time
    }

    pub fn purchase_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.purchase_time)
    }

    /// Raw state code: 0 purchased, 1 canceled, 2 refunded.
    pub fn purchase_state(&self) -> i32 {
        self.purchase_state
    }

    pub fn state(&self) -> Option<PurchaseState> {
        PurchaseState::try_from(self.purchase_state).ok()
    }

    pub fn developer_payload(&self) -> &str {
        &self.developer_payload
    }

    /// Purchase token. For App Store purchases this is the original
    /// transaction id read from the receipt, when the receipt could be
    /// decoded.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Payload exactly as sent by the store.
    pub fn original_json(&self) -> &str {
        &self.original_json
    }

    /// Store signature over `original_json`. Not verified here.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn appstore_name(&self) -> &str {
        &self.appstore_name
    }

    /// Base64 App Store receipt (iOS only).
    pub fn receipt(&self) -> &str {
        &self.receipt
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SKU:{};{}", self.sku, self.original_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_sku_sets_only_sku_and_payload() {
        let p = Purchase::from_sku("gold_100", "");
        assert_eq!(p.sku(), "gold_100");
        assert_eq!(p.developer_payload(), "");
        assert_eq!(
            p,
            Purchase {
                sku: "gold_100".to_owned(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn to_json_writes_exactly_the_persisted_keys() {
        let document = Document::parse(&Purchase::from_sku("gold", "dp").to_json()).unwrap();
        let present = [
            "itemType",
            "orderId",
            "packageName",
            "sku",
            "purchaseTime",
            "purchaseState",
            "developerPayload",
            "token",
            "originalJson",
            "signature",
            "appstoreName",
            "receipt",
        ]
        .into_iter()
        .filter(|key| document.contains_key(key))
        .count();
        assert_eq!(present, 12);
        assert_eq!(document.len(), 12);
        assert_eq!(document.get("purchaseTime"), Some(&serde_json::json!(0)));
    }

    #[test]
    fn typed_views() {
        let p = Purchase {
            item_type: "InApp".to_owned(),
            purchase_time: 1_700_000_000_123,
            purchase_state: 2,
            ..Default::default()
        };
        assert_eq!(p.item_type_kind(), Some(ItemType::InApp));
        assert_eq!(p.state(), Some(PurchaseState::Refunded));
        assert_eq!(
            p.purchase_datetime().unwrap().timestamp_millis(),
            1_700_000_000_123
        );

        let unknown = Purchase {
            purchase_state: 9,
            ..Default::default()
        };
        assert_eq!(unknown.state(), None);
        assert_eq!(unknown.item_type_kind(), None);
    }

    #[test]
    fn display_matches_bridge_format() {
        let p = Purchase {
            sku: "gold".to_owned(),
            original_json: "{\"a\":1}".to_owned(),
            ..Default::default()
        };
        assert_eq!(p.to_string(), "SKU:gold;{\"a\":1}");
    }
}
