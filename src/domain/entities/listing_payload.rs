use crate::{data::document::Document, domain::entities::product_listing::ProductListing};

/// Raw listing data as received from a store bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingPayload {
    /// JSON text, as delivered by Google Play and Amazon.
    Json(String),
    /// An already-parsed object, as delivered by the App Store bridge.
    Document(Document),
    /// A native Windows Phone Store listing record.
    Native(ProductListing),
}

impl ListingPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ListingPayload::Json(_) => "json",
            ListingPayload::Document(_) => "document",
            ListingPayload::Native(_) => "native",
        }
    }
}

impl From<&str> for ListingPayload {
    fn from(text: &str) -> Self {
        ListingPayload::Json(text.to_owned())
    }
}

impl From<String> for ListingPayload {
    fn from(text: String) -> Self {
        ListingPayload::Json(text)
    }
}

impl From<Document> for ListingPayload {
    fn from(document: Document) -> Self {
        ListingPayload::Document(document)
    }
}

impl From<ProductListing> for ListingPayload {
    fn from(listing: ProductListing) -> Self {
        ListingPayload::Native(listing)
    }
}
