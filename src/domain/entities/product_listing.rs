use crate::data::document::Document;

/// Listing record handed over by the Windows Phone Store SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListing {
    /// Store-side product id; mapped back to the app SKU on normalization.
    pub product_id: String,
    pub name: String,
    pub description: String,
    /// Localized price, ready for display.
    pub formatted_price: String,
}

impl ProductListing {
    /// Reads the native record from its JSON form, which uses the SDK's
    /// PascalCase property names.
    pub fn from_document(document: &Document) -> Self {
        Self {
            product_id: document.get_string("ProductId"),
            name: document.get_string("Name"),
            description: document.get_string("Description"),
            formatted_price: document.get_string("FormattedPrice"),
        }
    }
}
