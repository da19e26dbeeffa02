pub mod data {
    pub(crate) mod apple_receipt;
    pub mod document;
    pub mod subscription_period;
    pub mod repositories {
        pub(crate) mod android_normalizer_impl;
        pub(crate) mod apple_normalizer_impl;
        pub mod store_sku_map_impl;
        pub(crate) mod windows_normalizer_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod listing_payload;
        pub mod platform;
        pub mod product_listing;
        pub mod purchase;
        pub mod sku_details;
    }
    pub mod repositories {
        pub mod normalizer;
        pub mod sku_map;
    }
}

pub mod config;
pub mod errors;
pub mod util;
