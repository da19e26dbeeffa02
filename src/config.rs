use serde::Deserialize;

use crate::{
    data::repositories::{
        android_normalizer_impl::AndroidNormalizerImpl,
        apple_normalizer_impl::AppleNormalizerImpl,
        windows_normalizer_impl::WindowsNormalizerImpl,
    },
    domain::{
        entities::platform::Platform,
        repositories::{normalizer::Normalizer, sku_map::SkuMap},
    },
    errors::Result,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Store whose payloads will be normalized.
    pub platform: Platform,
    pub apple: AppleEditorDefaults,
}

/// Values the App Store normalizer fills into editor-mode purchases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppleEditorDefaults {
    pub store_name: String,
    pub item_type: String,
}

impl Default for AppleEditorDefaults {
    fn default() -> Self {
        Self {
            store_name: "com.apple.appstore".to_owned(),
            item_type: "InApp".to_owned(),
        }
    }
}

impl NormalizerConfig {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Default::default()
        }
    }

    /// Reads an optional `iap_normalizer.{toml,json,yaml,...}` file in the
    /// working directory, overridden by `IAP_NORMALIZER__*` environment
    /// variables (e.g. `IAP_NORMALIZER__PLATFORM=apple`).
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("iap_normalizer").required(false))
            .add_source(
                config::Environment::with_prefix("IAP_NORMALIZER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Builds the normalizer for the configured store. The SKU map is only
    /// consulted by stores whose product ids differ from application SKUs.
    pub fn build<M: SkuMap + 'static>(&self, sku_map: M) -> Box<dyn Normalizer> {
        match self.platform {
            Platform::Google | Platform::Amazon => Box::new(AndroidNormalizerImpl::new(self.platform)),
            Platform::Apple => Box::new(AppleNormalizerImpl::new(sku_map, self.apple.clone())),
            Platform::Windows => Box::new(WindowsNormalizerImpl::new(sku_map)),
        }
    }
}
