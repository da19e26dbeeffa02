use std::fmt;

use serde::Deserialize;

/// Store a payload came from. Selects the normalizer family at
/// construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Google Play.
    #[default]
    Google,
    /// Amazon Appstore. Uses the same payload shape as Google Play.
    Amazon,
    /// Apple App Store.
    Apple,
    /// Windows Phone Store.
    Windows,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Google => "google",
            Platform::Amazon => "amazon",
            Platform::Apple => "apple",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
