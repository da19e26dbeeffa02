use crate::domain::entities::platform::Platform;

#[derive(Debug, thiserror::Error)]
pub enum IapNormalizerError {
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        message: String,
        debug: Option<String>,
    },

    #[error("Failed to decode App Store receipt: {message}")]
    ReceiptDecodeFailure {
        message: String,
        debug: Option<String>,
    },

    #[error("SKU mapping table could not be read: {message}")]
    SkuMappingUnavailable {
        message: String,
        debug: Option<String>,
    },

    #[error("The {platform} normalizer does not accept {kind} listings.")]
    UnsupportedPayload {
        platform: Platform,
        kind: &'static str,
    },

    #[error("Invalid normalizer configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl IapNormalizerError {
    /// Debug rendering of the underlying cause, if one was attached.
    pub fn debug(&self) -> Option<&str> {
        match self {
            IapNormalizerError::MalformedPayload { debug, .. }
            | IapNormalizerError::ReceiptDecodeFailure { debug, .. }
            | IapNormalizerError::SkuMappingUnavailable { debug, .. } => debug.as_deref(),
            IapNormalizerError::UnsupportedPayload { .. } | IapNormalizerError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IapNormalizerError>;

/// Declares a constructor type for one of the message-carrying error
/// variants, so call sites read `MalformedPayload::with_debug("...", &e)`.
macro_rules! define_error_type {
    ($name:ident) => {
        pub(crate) struct $name;

        impl $name {
            #[allow(dead_code)]
            pub(crate) fn new(message: &str) -> IapNormalizerError {
                IapNormalizerError::$name {
                    message: message.to_owned(),
                    debug: None,
                }
            }

            pub(crate) fn with_debug(
                message: &str,
                debug: &impl std::fmt::Debug,
            ) -> IapNormalizerError {
                IapNormalizerError::$name {
                    message: message.to_owned(),
                    debug: Some(format!("{:?}", debug)),
                }
            }
        }
    };
}

define_error_type!(MalformedPayload);
define_error_type!(ReceiptDecodeFailure);
define_error_type!(SkuMappingUnavailable);
