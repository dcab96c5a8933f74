mod base;
mod notifier;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
pub use eapteka_api_structs::dtos::*;
pub use eapteka_domain::ID;
use notifier::NotifierClient;
pub use notifier::CreateNotifierInput;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use eapteka_api_structs::dtos::NotifierDTO as Notifier;
pub use eapteka_api_structs::dtos::ProductDTO as Product;

/// eapteka notifier SDK
///
/// The SDK contains methods for interacting with the notifier
/// API of the eapteka server.
#[derive(Clone)]
pub struct EaptekaSDK {
    pub notifier: NotifierClient,
    pub status: StatusClient,
}

impl EaptekaSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let notifier = NotifierClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { notifier, status }
    }
}
