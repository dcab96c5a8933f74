mod notifier;
mod product;
mod status;

pub mod dtos {
    pub use crate::notifier::dtos::*;
    pub use crate::product::dtos::*;
}

pub use crate::notifier::api::*;
pub use crate::status::api::*;
