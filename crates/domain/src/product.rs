use crate::shared::entity::{Entity, ID};

/// Display record of a product as shown to customers
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ID,
    pub substance_id: Option<ID>,
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit
    pub price: i32,
    pub image_id: i32,
    pub sku: i32,
    /// Name of the active substance, if the product has one
    pub substance_name: Option<String>,
}

impl Entity for Product {
    fn id(&self) -> &ID {
        &self.id
    }
}
