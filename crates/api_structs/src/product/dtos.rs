use eapteka_domain::{Product, ID};
use serde::{Deserialize, Serialize};

/// The product record pushed to recommendation subscribers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductDTO {
    pub id: ID,
    pub substance_id: Option<ID>,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub image_id: i32,
    pub sku: i32,
    pub substance_name: Option<String>,
}

impl ProductDTO {
    pub fn new(product: Product) -> Self {
        Self {
            id: product.id,
            substance_id: product.substance_id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_id: product.image_id,
            sku: product.sku,
            substance_name: product.substance_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_fields() {
        let product = ProductDTO::new(Product {
            id: 3.into(),
            substance_id: Some(1.into()),
            name: "Aspirin".into(),
            description: "Pain relief".into(),
            price: 250,
            image_id: 12,
            sku: 5001,
            substance_name: None,
        });

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "substance_id": 1,
                "name": "Aspirin",
                "description": "Pain relief",
                "price": 250,
                "image_id": 12,
                "sku": 5001,
                "substance_name": null,
            })
        );
    }
}
