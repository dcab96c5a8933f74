use super::IProductRepo;
use crate::repos::shared::inmemory_repo::find;
use eapteka_domain::{Product, ID};

pub struct InMemoryProductRepo {
    products: std::sync::Mutex<Vec<Product>>,
}

impl InMemoryProductRepo {
    pub fn new() -> Self {
        Self::with_products(Vec::new())
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: std::sync::Mutex::new(products),
        }
    }
}

impl Default for InMemoryProductRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IProductRepo for InMemoryProductRepo {
    async fn find(&self, product_id: &ID) -> anyhow::Result<Option<Product>> {
        Ok(find(product_id, &self.products))
    }
}
