mod inmemory;
mod postgres;

use eapteka_domain::{Product, ID};
pub use inmemory::InMemoryProductRepo;
pub use postgres::PostgresProductRepo;

#[async_trait::async_trait]
pub trait IProductRepo: Send + Sync {
    /// Point lookup of the display record of a product
    async fn find(&self, product_id: &ID) -> anyhow::Result<Option<Product>>;
}
