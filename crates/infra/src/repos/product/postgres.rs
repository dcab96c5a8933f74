use super::IProductRepo;
use eapteka_domain::{Product, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresProductRepo {
    pool: PgPool,
}

impl PostgresProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRaw {
    id: i64,
    substance_id: Option<i64>,
    name: String,
    description: String,
    price: i32,
    image_id: i32,
    sku: i32,
    substance_name: Option<String>,
}

impl From<ProductRaw> for Product {
    fn from(raw: ProductRaw) -> Self {
        Self {
            id: raw.id.into(),
            substance_id: raw.substance_id.map(ID::from),
            name: raw.name,
            description: raw.description,
            price: raw.price,
            image_id: raw.image_id,
            sku: raw.sku,
            substance_name: raw.substance_name,
        }
    }
}

#[async_trait::async_trait]
impl IProductRepo for PostgresProductRepo {
    async fn find(&self, product_id: &ID) -> anyhow::Result<Option<Product>> {
        let product: Option<ProductRaw> = sqlx::query_as(
            r#"
            SELECT p.id, p.substance_id, p.name, p.description, p.price,
                   p.image_id, p.sku, s.name AS substance_name
            FROM product AS p
            LEFT JOIN substance AS s
                ON s.id = p.substance_id
            WHERE p.id = $1
            "#,
        )
        .bind(product_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product.map(|p| p.into()))
    }
}
