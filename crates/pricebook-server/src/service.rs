//! Product service: validates input and delegates to the repository in
//! `pricebook-db`. Handlers never call the repository directly.

use pricebook_core::{CoreError, Product, ProductInput, SearchFilters};
use pricebook_db::DbError;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input broke a business rule; no store call was made.
    #[error(transparent)]
    Validation(#[from] CoreError),
    #[error("product not found")]
    NotFound,
    #[error(transparent)]
    Db(DbError),
}

impl From<DbError> for ServiceError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound => ServiceError::NotFound,
            other => ServiceError::Db(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> Result<(), DbError> {
        pricebook_db::health_check(&self.pool).await
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, ServiceError> {
        let draft = input.validate()?;
        Ok(pricebook_db::create_product(&self.pool, draft).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Product, ServiceError> {
        pricebook_db::get_product(&self.pool, id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(pricebook_db::list_products(&self.pool).await?)
    }

    /// Validates and overwrites the product identified by `input.id`.
    pub async fn update(&self, input: ProductInput) -> Result<Product, ServiceError> {
        let id = input.id;
        let draft = input.validate()?;
        Ok(pricebook_db::update_product(&self.pool, id, draft).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(pricebook_db::delete_product(&self.pool, id).await?)
    }

    /// Searches products with nested pricing. Blank filters are ignored; an
    /// empty result is reported as [`ServiceError::NotFound`].
    pub async fn search(
        &self,
        keyword: Option<&str>,
        category: Option<&str>,
        tier: Option<&str>,
    ) -> Result<Vec<Product>, ServiceError> {
        let filters = SearchFilters::parse(keyword, category, tier)?;
        let products = pricebook_db::search_products(&self.pool, &filters).await?;

        if products.is_empty() {
            return Err(ServiceError::NotFound);
        }
        Ok(products)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;

    use super::*;

    /// A pool that never reaches a server. Any store access fails with a
    /// pool timeout, so a validation error proves the store was not touched.
    pub(crate) fn unreachable_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy("postgres://pricebook@127.0.0.1:1/pricebook")
            .expect("lazy pool")
    }

    fn input(name: &str, category: &str) -> ProductInput {
        ProductInput {
            id: 1,
            name: name.to_string(),
            product_category: category.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn db_not_found_becomes_service_not_found() {
        assert!(matches!(
            ServiceError::from(DbError::NotFound),
            ServiceError::NotFound
        ));
    }

    #[test]
    fn db_failures_stay_db_errors() {
        let err = ServiceError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ServiceError::Db(_)));
    }

    #[tokio::test]
    async fn create_with_empty_name_fails_before_store_access() {
        let service = ProductService::new(unreachable_pool());
        let err = service
            .create(input("", "Rokok"))
            .await
            .expect_err("empty name");
        assert!(
            matches!(err, ServiceError::Validation(CoreError::MissingName)),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn create_with_unknown_category_fails_before_store_access() {
        let service = ProductService::new(unreachable_pool());
        let err = service
            .create(input("Kopi", "Minuman"))
            .await
            .expect_err("unknown category");
        assert!(
            matches!(err, ServiceError::Validation(CoreError::InvalidCategory(_))),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn update_validates_before_store_access() {
        let service = ProductService::new(unreachable_pool());
        let err = service
            .update(input("Kopi", ""))
            .await
            .expect_err("missing category");
        assert!(matches!(err, ServiceError::Validation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn search_with_unknown_tier_fails_before_store_access() {
        let service = ProductService::new(unreachable_pool());
        let err = service
            .search(None, None, Some("Gold"))
            .await
            .expect_err("unknown tier");
        assert!(
            matches!(err, ServiceError::Validation(CoreError::InvalidTier(_))),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn list_surfaces_store_failure_as_db_error() {
        let service = ProductService::new(unreachable_pool());
        let err = service.list().await.expect_err("unreachable store");
        assert!(matches!(err, ServiceError::Db(_)), "got {err:?}");
    }
}
