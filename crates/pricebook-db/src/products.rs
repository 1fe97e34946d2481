//! Single-table CRUD for `product`. Pricing is never written here and never
//! read back by these functions; only [`crate::search`] populates it.

use pricebook_core::{Product, ProductCategory, ProductDraft};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `product` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    /// Stored as `TEXT` with a `CHECK` constraint over the category names.
    pub product_category: String,
    pub description: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            product_category: row.product_category.parse::<ProductCategory>()?,
            description: row.description,
            prices: Vec::new(),
        })
    }
}

/// Inserts a product and returns it with the store-assigned `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_product(pool: &PgPool, draft: ProductDraft) -> Result<Product, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product (name, product_category, description) \
         VALUES ($1, $2, $3) \
         RETURNING id",
    )
    .bind(&draft.name)
    .bind(draft.product_category.as_str())
    .bind(&draft.description)
    .fetch_one(pool)
    .await?;

    Ok(Product::from_draft(id, draft))
}

/// Returns a single product by id, or `None` if no row matches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if the stored category is not a known variant.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<Product>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, product_category, description \
         FROM product \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Product::try_from).transpose()
}

/// Returns every product ordered by id, without pricing.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if a stored category is not a known variant.
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, name, product_category, description \
         FROM product \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Product::try_from).collect()
}

/// Overwrites the scalar fields of product `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    draft: ProductDraft,
) -> Result<Product, DbError> {
    let rows_affected = sqlx::query(
        "UPDATE product \
         SET name = $1, \
             product_category = $2, \
             description = $3 \
         WHERE id = $4",
    )
    .bind(&draft.name)
    .bind(draft.product_category.as_str())
    .bind(&draft.description)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }

    Ok(Product::from_draft(id, draft))
}

/// Deletes product `id`. Its prices and tier details cascade.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let rows_affected = sqlx::query("DELETE FROM product WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
