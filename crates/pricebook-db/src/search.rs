//! Product search across `product`, `price`, and `price_detail`.
//!
//! The joined query returns one flat row per (product, price, detail)
//! combination. [`fold_rows`] rebuilds the nested product aggregates from
//! that stream and [`retain_tier`] drops products left without a detail in
//! the requested tier.

use std::collections::HashMap;

use pricebook_core::{Price, PriceDetail, Product, ProductCategory, SearchFilters, Tier};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::DbError;

const SEARCH_SELECT: &str = "SELECT \
         p.id AS product_id, \
         p.name, \
         p.product_category, \
         p.description, \
         pr.id AS price_id, \
         pr.unit, \
         pd.id AS detail_id, \
         pd.tier, \
         pd.price \
     FROM product p \
     LEFT JOIN price pr ON pr.product_id = p.id \
     LEFT JOIN price_detail pd ON pd.price_id = pr.id \
     WHERE 1=1";

const SEARCH_ORDER: &str = " ORDER BY p.id, pr.id, pd.id";

// ---------------------------------------------------------------------------
// Query builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predicate {
    NameContains,
    CategoryEquals,
    TierEquals,
}

impl Predicate {
    fn template(self) -> &'static str {
        match self {
            Predicate::NameContains => "p.name ILIKE ",
            Predicate::CategoryEquals => "p.product_category = ",
            Predicate::TierEquals => "pd.tier = ",
        }
    }
}

/// Search statement assembled from optional filters.
///
/// Predicates are kept as an ordered list of (predicate, value) pairs; the
/// n-th pair is pushed n-th, so it binds to placeholder `$n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    predicates: Vec<(Predicate, String)>,
}

impl SearchQuery {
    /// Collects predicates in keyword, category, tier order.
    #[must_use]
    pub fn new(filters: &SearchFilters) -> Self {
        let mut predicates = Vec::with_capacity(3);

        if let Some(keyword) = &filters.keyword {
            predicates.push((
                Predicate::NameContains,
                format!("%{}%", escape_like(keyword)),
            ));
        }
        if let Some(category) = filters.category {
            predicates.push((Predicate::CategoryEquals, category.as_str().to_owned()));
        }
        if let Some(tier) = filters.tier {
            predicates.push((Predicate::TierEquals, tier.as_str().to_owned()));
        }

        Self { predicates }
    }

    /// Renders the statement with every predicate value bound in order.
    #[must_use]
    pub fn builder(&self) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::new(SEARCH_SELECT);
        for (predicate, value) in &self.predicates {
            builder.push(" AND ");
            builder.push(predicate.template());
            builder.push_bind(value.as_str());
        }
        builder.push(SEARCH_ORDER);
        builder
    }

    /// Bound values in placeholder order.
    #[must_use]
    pub fn params(&self) -> Vec<&str> {
        self.predicates
            .iter()
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Escapes `LIKE` metacharacters so the keyword matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ---------------------------------------------------------------------------
// Row folding
// ---------------------------------------------------------------------------

/// One row of the joined search query. Price and detail columns are `NULL`
/// when the LEFT JOIN found nothing to attach.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchRow {
    pub product_id: i64,
    pub name: String,
    pub product_category: String,
    pub description: String,
    pub price_id: Option<i64>,
    pub unit: Option<String>,
    pub detail_id: Option<i64>,
    pub tier: Option<String>,
    pub price: Option<i64>,
}

/// Folds joined rows into product aggregates.
///
/// Products, prices, and details keep the order in which they first appear
/// in `rows`. The first row seen for a product supplies its scalar fields.
///
/// # Errors
///
/// Returns [`DbError::InvalidValue`] if a row carries a category or tier
/// outside the known variants.
pub fn fold_rows<I>(rows: I) -> Result<Vec<Product>, DbError>
where
    I: IntoIterator<Item = SearchRow>,
{
    let mut products: Vec<Product> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let SearchRow {
            product_id,
            name,
            product_category,
            description,
            price_id,
            unit,
            detail_id,
            tier,
            price,
        } = row;

        let slot = if let Some(&slot) = slots.get(&product_id) {
            slot
        } else {
            products.push(Product {
                id: product_id,
                name,
                product_category: product_category.parse::<ProductCategory>()?,
                description,
                prices: Vec::new(),
            });
            slots.insert(product_id, products.len() - 1);
            products.len() - 1
        };

        let Some(price_id) = price_id else {
            continue;
        };

        let detail = match (detail_id, tier, price) {
            (Some(id), Some(tier), Some(amount)) => Some(PriceDetail {
                id,
                price_id,
                tier: tier.parse::<Tier>()?,
                price: amount,
            }),
            _ => None,
        };

        attach_price(&mut products[slot], price_id, unit, detail);
    }

    Ok(products)
}

fn attach_price(
    product: &mut Product,
    price_id: i64,
    unit: Option<String>,
    detail: Option<PriceDetail>,
) {
    if let Some(existing) = product.prices.iter_mut().find(|p| p.id == price_id) {
        if let Some(detail) = detail {
            if !existing.price_details.iter().any(|d| d.id == detail.id) {
                existing.price_details.push(detail);
            }
        }
        return;
    }

    // A price id without a unit is not a usable price entry.
    if let Some(unit) = unit {
        product.prices.push(Price {
            id: price_id,
            product_id: product.id,
            unit,
            price_details: detail.into_iter().collect(),
        });
    }
}

/// Keeps only products with at least one price detail in `tier`.
pub fn retain_tier(products: &mut Vec<Product>, tier: Tier) {
    products.retain(|p| p.has_tier(tier));
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Runs the filtered join and returns nested product aggregates.
///
/// An empty result is returned as an empty `Vec`; callers decide whether
/// that means "not found".
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if a stored category or tier is not a known variant.
pub async fn search_products(
    pool: &PgPool,
    filters: &SearchFilters,
) -> Result<Vec<Product>, DbError> {
    let query = SearchQuery::new(filters);
    let mut builder = query.builder();
    let rows = builder
        .build_query_as::<SearchRow>()
        .fetch_all(pool)
        .await?;
    let row_count = rows.len();

    let mut products = fold_rows(rows)?;
    if let Some(tier) = filters.tier {
        retain_tier(&mut products, tier);
    }

    tracing::debug!(
        unfiltered = filters.is_empty(),
        params = ?query.params(),
        rows = row_count,
        products = products.len(),
        "product search folded"
    );

    Ok(products)
}
