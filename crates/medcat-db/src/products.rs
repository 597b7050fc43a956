//! Database operations for the `products` catalogue table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
///
/// Prices are `NUMERIC(10,2)` in the schema; draft-side `f64` values are
/// rounded to two decimal places at write time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub company_name: Option<String>,
    pub content: Option<String>,
    pub form: Option<String>,
    pub mg: Option<String>,
    pub mrp: Decimal,
    pub rate: Decimal,
    pub unit_of_sale: String,
    pub unit_name: String,
    pub image_url: Option<String>,
    /// Highlighted on the storefront with a badge.
    pub is_popular: bool,
    /// Packing counts used to expand box/strip orders into countable units.
    /// `NULL` for products without packing data; the order flow treats
    /// absence as 1.
    pub units_per_strip: Option<i32>,
    pub strips_per_box: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for the product list query.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListFilters<'a> {
    /// Case-insensitive substring match on product name or company name.
    pub q: Option<&'a str>,
    pub limit: Option<i64>,
}

// Drafts carry f64 prices (NAN for unparseable text); anything that survives
// validation is finite, but the boundary still refuses non-finite values
// rather than corrupting a NUMERIC column.
fn price_to_decimal(field: &str, value: f64) -> Result<Decimal, DbError> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| DbError::InvalidPrice {
            field: field.to_string(),
        })
}

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Inserts one product from a parsed draft and returns its database id.
///
/// The draft's locally derived `id` is dropped — the `BIGSERIAL` key the
/// database assigns is the durable identity.
///
/// # Errors
///
/// Returns [`DbError::InvalidPrice`] if `mrp` or `rate` is non-finite, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product(
    pool: &PgPool,
    draft: &medcat_core::ProductDraft,
) -> Result<i64, DbError> {
    let mrp = price_to_decimal("mrp", draft.mrp)?;
    let rate = price_to_decimal("rate", draft.rate)?;

    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
             (name, company_name, content, form, mg, mrp, rate, \
              unit_of_sale, unit_name, image_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id",
    )
    .bind(&draft.name)
    .bind(&draft.company_name)
    .bind(&draft.content)
    .bind(&draft.form)
    .bind(&draft.mg)
    .bind(mrp)
    .bind(rate)
    .bind(&draft.unit_of_sale)
    .bind(&draft.unit_name)
    .bind(&draft.image_url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Lists products ordered by name, optionally filtered by a search term.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    filters: ProductListFilters<'_>,
) -> Result<Vec<ProductRow>, DbError> {
    let limit = filters.limit.unwrap_or(i64::MAX);
    let pattern = filters.q.map(|q| format!("%{}%", escape_like(q)));

    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products \
         WHERE $1::text IS NULL \
            OR name ILIKE $1 \
            OR company_name ILIKE $1 \
         ORDER BY name ASC \
         LIMIT $2",
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetches a single product by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Replaces the editable fields of a product and bumps `updated_at`.
///
/// The edit form submits every field, so this is a full replace rather than
/// a sparse patch; packing counts are not part of the form and stay as
/// they are.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id,
/// [`DbError::InvalidPrice`] for non-finite prices, or [`DbError::Sqlx`] if
/// the update fails.
pub async fn update_product(
    pool: &PgPool,
    id: i64,
    draft: &medcat_core::ProductDraft,
    is_popular: bool,
) -> Result<(), DbError> {
    let mrp = price_to_decimal("mrp", draft.mrp)?;
    let rate = price_to_decimal("rate", draft.rate)?;

    let result = sqlx::query(
        "UPDATE products SET \
             name         = $2, \
             company_name = $3, \
             content      = $4, \
             form         = $5, \
             mg           = $6, \
             mrp          = $7, \
             rate         = $8, \
             unit_of_sale = $9, \
             unit_name    = $10, \
             image_url    = $11, \
             is_popular   = $12, \
             updated_at   = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.company_name)
    .bind(&draft.content)
    .bind(&draft.form)
    .bind(&draft.mg)
    .bind(mrp)
    .bind(rate)
    .bind(&draft.unit_of_sale)
    .bind(&draft.unit_name)
    .bind(&draft.image_url)
    .bind(is_popular)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes a product by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Escapes `%` and `_` so a user-supplied search term matches literally
/// inside an ILIKE pattern.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
