use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use medcat_core::{derive_product_id, validate_product_form, ProductDraft};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    id: i64,
    name: String,
    company_name: Option<String>,
    content: Option<String>,
    form: Option<String>,
    mg: Option<String>,
    mrp: Decimal,
    rate: Decimal,
    unit_of_sale: String,
    unit_name: String,
    image_url: Option<String>,
    is_popular: bool,
    units_per_strip: Option<i32>,
    strips_per_box: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<medcat_db::ProductRow> for ProductItem {
    fn from(row: medcat_db::ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            company_name: row.company_name,
            content: row.content,
            form: row.form,
            mg: row.mg,
            mrp: row.mrp,
            rate: row.rate,
            unit_of_sale: row.unit_of_sale,
            unit_name: row.unit_name,
            image_url: row.image_url,
            is_popular: row.is_popular,
            units_per_strip: row.units_per_strip,
            strips_per_box: row.strips_per_box,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    /// Case-insensitive substring search over name and company name — the
    /// same live search the admin edit screen runs.
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// Fields an admin submits for a single product, for create and update
/// alike. The edit form submits every field, so updates are full replaces.
#[derive(Debug, Deserialize)]
pub(super) struct ProductBody {
    pub name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub mg: String,
    pub mrp: f64,
    pub rate: f64,
    pub unit_of_sale: String,
    pub unit_name: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_popular: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateProductResponse {
    pub id: i64,
}

impl ProductBody {
    /// Shapes the body as a draft so it runs through the same validation as
    /// bulk-imported text.
    fn into_draft(self) -> (ProductDraft, bool) {
        let is_popular = self.is_popular;
        let draft = ProductDraft {
            id: derive_product_id(&self.name),
            name: self.name,
            company_name: self.company_name,
            content: self.content,
            form: self.form,
            mg: self.mg,
            mrp: self.mrp,
            rate: self.rate,
            unit_of_sale: self.unit_of_sale,
            unit_name: self.unit_name,
            image_url: self.image_url,
        };
        (draft, is_popular)
    }
}

fn validated_draft(req_id: &str, body: ProductBody) -> Result<(ProductDraft, bool), ApiError> {
    let (draft, is_popular) = body.into_draft();
    let outcome = validate_product_form(&draft);
    if let Some(first_error) = outcome.first_error() {
        return Err(ApiError::new(req_id, "validation_error", first_error));
    }
    Ok((draft, is_popular))
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let rows = medcat_db::list_products(
        &state.pool,
        medcat_db::ProductListFilters {
            q: query.q.as_deref(),
            limit: Some(normalize_limit(query.limit)),
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(ProductItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let row = medcat_db::get_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "product not found"))?;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/products — create a single product.
pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<ApiResponse<CreateProductResponse>>), ApiError> {
    let (draft, _) = validated_draft(&req_id.0, body)?;

    let id = medcat_db::insert_product(&state.pool, &draft)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreateProductResponse { id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/products/{id} — replace a product's editable fields.
pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(body): Json<ProductBody>,
) -> Result<Json<ApiResponse<ProductItem>>, ApiError> {
    let (draft, is_popular) = validated_draft(&req_id.0, body)?;

    medcat_db::update_product(&state.pool, id, &draft, is_popular)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let row = medcat_db::get_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "product not found"))?;

    Ok(Json(ApiResponse {
        data: ProductItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/products/{id}
pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    medcat_db::delete_product(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(StatusCode::NO_CONTENT)
}
