//! Storefront order-message endpoint.
//!
//! The browser keeps the selection; this endpoint turns it into the
//! WhatsApp message and deep link, using each product's packing data to
//! expand box/strip quantities into countable units.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use medcat_core::{Cart, Packing};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderMessageResponse {
    pub message: String,
    pub whatsapp_url: String,
    pub item_count: usize,
}

/// POST /api/v1/orders/message — build the order text for the selected
/// products.
pub(super) async fn build_order_message(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<OrderRequest>,
) -> Result<Json<ApiResponse<OrderMessageResponse>>, ApiError> {
    let rid = &req_id.0;

    if body.items.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "No products selected."));
    }

    let mut cart = Cart::new();
    for item in &body.items {
        let row = medcat_db::get_product(&state.pool, item.product_id)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?
            .ok_or_else(|| {
                ApiError::new(
                    rid,
                    "not_found",
                    format!("product {} not found", item.product_id),
                )
            })?;

        let packing = Packing {
            unit_of_sale: row.unit_of_sale,
            unit_name: row.unit_name,
            units_per_strip: row.units_per_strip.and_then(|n| u32::try_from(n).ok()),
            strips_per_box: row.strips_per_box.and_then(|n| u32::try_from(n).ok()),
        };
        cart.select(&row.name, packing);
        cart.set_quantity(&row.name, item.quantity);
    }

    let message = cart.order_message();
    let whatsapp_url = cart.whatsapp_url(&state.config.whatsapp_number);

    Ok(Json(ApiResponse {
        data: OrderMessageResponse {
            message,
            whatsapp_url,
            item_count: cart.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
