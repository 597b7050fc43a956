//! Catalogue export as a downloadable CSV document.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

/// One exported catalogue line. Column order matches the printed catalogue:
/// running number, name, company, content, then prices.
#[derive(Debug, Serialize)]
struct CatalogueLine<'a> {
    no: usize,
    name: &'a str,
    company: &'a str,
    content: &'a str,
    mrp: String,
    rate: String,
}

pub(super) fn render_catalogue_csv(rows: &[medcat_db::ProductRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for (i, row) in rows.iter().enumerate() {
        writer.serialize(CatalogueLine {
            no: i + 1,
            name: &row.name,
            company: row.company_name.as_deref().unwrap_or(""),
            content: row.content.as_deref().unwrap_or(""),
            mrp: row.mrp.to_string(),
            rate: row.rate.to_string(),
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

/// GET /api/v1/export/catalogue.csv — the whole catalogue, sorted by name,
/// as a `text/csv` attachment.
pub(super) async fn export_catalogue_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let rows = medcat_db::list_products(&state.pool, medcat_db::ProductListFilters::default())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let body = render_catalogue_csv(&rows).map_err(|e| {
        tracing::error!(error = %e, "catalogue CSV rendering failed");
        ApiError::new(req_id.0.clone(), "internal_error", "catalogue export failed")
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"catalogue.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn make_row(id: i64, name: &str, company: Option<&str>) -> medcat_db::ProductRow {
        medcat_db::ProductRow {
            id,
            name: name.to_string(),
            company_name: company.map(ToOwned::to_owned),
            content: Some("Paracetamol".to_string()),
            form: Some("Tablet".to_string()),
            mg: Some("500".to_string()),
            mrp: Decimal::new(1000, 2),
            rate: Decimal::new(800, 2),
            unit_of_sale: "Box".to_string(),
            unit_name: "Strip".to_string(),
            image_url: None,
            is_popular: false,
            units_per_strip: None,
            strips_per_box: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_header_and_numbered_rows() {
        let rows = vec![
            make_row(1, "Calpol", Some("GSK")),
            make_row(2, "Dolo 650", Some("Micro Labs")),
        ];
        let bytes = render_catalogue_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("no,name,company,content,mrp,rate"));
        assert_eq!(lines.next(), Some("1,Calpol,GSK,Paracetamol,10.00,8.00"));
        assert_eq!(
            lines.next(),
            Some("2,Dolo 650,Micro Labs,Paracetamol,10.00,8.00")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn missing_company_renders_empty_column() {
        let bytes = render_catalogue_csv(&[make_row(1, "Calpol", None)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("1,Calpol,,"));
    }

    #[test]
    fn empty_catalogue_renders_nothing_but_is_not_an_error() {
        let bytes = render_catalogue_csv(&[]).unwrap();
        assert!(bytes.is_empty());
    }
}
