//! Catalogue export command handler.

use std::path::Path;

use serde::Serialize;

/// One exported catalogue line; column order matches the printed catalogue.
#[derive(Debug, Serialize)]
struct CatalogueLine<'a> {
    no: usize,
    name: &'a str,
    company: &'a str,
    content: &'a str,
    mrp: String,
    rate: String,
}

/// Fetches the full catalogue (sorted by name) and writes it as CSV to
/// `output`, or to stdout when no path is given.
pub(crate) async fn run_export(pool: &sqlx::PgPool, output: Option<&Path>) -> anyhow::Result<()> {
    let rows = medcat_db::list_products(pool, medcat_db::ProductListFilters::default()).await?;

    match output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)?;
            write_lines(&mut writer, &rows)?;
            writer.flush()?;
            println!("exported {} products to {}", rows.len(), path.display());
        }
        None => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            write_lines(&mut writer, &rows)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn write_lines<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[medcat_db::ProductRow],
) -> Result<(), csv::Error> {
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
    Ok(())
}
