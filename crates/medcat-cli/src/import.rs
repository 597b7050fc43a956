//! Bulk import command handler.
//!
//! Mirrors the admin bulk-add flow: parse the pasted text, validate every
//! draft, and only then write — the first invalid product rejects the whole
//! batch, so a partial import cannot happen.

use std::io::Read;

use medcat_core::{first_batch_error, BulkParser, ParseMode};

/// Reads block-formatted product text from `file` ('-' for stdin), parses
/// and validates it, and inserts one product per draft.
///
/// In strict mode a malformed block fails the import; otherwise it is
/// skipped with a warning. When `dry_run` is `true` the function prints what
/// would be created and returns without touching the database.
pub(crate) async fn run_import(
    pool: &sqlx::PgPool,
    file: &str,
    strict: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let text = read_input(file)?;

    let mode = if strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let report = BulkParser::new(mode).parse(&text)?;

    if report.drafts.is_empty() {
        anyhow::bail!("no valid products found; each product needs at least 9 lines");
    }

    if let Some(error) = first_batch_error(&report.drafts) {
        anyhow::bail!("{error}");
    }

    if dry_run {
        println!(
            "dry-run: would add {} products ({} blocks skipped):",
            report.drafts.len(),
            report.dropped.len()
        );
        for draft in &report.drafts {
            println!("  {} — {} (mrp {}, rate {})", draft.name, draft.company_name, draft.mrp, draft.rate);
        }
        return Ok(());
    }

    for draft in &report.drafts {
        let id = medcat_db::insert_product(pool, draft).await?;
        tracing::info!(id, name = %draft.name, "product added");
    }

    println!("{} products added successfully!", report.drafts.len());
    if !report.dropped.is_empty() {
        println!(
            "skipped {} malformed blocks: {}",
            report.dropped.len(),
            report
                .dropped
                .iter()
                .map(|d| d.index.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}

fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}
