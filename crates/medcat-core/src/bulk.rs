//! Bulk text → [`ProductDraft`] parsing.
//!
//! Pasted catalogue text is a sequence of blocks separated by blank lines.
//! Within a block, lines map positionally onto [`PRODUCT_SCHEMA`]; the
//! optional tenth line is the image URL. Blocks with too few lines are
//! dropped (lenient) or fail the whole parse (strict); the mapping itself
//! never fails, prices that do not parse become `NAN` and are left for the
//! validation pass.

use serde::Serialize;
use thiserror::Error;

use crate::products::{derive_product_id, ProductDraft};

/// Positional field schema for a product block: line *i* of a block feeds
/// `PRODUCT_SCHEMA[i]`, and the optional line 10 is the image URL.
/// Reordering this table changes the paste-format contract.
const PRODUCT_SCHEMA: [BlockField; 9] = [
    BlockField::Name,
    BlockField::CompanyName,
    BlockField::Content,
    BlockField::Form,
    BlockField::Mg,
    BlockField::Mrp,
    BlockField::Rate,
    BlockField::UnitOfSale,
    BlockField::UnitName,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockField {
    Name,
    CompanyName,
    Content,
    Form,
    Mg,
    Mrp,
    Rate,
    UnitOfSale,
    UnitName,
}

impl BlockField {
    /// Writes one trimmed line into its slot, coercing price fields.
    fn apply(self, draft: &mut ProductDraft, line: &str) {
        match self {
            BlockField::Name => draft.name = line.to_owned(),
            BlockField::CompanyName => draft.company_name = line.to_owned(),
            BlockField::Content => draft.content = line.to_owned(),
            BlockField::Form => draft.form = line.to_owned(),
            BlockField::Mg => draft.mg = line.to_owned(),
            BlockField::Mrp => draft.mrp = coerce_price(line),
            BlockField::Rate => draft.rate = coerce_price(line),
            BlockField::UnitOfSale => draft.unit_of_sale = line.to_owned(),
            BlockField::UnitName => draft.unit_name = line.to_owned(),
        }
    }
}

/// Numeric coercion for price lines. Non-numeric text yields `NAN` rather
/// than an error; the validation pass reports it as "must be a valid number".
fn coerce_price(line: &str) -> f64 {
    line.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// How the parser treats a block with fewer than the required lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Drop the malformed block, record a diagnostic, keep parsing.
    #[default]
    Lenient,
    /// Fail the whole parse on the first malformed block.
    Strict,
}

/// Diagnostic for a block dropped in lenient mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedBlock {
    /// 1-based position of the block in the pasted text.
    pub index: usize,
    /// Line count the block had after trailing blank lines were stripped.
    pub lines: usize,
}

#[derive(Debug, Error)]
pub enum BulkParseError {
    #[error("product block {index} has {lines} lines; at least {min} are required")]
    ShortBlock {
        index: usize,
        lines: usize,
        min: usize,
    },
}

/// Outcome of a bulk parse: the drafts that mapped cleanly, in block order,
/// plus diagnostics for every block that was dropped.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub drafts: Vec<ProductDraft>,
    pub dropped: Vec<DroppedBlock>,
}

/// Block parser over pasted catalogue text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkParser {
    mode: ParseMode,
}

impl BulkParser {
    #[must_use]
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    /// Parses raw multi-line text into product drafts.
    ///
    /// Empty or whitespace-only input yields an empty report. Blocks are
    /// independent: a dropped block never affects how later blocks parse.
    ///
    /// # Errors
    ///
    /// In [`ParseMode::Strict`], returns [`BulkParseError::ShortBlock`] for
    /// the first block with fewer than the required lines. Lenient parses
    /// never fail.
    pub fn parse(&self, raw_text: &str) -> Result<ParseReport, BulkParseError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Ok(ParseReport::default());
        }

        let mut report = ParseReport::default();
        for (i, block) in split_blocks(trimmed).iter().enumerate() {
            let index = i + 1;
            match parse_block(block) {
                Ok(draft) => report.drafts.push(draft),
                Err(lines) => match self.mode {
                    ParseMode::Strict => {
                        return Err(BulkParseError::ShortBlock {
                            index,
                            lines,
                            min: PRODUCT_SCHEMA.len(),
                        });
                    }
                    ParseMode::Lenient => {
                        tracing::warn!(
                            block = index,
                            lines,
                            required = PRODUCT_SCHEMA.len(),
                            "skipping product block: missing required lines"
                        );
                        report.dropped.push(DroppedBlock { index, lines });
                    }
                },
            }
        }

        Ok(report)
    }
}

/// Lenient convenience parse: malformed blocks are dropped with a warning
/// and everything else is returned, matching the behavior the admin bulk-add
/// screen expects.
#[must_use]
pub fn parse_bulk_products(raw_text: &str) -> Vec<ProductDraft> {
    BulkParser::new(ParseMode::Lenient)
        .parse(raw_text)
        .map(|report| report.drafts)
        .unwrap_or_default()
}

/// Splits text into blocks on blank-line separators. A separator is any line
/// that is empty or whitespace-only; consecutive separators do not produce
/// empty blocks.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Maps one block's lines onto a draft. Returns the post-strip line count
/// when the block is too short.
fn parse_block(raw_lines: &[&str]) -> Result<ProductDraft, usize> {
    let mut lines: Vec<&str> = raw_lines.iter().map(|l| l.trim()).collect();

    // Strip trailing empty lines only; interior blanks are block separators
    // and never reach this point.
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    if lines.len() < PRODUCT_SCHEMA.len() {
        return Err(lines.len());
    }

    let mut draft = ProductDraft::default();
    for (field, line) in PRODUCT_SCHEMA.iter().zip(&lines) {
        field.apply(&mut draft, line);
    }
    // Line 10, when present, is the image URL. Anything past it is ignored.
    draft.image_url = lines.get(PRODUCT_SCHEMA.len()).map(|l| (*l).to_owned());
    draft.id = derive_product_id(&draft.name);

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NINE_LINE_BLOCK: &str = "Paracetamol\nACME\nTablet\nTablet\n500\n10\n8\nBox\nStrip";

    #[test]
    fn empty_input_yields_no_drafts() {
        assert!(parse_bulk_products("").is_empty());
    }

    #[test]
    fn whitespace_only_input_yields_no_drafts() {
        assert!(parse_bulk_products("  \n\t\n   ").is_empty());
    }

    #[test]
    fn nine_line_block_parses_with_null_image() {
        let drafts = parse_bulk_products(NINE_LINE_BLOCK);
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.id, "paracetamol");
        assert_eq!(draft.name, "Paracetamol");
        assert_eq!(draft.company_name, "ACME");
        assert_eq!(draft.content, "Tablet");
        assert_eq!(draft.form, "Tablet");
        assert_eq!(draft.mg, "500");
        assert_eq!(draft.mrp, 10.0);
        assert_eq!(draft.rate, 8.0);
        assert_eq!(draft.unit_of_sale, "Box");
        assert_eq!(draft.unit_name, "Strip");
        assert_eq!(draft.image_url, None);
    }

    #[test]
    fn tenth_line_becomes_image_url() {
        let text = format!("{NINE_LINE_BLOCK}\nhttp://x.com/a.png");
        let drafts = parse_bulk_products(&text);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].image_url.as_deref(), Some("http://x.com/a.png"));
    }

    #[test]
    fn eight_line_block_is_dropped() {
        let drafts = parse_bulk_products("A\nB\nC\nD\nE\nF\nG\nH");
        assert!(drafts.is_empty());
    }

    #[test]
    fn lines_beyond_the_tenth_are_ignored() {
        let text = format!("{NINE_LINE_BLOCK}\nhttp://x.com/a.png\nextra\nmore");
        let drafts = parse_bulk_products(&text);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].image_url.as_deref(), Some("http://x.com/a.png"));
    }

    #[test]
    fn blocks_split_on_blank_lines_with_whitespace() {
        let text = format!("{NINE_LINE_BLOCK}\n   \n{NINE_LINE_BLOCK}");
        let drafts = parse_bulk_products(&text);
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn multiple_consecutive_separators_do_not_create_blocks() {
        let text = format!("{NINE_LINE_BLOCK}\n\n\n\n{NINE_LINE_BLOCK}");
        let report = BulkParser::default().parse(&text).unwrap();
        assert_eq!(report.drafts.len(), 2);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn dropped_block_does_not_abort_later_blocks() {
        let text = format!("too\nshort\n\n{NINE_LINE_BLOCK}");
        let report = BulkParser::new(ParseMode::Lenient).parse(&text).unwrap();
        assert_eq!(report.drafts.len(), 1);
        assert_eq!(report.dropped, vec![DroppedBlock { index: 1, lines: 2 }]);
        assert_eq!(report.drafts[0].name, "Paracetamol");
    }

    #[test]
    fn dropped_block_index_is_one_based_and_in_input_order() {
        let text = format!("{NINE_LINE_BLOCK}\n\nshort\n\n{NINE_LINE_BLOCK}\n\nalso\nshort");
        let report = BulkParser::default().parse(&text).unwrap();
        assert_eq!(report.drafts.len(), 2);
        assert_eq!(
            report.dropped,
            vec![
                DroppedBlock { index: 2, lines: 1 },
                DroppedBlock { index: 4, lines: 2 },
            ]
        );
    }

    #[test]
    fn strict_mode_fails_on_first_short_block() {
        let text = format!("{NINE_LINE_BLOCK}\n\nshort");
        let err = BulkParser::new(ParseMode::Strict)
            .parse(&text)
            .expect_err("expected strict parse to fail");
        assert!(matches!(
            err,
            BulkParseError::ShortBlock {
                index: 2,
                lines: 1,
                min: 9
            }
        ));
    }

    #[test]
    fn strict_mode_accepts_clean_input() {
        let text = format!("{NINE_LINE_BLOCK}\n\n{NINE_LINE_BLOCK}");
        let report = BulkParser::new(ParseMode::Strict).parse(&text).unwrap();
        assert_eq!(report.drafts.len(), 2);
    }

    #[test]
    fn lines_are_trimmed() {
        let text = "  Paracetamol  \n\tACME\nTablet\nTablet\n500\n 10 \n 8\nBox\nStrip";
        let drafts = parse_bulk_products(text);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Paracetamol");
        assert_eq!(drafts[0].company_name, "ACME");
        assert_eq!(drafts[0].mrp, 10.0);
    }

    #[test]
    fn non_numeric_price_becomes_nan() {
        let text = "Paracetamol\nACME\nTablet\nTablet\n500\nten\n8\nBox\nStrip";
        let drafts = parse_bulk_products(text);
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].mrp.is_nan());
        assert_eq!(drafts[0].rate, 8.0);
    }

    #[test]
    fn decimal_prices_parse() {
        let text = "Syrup X\nACME\nCough syrup\nSyrup\n100ml\n99.50\n80.25\nBottle\nBottle";
        let drafts = parse_bulk_products(text);
        assert_eq!(drafts[0].mrp, 99.50);
        assert_eq!(drafts[0].rate, 80.25);
    }

    #[test]
    fn id_is_derived_from_name() {
        let text = "Cold Relief Max\nACME\nMix\nTablet\n500\n10\n8\nBox\nStrip";
        let drafts = parse_bulk_products(text);
        assert_eq!(drafts[0].id, "coldreliefmax");
    }

    #[test]
    fn block_count_matches_well_formed_blocks() {
        let good = NINE_LINE_BLOCK;
        let text = format!("{good}\n\nshort\nblock\n\n{good}\n\n{good}");
        let drafts = parse_bulk_products(&text);
        assert_eq!(drafts.len(), 3);
    }

    #[test]
    fn same_input_parses_identically() {
        let text = format!("{NINE_LINE_BLOCK}\n\nshort\n\n{NINE_LINE_BLOCK}");
        let a = BulkParser::default().parse(&text).unwrap();
        let b = BulkParser::default().parse(&text).unwrap();
        assert_eq!(a.drafts.len(), b.drafts.len());
        assert_eq!(a.dropped, b.dropped);
        for (x, y) in a.drafts.iter().zip(&b.drafts) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.name, y.name);
        }
    }

    #[test]
    fn reserializing_a_draft_reparses_to_the_same_draft() {
        let drafts = parse_bulk_products(NINE_LINE_BLOCK);
        let d = &drafts[0];
        let rendered = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}",
            d.name, d.company_name, d.content, d.form, d.mg, d.mrp, d.rate, d.unit_of_sale, d.unit_name
        );
        let again = parse_bulk_products(&rendered);
        assert_eq!(again.len(), 1);
        let e = &again[0];
        assert_eq!(e.id, d.id);
        assert_eq!(e.name, d.name);
        assert_eq!(e.company_name, d.company_name);
        assert_eq!(e.content, d.content);
        assert_eq!(e.form, d.form);
        assert_eq!(e.mg, d.mg);
        assert_eq!(e.mrp, d.mrp);
        assert_eq!(e.rate, d.rate);
        assert_eq!(e.unit_of_sale, d.unit_of_sale);
        assert_eq!(e.unit_name, d.unit_name);
        assert_eq!(e.image_url, d.image_url);
    }
}
