use serde::{Deserialize, Serialize};

/// A product record parsed from one block of pasted catalogue text,
/// before validation and persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Locally derived key: lowercased name with all whitespace removed.
    /// Not guaranteed unique — collisions are left unresolved here, and the
    /// database assigns the durable id on insert.
    pub id: String,
    pub name: String,
    pub company_name: String,
    /// Composition line, e.g. `"Paracetamol"`.
    pub content: String,
    /// Dosage form, e.g. `"Tablet"`, `"Syrup"`.
    pub form: String,
    /// Strength or volume as free text, e.g. `"500"`, `"100ml"`.
    pub mg: String,
    /// Printed retail price. `NAN` when the source line was not numeric;
    /// that is flagged by the validation pass, not at parse time.
    pub mrp: f64,
    /// Distributor rate. Same `NAN` convention as `mrp`.
    pub rate: f64,
    /// Unit a customer orders in, e.g. `"Box"`, `"Strip"`.
    pub unit_of_sale: String,
    /// Smallest countable unit, e.g. `"Tablet"`.
    pub unit_name: String,
    pub image_url: Option<String>,
}

/// Derive the local draft key from a product name: lowercase, with every
/// whitespace run removed.
#[must_use]
pub fn derive_product_id(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_id_lowercases() {
        assert_eq!(derive_product_id("Paracetamol"), "paracetamol");
    }

    #[test]
    fn derive_id_removes_interior_whitespace() {
        assert_eq!(derive_product_id("Cold Relief Max"), "coldreliefmax");
    }

    #[test]
    fn derive_id_removes_tabs_and_runs() {
        assert_eq!(derive_product_id("  A\t B  C "), "abc");
    }

    #[test]
    fn derive_id_of_empty_name_is_empty() {
        assert_eq!(derive_product_id(""), "");
    }

    #[test]
    fn draft_serde_roundtrip() {
        let draft = ProductDraft {
            id: "paracetamol".to_string(),
            name: "Paracetamol".to_string(),
            company_name: "ACME".to_string(),
            content: "Paracetamol".to_string(),
            form: "Tablet".to_string(),
            mg: "500".to_string(),
            mrp: 10.0,
            rate: 8.0,
            unit_of_sale: "Box".to_string(),
            unit_name: "Strip".to_string(),
            image_url: Some("https://x.com/a.png".to_string()),
        };
        let json = serde_json::to_string(&draft).expect("serialization failed");
        let decoded: ProductDraft = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded.id, draft.id);
        assert_eq!(decoded.name, draft.name);
        assert_eq!(decoded.mrp, draft.mrp);
        assert_eq!(decoded.image_url, draft.image_url);
    }
}
