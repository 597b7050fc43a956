//! Session-scoped order cart and order-message construction.
//!
//! The storefront keeps one cart per browsing session. The cart is an
//! explicit value handed to whatever owns the session — there is no
//! process-wide selection state.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Characters left unescaped in the WhatsApp deep-link text, mirroring
/// JavaScript's `encodeURIComponent`.
const ORDER_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Packing shape of a product as it is ordered from the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packing {
    pub unit_of_sale: String,
    pub unit_name: String,
    pub units_per_strip: Option<u32>,
    pub strips_per_box: Option<u32>,
}

/// Expands an order quantity into the smallest countable units: a box is
/// `strips_per_box × units_per_strip`, a strip is `units_per_strip`, and any
/// other unit of sale counts 1:1. Missing packing counts default to 1.
#[must_use]
pub fn total_units(packing: &Packing, quantity: u32) -> u32 {
    let per_strip = packing.units_per_strip.unwrap_or(1);
    let per_box = packing.strips_per_box.unwrap_or(1);
    match packing.unit_of_sale.as_str() {
        "Box" => quantity * per_box * per_strip,
        "Strip" => quantity * per_strip,
        _ => quantity,
    }
}

/// One selected product in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_name: String,
    pub packing: Packing,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn total_units(&self) -> u32 {
        total_units(&self.packing, self.quantity)
    }
}

/// The products a customer has selected, in selection order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Selects a product with quantity 1. Re-selecting a product resets its
    /// quantity, matching the checkbox behavior on the storefront.
    pub fn select(&mut self, product_name: &str, packing: Packing) {
        self.deselect(product_name);
        self.items.push(CartItem {
            product_name: product_name.to_owned(),
            packing,
            quantity: 1,
        });
    }

    pub fn deselect(&mut self, product_name: &str) {
        self.items.retain(|item| item.product_name != product_name);
    }

    /// Sets the quantity for a selected product, floored at 1. Products not
    /// in the cart are ignored.
    pub fn set_quantity(&mut self, product_name: &str, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_name == product_name)
        {
            item.quantity = quantity.max(1);
        }
    }

    /// Renders the order as the WhatsApp message text. Each line names the
    /// product and ordered quantity; a total-units suffix is added only when
    /// the unit of sale differs from the unit name (ignoring case), so
    /// "1 Bottle (1 Bottle(s))" noise never appears.
    #[must_use]
    pub fn order_message(&self) -> String {
        let mut message = String::from("Hello MedsWell! I would like to place an order for:\n\n");

        for item in &self.items {
            let total_text = if item.packing.unit_of_sale.to_lowercase()
                != item.packing.unit_name.to_lowercase()
            {
                format!(" ({} {}(s))", item.total_units(), item.packing.unit_name)
            } else {
                String::new()
            };
            message.push_str(&format!(
                "- {}: {} {}(s){}\n",
                item.product_name, item.quantity, item.packing.unit_of_sale, total_text
            ));
        }

        message
    }

    /// The `wa.me` deep link that opens a chat pre-filled with the order.
    #[must_use]
    pub fn whatsapp_url(&self, phone_number: &str) -> String {
        format!(
            "https://wa.me/{phone_number}?text={}",
            utf8_percent_encode(&self.order_message(), ORDER_TEXT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_packing() -> Packing {
        Packing {
            unit_of_sale: "Box".to_string(),
            unit_name: "Tablet".to_string(),
            units_per_strip: Some(10),
            strips_per_box: Some(5),
        }
    }

    fn bottle_packing() -> Packing {
        Packing {
            unit_of_sale: "Bottle".to_string(),
            unit_name: "Bottle".to_string(),
            units_per_strip: None,
            strips_per_box: None,
        }
    }

    #[test]
    fn box_quantity_expands_through_strips() {
        assert_eq!(total_units(&box_packing(), 2), 100);
    }

    #[test]
    fn strip_quantity_expands_through_units_per_strip() {
        let packing = Packing {
            unit_of_sale: "Strip".to_string(),
            unit_name: "Tablet".to_string(),
            units_per_strip: Some(10),
            strips_per_box: None,
        };
        assert_eq!(total_units(&packing, 3), 30);
    }

    #[test]
    fn missing_packing_counts_default_to_one() {
        let packing = Packing {
            unit_of_sale: "Box".to_string(),
            unit_name: "Tablet".to_string(),
            units_per_strip: None,
            strips_per_box: None,
        };
        assert_eq!(total_units(&packing, 4), 4);
    }

    #[test]
    fn other_units_count_one_to_one() {
        assert_eq!(total_units(&bottle_packing(), 7), 7);
    }

    #[test]
    fn select_adds_with_quantity_one() {
        let mut cart = Cart::new();
        cart.select("Paracetamol", box_packing());
        assert_eq!(cart.len(), 1);
        let item = cart.items().next().unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn reselect_resets_quantity() {
        let mut cart = Cart::new();
        cart.select("Paracetamol", box_packing());
        cart.set_quantity("Paracetamol", 9);
        cart.select("Paracetamol", box_packing());
        assert_eq!(cart.items().next().unwrap().quantity, 1);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn deselect_removes() {
        let mut cart = Cart::new();
        cart.select("Paracetamol", box_packing());
        cart.deselect("Paracetamol");
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_floors_at_one() {
        let mut cart = Cart::new();
        cart.select("Paracetamol", box_packing());
        cart.set_quantity("Paracetamol", 0);
        assert_eq!(cart.items().next().unwrap().quantity, 1);
    }

    #[test]
    fn set_quantity_ignores_unselected_products() {
        let mut cart = Cart::new();
        cart.set_quantity("Ghost", 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn order_message_lists_items_in_selection_order() {
        let mut cart = Cart::new();
        cart.select("Paracetamol", box_packing());
        cart.select("Cough Syrup", bottle_packing());
        cart.set_quantity("Paracetamol", 2);

        let message = cart.order_message();
        assert!(message.starts_with("Hello MedsWell! I would like to place an order for:\n\n"));
        let para = message.find("Paracetamol").unwrap();
        let syrup = message.find("Cough Syrup").unwrap();
        assert!(para < syrup);
        assert!(message.contains("- Paracetamol: 2 Box(s) (100 Tablet(s))\n"));
    }

    #[test]
    fn order_message_omits_total_when_units_match() {
        let mut cart = Cart::new();
        cart.select("Cough Syrup", bottle_packing());
        assert!(cart.order_message().contains("- Cough Syrup: 1 Bottle(s)\n"));
        assert!(!cart.order_message().contains("Bottle(s) ("));
    }

    #[test]
    fn whatsapp_url_percent_encodes_the_message() {
        let mut cart = Cart::new();
        cart.select("Paracetamol", box_packing());
        let url = cart.whatsapp_url("919904685222");
        assert!(url.starts_with("https://wa.me/919904685222?text=Hello%20MedsWell!"));
        assert!(!url.contains('\n'));
        assert!(url.contains("%0A"));
    }
}
