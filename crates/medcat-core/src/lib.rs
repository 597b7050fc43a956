use thiserror::Error;

pub mod app_config;
pub mod bulk;
pub mod config;
pub mod orders;
pub mod products;
pub mod validation;

pub use app_config::{AppConfig, Environment};
pub use bulk::{parse_bulk_products, BulkParseError, BulkParser, DroppedBlock, ParseMode, ParseReport};
pub use config::{load_app_config, load_app_config_from_env};
pub use orders::{total_units, Cart, CartItem, Packing};
pub use products::{derive_product_id, ProductDraft};
pub use validation::{
    first_batch_error, is_empty, is_valid_email, is_valid_url, validate_form, validate_login_form,
    validate_number_fields, validate_product_form, validate_required_fields, validate_url_fields,
    FieldLookup, FieldValue, LoginValidation, ValidationOutcome, ValidationRules,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
