pub mod validation;

pub use validation::{validate_email, validate_postal_code, validate_state};
