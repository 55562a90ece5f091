use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input validation failures. These are recovered locally and surfaced
/// inline next to the form; they never reach the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("product name is required")]
    EmptyName,

    #[error("quantity must be a whole number")]
    InvalidQuantity,

    #[error("price must be a valid number")]
    InvalidPrice,

    #[error("size must be a valid number")]
    InvalidSize,

    /// Raised when every numeric field parses but at least one is negative.
    /// Parse errors are checked first, so this never masks them.
    #[error("values cannot be negative")]
    NegativeValue,

    #[error("unknown category: {0}")]
    InvalidCategory(String),

    /// Only raised when the gender-required policy is enabled.
    #[error("gender is required")]
    MissingGender,
}

/// Failures surfaced by the remote product gateway. All operations return
/// one of these rather than panicking across the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GatewayError {
    /// Single-product fetch failed; renders the distinct "not found" view.
    #[error("product {0} not found")]
    NotFound(String),

    /// The server answered with a non-2xx status. `detail` carries the
    /// body's error message when present, else the HTTP status text.
    #[error("request rejected ({status}): {detail}")]
    RemoteRejected { status: u16, detail: String },

    /// Connect, timeout, or decode failure below the HTTP layer. Consumers
    /// surface this exactly like `RemoteRejected`.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("gateway configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Message shown to the user via the notification channel.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NotFound(sku) => format!("Product {} not found", sku),
            GatewayError::RemoteRejected { detail, .. } => detail.clone(),
            GatewayError::Transport(_) => {
                "The server could not be reached. Please try again.".to_string()
            }
            GatewayError::Config(detail) => detail.clone(),
        }
    }
}

/// Either side of a form submission failure, attached to the `Idle` state
/// so the user can correct and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] GatewayError),
}
