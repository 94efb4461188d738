pub mod channels;
pub mod comments;
pub mod health;
pub mod history;
pub mod likes;
pub mod subscriptions;
pub mod videos;

use crate::error::AppError;
use uuid::Uuid;

/// Parse a path-supplied identifier; malformed keys are rejected before
/// any storage access.
pub(crate) fn parse_id(value: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::InvalidId(format!("invalid {field}: {value}")))
}
