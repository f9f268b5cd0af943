//! Failure to response mapping

use crate::model::QueryResponse;
use std::error::Error;

/// Turn any failure into the canonical error response.
///
/// Never fails: when the cause renders to an empty message its `Debug` form is used.
pub fn map_error(cause: &(dyn Error + 'static)) -> QueryResponse {
    let message = cause.to_string();
    if message.trim().is_empty() {
        QueryResponse::error(&format!("{cause:?}"))
    } else {
        QueryResponse::error(&message)
    }
}
