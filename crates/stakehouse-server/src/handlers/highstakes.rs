use axum::extract::{rejection::PathRejection, Path, State};

use crate::error::ApiError;
use crate::response::{format_stakes, Envelope};
use crate::state::AppState;

/// GET /highstakes/{offerId}
pub async fn high_stakes(
    State(state): State<AppState>,
    offer_id: Result<Path<String>, PathRejection>,
) -> Result<Envelope, ApiError> {
    let Path(offer_id) = offer_id.map_err(|_| ApiError::invalid("offerId"))?;
    let records = state.ledger.top_stakes(&offer_id, state.top_k)?;
    Ok(Envelope::success(format_stakes(&records)))
}
