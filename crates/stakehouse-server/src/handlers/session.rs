use axum::extract::{rejection::PathRejection, Path, State};

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;

/// GET /session/{userId}
pub async fn issue_session(
    State(state): State<AppState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<Envelope, ApiError> {
    let Path(user_id) = user_id.map_err(|_| ApiError::invalid("userId"))?;
    let session = state.sessions.issue_or_reuse(&user_id)?;
    Ok(Envelope::success(session.token))
}
