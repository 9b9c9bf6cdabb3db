use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
};
use stakehouse_core::Amount;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;

/// POST /stake/{offerId}?sessionkey={token}
///
/// Body is a bare integer. Checks run in order: offer id, session key, body,
/// then token resolution. Extractor rejections (bad percent-encoding, an
/// oversized body) fold into the same failures. On success the amount is
/// echoed back whether or not it beat the user's previous stake.
pub async fn submit_stake(
    State(state): State<AppState>,
    offer_id: Result<Path<String>, PathRejection>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Envelope, ApiError> {
    let Path(offer_id) = offer_id.map_err(|_| ApiError::invalid("offerId"))?;
    if offer_id.is_empty() {
        return Err(ApiError::missing("offerId"));
    }
    let Query(params) = params.map_err(|_| ApiError::invalid("sessionkey"))?;
    let token = params
        .get("sessionkey")
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::missing("sessionkey"))?;
    let amount = body
        .ok()
        .and_then(|b| parse_amount(&b))
        .ok_or_else(|| ApiError::invalid("stake amount"))?;

    let user_id = state.sessions.resolve(token)?;
    state.ledger.submit(&offer_id, &user_id, amount)?;
    Ok(Envelope::success(amount.to_string()))
}

fn parse_amount(body: &[u8]) -> Option<Amount> {
    std::str::from_utf8(body).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(b"50"), Some(50));
        assert_eq!(parse_amount(b" -7\n"), Some(-7));
        assert_eq!(parse_amount(b"0"), Some(0));
        assert_eq!(parse_amount(b""), None);
        assert_eq!(parse_amount(b"12.5"), None);
        assert_eq!(parse_amount(b"abc"), None);
        assert_eq!(parse_amount(b"99999999999999999999"), None);
        assert_eq!(parse_amount(&[0xff, 0xfe]), None);
    }
}
