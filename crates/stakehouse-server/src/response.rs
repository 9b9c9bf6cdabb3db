//! Response envelope
//!
//! Every endpoint except `/health` answers `{"status": bool, "data": string}`.
//! The HTTP status is 200 either way; callers branch on `status`.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stakehouse_core::StakeRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: bool,
    pub data: String,
}

impl Envelope {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            status: true,
            data: data.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: message.into(),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `user=amount` pairs joined by commas, in the order given.
pub fn format_stakes(records: &[StakeRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}={}", r.user_id, r.amount))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_string(&Envelope::success("abc")).unwrap();
        assert_eq!(json, r#"{"status":true,"data":"abc"}"#);

        let json = serde_json::to_string(&Envelope::failure("bad \"input\"")).unwrap();
        assert_eq!(json, r#"{"status":false,"data":"bad \"input\""}"#);
    }

    #[test]
    fn test_format_stakes() {
        let records = vec![
            StakeRecord { user_id: "carol".into(), amount: 70 },
            StakeRecord { user_id: "dave".into(), amount: -60 },
        ];
        assert_eq!(format_stakes(&records), "carol=70,dave=-60");
        assert_eq!(format_stakes(&[]), "");
    }
}
