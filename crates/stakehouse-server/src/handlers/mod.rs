pub mod health;
pub mod highstakes;
pub mod session;
pub mod stake;

use crate::error::ApiError;

pub async fn missing_user_id() -> ApiError {
    ApiError::missing("userId")
}

pub async fn missing_offer_id() -> ApiError {
    ApiError::missing("offerId")
}

pub async fn wrong_method() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
