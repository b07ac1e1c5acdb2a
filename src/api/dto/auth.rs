/*
 * Responsibility
 * - GET /auth の response DTO
 * - `response` には HTTP status と同じ値を入れる
 */
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub response: u16,
}

impl From<StatusCode> for AuthResponse {
    fn from(status: StatusCode) -> Self {
        Self {
            response: status.as_u16(),
        }
    }
}
