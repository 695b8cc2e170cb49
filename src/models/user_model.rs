//! models/user_model.rs
use serde::Deserialize;

/// Body de POST /api/users/fcm-token
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTokenRequest {
    pub user_id: Option<String>,
    pub token: Option<String>,
}
