use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for profile updates. Absent fields are no-ops.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub old_password: Option<String>,
}

/// Response returned after a profile update.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
