//! User profile: bio, picture path, optional address, and the skills the
//! user chose to show on their profile.

use crate::error::{AppError, FieldErrors};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_PICTURE: &str = "profile_pics/default.jpg";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub bio: Option<String>,
    /// Path under the uploads directory, served from `/uploads`.
    pub profile_picture: String,
    pub address_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: String,
    pub country: String,
    pub city: String,
    pub post_code: String,
    pub street: String,
}

/// Profile with its address and linked skill ids resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub bio: Option<String>,
    pub profile_picture: String,
    pub address: Option<Address>,
    pub skill_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressRequest {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub post_code: String,
    #[serde(default)]
    pub street: String,
}

/// Payload for `PUT /api/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// The profile's address is replaced by this field on every PUT;
    /// None removes the stored address.
    #[serde(default)]
    pub address: Option<AddressRequest>,
    /// Skills shown on the profile; all must belong to the caller.
    #[serde(default)]
    pub skill_ids: Vec<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        if let Some(address) = &self.address {
            address.collect_errors(&mut errors);
        }

        errors.into_result()
    }
}

impl AddressRequest {
    fn collect_errors(&self, errors: &mut FieldErrors) {
        let fields = [
            ("country", &self.country, 50usize),
            ("city", &self.city, 50),
            ("post_code", &self.post_code, 10),
            ("street", &self.street, 50),
        ];
        for (name, value, max) in fields {
            if value.trim().is_empty() {
                errors.add(name, "This field is required");
            } else if value.chars().count() > max {
                errors.add(
                    name,
                    format!("Ensure this value has at most {max} characters"),
                );
            }
        }
    }
}
