//! User profile types.

use serde::{Deserialize, Serialize};

/// Publicly visible profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// The user's nick.
    pub nick: String,
    /// Free-form profile description.
    #[serde(default)]
    pub description: String,
}

/// Profile record as kept by the profile repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    /// The user's nick (unique).
    pub nick: String,
    /// Argon2id hash of the user's password.
    pub password_hash: String,
    /// Free-form profile description.
    pub description: String,
}

/// Request body for registering a new profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProfileRequest {
    /// Desired nick.
    #[serde(default)]
    pub nick: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Optional profile description.
    #[serde(default)]
    pub description: String,
}

/// Request body for editing an existing profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditProfileRequest {
    /// New profile description.
    #[serde(default)]
    pub description: String,
}
