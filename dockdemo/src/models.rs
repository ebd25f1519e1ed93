use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, garde::Validate)]
pub struct CreateUserRequest {
    #[garde(length(chars, min = 1, max = 100))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[serde(default)]
    #[garde(range(max = 150))]
    pub age: Option<u32>,
}

/// Full replacement of a user's editable fields.
#[derive(Clone, Debug, Serialize, Deserialize, garde::Validate)]
pub struct UpdateUserRequest {
    #[garde(length(chars, min = 1, max = 100))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[serde(default)]
    #[garde(range(max = 150))]
    pub age: Option<u32>,
}

/// Partial update: absent fields keep their current value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, garde::Validate)]
pub struct PatchUserRequest {
    #[serde(default)]
    #[garde(length(chars, min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default)]
    #[garde(email)]
    pub email: Option<String>,
    /// `None` keeps the age, `Some(None)` (an explicit `null`) clears it.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[garde(custom(age_in_range))]
    pub age: Option<Option<u32>>,
}

/// Maps a present field, `null` included, to `Some`; absent fields fall
/// back to `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn age_in_range(value: &Option<Option<u32>>, _ctx: &()) -> garde::Result {
    match value {
        Some(Some(age)) if *age > 150 => Err(garde::Error::new("greater than 150")),
        _ => Ok(()),
    }
}
