use bookshelf_types::general::{non_empty, optional_url, valid_date};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// Create and update payload.
///
/// Absent fields decode as empty strings, so a missing required field is
/// reported by validation together with all other violations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct BookForm {
    #[garde(custom(non_empty), length(chars, max = 255))]
    pub title: String,

    #[garde(custom(non_empty), length(chars, max = 255), pattern(r"^[A-Za-z ]*$"))]
    pub author: String,

    /// `YYYY-MM-DD`
    #[garde(custom(valid_date))]
    pub published_date: String,

    #[garde(custom(optional_url))]
    pub image_url: String,

    #[garde(skip)]
    pub description: String,
}
