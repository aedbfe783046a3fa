use serde::{Deserialize, Serialize};

/// Book as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookDto {
    pub id: String,
    pub title: String,
    // Capitalized key is part of the published wire format
    #[serde(rename = "Author")]
    pub author: String,
    pub published_date: String,
    pub image_url: String,
    pub description: String,
}
