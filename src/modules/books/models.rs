use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHORS: &str = "Unknown";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_THUMBNAIL: &str = "https://via.placeholder.com/128x190.png?text=No+Image";

/// A Google Books volume reduced to what the search page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookResult {
    pub title: String,
    /// Comma-joined author names; "Unknown" only when `authors` is absent
    pub authors: String,
    pub description: String,
    /// Empty when the volume has `imageLinks` but no `thumbnail`
    pub thumbnail: String,
}

/// Result of one search: matching books, the echoed query, and a
/// user-facing message when the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub books: Vec<BookResult>,
    pub query: String,
    pub error: Option<String>,
}

impl SearchOutcome {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn failed(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

/// `volumeInfo` is required; an item without it fails the whole response.
#[derive(Debug, Deserialize)]
pub(crate) struct Volume {
    #[serde(rename = "volumeInfo")]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl From<VolumeInfo> for BookResult {
    fn from(info: VolumeInfo) -> Self {
        let authors = info
            .authors
            .map(|authors| authors.join(", "))
            .unwrap_or_else(|| UNKNOWN_AUTHORS.to_string());

        Self {
            title: info.title.unwrap_or_default(),
            authors,
            description: info
                .description
                .filter(|description| !description.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            thumbnail: info
                .image_links
                .map(|links| links.thumbnail.unwrap_or_default())
                .unwrap_or_else(|| NO_THUMBNAIL.to_string()),
        }
    }
}

impl VolumesResponse {
    pub fn into_books(self) -> Vec<BookResult> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(|volume| volume.volume_info.into())
            .collect()
    }
}
