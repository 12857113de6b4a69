use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i64,
    pub src: String,
    /// Caption shown under the photo.
    pub alt: Option<String>,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub likes: i64,
    pub is_public: bool,
    pub upload_date: DateTime<Utc>,
}

impl Photo {
    pub fn caption(&self) -> &str {
        self.alt.as_deref().unwrap_or_default()
    }
}

/// Partial update; only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl PhotoPatch {
    pub fn visibility(is_public: bool) -> Self {
        PhotoPatch {
            is_public: Some(is_public),
            ..Default::default()
        }
    }

    pub fn caption(alt: impl Into<String>) -> Self {
        PhotoPatch {
            alt: Some(alt.into()),
            ..Default::default()
        }
    }
}
