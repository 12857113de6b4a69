use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::photo::Photo;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub is_public: bool,
    #[serde(default)]
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Album {
    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn likes(&self) -> i64 {
        self.photos.iter().map(|photo| photo.likes).sum()
    }

    /// Most recent change, for "updated N ago" labels.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.updated_at.max(self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewAlbum {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewAlbum {
    pub fn titled(title: impl Into<String>) -> Self {
        NewAlbum {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AlbumPatch {
    pub fn visibility(is_public: bool) -> Self {
        AlbumPatch {
            is_public: Some(is_public),
            ..Default::default()
        }
    }
}
