use tracing::error;

use crate::client::ApiClient;
use crate::models::{Album, Photo};
use crate::services::albums;

/// Home page: the albums visitors may browse.
#[derive(Debug, Default)]
pub struct GalleryView {
    pub albums: Vec<Album>,
    pub error: Option<String>,
}

impl GalleryView {
    pub async fn load(&mut self, client: &ApiClient) {
        match albums::list(client).await {
            Ok(albums) => {
                self.albums = albums.into_iter().filter(|album| album.is_public).collect();
                self.error = None;
            }
            Err(err) => {
                error!("Could not load gallery: {}", err);
                self.error = Some(err.message());
            }
        }
    }
}

/// One public album with a lightbox over its photos.
#[derive(Debug)]
pub struct AlbumViewer {
    pub album_id: i64,
    pub title: String,
    pub photos: Vec<Photo>,
    /// Index into `photos` of the photo shown full size.
    pub open: Option<usize>,
    pub error: Option<String>,
}

impl AlbumViewer {
    pub fn new(album_id: i64) -> Self {
        AlbumViewer {
            album_id,
            title: "Album".to_string(),
            photos: Vec::new(),
            open: None,
            error: None,
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        match albums::get(client, self.album_id).await {
            Ok(album) => {
                self.title = album.title;
                self.photos = album
                    .photos
                    .into_iter()
                    .filter(|photo| photo.is_public)
                    .collect();
                self.error = None;
            }
            Err(err) => {
                error!("Could not load album {}: {}", self.album_id, err);
                self.photos.clear();
                self.error = Some(err.message());
            }
        }
        self.open = None;
    }

    pub fn open(&mut self, photo_id: i64) {
        self.open = self.photos.iter().position(|photo| photo.id == photo_id);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<&Photo> {
        self.open.and_then(|index| self.photos.get(index))
    }

    pub fn next(&mut self) {
        let count = self.photos.len();
        self.open = match self.open {
            Some(_) if count == 0 => None,
            Some(index) => Some((index + 1) % count),
            None => None,
        };
    }

    pub fn previous(&mut self) {
        let count = self.photos.len();
        self.open = match self.open {
            Some(_) if count == 0 => None,
            Some(index) => Some((index + count - 1) % count),
            None => None,
        };
    }
}
