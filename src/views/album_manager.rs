use futures::future::{join_all, try_join_all};
use tracing::{error, warn};

use crate::client::ApiClient;
use crate::models::{Photo, PhotoPatch};
use crate::services::photos::UploadFile;
use crate::services::{albums, photos};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Management page for the photos of one album.
#[derive(Debug)]
pub struct AlbumManagerView {
    pub album_id: i64,
    pub album_title: String,
    pub photos: Vec<Photo>,
    /// Selected photo ids in the order they were picked.
    pub selected: Vec<i64>,
    pub view_mode: ViewMode,
    pub search_term: String,
    /// Photo open in the detail pane.
    pub selected_photo: Option<Photo>,
    pub updating_photo_id: Option<i64>,
    pub selected_files: Vec<UploadFile>,
    pub uploading: bool,
    /// Why the last load failed, if it did.
    pub error: Option<String>,
}

impl AlbumManagerView {
    pub fn new(album_id: i64) -> Self {
        AlbumManagerView {
            album_id,
            album_title: "Loading album...".to_string(),
            photos: Vec::new(),
            selected: Vec::new(),
            view_mode: ViewMode::default(),
            search_term: String::new(),
            selected_photo: None,
            updating_photo_id: None,
            selected_files: Vec::new(),
            uploading: false,
            error: None,
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.load_photos(client).await;
        self.load_title(client).await;
    }

    pub async fn load_photos(&mut self, client: &ApiClient) {
        match photos::list_by_album(client, self.album_id).await {
            Ok(photos) => {
                self.photos = photos;
                self.error = None;
            }
            Err(err) => {
                error!("Could not load photos of album {}: {}", self.album_id, err);
                self.photos.clear();
                self.error = Some(err.message());
            }
        }
    }

    async fn load_title(&mut self, client: &ApiClient) {
        self.album_title = match albums::get(client, self.album_id).await {
            Ok(album) if !album.title.trim().is_empty() => album.title,
            Ok(_) => format!("Album #{}", self.album_id),
            Err(err) => {
                error!("Could not load album {}: {}", self.album_id, err);
                self.error = Some(err.message());
                "Album not found".to_string()
            }
        };
    }

    pub fn toggle_selection(&mut self, photo_id: i64) {
        if let Some(position) = self.selected.iter().position(|id| *id == photo_id) {
            self.selected.remove(position);
        } else {
            self.selected.push(photo_id);
        }
    }

    pub fn is_selected(&self, photo_id: i64) -> bool {
        self.selected.contains(&photo_id)
    }

    pub fn open_photo(&mut self, photo_id: i64) {
        self.selected_photo = self.photo(photo_id).cloned();
    }

    pub fn close_photo(&mut self) {
        self.selected_photo = None;
    }

    pub async fn toggle_photo_privacy(&mut self, client: &ApiClient, photo_id: i64) {
        let Some(current) = self.photo(photo_id).map(|photo| photo.is_public) else {
            return;
        };
        self.updating_photo_id = Some(photo_id);
        match photos::update(client, photo_id, &PhotoPatch::visibility(!current)).await {
            Ok(updated) => self.replace_photo(updated),
            Err(err) => error!("Could not change photo visibility: {}", err),
        }
        self.updating_photo_id = None;
    }

    pub async fn set_caption(&mut self, client: &ApiClient, photo_id: i64, caption: &str) {
        match photos::update(client, photo_id, &PhotoPatch::caption(caption)).await {
            Ok(updated) => self.replace_photo(updated),
            Err(err) => error!("Could not change caption of photo {}: {}", photo_id, err),
        }
    }

    /// Deletes every selected photo in parallel and drops the ones the server
    /// actually deleted. Returns how many were removed.
    pub async fn delete_selected(&mut self, client: &ApiClient) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let ids = std::mem::take(&mut self.selected);
        let results = join_all(ids.iter().map(|id| photos::delete(client, *id))).await;

        let mut deleted = Vec::with_capacity(ids.len());
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(()) => deleted.push(id),
                Err(err) => warn!("Could not delete photo {}: {}", id, err),
            }
        }
        self.photos.retain(|photo| !deleted.contains(&photo.id));
        if matches!(&self.selected_photo, Some(photo) if deleted.contains(&photo.id)) {
            self.selected_photo = None;
        }
        deleted.len()
    }

    pub async fn delete_photo(&mut self, client: &ApiClient, photo_id: i64) {
        match photos::delete(client, photo_id).await {
            Ok(()) => {
                self.photos.retain(|photo| photo.id != photo_id);
                self.selected.retain(|id| *id != photo_id);
                if matches!(&self.selected_photo, Some(photo) if photo.id == photo_id) {
                    self.selected_photo = None;
                }
            }
            Err(err) => error!("Could not delete photo {}: {}", photo_id, err),
        }
    }

    /// Uploads all picked files at once; any failure fails the batch.
    pub async fn upload(&mut self, client: &ApiClient) {
        if self.selected_files.is_empty() {
            return;
        }
        self.uploading = true;
        let uploads = self
            .selected_files
            .iter()
            .map(|file| photos::upload(client, self.album_id, file.clone()));
        match try_join_all(uploads).await {
            Ok(_) => {
                self.load_photos(client).await;
                self.selected_files.clear();
            }
            Err(err) => error!("Could not upload photos: {}", err),
        }
        self.uploading = false;
    }

    /// Photos whose caption contains the search term, ignoring case.
    pub fn filtered_photos(&self) -> Vec<&Photo> {
        let term = self.search_term.to_lowercase();
        self.photos
            .iter()
            .filter(|photo| photo.caption().to_lowercase().contains(&term))
            .collect()
    }

    pub fn photo(&self, photo_id: i64) -> Option<&Photo> {
        self.photos.iter().find(|photo| photo.id == photo_id)
    }

    fn replace_photo(&mut self, updated: Photo) {
        if let Some(photo) = self.photos.iter_mut().find(|photo| photo.id == updated.id) {
            *photo = updated.clone();
        }
        if let Some(photo) = self.selected_photo.as_mut().filter(|photo| photo.id == updated.id) {
            *photo = updated;
        }
    }
}
