use tracing::error;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::models::{Album, AlbumPatch, NewAlbum};
use crate::services::photos::UploadFile;
use crate::services::{albums, photos};
use crate::views::Toast;

pub const COLOR_OPTIONS: [&str; 6] = [
    "from-purple-200 to-pink-300",
    "from-amber-200 to-yellow-300",
    "from-emerald-200 to-teal-300",
    "from-blue-200 to-cyan-300",
    "from-rose-200 to-pink-300",
    "from-orange-200 to-amber-300",
];

pub const DEFAULT_ICON: &str = "Camera";
const KNOWN_ICONS: [&str; 5] = ["Crown", "Camera", "Plane", "PawPrint", "Users"];

/// Icon to draw for an album; unknown or missing names fall back to the camera.
pub fn icon_name(name: Option<&str>) -> &'static str {
    name.and_then(|name| KNOWN_ICONS.iter().copied().find(|known| *known == name))
        .unwrap_or(DEFAULT_ICON)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_albums: usize,
    pub total_photos: usize,
    pub public_albums: usize,
    pub private_albums: usize,
    pub total_views: i64,
    pub total_likes: i64,
}

#[derive(Debug)]
pub struct DashboardView {
    pub albums: Vec<Album>,
    pub loading: bool,
    pub toast: Option<Toast>,
    pub new_album_title: String,
    pub selected_color: String,
    pub creating: bool,
    pub upload_album_id: Option<i64>,
    pub selected_files: Vec<UploadFile>,
    /// Album whose visibility change is in flight.
    pub updating_album_id: Option<i64>,
}

impl Default for DashboardView {
    fn default() -> Self {
        DashboardView {
            albums: Vec::new(),
            loading: true,
            toast: None,
            new_album_title: String::new(),
            selected_color: COLOR_OPTIONS[0].to_string(),
            creating: false,
            upload_album_id: None,
            selected_files: Vec::new(),
            updating_album_id: None,
        }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch_albums(&mut self, client: &ApiClient) {
        self.loading = true;
        match albums::list(client).await {
            Ok(albums) => {
                if self.upload_album_id.is_none() {
                    self.upload_album_id = albums.first().map(|album| album.id);
                }
                self.albums = albums;
            }
            Err(err) => {
                error!("Could not load albums: {}", err);
                self.toast = Some(Toast::error("Could not load albums."));
            }
        }
        self.loading = false;
    }

    pub async fn toggle_album_privacy(&mut self, client: &ApiClient, album_id: i64) {
        let Some(current) = self.album(album_id).map(|album| album.is_public) else {
            return;
        };
        self.updating_album_id = Some(album_id);
        match albums::update(client, album_id, &AlbumPatch::visibility(!current)).await {
            Ok(mut updated) => {
                if let Some(album) = self.albums.iter_mut().find(|album| album.id == album_id) {
                    if updated.photos.is_empty() {
                        updated.photos = std::mem::take(&mut album.photos);
                    }
                    *album = updated;
                }
            }
            Err(err) => error!("Could not change album visibility: {}", err),
        }
        self.updating_album_id = None;
    }

    pub async fn delete_album(&mut self, client: &ApiClient, album_id: i64) {
        match albums::delete(client, album_id).await {
            Ok(()) => {
                self.albums.retain(|album| album.id != album_id);
                if self.upload_album_id == Some(album_id) {
                    self.upload_album_id = self.albums.first().map(|album| album.id);
                }
                self.toast = Some(Toast::success("Album deleted."));
            }
            Err(err) => {
                error!("Could not delete album {}: {}", album_id, err);
                self.toast = Some(Toast::error("Could not delete album."));
            }
        }
    }

    /// Creates an album from the form fields. A blank title is ignored without a request.
    pub async fn create_album(&mut self, client: &ApiClient) {
        let title = self.new_album_title.trim().to_string();
        if title.is_empty() {
            return;
        }
        self.creating = true;
        match albums::create(client, &NewAlbum::titled(self.new_album_title.clone())).await {
            Ok(_) => {
                self.fetch_albums(client).await;
                // The backend may not keep the cosmetic fields; fill them in locally.
                for album in self
                    .albums
                    .iter_mut()
                    .filter(|album| album.title == self.new_album_title && album.color.is_none())
                {
                    album.color = Some(self.selected_color.clone());
                    album.icon.get_or_insert_with(|| DEFAULT_ICON.to_string());
                }
                self.new_album_title.clear();
                self.toast = Some(Toast::success("Album created."));
            }
            Err(err) => {
                error!("Could not create album {:?}: {}", title, err);
                self.toast = Some(Toast::error("Could not create album."));
            }
        }
        self.creating = false;
    }

    /// Uploads the picked files one after another into the chosen album.
    pub async fn upload_photos(&mut self, client: &ApiClient) {
        let Some(album_id) = self.upload_album_id else {
            self.toast = Some(Toast::error("Select an album and at least one file."));
            return;
        };
        if self.selected_files.is_empty() {
            self.toast = Some(Toast::error("Select an album and at least one file."));
            return;
        }
        match upload_then_refresh(client, album_id, &self.selected_files).await {
            Ok(albums) => {
                self.albums = albums;
                self.selected_files.clear();
                self.toast = Some(Toast::success("Photos uploaded."));
            }
            Err(err) => {
                error!("Could not upload photos: {}", err);
                self.toast = Some(Toast::error("Could not upload photos."));
            }
        }
    }

    pub fn stats(&self) -> DashboardStats {
        let total_albums = self.albums.len();
        let public_albums = self.albums.iter().filter(|album| album.is_public).count();
        DashboardStats {
            total_albums,
            total_photos: self.albums.iter().map(Album::photo_count).sum(),
            public_albums,
            private_albums: total_albums - public_albums,
            total_views: self.albums.iter().map(|album| album.views).sum(),
            total_likes: self.albums.iter().map(Album::likes).sum(),
        }
    }

    pub fn album(&self, album_id: i64) -> Option<&Album> {
        self.albums.iter().find(|album| album.id == album_id)
    }
}

async fn upload_then_refresh(
    client: &ApiClient,
    album_id: i64,
    files: &[UploadFile],
) -> ApiResult<Vec<Album>> {
    for file in files {
        photos::upload(client, album_id, file.clone()).await?;
    }
    albums::list(client).await
}
