use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::client::{ApiClient, ApiRequest};
use crate::endpoints::{photo_by_id, PhotoListRoute, PHOTOS_UPLOAD};
use crate::error::{ApiError, ApiResult};
use crate::models::{Album, Photo, PhotoPatch};

/// A file picked for upload, held in memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        UploadFile {
            file_name,
            bytes,
            mime_type,
        }
    }

    pub async fn from_path(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::InvalidUpload(format!("{} is not a file", path.display())))?;
        Ok(UploadFile::new(file_name, bytes))
    }

    fn into_form(self, album_id: i64) -> ApiResult<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|err| ApiError::InvalidUpload(err.to_string()))?;
        Ok(Form::new()
            .part("file", part)
            .text("albumId", album_id.to_string()))
    }
}

pub async fn list_by_album(client: &ApiClient, album_id: i64) -> ApiResult<Vec<Photo>> {
    let route = client.photo_list_route();
    let request = ApiRequest::get(route.path(album_id)).authenticated();
    match route {
        PhotoListRoute::PhotosByAlbum => client.fetch(request).await,
        PhotoListRoute::AlbumDetail => {
            let album: Album = client.fetch(request).await?;
            Ok(album.photos)
        }
    }
}

/// Returns the stored photo when the backend echoes it back.
pub async fn upload(
    client: &ApiClient,
    album_id: i64,
    file: UploadFile,
) -> ApiResult<Option<Photo>> {
    let request = ApiRequest::post(PHOTOS_UPLOAD)
        .multipart(file.into_form(album_id)?)
        .authenticated();
    client.fetch_optional(request).await
}

pub async fn update(client: &ApiClient, id: i64, patch: &PhotoPatch) -> ApiResult<Photo> {
    let request = ApiRequest::patch(photo_by_id(id)).json(patch)?.authenticated();
    client.fetch(request).await
}

pub async fn delete(client: &ApiClient, id: i64) -> ApiResult<()> {
    client
        .send_discarding(ApiRequest::delete(photo_by_id(id)).authenticated())
        .await
}
