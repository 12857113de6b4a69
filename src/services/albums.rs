use crate::client::{ApiClient, ApiRequest};
use crate::endpoints::{album_by_id, ALBUMS};
use crate::error::ApiResult;
use crate::models::{Album, AlbumPatch, NewAlbum};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<Album>> {
    client.fetch(ApiRequest::get(ALBUMS).authenticated()).await
}

pub async fn get(client: &ApiClient, id: i64) -> ApiResult<Album> {
    client
        .fetch(ApiRequest::get(album_by_id(id)).authenticated())
        .await
}

/// Returns the created album when the backend echoes it back.
pub async fn create(client: &ApiClient, album: &NewAlbum) -> ApiResult<Option<Album>> {
    let request = ApiRequest::post(ALBUMS).json(album)?.authenticated();
    client.fetch_optional(request).await
}

pub async fn update(client: &ApiClient, id: i64, patch: &AlbumPatch) -> ApiResult<Album> {
    let request = ApiRequest::patch(album_by_id(id)).json(patch)?.authenticated();
    client.fetch(request).await
}

pub async fn delete(client: &ApiClient, id: i64) -> ApiResult<()> {
    client
        .send_discarding(ApiRequest::delete(album_by_id(id)).authenticated())
        .await
}
