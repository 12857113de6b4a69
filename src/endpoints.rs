use serde::{Deserialize, Serialize};

#[macro_export]
macro_rules! api_endpoint {
    ( $base: expr, $( $x: expr),+ ) => {{
        format!("{}{}", $base, format_args!($($x),+))
    }};
}

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_REGISTER: &str = "/auth/register";

pub const ALBUMS: &str = "/albums";
pub const PHOTOS_UPLOAD: &str = "/photos/upload";

pub fn album_by_id(id: i64) -> String {
    format!("{ALBUMS}/{id}")
}

pub fn photo_by_id(id: i64) -> String {
    format!("/photos/{id}")
}

/// Where the backend serves the photos of one album.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoListRoute {
    /// `GET /photos/album/{id}` answering with a bare photo array.
    #[default]
    PhotosByAlbum,
    /// `GET /albums/{id}` answering with the album, photos embedded.
    AlbumDetail,
}

impl PhotoListRoute {
    pub fn path(&self, album_id: i64) -> String {
        match self {
            PhotoListRoute::PhotosByAlbum => format!("/photos/album/{album_id}"),
            PhotoListRoute::AlbumDetail => album_by_id(album_id),
        }
    }
}
