pub mod album;
pub mod auth;
pub mod photo;

pub use album::{Album, AlbumPatch, NewAlbum};
pub use auth::{Credentials, LoginResponse};
pub use photo::{Photo, PhotoPatch};
