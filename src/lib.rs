pub mod cli;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod humanize;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod views;

#[cfg(test)]
mod test_utils;

pub use client::{ApiClient, ApiRequest};
pub use config::LanternConfig;
pub use error::{ApiError, ApiResult};
pub use session::{Session, TokenStore};
