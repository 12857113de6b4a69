use crate::client::{ApiClient, ApiRequest};
use crate::endpoints::{AUTH_LOGIN, AUTH_REGISTER};
use crate::error::ApiResult;
use crate::models::{Credentials, LoginResponse};

pub async fn login(client: &ApiClient, email: &str, password: &str) -> ApiResult<LoginResponse> {
    let request = ApiRequest::post(AUTH_LOGIN).json(&Credentials { email, password })?;
    client.fetch(request).await
}

pub async fn register(client: &ApiClient, email: &str, password: &str) -> ApiResult<()> {
    let request = ApiRequest::post(AUTH_REGISTER).json(&Credentials { email, password })?;
    client.send_discarding(request).await
}
