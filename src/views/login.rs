use tracing::{error, info};

use crate::client::ApiClient;
use crate::services::auth;
use crate::views::Route;

#[derive(Debug, Default)]
pub struct LoginView {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub error: Option<String>,
}

impl LoginView {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginView {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Logs in and keeps the token in the session; returns where to go next.
    pub async fn submit(&mut self, client: &ApiClient) -> Option<Route> {
        self.error = None;
        let result = match auth::login(client, &self.email, &self.password).await {
            Ok(response) => client.session().set_token(response.access_token),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                info!(email = %self.email, "logged in");
                Some(Route::Dashboard)
            }
            Err(err) => {
                error!("Login failed: {}", err);
                let message = err.message();
                self.error = Some(if message.is_empty() {
                    "Login failed".to_string()
                } else {
                    message
                });
                None
            }
        }
    }
}
