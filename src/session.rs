//! Current session identity
//!
//! Workflow records are decorated relative to whoever is logged in, so the
//! workflow client takes an [`Identity`] at construction instead of reaching
//! for global state.

use crate::client::GalaxyClient;
use crate::error::RequestError;
use serde::Deserialize;

/// Provides the username of the authenticated session.
pub trait Identity: Send + Sync {
    /// Username of the current session
    fn username(&self) -> &str;
}

/// A fixed session identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

#[derive(Deserialize)]
struct CurrentUser {
    #[serde(default)]
    username: Option<String>,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// An anonymous session owns nothing, so every workflow is shared with it.
    pub fn anonymous() -> Self {
        Self::new("")
    }

    /// Ask the server who the client is authenticated as.
    ///
    /// Uses `GET api/users/current`. Anonymous sessions have no `username`
    /// and resolve to [`Session::anonymous`].
    pub async fn fetch(client: &GalaxyClient) -> Result<Self, RequestError> {
        let response = client.get(&["api", "users", "current"]).await?;
        let user: CurrentUser = GalaxyClient::json(response).await?;

        match user.username {
            Some(username) => Ok(Self::new(username)),
            None => {
                log::debug!("Current user has no username, using anonymous session");
                Ok(Self::anonymous())
            }
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }
}

impl Identity for Session {
    fn username(&self) -> &str {
        &self.username
    }
}
