//! Client applications registered with the platform API
//!
//! Records are owned by the platform API; the console reads them, and forwards
//! create, update and delete requests on the operator's behalf.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::{AccessToken, ApiClient, ApiError};
use super::id_string;

const COLLECTION: &str = "client_applications";

/// A registered consumer of the platform API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientApplication {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_urls: Vec<String>,
    /// Applications are enabled unless the API says otherwise
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub published_artworks_access_enabled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn enabled_by_default() -> bool {
    true
}

impl ClientApplication {
    /// Whether the application may read every published artwork
    pub fn has_published_artworks_access(&self) -> bool {
        self.enabled && self.published_artworks_access_enabled
    }

    /// Short access description used in the applications table
    pub fn access_summary(&self) -> &'static str {
        if !self.enabled {
            "No"
        } else if self.published_artworks_access_enabled {
            "Yes + Published Artworks"
        } else {
            "Yes"
        }
    }
}

/// Writable fields sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientApplicationParams {
    pub name: String,
    pub redirect_urls: Vec<String>,
}

impl ClientApplicationParams {
    /// Builds params from form input, splitting redirect URLs on commas and whitespace
    pub fn from_form(name: &str, redirect_urls: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            redirect_urls: parse_redirect_urls(redirect_urls),
        }
    }
}

/// Splits free-form redirect URL input into individual URLs
pub fn parse_redirect_urls(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

impl ApiClient {
    /// Lists every client application visible to the token
    pub async fn list_client_applications(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ClientApplication>, ApiError> {
        let request = self.get(token, &[COLLECTION])?;
        let (applications, _) = self.send_json(request, "client applications").await?;
        Ok(applications)
    }

    /// Fetches a single client application
    pub async fn get_client_application(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<ClientApplication, ApiError> {
        let request = self.get(token, &[COLLECTION, id])?;
        let resource = format!("client application {}", id);
        let (application, _) = self.send_json(request, &resource).await?;
        Ok(application)
    }

    /// Registers a new client application
    pub async fn create_client_application(
        &self,
        token: &AccessToken,
        params: &ClientApplicationParams,
    ) -> Result<ClientApplication, ApiError> {
        let request = self.post(token, &[COLLECTION])?.json(params);
        let (application, _) = self.send_json(request, "client applications").await?;
        Ok(application)
    }

    /// Replaces the writable fields of a client application
    pub async fn update_client_application(
        &self,
        token: &AccessToken,
        id: &str,
        params: &ClientApplicationParams,
    ) -> Result<ClientApplication, ApiError> {
        let request = self.put(token, &[COLLECTION, id])?.json(params);
        let resource = format!("client application {}", id);
        let (application, _) = self.send_json(request, &resource).await?;
        Ok(application)
    }

    /// Deletes a client application
    pub async fn delete_client_application(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<(), ApiError> {
        let request = self.delete(token, &[COLLECTION, id])?;
        let resource = format!("client application {}", id);
        self.send(request, &resource).await?;
        Ok(())
    }
}
