/// REST client for the profile backend
///
/// One method per backend operation. All methods are async and return
/// `Result`; callers decide what a failure means for them. The discovery
/// call in particular does no recovery of its own - the listing screen
/// owns that decision.
use std::path::PathBuf;
use std::time::Duration;

use reqwest::multipart;

use super::types::{Photo, Profile, UserSummary};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given backend base URL.
    ///
    /// Constructing the HTTP stack only fails when the TLS backend is
    /// broken, in which case the app cannot function at all.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to construct HTTP client");

        ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List users open to discovery.
    ///
    /// GET /users/discover - the response body is returned verbatim.
    pub async fn discover_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let users = self
            .http
            .get(self.url("/users/discover"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(users)
    }

    /// Fetch another user's profile, milestones and photos included.
    pub async fn get_profile(&self, user_id: i64) -> Result<Profile, ApiError> {
        let profile = self
            .http
            .get(self.url(&format!("/users/{}", user_id)))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(profile)
    }

    /// Fetch the signed-in viewer's own profile.
    pub async fn self_profile(&self) -> Result<Profile, ApiError> {
        let profile = self
            .http
            .get(self.url("/users/me"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(profile)
    }

    /// Fetch the viewer's photo journal.
    pub async fn get_photos(&self) -> Result<Vec<Photo>, ApiError> {
        let photos = self
            .http
            .get(self.url("/photos"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(photos)
    }

    /// Upload a new photo as multipart form data.
    ///
    /// Returns the created record as the backend stored it.
    pub async fn upload_photo(
        &self,
        file: PathBuf,
        topic: String,
        description: String,
        tagged_milestone_ids: Vec<i64>,
    ) -> Result<Photo, ApiError> {
        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|e| ApiError::UploadFile(e.to_string()))?;

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());

        let tagged = tagged_milestone_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let form = multipart::Form::new()
            .text("topic", topic)
            .text("description", description)
            .text("taggedMilestoneIds", tagged)
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let photo = self
            .http
            .post(self.url("/photos"))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(photo)
    }

    /// Download raw image bytes from a photo's (absolute) image URL.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, ApiError> {
        let bytes = self
            .http
            .get(image_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/", Duration::from_secs(5));
        assert_eq!(
            client.url("/users/discover"),
            "http://localhost:8080/users/discover"
        );
    }
}
