//! Membership registration service

use tracing::{debug, info};

use crate::client::{extract_list, ApiClient, Blob, Payload};
use crate::models::{Registration, RegistrationRequest, RegistrationStats, RegistrationStatus};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

const VIEW_FALLBACK_TYPE: &str = "application/pdf";
const DOWNLOAD_FALLBACK_TYPE: &str = "application/octet-stream";

#[derive(Clone, Debug)]
pub struct RegistrationService {
    client: ApiClient,
}

impl RegistrationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Apply to a post. Sent as JSON, or multipart when a CV is attached.
    pub async fn submit(&self, post_id: i64, request: RegistrationRequest) -> Result<()> {
        let request = request.normalized();
        request.validate()?;

        let path = format!("/api/posts/{}/registrations", post_id);
        let payload = if request.cv.is_some() {
            Payload::Multipart(request.into_form_body())
        } else {
            Payload::json(&request)?
        };

        self.client.send(reqwest::Method::POST, &path, payload).await?;
        info!(post_id = post_id, "Registration submitted");
        Ok(())
    }

    pub async fn list(&self, status: Option<RegistrationStatus>) -> Result<Vec<Registration>> {
        let path = match status {
            Some(status) => format!("/api/admin/registrations?status={}", urlencoding::encode(status.as_str())),
            None => "/api/admin/registrations".to_string(),
        };

        let body = self.client.get(&path).await?;
        let registrations: Vec<Registration> = extract_list(&body, Some("registrations"))?;
        debug!(count = registrations.len(), status = ?status, "Fetched registrations");
        Ok(registrations)
    }

    pub async fn update_status(&self, id: i64, status: RegistrationStatus) -> Result<()> {
        self.client
            .patch_json(
                &format!("/api/admin/registrations/{}/status", id),
                &serde_json::json!({ "status": status }),
            )
            .await?;
        log_admin_action("update_registration_status", status.as_str(), Some(id));
        Ok(())
    }

    /// CV for inline viewing
    pub async fn view_cv(&self, id: i64) -> Result<Blob> {
        self.client
            .get_blob(&format!("/api/admin/registrations/{}/cv", id), VIEW_FALLBACK_TYPE)
            .await
    }

    /// CV as an attachment; the filename falls back to `{fallback_name}_{id}`
    pub async fn download_cv(&self, id: i64, fallback_name: &str) -> Result<Blob> {
        let mut blob = self
            .client
            .get_blob(&format!("/api/admin/registrations/{}/cv/download", id), DOWNLOAD_FALLBACK_TYPE)
            .await?;
        if blob.filename.is_none() {
            blob.filename = Some(format!("{}_{}", fallback_name, id));
        }
        Ok(blob)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/admin/registrations/{}", id)).await?;
        log_admin_action("delete_registration", "registration", Some(id));
        Ok(())
    }

    pub fn stats(&self, registrations: &[Registration]) -> RegistrationStats {
        RegistrationStats::from_registrations(registrations)
    }
}
