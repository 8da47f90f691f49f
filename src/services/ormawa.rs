//! Organization (ormawa) service

use tracing::{debug, info};

use crate::client::{extract_data, extract_list, extract_one, ApiClient};
use crate::models::{Ormawa, OrmawaForm};
use crate::utils::errors::{ApiError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Clone, Debug)]
pub struct OrmawaService {
    client: ApiClient,
}

impl OrmawaService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All organizations, public listing
    pub async fn list(&self) -> Result<Vec<Ormawa>> {
        let body = self.client.get("/api/ormawa").await?;
        let items: Vec<Ormawa> = extract_list(&body, Some("ormawa"))?;
        debug!(count = items.len(), "Fetched organizations");
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> Result<Ormawa> {
        let body = self.client.get(&format!("/api/ormawa/{}", id)).await?;
        let data = extract_data(&body, Some("ormawa"));
        if data.is_null() || data.as_object().is_some_and(|o| o.is_empty()) {
            return Err(ApiError::NotFound {
                message: Some(format!("organization {} not found", id)),
            }
            .into());
        }
        extract_one(&body, Some("ormawa"))
    }

    /// Create an organization from a multipart form
    pub async fn create(&self, form: OrmawaForm) -> Result<Option<Ormawa>> {
        form.validate()?;
        let name = form.name.trim().to_string();

        let body = self
            .client
            .post_form("/api/admin/ormawa", form.into_form_body())
            .await?;
        log_admin_action("create_ormawa", &name, None);
        info!(name = %name, "Organization created");

        Ok(extract_one(&body, Some("ormawa")).ok())
    }

    /// Update an organization; the form travels as a POST with `_method=PUT`
    pub async fn update(&self, id: i64, form: OrmawaForm) -> Result<()> {
        form.validate()?;
        let name = form.name.trim().to_string();

        self.client
            .post_form(
                &format!("/api/admin/ormawa/{}", id),
                form.into_form_body().method_override("PUT"),
            )
            .await?;
        log_admin_action("update_ormawa", &name, Some(id));
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/admin/ormawa/{}", id)).await?;
        log_admin_action("delete_ormawa", "ormawa", Some(id));
        Ok(())
    }
}
