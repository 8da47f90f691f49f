//! Post (event / recruitment announcement) service

use tracing::{debug, info, warn};

use crate::client::{extract_list, extract_one, ApiClient};
use crate::models::{Ormawa, Post, PostForm};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;
use super::ormawa::OrmawaService;

/// Data shown on the home screen
#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    pub posts: Vec<Post>,
    pub organizations: Vec<Ormawa>,
}

/// An organization with its posts. The posts are fetched separately and
/// may fail on their own without hiding the organization.
#[derive(Debug)]
pub struct OrmawaProfile {
    pub ormawa: Ormawa,
    pub posts: Result<Vec<Post>>,
}

#[derive(Clone, Debug)]
pub struct PostService {
    client: ApiClient,
}

impl PostService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Published posts visible to every logged-in user
    pub async fn list_public(&self) -> Result<Vec<Post>> {
        let body = self.client.get("/api/posts").await?;
        extract_list(&body, Some("posts"))
    }

    /// Every post, drafts included
    pub async fn list_admin(&self) -> Result<Vec<Post>> {
        let body = self.client.get("/api/admin/posts").await?;
        let posts: Vec<Post> = extract_list(&body, Some("posts"))?;
        debug!(count = posts.len(), "Fetched admin posts");
        Ok(posts)
    }

    /// Admin listing narrowed to one organization
    pub async fn list_for_ormawa(&self, ormawa_id: i64) -> Result<Vec<Post>> {
        let posts = self.list_admin().await?;
        Ok(posts.into_iter().filter(|p| p.belongs_to(ormawa_id)).collect())
    }

    pub async fn create(&self, form: PostForm) -> Result<Option<Post>> {
        form.validate()?;
        let title = form.title.trim().to_string();

        let body = self
            .client
            .post_form("/api/admin/posts", form.into_form_body())
            .await?;
        log_admin_action("create_post", &title, None);
        info!(title = %title, "Post created");

        Ok(extract_one(&body, Some("post")).ok())
    }

    /// Update a post; the form travels as a POST with `_method=PUT`
    pub async fn update(&self, id: i64, form: PostForm) -> Result<()> {
        form.validate()?;
        let title = form.title.trim().to_string();

        self.client
            .post_form(
                &format!("/api/admin/posts/{}", id),
                form.into_form_body().method_override("PUT"),
            )
            .await?;
        log_admin_action("update_post", &title, Some(id));
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/api/admin/posts/{}", id)).await?;
        log_admin_action("delete_post", "post", Some(id));
        Ok(())
    }

    /// Organization detail followed by its posts from the admin listing
    pub async fn ormawa_profile(&self, ormawa_id: i64) -> Result<OrmawaProfile> {
        let ormawa = OrmawaService::new(self.client.clone()).get(ormawa_id).await?;
        let posts = self.list_for_ormawa(ormawa_id).await;
        if let Err(e) = &posts {
            warn!(ormawa_id = ormawa_id, error = %e, "Posts for organization unavailable");
        }
        Ok(OrmawaProfile { ormawa, posts })
    }

    /// Published posts and organizations, fetched concurrently
    pub async fn home_feed(&self) -> Result<HomeFeed> {
        let organizations = OrmawaService::new(self.client.clone());
        let (mut posts, organizations) = futures::try_join!(self.list_public(), organizations.list())?;
        posts.retain(Post::is_published);
        Ok(HomeFeed {
            posts,
            organizations,
        })
    }
}
