use crate::database::models::{Post, PostWithAuthor};
use crate::database::repository::PostRepository;
use crate::error::ApiError;

#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
}

impl PostService {
    pub fn new(posts: PostRepository) -> Self {
        Self { posts }
    }

    pub async fn create_post(
        &self,
        user_id: i32,
        title: &str,
        content: &str,
        status: Option<&str>,
    ) -> Result<Post, ApiError> {
        let status = status.unwrap_or("draft");
        Ok(self.posts.create(user_id, title, content, status).await?)
    }

    pub async fn get_post(&self, id: i32) -> Result<Post, ApiError> {
        self.posts
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("post not found"))
    }

    pub async fn list_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, ApiError> {
        Ok(self.posts.list(limit, offset).await?)
    }

    pub async fn list_posts_by_user(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithAuthor>, ApiError> {
        Ok(self.posts.list_by_user(user_id, limit, offset).await?)
    }

    pub async fn update_post(
        &self,
        id: i32,
        title: &str,
        content: &str,
        status: Option<&str>,
    ) -> Result<Post, ApiError> {
        self.posts
            .update(id, title, content, status)
            .await?
            .ok_or_else(|| ApiError::not_found("post not found"))
    }

    pub async fn delete_post(&self, id: i32) -> Result<(), ApiError> {
        if !self.posts.delete(id).await? {
            return Err(ApiError::not_found("post not found"));
        }
        Ok(())
    }
}
