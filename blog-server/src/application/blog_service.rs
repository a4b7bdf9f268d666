use crate::data::blog_repository::BlogRepository;
use crate::domain::blog::{BlogPage, BlogResponse, CreateBlogRequest};
use crate::domain::slug::{candidate_prefix, next_available, slugify};
use crate::domain::user::AuthenticatedUser;
use crate::domain::validation::validate_new_blog;
use crate::domain::DomainError;
use crate::infrastructure::config::DeletePolicy;
use std::sync::Arc;

/// Inserts that lose a slug race are retried this many times.
const SLUG_ATTEMPTS: usize = 5;

pub struct BlogService {
    blog_repo: Arc<dyn BlogRepository + Send + Sync>,
    page_size: i64,
    delete_policy: DeletePolicy,
}

impl BlogService {
    pub fn new(
        blog_repo: Arc<dyn BlogRepository + Send + Sync>,
        page_size: i64,
        delete_policy: DeletePolicy,
    ) -> Self {
        Self {
            blog_repo,
            page_size,
            delete_policy,
        }
    }

    pub async fn list_blogs(&self, page: i64) -> Result<BlogPage, DomainError> {
        if page < 1 {
            return Err(DomainError::InvalidPage);
        }

        let offset = (page - 1)
            .checked_mul(self.page_size)
            .ok_or(DomainError::InvalidPage)?;
        let (blogs, count) = self.blog_repo.list(self.page_size, offset).await?;

        // The first page always exists, even when there is nothing on it.
        if page > 1 && blogs.is_empty() {
            return Err(DomainError::InvalidPage);
        }

        let has_next = offset + (blogs.len() as i64) < count;
        Ok(BlogPage {
            results: blogs.into_iter().map(BlogResponse::from).collect(),
            count,
            page,
            has_next,
            has_previous: page > 1,
        })
    }

    pub async fn get_blog(&self, slug: &str) -> Result<BlogResponse, DomainError> {
        let blog = self.blog_repo.find_by_slug(slug).await?;
        Ok(BlogResponse::from(blog))
    }

    pub async fn create_blog(
        &self,
        owner: &AuthenticatedUser,
        req: CreateBlogRequest,
    ) -> Result<BlogResponse, DomainError> {
        let new_blog = validate_new_blog(req)?;
        let base = slugify(&new_blog.title);
        let prefix = candidate_prefix(&base);

        for attempt in 1..=SLUG_ATTEMPTS {
            let taken = self.blog_repo.slugs_with_prefix(&prefix).await?;
            let slug = next_available(&base, &taken);

            match self.blog_repo.create(owner.user_id, &new_blog, &slug).await {
                Ok(blog) => {
                    tracing::info!(
                        "Blog created: id={}, slug={}, owner_id={}",
                        blog.id,
                        blog.slug,
                        owner.user_id
                    );
                    return Ok(BlogResponse::from(blog));
                }
                Err(DomainError::SlugConflict(slug)) => {
                    tracing::warn!("Slug {} taken concurrently (attempt {})", slug, attempt);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!("Could not allocate a slug for base {}", base);
        Err(DomainError::InternalError(format!(
            "Could not allocate a unique slug for '{}'",
            base
        )))
    }

    pub async fn destroy_blog(
        &self,
        requester: &AuthenticatedUser,
        slug: &str,
    ) -> Result<(), DomainError> {
        if self.delete_policy == DeletePolicy::OwnerOnly {
            let blog = self.blog_repo.find_by_slug(slug).await?;
            if blog.owner_id != requester.user_id {
                tracing::warn!(
                    "User {} attempted to delete blog {} owned by {}",
                    requester.user_id,
                    slug,
                    blog.owner_id
                );
                return Err(DomainError::Forbidden);
            }
        }

        self.blog_repo.delete_by_slug(slug).await?;

        tracing::info!("Blog deleted: slug={}, by user_id={}", slug, requester.user_id);
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, DomainError> {
        self.blog_repo.count().await
    }
}
