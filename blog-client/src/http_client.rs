use crate::error::BlogClientError;
use crate::models::{
    AuthResponse, Blog, BlogList, CreateBlogRequest, LoginRequest, MediaInfo, RegisterRequest,
    User,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the blog API. Keeps the bearer token between calls.
#[derive(Debug, Clone)]
pub struct BlogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BlogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn add_auth_header(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds `base/api/<prefix...>/<segments...>` with each segment percent-encoded.
    fn segment_url(&self, prefix: &[&str], tail: &str) -> Result<Url, BlogClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BlogClientError::InvalidRequest(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| BlogClientError::InvalidRequest("Base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(prefix)
            .extend(tail.split('/'));
        Ok(url)
    }

    // ============== Auth ==============

    pub async fn register(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, BlogClientError> {
        let req = RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        };
        tracing::debug!("Registering {}", req.username);

        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&req)
            .send()
            .await?;

        let auth: AuthResponse = expect_json(response, StatusCode::CREATED).await?;
        self.set_token(auth.token.clone());
        Ok(auth)
    }

    pub async fn login(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, BlogClientError> {
        let req = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        tracing::debug!("Logging in as {}", req.username);

        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&req)
            .send()
            .await?;

        let auth: AuthResponse = expect_json(response, StatusCode::OK).await?;
        self.set_token(auth.token.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> Result<User, BlogClientError> {
        let response = self
            .add_auth_header(self.client.get(self.url("/api/auth/user")))
            .send()
            .await?;
        expect_json(response, StatusCode::OK).await
    }

    /// Revokes the current token on the server and forgets it locally.
    pub async fn logout(&mut self) -> Result<(), BlogClientError> {
        let response = self
            .add_auth_header(self.client.post(self.url("/api/auth/logout")))
            .send()
            .await?;
        expect_no_content(response).await?;
        self.clear_token();
        Ok(())
    }

    pub async fn logout_all(&mut self) -> Result<(), BlogClientError> {
        let response = self
            .add_auth_header(self.client.post(self.url("/api/auth/logoutall")))
            .send()
            .await?;
        expect_no_content(response).await?;
        self.clear_token();
        Ok(())
    }

    // ============== Blogs ==============

    pub async fn list_blogs(&self, page: Option<u32>) -> Result<BlogList, BlogClientError> {
        let mut request = self.client.get(self.url("/api/blog"));
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        let response = self.add_auth_header(request).send().await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn get_blog(&self, slug: &str) -> Result<Blog, BlogClientError> {
        let url = self.segment_url(&["api", "blog"], slug)?;
        let response = self.add_auth_header(self.client.get(url)).send().await?;
        expect_json(response, StatusCode::OK).await
    }

    pub async fn create_blog(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Blog, BlogClientError> {
        let request = CreateBlogRequest {
            title: title.into(),
            description: description.into(),
        };

        let response = self
            .add_auth_header(self.client.post(self.url("/api/blog")))
            .json(&request)
            .send()
            .await?;
        expect_json(response, StatusCode::CREATED).await
    }

    pub async fn delete_blog(&self, slug: &str) -> Result<(), BlogClientError> {
        let url = self.segment_url(&["api", "blog"], slug)?;
        let response = self.add_auth_header(self.client.delete(url)).send().await?;
        expect_no_content(response).await
    }

    // ============== Media / Static ==============

    pub async fn upload_media(&self, key: &str, bytes: Vec<u8>) -> Result<MediaInfo, BlogClientError> {
        self.upload_asset("media", key, bytes).await
    }

    pub async fn media_url(&self, key: &str) -> Result<MediaInfo, BlogClientError> {
        self.asset_url("media", key).await
    }

    pub async fn upload_static(&self, key: &str, bytes: Vec<u8>) -> Result<MediaInfo, BlogClientError> {
        self.upload_asset("static", key, bytes).await
    }

    pub async fn static_url(&self, key: &str) -> Result<MediaInfo, BlogClientError> {
        self.asset_url("static", key).await
    }

    async fn upload_asset(
        &self,
        scope: &str,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaInfo, BlogClientError> {
        let url = self.segment_url(&["api", scope], key)?;
        tracing::debug!("Uploading {} bytes to {}", bytes.len(), url);
        let response = self
            .add_auth_header(self.client.put(url))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        expect_json(response, StatusCode::CREATED).await
    }

    async fn asset_url(&self, scope: &str, key: &str) -> Result<MediaInfo, BlogClientError> {
        let url = self.segment_url(&["api", scope], key)?;
        let response = self.add_auth_header(self.client.get(url)).send().await?;
        expect_json(response, StatusCode::OK).await
    }
}

async fn expect_json<T: DeserializeOwned>(
    response: Response,
    expected: StatusCode,
) -> Result<T, BlogClientError> {
    let status = response.status();
    if status == expected {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| BlogClientError::SerializationError(e.to_string()))
    } else {
        let text = response.text().await?;
        Err(BlogClientError::from_status(status, &text))
    }
}

async fn expect_no_content(response: Response) -> Result<(), BlogClientError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        Ok(())
    } else {
        let text = response.text().await?;
        Err(BlogClientError::from_status(status, &text))
    }
}
