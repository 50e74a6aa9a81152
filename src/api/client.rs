use super::types::{AddFavoriteRequest, GenresResponse, MoviesResponse};
use super::{ApiError, CatalogGateway, HealthStatus, Movie, MovieDetails, MovieId, UserGateway};
use crate::util::validate_api_base;
use futures::StreamExt;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Page size the dashboard asks for on every list endpoint.
pub const DEFAULT_LIMIT: usize = 20;

const MAX_BODY_SIZE: usize = 8 * 1024 * 1024; // 8MB

/// HTTP implementation of both gateways.
///
/// Cheap to clone: `reqwest::Client` is reference counted internally.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Validated base URL without trailing slash, e.g. `http://localhost:5000/api`.
    base: String,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Builds a client with connection pooling and a per-request timeout.
    pub fn new(
        base_url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(timeout)
            .build()?;
        Self::with_http_client(http, base_url, token)
    }

    /// Wraps an existing `reqwest::Client` (tests use a plain default client).
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        token: Option<SecretString>,
    ) -> Result<Self, ApiError> {
        let parsed =
            validate_api_base(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        let base = parsed.as_str().trim_end_matches('/').to_string();

        if token.is_none() {
            tracing::debug!(base = %base, "No bearer token configured, user endpoints will be anonymous");
        }

        Ok(Self { http, base, token })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `GET /health`, used by `--health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health", &[]).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Attach the bearer token when one is stored; otherwise send the request bare
    /// and let the server decide.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status().as_u16()));
        }

        read_limited(response, MAX_BODY_SIZE).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "GET");
        let body = self.send(self.http.get(&url).query(query)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_movies(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Movie>, ApiError> {
        let response: MoviesResponse = self.get_json(path, query).await?;
        Ok(response.movies)
    }
}

#[async_trait::async_trait]
impl CatalogGateway for ApiClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Movie>, ApiError> {
        self.get_movies(
            "/search",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn movie(&self, movie_id: MovieId) -> Result<MovieDetails, ApiError> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }

    async fn recommend(
        &self,
        seed: Option<MovieId>,
        limit: usize,
    ) -> Result<Vec<Movie>, ApiError> {
        let mut query = Vec::with_capacity(2);
        if let Some(movie_id) = seed {
            query.push(("movie_id", movie_id.to_string()));
        }
        query.push(("limit", limit.to_string()));
        self.get_movies("/recommend", &query).await
    }

    async fn trending(&self, limit: usize) -> Result<Vec<Movie>, ApiError> {
        self.get_movies("/trending", &[("limit", limit.to_string())])
            .await
    }

    async fn genres(&self) -> Result<Vec<String>, ApiError> {
        let response: GenresResponse = self.get_json("/genres", &[]).await?;
        Ok(response.genres)
    }

    async fn movies_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<Movie>, ApiError> {
        self.get_movies(
            "/movies/genre",
            &[("genre", genre.to_string()), ("limit", limit.to_string())],
        )
        .await
    }
}

#[async_trait::async_trait]
impl UserGateway for ApiClient {
    async fn favorites(&self) -> Result<Vec<Movie>, ApiError> {
        self.get_movies("/user/favorites", &[]).await
    }

    async fn add_favorite(&self, movie_id: MovieId) -> Result<(), ApiError> {
        let url = self.endpoint("/user/favorites");
        tracing::debug!(movie_id, "POST favorite");
        self.send(self.http.post(&url).json(&AddFavoriteRequest { movie_id }))
            .await?;
        Ok(())
    }

    async fn remove_favorite(&self, movie_id: MovieId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/user/favorites/{}", movie_id));
        tracing::debug!(movie_id, "DELETE favorite");
        self.send(self.http.delete(&url)).await?;
        Ok(())
    }

    async fn history(&self) -> Result<Vec<Movie>, ApiError> {
        self.get_movies("/user/history", &[]).await
    }
}

async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
