use serde::{Deserialize, Deserializer, Serialize};

/// Catalog identifier of a movie (`movieId` on the wire).
pub type MovieId = i64;

// ============================================================================
// Catalog Types
// ============================================================================

/// A movie as returned by the catalog service.
///
/// Movies are value objects: the client never edits their fields, it only
/// moves them in and out of collections. Identity is `movie_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Average user rating. Expected in 0.0..=10.0 but not validated.
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub imdb_url: Option<String>,
}

impl Movie {
    /// Creates a movie with only the fields the dashboard needs to render it.
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            genres: Vec::new(),
            avg_rating: 0.0,
            poster_url: None,
            imdb_url: None,
        }
    }
}

/// Response of `GET /movie/{id}`: the movie plus similar titles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub similar_movies: Vec<Movie>,
}

/// The server fills optional links with `""` (or a stringified NaN) when it
/// has nothing, so both are read as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| {
        let trimmed = s.trim();
        !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
    }))
}

// ============================================================================
// Wire Envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct MoviesResponse {
    #[serde(default)]
    pub movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenresResponse {
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddFavoriteRequest {
    pub movie_id: MovieId,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
