//! Integration tests for the dashboard store running against a mocked
//! Panchax API through the real HTTP client.
//!
//! Each test starts its own `wiremock` server; request counts are checked
//! either with `expect(n)` (verified when the server drops) or by
//! inspecting `received_requests()`.

use panchax::api::ApiClient;
use panchax::dashboard::{
    DashboardError, DashboardEvent, DashboardStore, DetailPane, FailureKind, FetchTarget,
    StoreOptions, Tab,
};
use panchax::session::UserIdentity;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn movie(id: i64, title: &str) -> Value {
    json!({
        "movieId": id,
        "title": title,
        "genres": ["Drama"],
        "avg_rating": 3.5,
        "imdb_url": "",
        "poster_url": null
    })
}

fn movies(list: &[(i64, &str)]) -> Value {
    json!({ "movies": list.iter().map(|(id, t)| movie(*id, t)).collect::<Vec<_>>() })
}

fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn user() -> UserIdentity {
    UserIdentity {
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
    }
}

fn store_for(server: &MockServer) -> (DashboardStore, mpsc::Receiver<DashboardEvent>) {
    let client = ApiClient::with_http_client(
        reqwest::Client::new(),
        &format!("{}/api", server.uri()),
        Some(SecretString::from("test-token".to_string())),
    )
    .unwrap();
    let client = Arc::new(client);
    let (tx, rx) = mpsc::channel(32);
    let store = DashboardStore::new(client.clone(), client, tx, StoreOptions::default());
    (store, rx)
}

/// Mounts the history and genre reads that most tests do not care about.
async fn mount_quiet_initial_reads(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/user/history"))
        .respond_with(ok_json(movies(&[])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/genres"))
        .respond_with(ok_json(json!({"genres": ["Drama", "Comedy"]})))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, http_method: &str, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
        .count()
}

async fn loaded_store(server: &MockServer) -> (DashboardStore, mpsc::Receiver<DashboardEvent>) {
    let (mut store, mut rx) = store_for(server);
    store.initialize(Some(user())).unwrap();
    store.settle(&mut rx).await;
    (store, rx)
}

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_initial_load_populates_everything() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .and(query_param("limit", "20"))
        .respond_with(ok_json(movies(&[(1, "Heat"), (2, "Alien"), (3, "Up")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[(4, "Brazil")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ok_json(movies(&[(2, "Alien")])))
        .expect(1)
        .mount(&server)
        .await;

    let (store, _rx) = loaded_store(&server).await;
    let view = store.view();

    assert!(!view.loading);
    assert_eq!(view.trending.len(), 3);
    assert_eq!(view.recommended.len(), 1);
    assert!(view.is_favorite(2));
    assert_eq!(view.genres, vec!["Comedy", "Drama"]);
    assert_eq!(view.active_tab, Tab::Trending);
    assert!(store.last_failure().is_none());

    // Recommendations on entry are unseeded.
    let requests = server.received_requests().await.unwrap();
    let recommend = requests
        .iter()
        .find(|r| r.url.path() == "/api/recommend")
        .unwrap();
    assert_eq!(recommend.url.query(), Some("limit=20"));
}

#[tokio::test]
async fn test_failed_favorites_fetch_does_not_block_others() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ok_json(movies(&[(1, "Heat"), (2, "Alien"), (3, "Up")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (store, _rx) = loaded_store(&server).await;

    assert_eq!(store.view().trending.len(), 3);
    assert_eq!(store.view().favorites.len(), 0);
    assert!(!store.view().loading);
    let failure = store.last_failure().unwrap();
    assert_eq!(failure.kind, FailureKind::PartialInitializationFailure);
    assert_eq!(failure.targets, vec![FetchTarget::Favorites]);
}

#[tokio::test]
async fn test_unauthenticated_entry_makes_no_requests() {
    let server = MockServer::start().await;
    let (mut store, _rx) = store_for(&server);

    assert_eq!(store.initialize(None), Err(DashboardError::Unauthenticated));
    assert!(store.is_settled());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Favorite Reconciliation
// ============================================================================

#[tokio::test]
async fn test_toggle_cached_movie_appends_without_favorites_fetch() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ok_json(movies(&[(42, "Arrival"), (7, "Heat")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[(1, "Before")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[(8, "After"), (9, "After too")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ok_json(movies(&[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/favorites"))
        .and(body_json(json!({"movie_id": 42})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "added"})))
        .expect(1)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    store.toggle_favorite(42, true);
    store.settle(&mut rx).await;

    let favorite = store.view().favorites.find(42).unwrap();
    assert_eq!(favorite.title, "Arrival");
    assert_eq!(
        store.view().recommended.ids().collect::<Vec<_>>(),
        vec![8, 9]
    );
    assert_eq!(requests_to(&server, "GET", "/api/recommend").await, 2);
}

#[tokio::test]
async fn test_toggle_uncached_movie_refetches_favorites() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ok_json(movies(&[(1, "Heat")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[(3, "Rec")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ok_json(movies(&[])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ok_json(movies(&[(99, "Server copy"), (5, "Older favorite")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/favorites"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    store.toggle_favorite(99, true);
    store.settle(&mut rx).await;

    assert_eq!(requests_to(&server, "GET", "/api/user/favorites").await, 2);
    let titles: Vec<_> = store
        .view()
        .favorites
        .iter()
        .map(|m| (m.movie_id, m.title.clone()))
        .collect();
    assert_eq!(
        titles,
        vec![
            (99, "Server copy".to_string()),
            (5, "Older favorite".to_string())
        ]
    );
    // The refresh runs after the re-fetch landed.
    assert_eq!(requests_to(&server, "GET", "/api/recommend").await, 2);
}

#[tokio::test]
async fn test_failed_add_changes_nothing_and_skips_refresh() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ok_json(movies(&[(42, "Arrival")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[(3, "Rec")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ok_json(movies(&[(5, "Kept")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/favorites"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    let before = store.view().clone();
    store.toggle_favorite(42, true);
    store.settle(&mut rx).await;

    assert_eq!(store.view(), &before);
    assert_eq!(
        store.last_failure().map(|f| f.kind),
        Some(FailureKind::ReconciliationAbort)
    );
}

#[tokio::test]
async fn test_add_then_remove_restores_favorites() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ok_json(movies(&[(42, "Arrival")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ok_json(movies(&[(5, "Kept")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/favorites"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/favorites/42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    let before: Vec<_> = store.view().favorites.ids().collect();

    store.toggle_favorite(42, true);
    store.settle(&mut rx).await;
    assert!(store.view().is_favorite(42));

    store.toggle_favorite(42, false);
    store.settle(&mut rx).await;
    assert_eq!(store.view().favorites.ids().collect::<Vec<_>>(), before);
}

#[tokio::test]
async fn test_remove_absent_movie_is_harmless() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/trending"))
        .respond_with(ok_json(movies(&[])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommend"))
        .respond_with(ok_json(movies(&[(3, "Rec")])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/favorites"))
        .respond_with(ok_json(movies(&[(5, "Kept")])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/favorites/77"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    store.toggle_favorite(77, false);
    store.settle(&mut rx).await;

    assert_eq!(store.view().favorites.ids().collect::<Vec<_>>(), vec![5]);
    assert!(store.last_failure().is_none());
}

// ============================================================================
// Search, Genres and Tabs
// ============================================================================

#[tokio::test]
async fn test_search_and_genre_flow() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    for endpoint in ["/api/trending", "/api/recommend", "/api/user/favorites"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ok_json(movies(&[])))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "star wars"))
        .and(query_param("limit", "20"))
        .respond_with(ok_json(movies(&[(260, "Star Wars")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/movies/genre"))
        .and(query_param("genre", "Comedy"))
        .respond_with(ok_json(movies(&[(1, "Airplane!"), (2, "Clue")])))
        .expect(1)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;

    store.search("   ");
    assert!(store.is_settled());

    store.search(" star wars ");
    store.settle(&mut rx).await;
    assert_eq!(store.view().active_tab, Tab::Search);
    assert_eq!(store.visible().ids().collect::<Vec<_>>(), vec![260]);

    store.select_genre("Comedy");
    assert_eq!(store.view().active_tab, Tab::Genre);
    store.settle(&mut rx).await;
    assert_eq!(store.visible().len(), 2);

    store.select_tab_id("trending");
    assert_eq!(store.view().selected_genre, None);
    assert_eq!(store.view().active_tab, Tab::Trending);
    // Search results survive tab changes.
    assert_eq!(store.view().search_results.len(), 1);
}

#[tokio::test]
async fn test_failed_search_keeps_previous_results() {
    let server = MockServer::start().await;
    mount_quiet_initial_reads(&server).await;
    for endpoint in ["/api/trending", "/api/recommend", "/api/user/favorites"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ok_json(movies(&[])))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "alien"))
        .respond_with(ok_json(movies(&[(1, "Alien")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    store.search("alien");
    store.settle(&mut rx).await;
    store.select_tab(Tab::Favorites);

    store.search("broken");
    store.settle(&mut rx).await;

    assert_eq!(store.view().active_tab, Tab::Favorites);
    assert_eq!(store.view().search_results.ids().collect::<Vec<_>>(), vec![1]);
}

// ============================================================================
// Details
// ============================================================================

#[tokio::test]
async fn test_every_details_lookup_refreshes_history() {
    let server = MockServer::start().await;
    for endpoint in ["/api/trending", "/api/recommend", "/api/user/favorites"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ok_json(movies(&[])))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/genres"))
        .respond_with(ok_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/history"))
        .respond_with(ok_json(movies(&[])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/history"))
        .respond_with(ok_json(movies(&[(42, "Arrival")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/movie/42"))
        .respond_with(ok_json(json!({
            "movieId": 42,
            "title": "Arrival",
            "genres": ["Sci-Fi"],
            "avg_rating": 4.1,
            "similar_movies": [movie(43, "Contact")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (mut store, mut rx) = loaded_store(&server).await;
    assert!(store.view().genres.is_empty());

    store.open_details(42);
    store.settle(&mut rx).await;
    match store.details() {
        Some(DetailPane::Ready(details)) => {
            assert_eq!(details.movie.title, "Arrival");
            assert_eq!(details.similar_movies.len(), 1);
        }
        other => panic!("Expected loaded details, got {:?}", other),
    }
    assert_eq!(store.view().recently_watched.ids().collect::<Vec<_>>(), vec![42]);

    // Reopening shows the cached copy but still records the view.
    store.close_details();
    store.open_details(42);
    assert!(matches!(store.details(), Some(DetailPane::Ready(_))));
    store.settle(&mut rx).await;
    assert_eq!(requests_to(&server, "GET", "/api/movie/42").await, 2);
    assert_eq!(requests_to(&server, "GET", "/api/user/history").await, 3);
}
