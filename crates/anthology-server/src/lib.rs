//! HTTP server assembly for the Anthology API.
//!
//! Mounts [`anthology_api::api_router`] under `/api`, adds permissive CORS
//! and request tracing, and owns the configuration and startup sequence.

pub mod startup;

use std::path::{Path, PathBuf};

use anthology_api::{AppState, Envelope, api_router};
use anthology_core::{
  dynasty::{DynastyClassifier, DynastyRule},
  store::Storage,
};
use anthology_store_sqlite::DEFAULT_POOL_SIZE;
use axum::{
  Router,
  http::{Method, StatusCode, Uri},
};
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, layered from defaults, `config.toml`, and
/// `ANTHOLOGY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub database_path:  PathBuf,
  pub pool_size:      usize,
  /// Replaces the built-in dynasty → group rules, in priority order.
  #[serde(default)]
  pub dynasty_groups: Option<Vec<DynastyRule>>,
}

impl ServerConfig {
  /// Load configuration; a missing file at `path` is not an error.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000_i64)?
      .set_default("database_path", "anthology.db")?
      .set_default("pool_size", DEFAULT_POOL_SIZE as i64)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ANTHOLOGY"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn classifier(&self) -> DynastyClassifier {
    match &self.dynasty_groups {
      Some(rules) => DynastyClassifier::new(rules.iter().cloned()),
      None => DynastyClassifier::default(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: Storage + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .fallback(not_found)
    .layer(cors())
    .layer(TraceLayer::new_for_http())
}

/// Any origin, the usual REST methods, any request header.
pub fn cors() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([
      Method::GET,
      Method::HEAD,
      Method::PUT,
      Method::PATCH,
      Method::POST,
      Method::DELETE,
    ])
    .allow_headers(Any)
}

async fn not_found(uri: Uri) -> Envelope<()> {
  tracing::warn!(%uri, "no such route");
  Envelope::error(StatusCode::NOT_FOUND, "route not found")
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use anthology_core::statement::Statement;
  use anthology_store_sqlite::SqlitePool;
  use axum::{
    body::Body,
    http::{Request, header},
  };
  use tower::ServiceExt as _;

  use super::*;

  async fn test_app() -> Router {
    let pool = SqlitePool::open_in_memory().await.unwrap();
    pool
      .execute(&Statement::new(
        "INSERT INTO poet (id, name, dynasty) VALUES (1, '陶渊明', '东晋')",
      ))
      .await
      .unwrap();
    pool
      .execute(&Statement::new(
        "INSERT INTO poem (id, title, content, poetID) VALUES (1, '饮酒', '结庐在人境，而无车马喧。', 1)",
      ))
      .await
      .unwrap();
    app(AppState::new(Arc::new(pool), DynastyClassifier::default()))
  }

  async fn oneshot(
    app: Router,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
  }

  async fn json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let resp = oneshot(test_app().await, "GET", "/api/poem/1", vec![]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp).await;
    assert_eq!(body["data"]["title"], "饮酒");
    assert_eq!(body["data"]["author"], "陶渊明");
  }

  #[tokio::test]
  async fn unknown_route_is_enveloped_404() {
    let resp = oneshot(test_app().await, "GET", "/nope", vec![]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(resp).await["code"], 404);
  }

  #[tokio::test]
  async fn responses_allow_any_origin() {
    let resp = oneshot(
      test_app().await,
      "GET",
      "/api/poems",
      vec![(header::ORIGIN, "http://localhost:5173")],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "*"
    );
  }

  #[tokio::test]
  async fn preflight_allows_post() {
    let resp = oneshot(
      test_app().await,
      "OPTIONS",
      "/api/comments",
      vec![
        (header::ORIGIN, "http://localhost:5173"),
        (header::ACCESS_CONTROL_REQUEST_METHOD, "POST"),
        (header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"),
      ],
    )
    .await;
    assert!(resp.status().is_success());
    let methods = resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_METHODS)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(methods.contains("POST"), "allow-methods: {methods}");
  }

  #[tokio::test]
  async fn graph_groups_unlisted_dynasty_as_other() {
    let resp = oneshot(test_app().await, "GET", "/api/relationships", vec![]).await;
    let body = json(resp).await;
    assert_eq!(body["data"]["nodes"][0]["id"], "陶渊明");
    // "东晋" contains neither "魏晋" nor any other listed pattern.
    assert_eq!(body["data"]["nodes"][0]["group"], 99);
    assert_eq!(body["data"]["links"], serde_json::json!([]));
  }

  #[test]
  fn configured_rules_replace_defaults() {
    let cfg = ServerConfig {
      host:           "127.0.0.1".into(),
      port:           3000,
      database_path:  ":memory:".into(),
      pool_size:      1,
      dynasty_groups: Some(vec![DynastyRule::new("晋", 5)]),
    };
    let classifier = cfg.classifier();
    assert_eq!(classifier.classify("东晋"), 5);
    assert_eq!(classifier.classify("唐"), 99);
    assert_eq!(cfg.address(), "127.0.0.1:3000");
  }

  #[test]
  fn missing_config_file_uses_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/anthology.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.pool_size, DEFAULT_POOL_SIZE);
    assert!(cfg.dynasty_groups.is_none());
  }
}
