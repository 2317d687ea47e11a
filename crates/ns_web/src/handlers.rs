use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ns_core::{ArticleFeed, CategoryListing, Error};
use ns_scrapers::registry::{list_shared, resolve_shared};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::AppState;

fn default_page() -> String {
    "world".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PagesQuery {
    #[serde(default = "default_page")]
    pub page: String,
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_page")]
    pub page: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: Option<String>,
}

/// Scraper failure mapped to a status code: unknown sources are the
/// caller's problem (404), everything else is ours (500).
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn from_scrape(source: &str, err: Error) -> Self {
        if err.is_unsupported_source() {
            Self {
                status: StatusCode::NOT_FOUND,
                body: ErrorResponse {
                    error: "unsupported_source".to_string(),
                    detail: Some(err.to_string()),
                },
            }
        } else {
            error!(%source, error = %err, "Scrape failed");
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: ErrorResponse {
                    error: "extraction_failed".to_string(),
                    detail: Some(format!("Error scraping {}: {}", source, err)),
                },
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Multi-Source News Scraper API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/sources": "Get available news sources",
            "/pages/{source}": "Get pages/categories for a source",
            "/news/{source}": "Get news feeds from a source",
        }
    }))
}

pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<SourcesResponse> {
    let sources = list_shared(&state.registry);
    Json(SourcesResponse {
        total: sources.len(),
        sources,
    })
}

pub async fn get_pages(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
    Query(query): Query<PagesQuery>,
) -> Result<Json<CategoryListing>, ApiError> {
    info!(%source, page = %query.page, "Listing categories");
    let scraper = resolve_shared(&state.registry, &source).map_err(|e| ApiError::from_scrape(&source, e))?;
    let listing = scraper
        .list_categories(&query.page)
        .await
        .map_err(|e| ApiError::from_scrape(&source, e))?;
    Ok(Json(listing))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(source): Path<String>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<ArticleFeed>, ApiError> {
    info!(%source, page = %query.page, category = %query.category, "Listing articles");
    let scraper = resolve_shared(&state.registry, &source).map_err(|e| ApiError::from_scrape(&source, e))?;
    let feed = scraper
        .list_articles(&query.page, &query.category, &query.subcategory)
        .await
        .map_err(|e| ApiError::from_scrape(&source, e))?;
    Ok(Json(feed))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "detail": null })),
    )
}
