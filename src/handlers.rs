use crate::{
    browser::TriggerOutcome,
    domain::SearchQuery,
    errors::AppError,
    models::GifResultSet,
    regions::Page,
    templates::render_page,
    AppState,
};
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing;

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Handler for GET /: the page-ready trigger on a fresh page.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = Page::new();
    let outcome = state.browser.page_ready(&page).await;
    tracing::debug!(?outcome, "Page ready");

    Ok(Html(render_page(&state.templates, &page, "")?))
}

/// Handler for GET /search: submits the query on a fresh page.
///
/// Trending is only fetched when the search did not render, since a rendered
/// search hides it.
pub async fn search_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let page = Page::new();
    let search = state.browser.search_submit(&page, &params.q).await;
    let trending = match search {
        TriggerOutcome::Rendered(_) => None,
        _ => Some(state.browser.page_ready(&page).await),
    };
    tracing::debug!(?search, ?trending, "Search page ready");

    Ok(Html(render_page(&state.templates, &page, params.q.trim())?))
}

/// Handler for GET /api/trending
pub async fn api_trending(State(state): State<Arc<AppState>>) -> Result<Json<GifResultSet>, AppError> {
    let gifs = state.browser.fetch_gifs(&SearchQuery::trending()).await?;
    tracing::info!("Handler retrieved {} trending GIFs", gifs.len());
    Ok(Json(gifs))
}

/// Handler for GET /api/search?q=...
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<GifResultSet>, AppError> {
    let query = SearchQuery::parse(Some(&params.q));
    if query.term().is_none() {
        return Err(AppError::InvalidInput("query parameter 'q' must not be blank".to_string()));
    }

    let gifs = state.browser.fetch_gifs(&query).await?;
    tracing::info!(term = ?query.term(), "Handler retrieved {} GIFs", gifs.len());
    Ok(Json(gifs))
}
