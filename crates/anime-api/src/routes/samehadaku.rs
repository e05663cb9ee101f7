//! `/samehadaku/...` handlers.

use super::{PageQuery, SearchQuery};
use crate::extract::{ApiPath, ApiQuery};
use crate::response::{ApiResult, Envelope};
use crate::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use shared::{AnimeCard, AnimeDetail, EpisodeDetail, Genre, SamehadakuHome, StreamServer};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/recent", get(recent))
        .route("/ongoing", get(ongoing))
        .route("/completed", get(completed))
        .route("/search", get(search))
        .route("/genres", get(genres))
        .route("/genres/:genre_id", get(genre_anime))
        .route("/anime/:anime_id", get(anime))
        .route("/episode/:episode_id", get(episode))
        .route("/server/:server_id", get(server))
}

async fn home(State(state): State<AppState>) -> ApiResult<SamehadakuHome> {
    Ok(Envelope::ok(state.samehadaku.home().await?))
}

async fn recent(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(state.samehadaku.recent(page).await?))
}

async fn ongoing(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(state.samehadaku.ongoing(page).await?))
}

async fn completed(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(state.samehadaku.completed(page).await?))
}

async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let q = query.query()?;
    let page = query.page()?;
    Ok(Envelope::paged(state.samehadaku.search(q, page).await?))
}

async fn genres(State(state): State<AppState>) -> ApiResult<Vec<Genre>> {
    Ok(Envelope::ok(state.samehadaku.genres().await?))
}

async fn genre_anime(
    State(state): State<AppState>,
    ApiPath(genre_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(
        state.samehadaku.genre_anime(&genre_id, page).await?,
    ))
}

async fn anime(
    State(state): State<AppState>,
    ApiPath(anime_id): ApiPath<String>,
) -> ApiResult<AnimeDetail> {
    Ok(Envelope::ok(state.samehadaku.anime(&anime_id).await?))
}

async fn episode(
    State(state): State<AppState>,
    ApiPath(episode_id): ApiPath<String>,
) -> ApiResult<EpisodeDetail> {
    Ok(Envelope::ok(state.samehadaku.episode(&episode_id).await?))
}

async fn server(
    State(state): State<AppState>,
    ApiPath(server_id): ApiPath<String>,
) -> ApiResult<StreamServer> {
    Ok(Envelope::ok(state.samehadaku.server(&server_id).await?))
}
