//! `/otakudesu/...` handlers.

use super::{PageQuery, SearchQuery};
use crate::extract::{ApiPath, ApiQuery};
use crate::response::{ApiResult, Envelope};
use crate::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use shared::{
    AnimeCard, AnimeDetail, AnimeListGroup, BatchDetail, EpisodeDetail, Genre, OtakudesuHome,
    ScheduleDay, StreamServer,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/ongoing", get(ongoing))
        .route("/completed", get(completed))
        .route("/search", get(search))
        .route("/genres", get(genres))
        .route("/genres/:genre_id", get(genre_anime))
        .route("/schedule", get(schedule))
        .route("/anime", get(anime_list))
        .route("/anime/:anime_id", get(anime))
        .route("/episode/:episode_id", get(episode))
        .route("/batch/:batch_id", get(batch))
        .route("/server/:server_id", get(server))
}

async fn home(State(state): State<AppState>) -> ApiResult<OtakudesuHome> {
    Ok(Envelope::ok(state.otakudesu.home().await?))
}

async fn ongoing(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(state.otakudesu.ongoing(page).await?))
}

async fn completed(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(state.otakudesu.completed(page).await?))
}

async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    Ok(Envelope::ok(state.otakudesu.search(query.query()?).await?))
}

async fn genres(State(state): State<AppState>) -> ApiResult<Vec<Genre>> {
    Ok(Envelope::ok(state.otakudesu.genres().await?))
}

async fn genre_anime(
    State(state): State<AppState>,
    ApiPath(genre_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<AnimeCard>> {
    let page = query.page()?;
    Ok(Envelope::paged(
        state.otakudesu.genre_anime(&genre_id, page).await?,
    ))
}

async fn schedule(State(state): State<AppState>) -> ApiResult<Vec<ScheduleDay>> {
    Ok(Envelope::ok(state.otakudesu.schedule().await?))
}

async fn anime_list(State(state): State<AppState>) -> ApiResult<Vec<AnimeListGroup>> {
    Ok(Envelope::ok(state.otakudesu.anime_list().await?))
}

async fn anime(
    State(state): State<AppState>,
    ApiPath(anime_id): ApiPath<String>,
) -> ApiResult<AnimeDetail> {
    Ok(Envelope::ok(state.otakudesu.anime(&anime_id).await?))
}

async fn episode(
    State(state): State<AppState>,
    ApiPath(episode_id): ApiPath<String>,
) -> ApiResult<EpisodeDetail> {
    Ok(Envelope::ok(state.otakudesu.episode(&episode_id).await?))
}

async fn batch(
    State(state): State<AppState>,
    ApiPath(batch_id): ApiPath<String>,
) -> ApiResult<BatchDetail> {
    Ok(Envelope::ok(state.otakudesu.batch(&batch_id).await?))
}

async fn server(
    State(state): State<AppState>,
    ApiPath(server_id): ApiPath<String>,
) -> ApiResult<StreamServer> {
    Ok(Envelope::ok(state.otakudesu.server(&server_id).await?))
}
