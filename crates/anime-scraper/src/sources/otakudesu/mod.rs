//! otakudesu scraper.
//!
//! Each operation fetches one upstream page and hands the body to a
//! synchronous parser; parsed documents never live across an `.await`.

mod anime;
mod batch;
mod catalog;
mod episode;
mod listing;

pub use anime::parse_anime;
pub use batch::parse_batch;
pub use catalog::{parse_anime_list, parse_genres, parse_schedule};
pub use episode::{decode_server_id, parse_embed_response, parse_episode, ServerToken};
pub use listing::{parse_completed, parse_genre_page, parse_home, parse_ongoing, parse_search};

use super::paged_path;
use crate::dom;
use crate::error::{Result, ScrapeError};
use crate::fetch::PageFetcher;
use crate::pagination::validate_page;
use crate::slug::{api_href, slug_or_empty, validate_slug};
use scraper::ElementRef;
use serde::Deserialize;
use shared::config::OtakudesuConfig;
use shared::{
    AnimeCard, AnimeDetail, AnimeListGroup, BatchDetail, EpisodeDetail, Genre, OtakudesuHome,
    Paged, ScheduleDay, StreamServer,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const SOURCE: &str = "otakudesu";

const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";

/// Genre record from an `<a href=".../genres/{slug}/">` link
pub(crate) fn genre_from_link(link: ElementRef<'_>) -> Option<Genre> {
    let genre_id = slug_or_empty(&dom::attr(link, "href")?);
    if genre_id.is_empty() {
        return None;
    }
    Some(Genre {
        title: dom::text(link),
        href: api_href(SOURCE, "genres", &genre_id),
        genre_id,
    })
}

/// `{"data": "..."}` payload of admin-ajax responses
#[derive(Debug, Deserialize)]
struct AjaxData {
    data: String,
}

/// otakudesu client
pub struct Otakudesu {
    fetcher: Arc<dyn PageFetcher>,
    config: OtakudesuConfig,
}

impl Otakudesu {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: OtakudesuConfig) -> Self {
        Self { fetcher, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn page(&self, path: &str) -> Result<String> {
        self.fetcher.get(&self.url(path)).await
    }

    pub async fn home(&self) -> Result<OtakudesuHome> {
        info!(source = SOURCE, "Scraping home");
        let body = self.page("/").await?;
        Ok(parse_home(&body))
    }

    pub async fn ongoing(&self, page: u32) -> Result<Paged<AnimeCard>> {
        let page = validate_page(page)?;
        info!(source = SOURCE, page = page, "Scraping ongoing anime");
        let body = self.page(&paged_path("/ongoing-anime/", page)).await?;
        Ok(parse_ongoing(&body, page))
    }

    pub async fn completed(&self, page: u32) -> Result<Paged<AnimeCard>> {
        let page = validate_page(page)?;
        info!(source = SOURCE, page = page, "Scraping completed anime");
        let body = self.page(&paged_path("/complete-anime/", page)).await?;
        Ok(parse_completed(&body, page))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<AnimeCard>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScrapeError::InvalidInput("search query is empty".to_string()));
        }
        info!(source = SOURCE, query = %query, "Searching anime");
        let path = format!("/?s={}&post_type=anime", urlencoding::encode(query));
        let body = self.page(&path).await?;
        Ok(parse_search(&body))
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        info!(source = SOURCE, "Scraping genre list");
        let body = self.page("/genre-list/").await?;
        Ok(parse_genres(&body))
    }

    pub async fn genre_anime(&self, genre_id: &str, page: u32) -> Result<Paged<AnimeCard>> {
        let genre_id = validate_slug(genre_id)?;
        let page = validate_page(page)?;
        info!(source = SOURCE, genre = %genre_id, page = page, "Scraping genre");
        let prefix = format!("/genres/{}/", urlencoding::encode(genre_id));
        let body = self.page(&paged_path(&prefix, page)).await?;
        Ok(parse_genre_page(&body, page))
    }

    pub async fn schedule(&self) -> Result<Vec<ScheduleDay>> {
        info!(source = SOURCE, "Scraping release schedule");
        let body = self.page("/jadwal-rilis/").await?;
        Ok(parse_schedule(&body))
    }

    pub async fn anime_list(&self) -> Result<Vec<AnimeListGroup>> {
        info!(source = SOURCE, "Scraping anime index");
        let body = self.page("/anime-list/").await?;
        Ok(parse_anime_list(&body))
    }

    pub async fn anime(&self, anime_id: &str) -> Result<AnimeDetail> {
        let anime_id = validate_slug(anime_id)?;
        info!(source = SOURCE, anime = %anime_id, "Scraping anime detail");
        let body = self.page(&format!("/anime/{}/", urlencoding::encode(anime_id))).await?;
        parse_anime(&body, anime_id)
    }

    pub async fn episode(&self, episode_id: &str) -> Result<EpisodeDetail> {
        let episode_id = validate_slug(episode_id)?;
        info!(source = SOURCE, episode = %episode_id, "Scraping episode");
        let body = self.page(&format!("/episode/{}/", urlencoding::encode(episode_id))).await?;
        parse_episode(&body)
    }

    pub async fn batch(&self, batch_id: &str) -> Result<BatchDetail> {
        let batch_id = validate_slug(batch_id)?;
        info!(source = SOURCE, batch = %batch_id, "Scraping batch");
        let body = self.page(&format!("/batch/{}/", urlencoding::encode(batch_id))).await?;
        parse_batch(&body, batch_id)
    }

    /// Resolve a mirror id into its embed URL.
    ///
    /// The site hands out a nonce first, then returns the player markup
    /// base64-encoded for the mirror's `{id, i, q}` triple.
    pub async fn server(&self, server_id: &str) -> Result<StreamServer> {
        let token = decode_server_id(server_id)?;
        let ajax_url = self.url(AJAX_PATH);

        let nonce_body = self
            .fetcher
            .post_form(&ajax_url, &[("action", self.config.nonce_action.as_str())])
            .await?;
        let nonce: AjaxData = serde_json::from_str(&nonce_body)
            .map_err(|e| ScrapeError::parse("nonce response", e))?;
        debug!(source = SOURCE, "Obtained player nonce");

        let embed_body = self
            .fetcher
            .post_form(
                &ajax_url,
                &[
                    ("id", token.id.as_str()),
                    ("i", token.i.as_str()),
                    ("q", token.q.as_str()),
                    ("nonce", nonce.data.as_str()),
                    ("action", self.config.embed_action.as_str()),
                ],
            )
            .await?;
        let embed: AjaxData = serde_json::from_str(&embed_body)
            .map_err(|e| ScrapeError::parse("embed response", e))?;

        let url = parse_embed_response(&embed.data)?;
        Ok(StreamServer { url })
    }
}
