//! samehadaku scraper.

mod anime;
mod episode;
mod listing;

pub use anime::parse_anime;
pub use episode::{decode_server_id, parse_episode, parse_player_response, PlayerRef};
pub use listing::{parse_catalogue, parse_genres, parse_home, parse_recent};

use super::paged_path;
use crate::dom;
use crate::error::{Result, ScrapeError};
use crate::fetch::PageFetcher;
use crate::pagination::validate_page;
use crate::slug::{api_href, slug_or_empty, validate_slug};
use scraper::ElementRef;
use shared::config::SamehadakuConfig;
use shared::{AnimeCard, AnimeDetail, EpisodeDetail, Genre, Paged, SamehadakuHome, StreamServer};
use std::sync::Arc;
use tracing::info;

pub const SOURCE: &str = "samehadaku";

const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";
const ONGOING_FILTER: &str = "?status=Currently+Airing&order=update";
const COMPLETED_FILTER: &str = "?status=Finished+Airing&order=latest";

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

/// samehadaku client
pub struct Samehadaku {
    fetcher: Arc<dyn PageFetcher>,
    config: SamehadakuConfig,
}

impl Samehadaku {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: SamehadakuConfig) -> Self {
        Self { fetcher, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn page(&self, path: &str) -> Result<String> {
        self.fetcher.get(&self.url(path)).await
    }

    pub async fn home(&self) -> Result<SamehadakuHome> {
        info!(source = SOURCE, "Scraping home");
        let body = self.page("/").await?;
        Ok(parse_home(&body))
    }

    pub async fn recent(&self, page: u32) -> Result<Paged<AnimeCard>> {
        let page = validate_page(page)?;
        info!(source = SOURCE, page = page, "Scraping recent episodes");
        let body = self.page(&paged_path("/anime-terbaru/", page)).await?;
        Ok(parse_recent(&body, page))
    }

    pub async fn ongoing(&self, page: u32) -> Result<Paged<AnimeCard>> {
        let page = validate_page(page)?;
        info!(source = SOURCE, page = page, "Scraping ongoing anime");
        let path = format!("{}{}", paged_path("/daftar-anime-2/", page), ONGOING_FILTER);
        let body = self.page(&path).await?;
        Ok(parse_catalogue(&body, page))
    }

    pub async fn completed(&self, page: u32) -> Result<Paged<AnimeCard>> {
        let page = validate_page(page)?;
        info!(source = SOURCE, page = page, "Scraping completed anime");
        let path = format!("{}{}", paged_path("/daftar-anime-2/", page), COMPLETED_FILTER);
        let body = self.page(&path).await?;
        Ok(parse_catalogue(&body, page))
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<Paged<AnimeCard>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScrapeError::InvalidInput("search query is empty".to_string()));
        }
        let page = validate_page(page)?;
        info!(source = SOURCE, query = %query, page = page, "Searching anime");
        let path = format!("{}?s={}", paged_path("/", page), urlencoding::encode(query));
        let body = self.page(&path).await?;
        Ok(parse_catalogue(&body, page))
    }

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        info!(source = SOURCE, "Scraping genre list");
        let body = self.page("/daftar-anime-2/").await?;
        Ok(parse_genres(&body))
    }

    pub async fn genre_anime(&self, genre_id: &str, page: u32) -> Result<Paged<AnimeCard>> {
        let genre_id = validate_slug(genre_id)?;
        let page = validate_page(page)?;
        info!(source = SOURCE, genre = %genre_id, page = page, "Scraping genre");
        let prefix = format!("/genre/{}/", urlencoding::encode(genre_id));
        let body = self.page(&paged_path(&prefix, page)).await?;
        Ok(parse_catalogue(&body, page))
    }

    pub async fn anime(&self, anime_id: &str) -> Result<AnimeDetail> {
        let anime_id = validate_slug(anime_id)?;
        info!(source = SOURCE, anime = %anime_id, "Scraping anime detail");
        let body = self.page(&format!("/anime/{}/", urlencoding::encode(anime_id))).await?;
        parse_anime(&body, anime_id)
    }

    /// Episodes live at the site root: `/{slug}/`
    pub async fn episode(&self, episode_id: &str) -> Result<EpisodeDetail> {
        let episode_id = validate_slug(episode_id)?;
        info!(source = SOURCE, episode = %episode_id, "Scraping episode");
        let body = self.page(&format!("/{}/", urlencoding::encode(episode_id))).await?;
        parse_episode(&body)
    }

    pub async fn server(&self, server_id: &str) -> Result<StreamServer> {
        let reference = decode_server_id(server_id)?;
        info!(source = SOURCE, server = %server_id, "Resolving mirror");

        let body = self
            .fetcher
            .post_form(
                &self.url(AJAX_PATH),
                &[
                    ("action", "player_ajax"),
                    ("post", reference.post.as_str()),
                    ("nume", reference.nume.as_str()),
                    ("type", reference.kind.as_str()),
                ],
            )
            .await?;

        let url = parse_player_response(&body)?;
        Ok(StreamServer { url })
    }
}
