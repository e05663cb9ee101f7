//! Data models for the scrape API.
//!
//! Every source's extractors produce these records, so routes serve the same
//! JSON shape no matter which site the data came from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anime summary as it appears in listings (home, ongoing, search, genre pages)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeCard {
    pub title: String,
    pub anime_id: String,
    pub poster: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub anime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
}

/// Genre link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub title: String,
    pub genre_id: String,
    pub href: String,
}

/// Link to an episode (or batch) page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeLink {
    pub title: String,
    pub episode_id: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// Full anime page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetail {
    pub title: String,
    pub anime_id: String,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producers: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub anime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aired: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub studios: Option<String>,
    pub synopsis: Vec<String>,
    pub genres: Vec<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<EpisodeLink>,
    pub episodes: Vec<EpisodeLink>,
    pub recommendations: Vec<AnimeCard>,
}

/// Mirror reference; `server_id` is opaque and resolved by the server route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamServerRef {
    pub title: String,
    pub server_id: String,
    pub href: String,
}

/// Mirrors grouped by resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerQuality {
    pub quality: String,
    pub servers: Vec<StreamServerRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub title: String,
    pub url: String,
}

/// Download links grouped by quality/format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuality {
    pub quality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub links: Vec<DownloadLink>,
}

/// Episode page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDetail {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anime_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_streaming_url: Option<String>,
    pub has_prev_episode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_episode: Option<EpisodeLink>,
    pub has_next_episode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_episode: Option<EpisodeLink>,
    pub servers: Vec<ServerQuality>,
    pub downloads: Vec<DownloadQuality>,
    pub info: BTreeMap<String, String>,
}

/// Batch download page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetail {
    pub title: String,
    pub batch_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anime_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub info: BTreeMap<String, String>,
    pub downloads: Vec<DownloadQuality>,
}

/// Plain title/id/href entry used by schedule and A-Z listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeLink {
    pub title: String,
    pub anime_id: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub day: String,
    pub anime: Vec<AnimeLink>,
}

/// One letter of the A-Z anime index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListGroup {
    pub start_with: String,
    pub anime: Vec<AnimeLink>,
}

/// Resolved embed URL for a mirror
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamServer {
    pub url: String,
}

/// Uniform pagination block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub has_prev_page: bool,
    pub prev_page: Option<u32>,
    pub has_next_page: bool,
    pub next_page: Option<u32>,
    pub total_pages: Option<u32>,
}

/// A list of records plus the pagination parsed from the same page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// otakudesu landing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtakudesuHome {
    pub ongoing: Vec<AnimeCard>,
    pub completed: Vec<AnimeCard>,
}

/// samehadaku landing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamehadakuHome {
    pub recent: Vec<AnimeCard>,
    pub top10: Vec<AnimeCard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_serializes_camel_case_and_skips_empty() {
        let card = AnimeCard {
            title: "Frieren".to_string(),
            anime_id: "frieren-sub-indo".to_string(),
            poster: "https://cdn.example/p.jpg".to_string(),
            href: "/otakudesu/anime/frieren-sub-indo".to_string(),
            anime_type: Some("TV".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["animeId"], "frieren-sub-indo");
        assert_eq!(json["type"], "TV");
        assert!(json.get("episodes").is_none());
        assert!(json.get("genres").is_none());
    }

    #[test]
    fn test_detail_omits_missing_fields() {
        let detail = EpisodeDetail {
            title: "Dandadan Episode 1".to_string(),
            release_info: Some("Posted by admin".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["releaseInfo"], "Posted by admin");
        assert!(json.get("animeId").is_none());
        assert!(json.get("prevEpisode").is_none());
        assert!(json.get("defaultStreamingUrl").is_none());
        assert_eq!(json["hasPrevEpisode"], false);

        let anime = serde_json::to_value(AnimeDetail::default()).unwrap();
        assert!(anime.get("japanese").is_none());
        assert!(anime.get("type").is_none());
        assert!(anime.get("batch").is_none());

        let batch = serde_json::to_value(BatchDetail::default()).unwrap();
        assert!(batch.get("poster").is_none());
    }

    #[test]
    fn test_pagination_serialization() {
        let pagination = Pagination {
            current_page: 2,
            has_prev_page: true,
            prev_page: Some(1),
            has_next_page: false,
            next_page: None,
            total_pages: Some(2),
        };

        let json = serde_json::to_value(pagination).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["prevPage"], 1);
        assert!(json["nextPage"].is_null());
    }
}
