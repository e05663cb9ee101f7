use crate::response::Envelope;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceIndex {
    source: &'static str,
    base_path: &'static str,
    routes: &'static [&'static str],
}

const OTAKUDESU_ROUTES: &[&str] = &[
    "GET /otakudesu/home",
    "GET /otakudesu/ongoing?page=",
    "GET /otakudesu/completed?page=",
    "GET /otakudesu/search?q=",
    "GET /otakudesu/genres",
    "GET /otakudesu/genres/{genreId}?page=",
    "GET /otakudesu/schedule",
    "GET /otakudesu/anime",
    "GET /otakudesu/anime/{animeId}",
    "GET /otakudesu/episode/{episodeId}",
    "GET /otakudesu/batch/{batchId}",
    "GET /otakudesu/server/{serverId}",
];

const SAMEHADAKU_ROUTES: &[&str] = &[
    "GET /samehadaku/home",
    "GET /samehadaku/recent?page=",
    "GET /samehadaku/ongoing?page=",
    "GET /samehadaku/completed?page=",
    "GET /samehadaku/search?q=&page=",
    "GET /samehadaku/genres",
    "GET /samehadaku/genres/{genreId}?page=",
    "GET /samehadaku/anime/{animeId}",
    "GET /samehadaku/episode/{episodeId}",
    "GET /samehadaku/server/{serverId}",
];

/// Lists the sources and their routes
pub async fn index_handler() -> Envelope<Vec<SourceIndex>> {
    Envelope::ok(vec![
        SourceIndex {
            source: "otakudesu",
            base_path: "/otakudesu",
            routes: OTAKUDESU_ROUTES,
        },
        SourceIndex {
            source: "samehadaku",
            base_path: "/samehadaku",
            routes: SAMEHADAKU_ROUTES,
        },
    ])
}
