//! Router assembly.

use crate::routes::{self, health::health_handler, index::index_handler};
use crate::state::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use shared::config::ServerConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Permissive unless origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::OPTIONS]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

fn cache_control(max_age_seconds: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("public, max-age={}", max_age_seconds))
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
}

/// Build the application router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .nest("/otakudesu", routes::otakudesu::router())
        .nest("/samehadaku", routes::samehadaku::router())
        .fallback(routes::not_found)
        // Error responses set their own `no-store`
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            cache_control(server.cache_max_age_seconds),
        ))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_scraper::StaticPages;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use shared::config::SourcesConfig;
    use std::sync::Arc;
    use tower::ServiceExt;

    const OTAKUDESU: &str = "https://otakudesu.test";
    const SAMEHADAKU: &str = "https://samehadaku.test";

    fn sources() -> SourcesConfig {
        let mut sources = SourcesConfig::default();
        sources.otakudesu.base_url = OTAKUDESU.to_string();
        sources.samehadaku.base_url = SAMEHADAKU.to_string();
        sources
    }

    fn app(pages: StaticPages) -> Router {
        let state = AppState::with_fetcher(Arc::new(pages), &sources());
        build_router(state, &ServerConfig::default())
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, cache, serde_json::from_slice(&bytes).unwrap())
    }

    const ONGOING_PAGE: &str = r#"<div class="venz"><ul>
        <li><div class="detpost">
          <div class="epz"><i class="fa fa-play"></i> Episode 7</div>
          <div class="epztipe"><i class="fa fa-calendar"></i> Sabtu</div>
          <div class="newnime">16 Nov</div>
          <div class="thumb"><a href="https://otakudesu.test/anime/dandadan-sub-indo/">
            <div class="thumbz"><img src="https://img.example/ddn.jpg"><h2 class="jdlflm">Dandadan</h2></div>
          </a></div>
        </div></li>
      </ul></div>
      <div class="pagination"><div class="pagenavix">
        <span aria-current="page" class="page-numbers current">2</span>
        <a class="page-numbers" href="/ongoing-anime/page/3/">3</a>
        <a class="next page-numbers" href="/ongoing-anime/page/3/">Berikutnya</a>
      </div></div>"#;

    #[tokio::test]
    async fn test_paged_listing_envelope() {
        let pages = StaticPages::new().with_page(
            format!("{}/ongoing-anime/page/2/", OTAKUDESU),
            ONGOING_PAGE,
        );

        let (status, cache, json) = call(app(pages), "/otakudesu/ongoing?page=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("public, max-age=300"));
        assert_eq!(json["status"], 200);
        assert_eq!(json["ok"], true);
        assert_eq!(json["data"][0]["animeId"], "dandadan-sub-indo");
        assert_eq!(json["data"][0]["href"], "/otakudesu/anime/dandadan-sub-indo");
        assert_eq!(json["pagination"]["currentPage"], 2);
        assert_eq!(json["pagination"]["prevPage"], 1);
        assert_eq!(json["pagination"]["nextPage"], 3);
    }

    #[tokio::test]
    async fn test_upstream_404_maps_to_not_found_envelope() {
        let (status, cache, json) = call(app(StaticPages::new()), "/otakudesu/anime/ghost").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(json["ok"], false);
        assert_eq!(json["status"], 404);
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn test_bad_page_param_is_400() {
        let (status, _, json) = call(app(StaticPages::new()), "/samehadaku/recent?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);

        let (status, _, _) = call(app(StaticPages::new()), "/otakudesu/completed?page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_server_id_is_400() {
        let (status, _, _) = call(app(StaticPages::new()), "/samehadaku/server/garbage").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let (status, _, json) = call(app(StaticPages::new()), "/otakudesu/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("`q`"));
    }

    #[tokio::test]
    async fn test_samehadaku_episode() {
        let pages = StaticPages::new().with_page(
            format!("{}/dandadan-episode-2/", SAMEHADAKU),
            r#"<h1 class="entry-title">Dandadan Episode 2</h1>
               <div class="naveps"><div class="nvs"><a href="/dandadan-episode-1/">Prev</a></div></div>"#,
        );

        let (status, _, json) = call(app(pages), "/samehadaku/episode/dandadan-episode-2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Dandadan Episode 2");
        assert_eq!(json["data"]["hasPrevEpisode"], true);
        assert_eq!(json["data"]["prevEpisode"]["episodeId"], "dandadan-episode-1");
        assert!(json["pagination"].is_null());
    }

    #[tokio::test]
    async fn test_index_health_and_unknown_route() {
        let (status, _, json) = call(app(StaticPages::new()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["source"], "otakudesu");

        let (status, _, json) = call(app(StaticPages::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "healthy");

        let (status, _, json) = call(app(StaticPages::new()), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["ok"], false);
    }

    #[tokio::test]
    async fn test_extractor_rejections_use_envelope() {
        let (status, cache, json) =
            call(app(StaticPages::new()), "/otakudesu/ongoing?page=1&page=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(json["ok"], false);
        assert_eq!(json["status"], 400);

        let (status, _, json) = call(app(StaticPages::new()), "/otakudesu/anime/%FF").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);
        assert!(json["data"].is_null());
    }

    const SEARCH_PAGE: &str = r#"<ul class="chivsrc">
        <li><h2><a href="https://otakudesu.test/anime/re%3Azero-sub-indo/">Re:Zero</a></h2></li>
        <li><h2><a href="https://otakudesu.test/anime/oshi-no-ko-%e2%98%86-sub-indo/">Oshi no Ko</a></h2></li>
      </ul>"#;

    #[tokio::test]
    async fn test_returned_hrefs_resolve() {
        let detail = |title: &str| {
            format!(
                r#"<div class="infozingle"><p><span><b>Judul</b>: {}</span></p></div>"#,
                title
            )
        };
        let pages = StaticPages::new()
            .with_page(format!("{}/?s=rezero&post_type=anime", OTAKUDESU), SEARCH_PAGE)
            .with_page(
                format!("{}/anime/re%3Azero-sub-indo/", OTAKUDESU),
                detail("Re:Zero"),
            )
            .with_page(
                format!("{}/anime/oshi-no-ko-%E2%98%86-sub-indo/", OTAKUDESU),
                detail("Oshi no Ko"),
            );
        let app = app(pages);

        let (status, _, json) = call(app.clone(), "/otakudesu/search?q=rezero").await;
        assert_eq!(status, StatusCode::OK);
        let cards = json["data"].as_array().unwrap().clone();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0]["animeId"], "re:zero-sub-indo");
        assert_eq!(cards[0]["href"], "/otakudesu/anime/re%3Azero-sub-indo");

        for card in cards {
            let href = card["href"].as_str().unwrap();
            let (status, _, json) = call(app.clone(), href).await;
            assert_eq!(status, StatusCode::OK, "{}", href);
            assert_eq!(json["data"]["animeId"], card["animeId"]);
        }
    }

    #[test]
    fn test_cache_control_value() {
        assert_eq!(cache_control(60), "public, max-age=60");
    }
}
