//! Episode pages and mirror ids.

use super::SOURCE;
use crate::dom::{self, css, first_match, info_key, text, text_of};
use crate::error::{Result, ScrapeError};
use crate::slug::{api_href, slug_or_empty};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use scraper::{ElementRef, Html};
use serde::Deserialize;
use serde_json::Value;
use shared::{
    DownloadLink, DownloadQuality, EpisodeDetail, EpisodeLink, ServerQuality, StreamServerRef,
};
use std::collections::BTreeMap;

/// Mirror triple the player endpoint expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerToken {
    pub id: String,
    pub i: String,
    pub q: String,
}

#[derive(Deserialize)]
struct RawToken {
    id: Value,
    i: Value,
    q: Value,
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode an API server id back into the mirror triple.
///
/// Ids are URL-safe base64 of the page's `data-content` JSON; the page's own
/// standard base64 is accepted too.
pub fn decode_server_id(server_id: &str) -> Result<ServerToken> {
    let invalid = || ScrapeError::InvalidInput(format!("invalid server id: {}", server_id));

    let bytes = URL_SAFE_NO_PAD
        .decode(server_id.trim_end_matches('='))
        .or_else(|_| STANDARD.decode(server_id))
        .map_err(|_| invalid())?;

    let raw: RawToken = serde_json::from_slice(&bytes).map_err(|_| invalid())?;

    Ok(ServerToken {
        id: scalar(&raw.id).ok_or_else(invalid)?,
        i: scalar(&raw.i).ok_or_else(invalid)?,
        q: scalar(&raw.q).ok_or_else(invalid)?,
    })
}

/// Re-encode a page `data-content` value into a path-safe id
fn server_id_from_content(content: &str) -> Option<String> {
    let bytes = STANDARD.decode(content.trim()).ok()?;
    Some(URL_SAFE_NO_PAD.encode(bytes))
}

/// Pull the iframe URL out of the base64 player markup
pub fn parse_embed_response(data: &str) -> Result<String> {
    let markup = STANDARD
        .decode(data.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| data.to_string());

    let fragment = Html::parse_fragment(&markup);
    dom::attr_of(fragment.root_element(), css!("iframe"), "src")
        .ok_or_else(|| ScrapeError::NotFound("embed player".to_string()))
}

/// Download blocks: `<li><strong>Mp4 480p</strong><a>Host</a>…<i>80 MB</i></li>`
pub(super) fn parse_downloads(scope: ElementRef<'_>) -> Vec<DownloadQuality> {
    scope
        .select(css!("ul > li"))
        .filter_map(|item| {
            let quality = text_of(item, css!("strong"))?;
            let links = item
                .select(css!("a"))
                .filter_map(|link| {
                    Some(DownloadLink {
                        title: text(link),
                        url: dom::attr(link, "href")?,
                    })
                })
                .collect();

            Some(DownloadQuality {
                quality,
                size: text_of(item, css!("i")),
                links,
            })
        })
        .collect()
}

fn quality_of(list: ElementRef<'_>) -> String {
    let from_class = list
        .value()
        .classes()
        .find(|class| class.starts_with('m') && class.ends_with('p'))
        .map(|class| class.trim_start_matches('m').to_string());

    from_class
        .or_else(|| {
            text_of(list, css!("span"))
                .and_then(|label| label.split_whitespace().last().map(str::to_string))
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_servers(root: ElementRef<'_>) -> Vec<ServerQuality> {
    root.select(css!(".mirrorstream > ul"))
        .map(|list| {
            let servers = list
                .select(css!("li a[data-content]"))
                .filter_map(|link| {
                    let server_id = server_id_from_content(&dom::attr(link, "data-content")?)?;
                    Some(StreamServerRef {
                        title: text(link),
                        href: api_href(SOURCE, "server", &server_id),
                        server_id,
                    })
                })
                .collect();

            ServerQuality {
                quality: quality_of(list),
                servers,
            }
        })
        .filter(|quality| !quality.servers.is_empty())
        .collect()
}

fn episode_link(link: ElementRef<'_>) -> Option<EpisodeLink> {
    let episode_id = slug_or_empty(&dom::attr(link, "href")?);
    if episode_id.is_empty() {
        return None;
    }
    Some(EpisodeLink {
        title: text(link),
        href: api_href(SOURCE, "episode", &episode_id),
        episode_id,
        release_date: None,
    })
}

pub fn parse_episode(body: &str) -> Result<EpisodeDetail> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let title_selectors = [
        css!(".venutama h1.posttl"),
        css!("h1.posttl"),
        css!(".venutama h1"),
    ];
    let title = first_match(root, &title_selectors)
        .map(text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ScrapeError::NotFound("episode".to_string()))?;

    let mut detail = EpisodeDetail {
        title,
        release_info: text_of(root, css!(".kategoz span")),
        default_streaming_url: first_match(
            root,
            &[css!("#pembed iframe"), css!(".player-embed iframe")],
        )
        .and_then(|iframe| dom::attr(iframe, "src")),
        servers: parse_servers(root),
        ..Default::default()
    };

    for link in root.select(css!(".flir a")) {
        let href = dom::attr(link, "href").unwrap_or_default();
        let label = format!(
            "{} {}",
            text(link),
            dom::attr(link, "title").unwrap_or_default()
        )
        .to_lowercase();

        if href.contains("/anime/") {
            detail.anime_id = crate::slug::slug(&href);
        } else if label.contains("prev") || label.contains("sebelum") {
            detail.prev_episode = episode_link(link);
        } else if label.contains("next") || label.contains("selanjut") {
            detail.next_episode = episode_link(link);
        }
    }
    detail.has_prev_episode = detail.prev_episode.is_some();
    detail.has_next_episode = detail.next_episode.is_some();

    if let Some(block) = first_match(root, &[css!(".download"), css!(".download-eps")]) {
        detail.downloads = parse_downloads(block);
    }

    let mut info = BTreeMap::new();
    for span in root.select(css!(".infozingle p span")) {
        if let Some((label, value)) = dom::split_label(&text(span)) {
            info.insert(info_key(&label), value);
        }
    }
    detail.info = info;

    Ok(detail)
}
