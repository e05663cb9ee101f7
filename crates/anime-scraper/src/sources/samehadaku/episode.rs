//! Episode pages and `player_ajax` mirror ids.

use super::SOURCE;
use crate::dom::{self, css, first_match, text, text_of};
use crate::error::{Result, ScrapeError};
use crate::slug::{api_href, slug, slug_or_empty};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use shared::{
    DownloadLink, DownloadQuality, EpisodeDetail, EpisodeLink, ServerQuality, StreamServerRef,
};

static QUALITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{3,4}p|4k|fullhd|hd)\b").expect("valid quality regex"));

/// Mirror reference for the `player_ajax` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    pub post: String,
    pub nume: String,
    pub kind: String,
}

impl PlayerRef {
    /// `{post}-{nume}-{type}`
    pub fn server_id(&self) -> String {
        format!("{}-{}-{}", self.post, self.nume, self.kind)
    }
}

pub fn decode_server_id(server_id: &str) -> Result<PlayerRef> {
    let invalid = || ScrapeError::InvalidInput(format!("invalid server id: {}", server_id));

    let mut parts = server_id.splitn(3, '-');
    let post = parts.next().ok_or_else(invalid)?;
    let nume = parts.next().ok_or_else(invalid)?;
    let kind = parts.next().ok_or_else(invalid)?;

    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !numeric(post) || !numeric(nume) || kind.is_empty() {
        return Err(invalid());
    }
    if !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }

    Ok(PlayerRef {
        post: post.to_string(),
        nume: nume.to_string(),
        kind: kind.to_string(),
    })
}

/// Iframe URL from the `player_ajax` response markup
pub fn parse_player_response(body: &str) -> Result<String> {
    let fragment = Html::parse_fragment(body);
    dom::attr_of(fragment.root_element(), css!("iframe"), "src")
        .ok_or_else(|| ScrapeError::NotFound("embed player".to_string()))
}

fn quality_of(label: &str) -> String {
    QUALITY
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Mirrors grouped by the resolution in their label, first-seen order
fn parse_servers(root: ElementRef<'_>) -> Vec<ServerQuality> {
    let mut groups: Vec<ServerQuality> = Vec::new();

    for option in root.select(css!("[data-post][data-nume][data-type]")) {
        let reference = PlayerRef {
            post: dom::attr(option, "data-post").unwrap_or_default(),
            nume: dom::attr(option, "data-nume").unwrap_or_default(),
            kind: dom::attr(option, "data-type").unwrap_or_default(),
        };
        let Ok(reference) = decode_server_id(&reference.server_id()) else {
            continue;
        };

        let title = text(option);
        let quality = quality_of(&title);
        let server_id = reference.server_id();
        let server = StreamServerRef {
            title,
            href: api_href(SOURCE, "server", &server_id),
            server_id,
        };

        match groups.iter_mut().find(|group| group.quality == quality) {
            Some(group) => group.servers.push(server),
            None => groups.push(ServerQuality {
                quality,
                servers: vec![server],
            }),
        }
    }

    groups
}

/// One `.download-eps` block per container format
fn parse_downloads(root: ElementRef<'_>) -> Vec<DownloadQuality> {
    let mut downloads = Vec::new();

    for block in root.select(css!(".download-eps")) {
        let format = first_match(block, &[css!("p b"), css!("p")]).map(text);

        for item in block.select(css!("ul li")) {
            let Some(resolution) = text_of(item, css!("strong")) else {
                continue;
            };
            let quality = match &format {
                Some(format) if !format.is_empty() => format!("{} {}", format, resolution),
                _ => resolution,
            };

            downloads.push(DownloadQuality {
                quality,
                size: None,
                links: item
                    .select(css!("a"))
                    .filter_map(|link| {
                        Some(DownloadLink {
                            title: text(link),
                            url: dom::attr(link, "href")?,
                        })
                    })
                    .collect(),
            });
        }
    }

    downloads
}

fn nav_link(nav: ElementRef<'_>) -> Option<EpisodeLink> {
    let link = nav.select(css!("a")).next()?;
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

    let title = first_match(root, &[css!(".entry-title"), css!("h1")])
        .map(text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ScrapeError::NotFound("episode".to_string()))?;

    let mut detail = EpisodeDetail {
        title,
        release_info: text_of(root, css!(".time-post")),
        default_streaming_url: first_match(
            root,
            &[css!(".player-embed iframe"), css!("#embed_holder iframe")],
        )
        .and_then(|iframe| dom::attr(iframe, "src")),
        servers: parse_servers(root),
        downloads: parse_downloads(root),
        ..Default::default()
    };

    for nav in root.select(css!(".naveps .nvs")) {
        let classes: Vec<_> = nav.value().classes().collect();
        let href = dom::attr_of(nav, css!("a"), "href").unwrap_or_default();

        if classes.contains(&"nvsc") || href.contains("/anime/") {
            detail.anime_id = slug(&href);
        } else if classes.contains(&"rght") {
            detail.next_episode = nav_link(nav);
        } else {
            detail.prev_episode = nav_link(nav);
        }
    }
    detail.has_prev_episode = detail.prev_episode.is_some();
    detail.has_next_episode = detail.next_episode.is_some();

    for span in root.select(css!(".infox .spe span, .spe span")) {
        let Some(label) = text_of(span, css!("b")) else {
            continue;
        };
        let full = text(span);
        let value = full
            .strip_prefix(label.as_str())
            .unwrap_or(&full)
            .trim_start_matches(':')
            .trim()
            .to_string();
        if !value.is_empty() {
            detail
                .info
                .insert(dom::info_key(label.trim_end_matches(':')), value);
        }
    }

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPISODE_PAGE: &str = r#"<html><body>
      <div class="player-area widget_senction">
        <header class="entry-header"><h1 class="entry-title" itemprop="name">Dandadan Episode 12 Sub Indo</h1>
          <div class="sbdbti"><span class="time-post"><i class="fa fa-calendar"></i> 2 weeks yang lalu</span></div>
        </header>
        <div class="player-embed" id="embed_holder"><div class="pframe"><iframe src="https://www.blogger.example/video.g?token=abc" allowfullscreen></iframe></div></div>
        <div class="server_option"><ul>
          <li><div class="east_player_option" data-post="31283" data-nume="1" data-type="schtml"><span>Blogspot 360p</span></div></li>
          <li><div class="east_player_option" data-post="31283" data-nume="2" data-type="schtml"><span>Premium 720p</span></div></li>
          <li><div class="east_player_option" data-post="31283" data-nume="3" data-type="schtml"><span>Mega 720p</span></div></li>
          <li><div class="east_player_option" data-post="31283" data-nume="4" data-type="schtml"><span>Nakama</span></div></li>
        </ul></div>
        <div class="naveps">
          <div class="nvs"><a href="https://v1.samehadaku.how/dandadan-episode-11/"><i class="fa fa-chevron-left"></i> <span>Prev</span></a></div>
          <div class="nvs nvsc"><a href="https://v1.samehadaku.how/anime/dandadan/"><i class="fa fa-th-list"></i> <span>All Episode</span></a></div>
          <div class="nvs rght"><span class="nolink"><span>Next</span></span></div>
        </div>
      </div>
      <div class="download-eps"><p><b>MKV</b></p><ul>
        <li><strong>360p</strong><span><a href="https://gofile.example/mkv360">Gofile</a></span><span><a href="https://pixeldrain.example/mkv360">Pixeldrain</a></span></li>
        <li><strong>1080p</strong><span><a href="https://gofile.example/mkv1080">Gofile</a></span></li>
      </ul></div>
      <div class="download-eps"><p><b>MP4</b></p><ul>
        <li><strong>480p</strong><span><a href="https://gofile.example/mp4480">Gofile</a></span></li>
      </ul></div>
    </body></html>"#;

    #[test]
    fn test_episode_detail() {
        let detail = parse_episode(EPISODE_PAGE).unwrap();

        assert_eq!(detail.title, "Dandadan Episode 12 Sub Indo");
        assert_eq!(detail.release_info.as_deref(), Some("2 weeks yang lalu"));
        assert_eq!(
            detail.default_streaming_url.as_deref(),
            Some("https://www.blogger.example/video.g?token=abc")
        );
        assert_eq!(detail.anime_id.as_deref(), Some("dandadan"));

        assert!(detail.has_prev_episode);
        assert_eq!(
            detail.prev_episode.as_ref().unwrap().href,
            "/samehadaku/episode/dandadan-episode-11"
        );
        // Last episode renders the next arrow without a link
        assert!(!detail.has_next_episode);
        assert!(detail.next_episode.is_none());
    }

    #[test]
    fn test_servers_grouped_by_quality() {
        let detail = parse_episode(EPISODE_PAGE).unwrap();

        let qualities: Vec<_> = detail.servers.iter().map(|q| q.quality.as_str()).collect();
        assert_eq!(qualities, vec!["360p", "720p", "unknown"]);
        assert_eq!(detail.servers[1].servers.len(), 2);

        let mega = &detail.servers[1].servers[1];
        assert_eq!(mega.title, "Mega 720p");
        assert_eq!(mega.server_id, "31283-3-schtml");
        assert_eq!(mega.href, "/samehadaku/server/31283-3-schtml");
    }

    #[test]
    fn test_downloads_per_format() {
        let detail = parse_episode(EPISODE_PAGE).unwrap();

        let qualities: Vec<_> = detail.downloads.iter().map(|d| d.quality.as_str()).collect();
        assert_eq!(qualities, vec!["MKV 360p", "MKV 1080p", "MP4 480p"]);
        assert_eq!(detail.downloads[0].links.len(), 2);
        assert_eq!(detail.downloads[0].links[1].title, "Pixeldrain");
    }

    #[test]
    fn test_decode_server_id() {
        let reference = decode_server_id("31283-2-schtml").unwrap();
        assert_eq!(reference.post, "31283");
        assert_eq!(reference.nume, "2");
        assert_eq!(reference.kind, "schtml");

        assert!(decode_server_id("31283-2").is_err());
        assert!(decode_server_id("abc-2-schtml").is_err());
        assert!(decode_server_id("1-2-sc html").is_err());
    }

    #[test]
    fn test_player_response() {
        let body = r#"<iframe src="https://player.example/embed/9" frameborder="0"></iframe>"#;
        assert_eq!(parse_player_response(body).unwrap(), "https://player.example/embed/9");
        assert!(parse_player_response("").is_err());
    }

    #[test]
    fn test_missing_title_is_not_found() {
        assert!(matches!(
            parse_episode("<html><body></body></html>"),
            Err(ScrapeError::NotFound(_))
        ));
    }
}
