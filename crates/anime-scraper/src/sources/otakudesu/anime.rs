use super::{genre_from_link, SOURCE};
use crate::dom::{self, css, first_match, non_empty, text, text_of};
use crate::error::{Result, ScrapeError};
use crate::slug::{api_href, slug_or_empty};
use scraper::{ElementRef, Html};
use shared::{AnimeCard, AnimeDetail, EpisodeLink};

fn link_record(item: ElementRef<'_>, kind: &str) -> Option<EpisodeLink> {
    let link = item.select(css!("a")).next()?;
    let id = slug_or_empty(&dom::attr(link, "href")?);
    if id.is_empty() {
        return None;
    }
    Some(EpisodeLink {
        title: text(link),
        href: api_href(SOURCE, kind, &id),
        episode_id: id,
        release_date: text_of(item, css!(".zeebr")),
    })
}

fn recommendation(entry: ElementRef<'_>) -> Option<AnimeCard> {
    let link = entry.select(css!("a")).next()?;
    let anime_id = slug_or_empty(&dom::attr(link, "href")?);
    if anime_id.is_empty() {
        return None;
    }
    let title = text_of(entry, css!(".judul-anime"))
        .or_else(|| dom::attr_of(entry, css!("img"), "alt"))
        .unwrap_or_default();

    Some(AnimeCard {
        title,
        href: api_href(SOURCE, "anime", &anime_id),
        anime_id,
        poster: dom::first_image(entry).unwrap_or_default(),
        ..Default::default()
    })
}

/// Anime page: info table, synopsis, episode lists and recommendations
pub fn parse_anime(body: &str, anime_id: &str) -> Result<AnimeDetail> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let info = first_match(root, &[css!(".infozingle"), css!(".infozin")])
        .ok_or_else(|| ScrapeError::NotFound(format!("anime {}", anime_id)))?;

    let mut detail = AnimeDetail {
        anime_id: anime_id.to_string(),
        poster: first_match(root, &[css!(".fotoanime"), css!(".venser")])
            .and_then(dom::first_image)
            .unwrap_or_default(),
        ..Default::default()
    };

    for span in info.select(css!("p span")) {
        let Some((label, value)) = dom::split_label(&text(span)) else {
            continue;
        };
        let value = non_empty(value);
        match label.to_lowercase().as_str() {
            "judul" => detail.title = value.unwrap_or_default(),
            "japanese" => detail.japanese = value,
            "english" => detail.english = value,
            "skor" => detail.score = value,
            "produser" => detail.producers = value,
            "tipe" => detail.anime_type = value,
            "status" => detail.status = value,
            "total episode" => detail.total_episodes = value,
            "durasi" => detail.duration = value,
            "tanggal rilis" => detail.aired = value,
            "studio" => detail.studios = value,
            "genre" => {
                detail.genres = span.select(css!("a")).filter_map(genre_from_link).collect();
            }
            _ => {}
        }
    }

    if detail.title.is_empty() {
        detail.title = text_of(root, css!(".jdlrx h1"))
            .ok_or_else(|| ScrapeError::NotFound(format!("anime {}", anime_id)))?;
    }

    detail.synopsis = root
        .select(css!(".sinopc p"))
        .map(text)
        .filter(|p| !p.is_empty())
        .collect();

    for list in root.select(css!(".episodelist")) {
        let heading = text_of(list, css!(".monktit")).unwrap_or_default();
        if heading.contains("Batch") {
            detail.batch = list
                .select(css!("ul li"))
                .find_map(|item| link_record(item, "batch"));
        } else if heading.contains("Lengkap") {
            // Same links as the batch block, just unpacked per episode
            continue;
        } else {
            detail
                .episodes
                .extend(list.select(css!("ul li")).filter_map(|item| link_record(item, "episode")));
        }
    }

    detail.recommendations = root
        .select(css!("#recommend-anime-series .isi-anime"))
        .filter_map(recommendation)
        .collect();

    Ok(detail)
}
