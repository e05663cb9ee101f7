//! Card listings: home, latest episodes, catalogue filters, search, genres.

use super::{genre_from_link, SOURCE};
use crate::dom::{self, css, first_match, text, text_of};
use crate::pagination::{extract_pagination, PaginationMarkup};
use crate::slug::{api_href, slug_or_empty};
use scraper::{ElementRef, Html};
use shared::{AnimeCard, Genre, Paged, SamehadakuHome};

pub(super) fn pagination_markup() -> PaginationMarkup {
    PaginationMarkup {
        container: css!(".pagination"),
        current: css!("span.current"),
        numbers: css!("a.inactive, span.current, a.page-numbers"),
        next: css!("a.arrow_pag i#nextpagination"),
        summary: Some(css!("span:first-child")),
    }
}

/// "Released on: 3 hours ago" → "3 hours ago"
fn labelled_value(raw: &str) -> Option<String> {
    match dom::split_label(raw) {
        Some((_, value)) => dom::non_empty(value),
        None => dom::non_empty(raw.to_string()),
    }
}

/// Latest-episode entry from `.post-show`.
///
/// These link to an episode page rather than an anime page, so `href` points
/// at the episode route.
fn recent_card(item: ElementRef<'_>) -> Option<AnimeCard> {
    let link = first_match(item, &[css!(".entry-title a"), css!(".thumb a"), css!("a")])?;
    let episode_id = slug_or_empty(&dom::attr(link, "href")?);
    if episode_id.is_empty() {
        return None;
    }

    let mut card = AnimeCard {
        title: text(link),
        href: api_href(SOURCE, "episode", &episode_id),
        anime_id: episode_id,
        poster: dom::first_image(item).unwrap_or_default(),
        ..Default::default()
    };

    for span in item.select(css!(".dtla span")) {
        let raw = text(span);
        let lower = raw.to_lowercase();
        if lower.starts_with("episode") {
            card.episodes = labelled_value(&raw)
                .map(|value| value.trim_start_matches("Episode").trim().to_string())
                .and_then(dom::non_empty);
        } else if lower.starts_with("released") {
            card.latest_release_date = labelled_value(&raw);
        }
    }

    Some(card)
}

/// Catalogue card (`.animposx`) used by search, genre and filter pages
fn catalogue_card(post: ElementRef<'_>) -> Option<AnimeCard> {
    let link = post.select(css!("a")).next()?;
    let anime_id = slug_or_empty(&dom::attr(link, "href")?);
    if anime_id.is_empty() {
        return None;
    }

    let title = text_of(post, css!(".data .title"))
        .or_else(|| dom::attr(link, "title"))
        .unwrap_or_default();

    Some(AnimeCard {
        title,
        href: api_href(SOURCE, "anime", &anime_id),
        anime_id,
        poster: dom::first_image(post).unwrap_or_default(),
        score: text_of(post, css!(".score")),
        anime_type: text_of(post, css!(".content-thumb .type")),
        status: text_of(post, css!(".data .type")),
        genres: post
            .parent()
            .and_then(ElementRef::wrap)
            .map(|wrapper| {
                wrapper
                    .select(css!(".stooltip .genres a"))
                    .filter_map(genre_from_link)
                    .collect()
            })
            .unwrap_or_default(),
        ..Default::default()
    })
}

fn top_card(item: ElementRef<'_>) -> Option<AnimeCard> {
    let link = item.select(css!("a")).next()?;
    let anime_id = slug_or_empty(&dom::attr(link, "href")?);
    if anime_id.is_empty() {
        return None;
    }

    Some(AnimeCard {
        title: text_of(item, css!(".judul"))
            .or_else(|| dom::attr(link, "title"))
            .unwrap_or_default(),
        href: api_href(SOURCE, "anime", &anime_id),
        anime_id,
        poster: dom::first_image(item).unwrap_or_default(),
        score: text_of(item, css!(".rating")),
        ..Default::default()
    })
}

pub fn parse_home(body: &str) -> SamehadakuHome {
    let document = Html::parse_document(body);
    let root = document.root_element();

    SamehadakuHome {
        recent: root
            .select(css!(".post-show ul li"))
            .filter_map(recent_card)
            .collect(),
        top10: root
            .select(css!(".topten-animesu ul li"))
            .filter_map(top_card)
            .collect(),
    }
}

/// `/anime-terbaru/` pages
pub fn parse_recent(body: &str, page: u32) -> Paged<AnimeCard> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    Paged {
        items: root
            .select(css!(".post-show ul li"))
            .filter_map(recent_card)
            .collect(),
        pagination: extract_pagination(root, &pagination_markup(), page),
    }
}

/// Catalogue, genre and search result pages
pub fn parse_catalogue(body: &str, page: u32) -> Paged<AnimeCard> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let items = dom::all_matches(root, &[css!(".relat .animposx"), css!(".animposx")])
        .into_iter()
        .filter_map(catalogue_card)
        .collect();

    Paged {
        items,
        pagination: extract_pagination(root, &pagination_markup(), page),
    }
}

/// Genre checkboxes of the catalogue filter form
pub fn parse_genres(body: &str) -> Vec<Genre> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let from_filter: Vec<Genre> = root
        .select(css!(".filter_act.genres label"))
        .filter_map(|label| {
            let genre_id = dom::attr_of(label, css!(r#"input[name="genre[]"]"#), "value")?;
            Some(Genre {
                title: text(label),
                href: api_href(SOURCE, "genres", &genre_id),
                genre_id,
            })
        })
        .collect();

    if !from_filter.is_empty() {
        return from_filter;
    }

    // Widget fallback: plain genre links
    root.select(css!(r#"a[href*="/genre/"]"#))
        .filter_map(genre_from_link)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"<html><body>
      <div class="post-show"><ul>
        <li>
          <div class="thumb"><a href="https://v1.samehadaku.how/dandadan-episode-12/"><img src="https://img.example/ddn12.jpg"></a></div>
          <div class="dtla">
            <h2 class="entry-title"><a href="https://v1.samehadaku.how/dandadan-episode-12/">Dandadan</a></h2>
            <span><i class="dashicons dashicons-controls-play"></i> Episode <author>12</author></span>
            <span><i class="dashicons dashicons-admin-users"></i> Posted by: <author>Fiqi</author></span>
            <span><i class="dashicons dashicons-calendar"></i> Released on: 3 hours yang lalu</span>
          </div>
        </li>
      </ul></div>
      <div class="topten-animesu"><ul>
        <li><a class="series" href="https://v1.samehadaku.how/anime/one-piece/" title="One Piece">
          <img src="https://img.example/op.jpg"><span class="rating"><i class="fa fa-star"></i>8.71</span><span class="judul">One Piece</span>
        </a></li>
      </ul></div>
    </body></html>"#;

    const CATALOGUE: &str = r#"<html><body>
      <div class="relat">
        <article class="animpost"><div class="animepost">
          <div class="animposx"><a href="https://v1.samehadaku.how/anime/dandadan/" title="Dandadan">
            <div class="content-thumb"><div class="type TV">TV</div><div class="score"><i class="fa fa-star"></i> 8.62</div><img data-src="https://img.example/ddn.jpg" src="data:image/gif;base64,R0lG"></div>
            <div class="data"><div class="title"><h2>Dandadan</h2></div><div class="type">Completed</div></div>
          </a></div>
          <div class="stooltip"><div class="genres"><div class="mta">
            <a href="https://v1.samehadaku.how/genre/action/">Action</a><a href="https://v1.samehadaku.how/genre/comedy/">Comedy</a>
          </div></div></div>
        </div></article>
      </div>
      <div class="pagination">
        <span>Page 1 of 33</span><span class="current">1</span>
        <a class="inactive" href="/page/2/">2</a>
        <a class="arrow_pag" href="/page/2/"><i id="nextpagination" class="fa fa-caret-right"></i></a>
      </div>
    </body></html>"#;

    #[test]
    fn test_home() {
        let home = parse_home(HOME);

        assert_eq!(home.recent.len(), 1);
        let recent = &home.recent[0];
        assert_eq!(recent.title, "Dandadan");
        assert_eq!(recent.anime_id, "dandadan-episode-12");
        assert_eq!(recent.href, "/samehadaku/episode/dandadan-episode-12");
        assert_eq!(recent.episodes.as_deref(), Some("12"));
        assert_eq!(recent.latest_release_date.as_deref(), Some("3 hours yang lalu"));

        assert_eq!(home.top10.len(), 1);
        assert_eq!(home.top10[0].anime_id, "one-piece");
        assert_eq!(home.top10[0].score.as_deref(), Some("8.71"));
        assert_eq!(home.top10[0].title, "One Piece");
    }

    #[test]
    fn test_catalogue_page() {
        let page = parse_catalogue(CATALOGUE, 1);

        assert_eq!(page.items.len(), 1);
        let card = &page.items[0];
        assert_eq!(card.title, "Dandadan");
        assert_eq!(card.href, "/samehadaku/anime/dandadan");
        assert_eq!(card.poster, "https://img.example/ddn.jpg");
        assert_eq!(card.score.as_deref(), Some("8.62"));
        assert_eq!(card.anime_type.as_deref(), Some("TV"));
        assert_eq!(card.status.as_deref(), Some("Completed"));
        assert_eq!(card.genres.len(), 2);
        assert_eq!(card.genres[0].href, "/samehadaku/genres/action");

        assert_eq!(page.pagination.total_pages, Some(33));
        assert!(page.pagination.has_next_page);
        assert!(!page.pagination.has_prev_page);
    }

    #[test]
    fn test_empty_catalogue() {
        let page = parse_catalogue("<div class=\"relat\"></div>", 4);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.current_page, 4);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_genres_from_filter_form() {
        let body = r#"<div class="filter_act genres">
            <label class="tax_fil"><input type="checkbox" name="genre[]" value="action">Action</label>
            <label class="tax_fil"><input type="checkbox" name="genre[]" value="slice-of-life">Slice of Life</label>
        </div>"#;

        let genres = parse_genres(body);
        assert_eq!(genres.len(), 2);
        assert_eq!(genres[1].genre_id, "slice-of-life");
        assert_eq!(genres[1].title, "Slice of Life");
    }

    #[test]
    fn test_genres_fallback_links() {
        let body =
            r#"<ul class="genre"><li><a href="https://v1.samehadaku.how/genre/drama/">Drama</a></li></ul>"#;
        let genres = parse_genres(body);
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].genre_id, "drama");
    }
}
