//! Anime card listings: home, ongoing/complete pages, search, genre pages.

use super::{genre_from_link, SOURCE};
use crate::dom::{self, css, first_match, non_empty, text, text_of};
use crate::pagination::{extract_pagination, PaginationMarkup};
use crate::slug::{api_href, slug_or_empty};
use scraper::{ElementRef, Html};
use shared::{AnimeCard, OtakudesuHome, Paged};

pub(super) fn pagination_markup() -> PaginationMarkup {
    PaginationMarkup {
        container: css!(".pagenavix"),
        current: css!(".page-numbers.current"),
        numbers: css!(".page-numbers"),
        next: css!(".next.page-numbers"),
        summary: None,
    }
}

/// What the three small badges on a `.detpost` card mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardKind {
    /// episode / release day / date
    Ongoing,
    /// episode count / score / date
    Completed,
}

fn card_from_detpost(post: ElementRef<'_>, kind: CardKind) -> Option<AnimeCard> {
    let link = post.select(css!(".thumb a")).next()?;
    let href = dom::attr(link, "href")?;
    let anime_id = slug_or_empty(&href);
    if anime_id.is_empty() {
        return None;
    }

    let title = text_of(post, css!(".jdlflm")).unwrap_or_default();
    let badge = text_of(post, css!(".epztipe"));

    let mut card = AnimeCard {
        title,
        href: api_href(SOURCE, "anime", &anime_id),
        anime_id,
        poster: dom::first_image(post).unwrap_or_default(),
        episodes: text_of(post, css!(".epz")),
        latest_release_date: text_of(post, css!(".newnime")),
        ..Default::default()
    };

    match kind {
        CardKind::Ongoing => card.release_day = badge,
        CardKind::Completed => card.score = badge,
    }

    Some(card)
}

fn cards_in(scope: ElementRef<'_>, kind: CardKind) -> Vec<AnimeCard> {
    scope
        .select(css!(".detpost"))
        .filter_map(|post| card_from_detpost(post, kind))
        .collect()
}

/// Landing page: one ongoing section and one complete section
pub fn parse_home(body: &str) -> OtakudesuHome {
    let document = Html::parse_document(body);
    let root = document.root_element();
    let mut home = OtakudesuHome::default();

    let sections: Vec<_> = root.select(css!(".rapi")).collect();
    if !sections.is_empty() {
        for section in sections {
            let heading = text_of(section, css!(".rvad h1"))
                .unwrap_or_default()
                .to_lowercase();
            if heading.contains("complete") {
                home.completed.extend(cards_in(section, CardKind::Completed));
            } else {
                home.ongoing.extend(cards_in(section, CardKind::Ongoing));
            }
        }
        return home;
    }

    // Older layout: bare `.venz` blocks, ongoing first
    let mut blocks = root.select(css!(".venz"));
    if let Some(block) = blocks.next() {
        home.ongoing = cards_in(block, CardKind::Ongoing);
    }
    if let Some(block) = blocks.next() {
        home.completed = cards_in(block, CardKind::Completed);
    }
    home
}

/// `/ongoing-anime/` pages
pub fn parse_ongoing(body: &str, page: u32) -> Paged<AnimeCard> {
    parse_detpost_page(body, page, CardKind::Ongoing)
}

/// `/complete-anime/` pages
pub fn parse_completed(body: &str, page: u32) -> Paged<AnimeCard> {
    parse_detpost_page(body, page, CardKind::Completed)
}

fn parse_detpost_page(body: &str, page: u32, kind: CardKind) -> Paged<AnimeCard> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let items = match first_match(root, &[css!(".venz"), css!(".venser")]) {
        Some(block) => cards_in(block, kind),
        None => Vec::new(),
    };

    Paged {
        items,
        pagination: extract_pagination(root, &pagination_markup(), page),
    }
}

/// Search results (`/?s=...&post_type=anime`)
pub fn parse_search(body: &str) -> Vec<AnimeCard> {
    let document = Html::parse_document(body);

    document
        .select(css!("ul.chivsrc > li"))
        .filter_map(|item| {
            let link = item.select(css!("h2 a")).next()?;
            let anime_id = slug_or_empty(&dom::attr(link, "href")?);
            if anime_id.is_empty() {
                return None;
            }

            let mut card = AnimeCard {
                title: text(link),
                href: api_href(SOURCE, "anime", &anime_id),
                anime_id,
                poster: dom::first_image(item).unwrap_or_default(),
                ..Default::default()
            };

            for set in item.select(css!(".set")) {
                let label = text_of(set, css!("b")).unwrap_or_default().to_lowercase();
                let value = dom::split_label(&text(set)).map(|(_, value)| value);
                match label.as_str() {
                    "genres" => {
                        card.genres = set.select(css!("a")).filter_map(genre_from_link).collect();
                    }
                    "status" => card.status = value.and_then(non_empty),
                    "rating" => card.score = value.and_then(non_empty),
                    _ => {}
                }
            }

            Some(card)
        })
        .collect()
}

/// `/genres/{slug}/` pages
pub fn parse_genre_page(body: &str, page: u32) -> Paged<AnimeCard> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let items = dom::all_matches(root, &[css!(".col-anime"), css!(".col-anime-con")])
        .into_iter()
        .filter_map(|item| {
            let link = item.select(css!(".col-anime-title a")).next()?;
            let anime_id = slug_or_empty(&dom::attr(link, "href")?);
            if anime_id.is_empty() {
                return None;
            }

            Some(AnimeCard {
                title: text(link),
                href: api_href(SOURCE, "anime", &anime_id),
                anime_id,
                poster: item
                    .select(css!(".col-anime-cover"))
                    .next()
                    .and_then(dom::first_image)
                    .or_else(|| dom::first_image(item))
                    .unwrap_or_default(),
                episodes: text_of(item, css!(".col-anime-eps")),
                score: text_of(item, css!(".col-anime-rating")),
                latest_release_date: text_of(item, css!(".col-anime-date")),
                genres: item
                    .select(css!(".col-anime-genre a"))
                    .filter_map(genre_from_link)
                    .collect(),
                ..Default::default()
            })
        })
        .collect();

    Paged {
        items,
        pagination: extract_pagination(root, &pagination_markup(), page),
    }
}
