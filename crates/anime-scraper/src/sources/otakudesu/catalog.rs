//! Site-wide indexes: genre list, release schedule, A-Z list.

use super::{genre_from_link, SOURCE};
use crate::dom::{self, css, text, text_of};
use crate::slug::{api_href, slug_or_empty};
use scraper::{ElementRef, Html};
use shared::{AnimeLink, AnimeListGroup, Genre, ScheduleDay};

fn anime_link(link: ElementRef<'_>) -> Option<AnimeLink> {
    let anime_id = slug_or_empty(&dom::attr(link, "href")?);
    if anime_id.is_empty() {
        return None;
    }
    Some(AnimeLink {
        title: text(link),
        href: api_href(SOURCE, "anime", &anime_id),
        anime_id,
    })
}

pub fn parse_genres(body: &str) -> Vec<Genre> {
    let document = Html::parse_document(body);
    document
        .root_element()
        .select(css!("ul.genres li a"))
        .filter_map(genre_from_link)
        .collect()
}

/// Weekly schedule, one entry per day heading
pub fn parse_schedule(body: &str) -> Vec<ScheduleDay> {
    let document = Html::parse_document(body);
    document
        .root_element()
        .select(css!(".kglist321"))
        .filter_map(|block| {
            let day = text_of(block, css!("h2"))?;
            Some(ScheduleDay {
                day,
                anime: block.select(css!("ul li a")).filter_map(anime_link).collect(),
            })
        })
        .collect()
}

pub fn parse_anime_list(body: &str) -> Vec<AnimeListGroup> {
    let document = Html::parse_document(body);
    document
        .root_element()
        .select(css!(".bariskelom"))
        .filter_map(|group| {
            let start_with = text_of(group, css!(".barispenz"))?;
            let anime: Vec<_> = group
                .select(css!(".jdlbar a"))
                .filter_map(anime_link)
                .collect();
            (!anime.is_empty()).then_some(AnimeListGroup { start_with, anime })
        })
        .collect()
}
