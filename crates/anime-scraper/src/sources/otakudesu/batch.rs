use super::episode::parse_downloads;
use crate::dom::{self, css, first_match, info_key, text_of};
use crate::error::{Result, ScrapeError};
use crate::slug::slug;
use scraper::Html;
use shared::BatchDetail;

/// Batch page: one download table for the whole season
pub fn parse_batch(body: &str, batch_id: &str) -> Result<BatchDetail> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let block = root
        .select(css!(".batchlink"))
        .next()
        .ok_or_else(|| ScrapeError::NotFound(format!("batch {}", batch_id)))?;

    let title = text_of(block, css!("h4"))
        .or_else(|| text_of(root, css!(".jdlrx h1")))
        .unwrap_or_default();

    let info = root
        .select(css!(".animeinfo .infos"))
        .next()
        .map(|infos| {
            dom::bold_label_pairs(infos)
                .into_iter()
                .map(|(label, value)| (info_key(&label), value))
                .collect()
        })
        .unwrap_or_default();

    let anime_id = first_match(
        root,
        &[
            css!(r#".totalepisode a[href*="/anime/"]"#),
            css!(r#".animeinfo a[href*="/anime/"]"#),
            css!(r#"a[href*="/anime/"]"#),
        ],
    )
    .and_then(|link| dom::attr(link, "href"))
    .and_then(|href| slug(&href));

    Ok(BatchDetail {
        title,
        batch_id: batch_id.to_string(),
        anime_id,
        poster: first_match(root, &[css!(".imganime img"), css!(".animeinfo img")])
            .and_then(dom::image_src),
        info,
        downloads: parse_downloads(block),
    })
}
