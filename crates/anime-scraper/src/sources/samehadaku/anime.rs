use super::{genre_from_link, SOURCE};
use crate::dom::{self, css, first_match, non_empty, normalize_text, text, text_of};
use crate::error::{Result, ScrapeError};
use crate::slug::{api_href, slug_or_empty};
use scraper::{ElementRef, Html};
use shared::{AnimeCard, AnimeDetail, EpisodeLink};

/// `<span><b>Japanese</b> ダンダダン</span>`: the label is the bold part,
/// the value whatever follows it
fn spe_pair(span: ElementRef<'_>) -> Option<(String, Option<String>)> {
    let label = text_of(span, css!("b"))?;
    let full = text(span);
    let value = full
        .strip_prefix(label.as_str())
        .unwrap_or(&full)
        .trim_start_matches(':');
    let label = label.trim_end_matches(':').trim().to_lowercase();
    Some((label, non_empty(normalize_text(value))))
}

fn episode_entry(item: ElementRef<'_>) -> Option<EpisodeLink> {
    let link = first_match(item, &[css!(".lchx a"), css!(".epsleft a"), css!("a")])?;
    let episode_id = slug_or_empty(&dom::attr(link, "href")?);
    if episode_id.is_empty() {
        return None;
    }
    Some(EpisodeLink {
        title: text(link),
        href: api_href(SOURCE, "episode", &episode_id),
        episode_id,
        release_date: text_of(item, css!(".date")),
    })
}

fn recommendation(item: ElementRef<'_>) -> Option<AnimeCard> {
    let link = item.select(css!("a")).next()?;
    let anime_id = slug_or_empty(&dom::attr(link, "href")?);
    if anime_id.is_empty() {
        return None;
    }
    Some(AnimeCard {
        title: first_match(item, &[css!(".judul"), css!(".title"), css!("h3")])
            .map(text)
            .and_then(non_empty)
            .or_else(|| dom::attr(link, "title"))
            .unwrap_or_default(),
        href: api_href(SOURCE, "anime", &anime_id),
        anime_id,
        poster: dom::first_image(item).unwrap_or_default(),
        ..Default::default()
    })
}

pub fn parse_anime(body: &str, anime_id: &str) -> Result<AnimeDetail> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let info = first_match(root, &[css!(".infoanime"), css!(".infox")])
        .ok_or_else(|| ScrapeError::NotFound(format!("anime {}", anime_id)))?;

    let title_selectors = [css!(".infox h1.entry-title"), css!("h1"), css!(".entry-title")];
    let title = first_match(info, &title_selectors)
        .map(text)
        .unwrap_or_default()
        .trim_start_matches("Nonton Anime ")
        .to_string();

    let mut detail = AnimeDetail {
        title,
        anime_id: anime_id.to_string(),
        poster: first_match(info, &[css!(".thumb"), css!(".infoanime")])
            .and_then(dom::first_image)
            .unwrap_or_default(),
        score: first_match(
            root,
            &[
                css!(r#".rating-area [itemprop="ratingValue"]"#),
                css!(".archiveanime-rating span"),
            ],
        )
        .map(text)
        .and_then(non_empty),
        synopsis: root
            .select(css!(".desc .entry-content p"))
            .map(text)
            .filter(|p| !p.is_empty())
            .collect(),
        genres: info
            .select(css!(".genre-info a"))
            .filter_map(genre_from_link)
            .collect(),
        ..Default::default()
    };

    if detail.synopsis.is_empty() {
        detail.synopsis = text_of(root, css!(".desc .entry-content")).into_iter().collect();
    }

    for span in root.select(css!(".spe span")) {
        let Some((label, value)) = spe_pair(span) else {
            continue;
        };
        match label.as_str() {
            "japanese" => detail.japanese = value,
            "english" | "synonyms" if detail.english.is_none() => detail.english = value,
            "status" => detail.status = value,
            "type" => detail.anime_type = value,
            "duration" => detail.duration = value,
            "total episode" => detail.total_episodes = value,
            "studio" => detail.studios = value,
            "producers" => detail.producers = value,
            "released" => detail.aired = value,
            _ => {}
        }
    }

    detail.episodes = root
        .select(css!(".lstepsiode ul li"))
        .filter_map(episode_entry)
        .collect();

    detail.recommendations = dom::all_matches(
        root,
        &[css!(".rekomf .animposx"), css!(".rand-animesu ul li")],
    )
    .into_iter()
    .filter_map(recommendation)
    .collect();

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANIME_PAGE: &str = r#"<html><body>
      <div class="infoanime widget_senction">
        <h2 class="entry-title">Nonton Anime Dandadan</h2>
        <div class="thumb"><img src="https://img.example/ddn.jpg" title="Dandadan"></div>
        <div class="infox">
          <h1 class="entry-title">Nonton Anime Dandadan</h1>
          <div class="genre-info"><a href="https://v1.samehadaku.how/genre/action/" itemprop="genre">Action</a><a href="https://v1.samehadaku.how/genre/comedy/" itemprop="genre">Comedy</a></div>
          <div class="desc"><div class="entry-content entry-content-single" itemprop="description"><p>Momo Ayase meets Okarun.</p></div></div>
        </div>
      </div>
      <div class="anim-senct"><div class="right-senc widget_senction"><div class="spe">
        <span><b>Japanese</b> ダンダダン</span>
        <span><b>English</b> Dan Da Dan</span>
        <span><b>Status</b> Completed</span>
        <span><b>Type</b> TV</span>
        <span><b>Duration</b> 24 min. per ep.</span>
        <span><b>Total Episode</b> 12</span>
        <span><b>Studio</b> <a href="/studio/science-saru/">Science SARU</a></span>
        <span><b>Released:</b> Oct 4, 2024 to Dec 20, 2024</span>
      </div></div></div>
      <div class="clearfix archiveanime"><div class="rating-area"><span itemprop="ratingValue">8.62</span></div></div>
      <div class="lstepsiode listeps"><ul>
        <li><div class="epsright"><span class="eps"><a href="https://v1.samehadaku.how/dandadan-episode-12/">12</a></span></div>
            <div class="epsleft"><span class="lchx"><a href="https://v1.samehadaku.how/dandadan-episode-12/">Dandadan Episode 12</a></span><span class="date">20 December 2024</span></div></li>
        <li><div class="epsright"><span class="eps"><a href="https://v1.samehadaku.how/dandadan-episode-11/">11</a></span></div>
            <div class="epsleft"><span class="lchx"><a href="https://v1.samehadaku.how/dandadan-episode-11/">Dandadan Episode 11</a></span><span class="date">13 December 2024</span></div></li>
      </ul></div>
      <div class="rekomf"><div class="animposx"><a href="https://v1.samehadaku.how/anime/kaiju-no-8/" title="Kaiju No. 8"><img src="https://img.example/k8.jpg"></a></div></div>
    </body></html>"#;

    #[test]
    fn test_anime_detail() {
        let detail = parse_anime(ANIME_PAGE, "dandadan").unwrap();

        assert_eq!(detail.title, "Dandadan");
        assert_eq!(detail.poster, "https://img.example/ddn.jpg");
        assert_eq!(detail.score.as_deref(), Some("8.62"));
        assert_eq!(detail.japanese.as_deref(), Some("ダンダダン"));
        assert_eq!(detail.english.as_deref(), Some("Dan Da Dan"));
        assert_eq!(detail.anime_type.as_deref(), Some("TV"));
        assert_eq!(detail.total_episodes.as_deref(), Some("12"));
        assert_eq!(detail.studios.as_deref(), Some("Science SARU"));
        assert_eq!(detail.aired.as_deref(), Some("Oct 4, 2024 to Dec 20, 2024"));
        assert_eq!(detail.synopsis, vec!["Momo Ayase meets Okarun.".to_string()]);
        assert_eq!(detail.genres.len(), 2);
        assert_eq!(detail.genres[0].href, "/samehadaku/genres/action");
        assert!(detail.batch.is_none());
    }

    #[test]
    fn test_episodes_and_recommendations() {
        let detail = parse_anime(ANIME_PAGE, "dandadan").unwrap();

        assert_eq!(detail.episodes.len(), 2);
        assert_eq!(detail.episodes[0].title, "Dandadan Episode 12");
        assert_eq!(detail.episodes[0].href, "/samehadaku/episode/dandadan-episode-12");
        assert_eq!(detail.episodes[1].release_date.as_deref(), Some("13 December 2024"));

        assert_eq!(detail.recommendations.len(), 1);
        assert_eq!(detail.recommendations[0].title, "Kaiju No. 8");
    }

    #[test]
    fn test_missing_info_is_not_found() {
        assert!(matches!(
            parse_anime("<html><body></body></html>", "x"),
            Err(ScrapeError::NotFound(_))
        ));
    }
}
