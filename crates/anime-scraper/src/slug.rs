//! Slug derivation.
//!
//! A slug is the last path segment of a source URL. The API exposes slugs as
//! opaque path parameters and rebuilds source URLs from them.

use crate::error::{Result, ScrapeError};
use url::Url;

/// Last non-empty path segment of an absolute or site-relative URL.
///
/// Query and fragment are ignored and the segment is percent-decoded.
/// Returns `None` for the site root.
pub fn slug(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => Url::parse("http://relative.invalid/").ok()?.join(raw).ok()?,
    };

    let segment = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?;

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    Some(decoded)
}

/// Slug or empty string, for records where the id is mandatory
pub fn slug_or_empty(raw: &str) -> String {
    slug(raw).unwrap_or_default()
}

/// API route for a record: `/{source}/{kind}/{slug}`, slug percent-encoded
pub fn api_href(source: &str, kind: &str, slug: &str) -> String {
    format!("/{}/{}/{}", source, kind, urlencoding::encode(slug))
}

/// Check a slug received from an API caller before it goes into an upstream URL.
///
/// Accepts anything [`slug`] can produce; the caller percent-encodes it again
/// when building the upstream path.
pub fn validate_slug(raw: &str) -> Result<&str> {
    let valid = !raw.is_empty()
        && raw != "."
        && raw != ".."
        && !raw
            .chars()
            .any(|c| c.is_control() || matches!(c, '/' | '?' | '#'));

    if valid {
        Ok(raw)
    } else {
        Err(ScrapeError::InvalidInput(format!("invalid id: {:?}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_with_trailing_slash() {
        assert_eq!(
            slug("https://otakudesu.cloud/anime/dandadan-sub-indo/").as_deref(),
            Some("dandadan-sub-indo")
        );
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            slug("https://v1.samehadaku.how/genre/action/?order=title#top").as_deref(),
            Some("action")
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(slug("/genres/slice-of-life/").as_deref(), Some("slice-of-life"));
        assert_eq!(slug("episode/abc-episode-1").as_deref(), Some("abc-episode-1"));
    }

    #[test]
    fn test_percent_decoding() {
        assert_eq!(
            slug("https://example.com/anime/re%3Azero/").as_deref(),
            Some("re:zero")
        );
    }

    #[test]
    fn test_root_has_no_slug() {
        assert_eq!(slug("https://otakudesu.cloud/"), None);
        assert_eq!(slug("https://otakudesu.cloud"), None);
        assert_eq!(slug(""), None);
        assert_eq!(slug_or_empty("/"), "");
    }

    #[test]
    fn test_validate_slug() {
        assert_eq!(validate_slug("dandadan-sub-indo").unwrap(), "dandadan-sub-indo");
        assert!(validate_slug("").is_err());
        assert!(validate_slug("..").is_err());
        assert!(validate_slug("a/b").is_err());
        assert!(validate_slug("a?s=b").is_err());
        assert!(validate_slug("a#top").is_err());
        assert!(validate_slug("a\nb").is_err());
    }

    #[test]
    fn test_decoded_slugs_validate() {
        for href in [
            "/anime/re%3Azero-sub-indo/",
            "/anime/oshi-no-ko-%e2%98%86-sub-indo/",
            "/anime/a%20b/",
        ] {
            let id = slug_or_empty(href);
            assert_eq!(validate_slug(&id).unwrap(), id);
        }
    }

    #[test]
    fn test_api_href() {
        assert_eq!(api_href("otakudesu", "anime", "x"), "/otakudesu/anime/x");
        assert_eq!(api_href("samehadaku", "genres", "action"), "/samehadaku/genres/action");
        assert_eq!(
            api_href("otakudesu", "anime", "re:zero-sub-indo"),
            "/otakudesu/anime/re%3Azero-sub-indo"
        );
    }
}
