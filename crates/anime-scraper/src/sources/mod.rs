//! Per-site scrapers. Every source produces the records in `shared::models`.

pub mod otakudesu;
pub mod samehadaku;

pub use otakudesu::Otakudesu;
pub use samehadaku::Samehadaku;

/// WordPress archive path: page 1 lives at the bare prefix, the rest under
/// `page/{n}/`
pub(crate) fn paged_path(prefix: &str, page: u32) -> String {
    if page <= 1 {
        prefix.to_string()
    } else {
        format!("{}page/{}/", prefix, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_path() {
        assert_eq!(paged_path("/ongoing-anime/", 1), "/ongoing-anime/");
        assert_eq!(paged_path("/ongoing-anime/", 3), "/ongoing-anime/page/3/");
        assert_eq!(paged_path("/", 2), "/page/2/");
    }
}
