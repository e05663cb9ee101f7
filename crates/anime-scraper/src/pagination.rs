//! Pagination normalization.
//!
//! Each theme renders its page navigation differently; a [`PaginationMarkup`]
//! names the pieces and [`extract_pagination`] turns them into the uniform
//! [`Pagination`] block.

use crate::dom::text;
use crate::error::{Result, ScrapeError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use shared::Pagination;

static PAGE_OF_TOTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:of|dari|/)\s*(\d+)").expect("valid page summary regex")
});

/// Selectors describing one theme's page navigation
#[derive(Debug, Clone, Copy)]
pub struct PaginationMarkup {
    /// Navigation container
    pub container: &'static Selector,
    /// Element holding the current page number
    pub current: &'static Selector,
    /// Numbered page links (may also match the current element)
    pub numbers: &'static Selector,
    /// "Next" link
    pub next: &'static Selector,
    /// Optional "Page 3 of 40" summary
    pub summary: Option<&'static Selector>,
}

/// Reject page 0 before building an upstream URL
pub fn validate_page(page: u32) -> Result<u32> {
    if page == 0 {
        return Err(ScrapeError::InvalidInput(
            "page must be 1 or greater".to_string(),
        ));
    }
    Ok(page)
}

/// Pagination for a page without any navigation
pub fn single_page(requested: u32) -> Pagination {
    Pagination {
        current_page: requested,
        has_prev_page: false,
        prev_page: None,
        has_next_page: false,
        next_page: None,
        total_pages: Some(requested),
    }
}

/// Digits of a page label such as `"1,234"` or `" 7 "`
fn page_number(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() || digits.len() > 9 {
        return None;
    }
    digits.parse().ok()
}

/// Build the uniform pagination block from a parsed page
pub fn extract_pagination(
    root: ElementRef<'_>,
    markup: &PaginationMarkup,
    requested: u32,
) -> Pagination {
    let Some(nav) = root.select(markup.container).next() else {
        return single_page(requested);
    };

    let marked_current = nav
        .select(markup.current)
        .next()
        .and_then(|el| page_number(&text(el)));

    let summary = markup
        .summary
        .and_then(|selector| nav.select(selector).next())
        .and_then(|el| {
            let label = text(el);
            let caps = PAGE_OF_TOTAL.captures(&label)?;
            let current = caps.get(1)?.as_str().parse::<u32>().ok()?;
            let total = caps.get(2)?.as_str().parse::<u32>().ok()?;
            Some((current, total))
        });

    let current_page = marked_current
        .or(summary.map(|(current, _)| current))
        .unwrap_or(requested)
        .max(1);

    let has_next_link = nav.select(markup.next).next().is_some();

    let highest_number = nav
        .select(markup.numbers)
        .filter_map(|el| page_number(&text(el)))
        .chain(marked_current)
        .max();

    let mut total_pages = match (summary, highest_number) {
        (Some((_, total)), Some(highest)) => Some(total.max(highest)),
        (Some((_, total)), None) => Some(total),
        (None, highest) => highest,
    };
    if let Some(total) = total_pages {
        if total < current_page {
            total_pages = Some(current_page);
        }
    }

    let next_page = if has_next_link {
        current_page.checked_add(1)
    } else {
        None
    };
    let has_next_page = next_page.is_some();
    if has_next_page && total_pages == Some(current_page) {
        // Numbers are truncated around the current page; the real total is unknown
        total_pages = None;
    }

    // Themes drop the "previous" arrow inconsistently; page 2+ always has one
    let has_prev_page = current_page > 1;

    Pagination {
        current_page,
        has_prev_page,
        prev_page: has_prev_page.then(|| current_page - 1),
        has_next_page,
        next_page,
        total_pages,
    }
}
