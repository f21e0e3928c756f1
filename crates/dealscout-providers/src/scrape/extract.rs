//! HTML extraction for the scrape-based provider.
//!
//! Candidate deal blocks are located by a fixed, ordered list of structural
//! class markers; the first marker that yields any blocks wins. Block
//! boundaries are found by balanced-tag scanning rather than a full HTML
//! parse; deal listings in the wild are shallow enough for this to hold.

use regex::Regex;
use url::Url;

/// Structural markers tried in priority order.
const BLOCK_MARKERS: [&str; 3] = ["deal-item", "product-item", "offer-item"];

/// Classes carrying a deal title inside a block, in priority order.
pub(crate) const TITLE_CLASSES: [&str; 3] = ["title", "deal-title", "product-title"];
/// Classes carrying the current price.
pub(crate) const PRICE_CLASSES: [&str; 3] = ["price", "deal-price", "current-price"];
/// Classes carrying the pre-discount price.
pub(crate) const ORIGINAL_PRICE_CLASSES: [&str; 3] = ["original-price", "list-price", "was-price"];
/// Classes carrying the retailer name.
pub(crate) const STORE_CLASSES: [&str; 3] = ["store", "merchant", "retailer"];
/// Classes carrying a rating on detail pages.
pub(crate) const RATING_CLASSES: [&str; 2] = ["rating", "stars"];
/// Classes carrying a description on detail pages.
pub(crate) const DESCRIPTION_CLASSES: [&str; 3] =
    ["description", "deal-description", "product-description"];

/// Extracts candidate deal blocks from a listing page.
///
/// Markers are tried in priority order; the first that matches anything
/// wins. Returns raw HTML slices, one per block, in document order.
pub(crate) fn extract_deal_blocks(html: &str) -> Vec<&str> {
    for marker in BLOCK_MARKERS {
        let blocks = find_blocks(html, marker);
        if !blocks.is_empty() {
            tracing::debug!(marker, count = blocks.len(), "matched deal blocks");
            return blocks;
        }
    }
    Vec::new()
}

fn find_blocks<'a>(html: &'a str, marker: &str) -> Vec<&'a str> {
    let pattern =
        format!(r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*class="[^"]*\b{marker}\b[^"]*"[^>]*>"#);
    let re = Regex::new(&pattern).expect("valid regex");

    let mut blocks = Vec::new();
    for caps in re.captures_iter(html) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some(block) = balanced_block(html, whole.start(), whole.end(), tag.as_str()) {
            blocks.push(block);
        }
    }
    blocks
}

/// Scans forward from an opening tag, counting nested opens/closes of the
/// same tag name, and returns the slice covering the whole element. `None`
/// if the document ends before the element closes.
fn balanced_block<'a>(
    html: &'a str,
    open_start: usize,
    open_end: usize,
    tag: &str,
) -> Option<&'a str> {
    let open_re = Regex::new(&format!(r"(?i)<{tag}\b")).expect("valid regex");
    let close_re = Regex::new(&format!(r"(?i)</{tag}\s*>")).expect("valid regex");

    let mut depth = 1usize;
    let mut pos = open_end;

    while depth > 0 {
        let rest = html.get(pos..)?;
        let next_close = close_re.find(rest)?;
        match open_re.find(rest) {
            Some(next_open) if next_open.start() < next_close.start() => {
                depth += 1;
                pos += next_open.end();
            }
            _ => {
                depth -= 1;
                pos += next_close.end();
            }
        }
    }

    html.get(open_start..pos)
}

/// First non-empty text directly inside an element carrying one of the
/// given classes, tried in order.
pub(crate) fn text_by_class(html: &str, classes: &[&str]) -> Option<String> {
    for class in classes {
        let pattern = format!(r#"<[a-zA-Z][^>]*class="[^"]*\b{class}\b[^"]*"[^>]*>\s*([^<]+)"#);
        let re = Regex::new(&pattern).expect("valid regex");
        if let Some(caps) = re.captures(html) {
            if let Some(m) = caps.get(1) {
                let text = m.as_str().trim();
                if !text.is_empty() {
                    return Some(text.to_owned());
                }
            }
        }
    }
    None
}

/// Text of the first `<h1>`/`<h2>`/`<h3>` element.
pub(crate) fn heading_text(html: &str) -> Option<String> {
    let re = Regex::new(r"<h[123][^>]*>\s*([^<]+)").expect("valid regex");
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// `href` of the first anchor in the fragment.
pub(crate) fn first_href(html: &str) -> Option<String> {
    let re = Regex::new(r#"<a\s[^>]*href=["']([^"']+)["']"#).expect("valid regex");
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// `src` of the first image in the fragment.
pub(crate) fn first_img_src(html: &str) -> Option<String> {
    let re = Regex::new(r#"<img\s[^>]*src=["']([^"']+)["']"#).expect("valid regex");
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Resolves a possibly-relative href against the provider base URL. An
/// already-absolute href passes through unchanged; resolution happens
/// before validation so relative listing links survive it.
pub(crate) fn resolve_url(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|u| u.to_string())
}
