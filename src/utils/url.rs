// src/utils/url.rs

//! URL manipulation utilities.
//!
//! Listing identity and region are both derived from the listing URL, so the
//! derivations live here rather than in the parser.

/// Resolve a potentially relative `href` against a base URL.
///
/// # Examples
/// ```
/// use flatwatch::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://www.ss.lv/en/real-estate/flats/riga/all/", "/msg/en/real-estate/flats/riga/centre/abcde.html"),
///     "https://www.ss.lv/msg/en/real-estate/flats/riga/centre/abcde.html"
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> String {
    match url::Url::parse(base).and_then(|b| b.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Extract the stable listing identifier from a listing URL.
///
/// The identifier is the last non-empty path segment with its file extension
/// stripped, so the same advertisement keeps the same id across crawls.
///
/// # Examples
/// ```
/// use flatwatch::utils::url::listing_id;
///
/// assert_eq!(
///     listing_id("https://www.ss.lv/msg/en/real-estate/flats/riga/centre/abcde.html"),
///     Some("abcde".to_string())
/// );
/// ```
pub fn listing_id(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;

    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => segment,
    };

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Extract the region from a listing URL.
///
/// Listing pages sit one directory below the district name
/// (`.../flats/riga/<region>/<id>.html`), so the region is the path segment
/// preceding the final one.
pub fn region_from_link(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 {
        return None;
    }
    Some(segments[segments.len() - 2].to_string())
}
