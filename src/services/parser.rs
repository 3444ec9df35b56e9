// src/services/parser.rs

//! Result-page and detail-page markup parsing.
//!
//! A result page carries one `<tr>` per advertisement with a fixed column
//! layout: checkbox, thumbnail, description (with the `a.am` listing link),
//! rooms, area, floor, series and price. Header rows, banner rows and
//! anything else that does not match that shape is skipped without aborting
//! the page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::Listing;
use crate::utils::url::{region_from_link, resolve};

/// Minimum cell count for a row to qualify as a listing.
const ROW_CELLS: usize = 8;

const CELL_ROOMS: usize = 3;
const CELL_AREA: usize = 4;
const CELL_FLOOR: usize = 5;
const CELL_SERIES: usize = 6;
const CELL_PRICE: usize = 7;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector"));
static LISTING_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.am").expect("static selector"));
static PHOTO: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.pic_dv_thumbnail img").expect("static selector"));

/// Monthly price, e.g. "1,250 €/mon."
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d,]+)\s*€/mon").expect("static regex"));

/// Parse all listing records out of one result page, in document order.
pub fn parse_listings(html: &str, base_url: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);

    document
        .select(&ROW)
        .filter_map(|row| parse_row(&row, base_url))
        .collect()
}

/// Parse the ordered photo URLs from a listing detail page.
///
/// Pages without photo elements yield an empty list.
pub fn parse_photos(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&PHOTO)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| {
            // Gallery thumbnails use protocol-relative URLs.
            if src.starts_with("//") {
                format!("https:{src}")
            } else {
                src.to_string()
            }
        })
        .collect()
}

fn parse_row(row: &ElementRef, base_url: &str) -> Option<Listing> {
    let cells: Vec<ElementRef> = row.select(&CELL).collect();
    if cells.len() < ROW_CELLS {
        return None;
    }

    let href = row.select(&LISTING_LINK).next()?.value().attr("href")?;
    let link = resolve(base_url, href);
    let region = region_from_link(&link).unwrap_or_default();

    // Price is mandatory; daily rates and unreadable price text drop the row.
    let price = parse_price(&cell_text(&cells[CELL_PRICE]))?;

    Some(Listing {
        region,
        rooms: cell_text(&cells[CELL_ROOMS]),
        area: cell_text(&cells[CELL_AREA]),
        floor: cell_text(&cells[CELL_FLOOR]),
        series: cell_text(&cells[CELL_SERIES]),
        price,
        link,
    })
}

/// Extract the monthly price from the cell text.
///
/// Returns `None` for daily rates and for text without a readable
/// `<digits> €/mon` amount. The thousands separator is stripped before
/// parsing.
fn parse_price(text: &str) -> Option<f64> {
    if text.contains("/day") {
        return None;
    }

    let caps = PRICE_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.ss.lv/en/real-estate/flats/riga/all/hand_over/";

    fn row(region: &str, id: &str, rooms: &str, area: &str, floor: &str, price: &str) -> String {
        format!(
            "<tr>\
             <td><input type=\"checkbox\"></td>\
             <td><img src=\"//i.ss.lv/thumb.jpg\"></td>\
             <td><a class=\"am\" href=\"/msg/en/real-estate/flats/riga/{region}/{id}.html\">flat</a></td>\
             <td>{rooms}</td><td>{area}</td><td>{floor}</td><td>602.</td><td>{price}</td>\
             </tr>"
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table>\
             <tr><td colspan=\"8\">banner</td></tr>\
             <tr><th>Ad</th><th>Rooms</th><th>m2</th><th>Floor</th><th>Series</th><th>Price</th></tr>\
             {}\
             </table></body></html>",
            rows.join("")
        )
    }

    #[test]
    fn test_parse_listings_skips_non_listing_rows() {
        let html = page(&[
            row("centre", "aaa", "2", "45", "3/5", "350 €/mon."),
            row("teika", "bbb", "1", "30", "1/9", "250 €/mon."),
        ]);

        let listings = parse_listings(&html, BASE);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id(), "aaa");
        assert_eq!(listings[0].region, "centre");
        assert_eq!(listings[0].price, 350.0);
        assert_eq!(listings[1].id(), "bbb");
        assert_eq!(
            listings[1].link,
            "https://www.ss.lv/msg/en/real-estate/flats/riga/teika/bbb.html"
        );
    }

    #[test]
    fn test_parse_listings_drops_daily_rate() {
        let html = page(&[
            row("centre", "aaa", "2", "45", "3/5", "40 €/day"),
            row("centre", "bbb", "2", "45", "3/5", "350 €/mon."),
        ]);

        let listings = parse_listings(&html, BASE);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id(), "bbb");
    }

    #[test]
    fn test_parse_listings_drops_malformed_price() {
        let html = page(&[row("centre", "aaa", "2", "45", "3/5", "ask owner")]);
        assert!(parse_listings(&html, BASE).is_empty());
    }

    #[test]
    fn test_parse_listings_strips_thousands_separator() {
        let html = page(&[row("centre", "aaa", "4", "120", "2/3", "1,250 €/mon.")]);
        let listings = parse_listings(&html, BASE);
        assert_eq!(listings[0].price, 1250.0);
    }

    #[test]
    fn test_parse_listings_keeps_row_with_unparseable_area() {
        let html = page(&[row("centre", "aaa", "2", "-", "3/5", "350 €/mon.")]);
        let listings = parse_listings(&html, BASE);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].area, "-");
        assert_eq!(listings[0].area_m2(), None);
    }

    #[test]
    fn test_parse_photos() {
        let html = "<html><body>\
                    <div class=\"pic_dv_thumbnail\"><img src=\"//i.ss.lv/gallery/1/a.t.jpg\"></div>\
                    <div class=\"pic_dv_thumbnail\"><img src=\"https://i.ss.lv/gallery/1/b.t.jpg\"></div>\
                    </body></html>";

        let photos = parse_photos(html);
        assert_eq!(
            photos,
            vec![
                "https://i.ss.lv/gallery/1/a.t.jpg".to_string(),
                "https://i.ss.lv/gallery/1/b.t.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_photos_empty_page() {
        assert!(parse_photos("<html><body><p>no photos</p></body></html>").is_empty());
    }
}
