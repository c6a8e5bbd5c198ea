//! Location extraction: from/to zip, city and state
//!
//! Three strategies run in order. The sectioned pass anchors on the
//! "Moving From" / "Moving To" headings; the proximity pass looks for a
//! state token near an already-found zip; the general pass scans the whole
//! text. A later pass never overwrites what an earlier one found.

use regex::Regex;
use tracing::{debug, trace};

use super::{all_matches, first_capture, Locations};

pub fn extract_locations(text: &str) -> Locations {
    let mut locations = Locations::default();

    moving_sections(text, &mut locations);

    if locations.from.state.is_empty() || locations.to.state.is_empty() {
        states_near_zips(text, &mut locations);
    }

    if locations.from.zip.is_empty() || locations.to.zip.is_empty() {
        general_scan(text, &mut locations);
    }

    city_names(text, &mut locations);

    locations
}

/// Sectioned strategy: split at each "Moving From" / "Moving To" heading and
/// read the first zip and state token inside each segment.
fn moving_sections(text: &str, locations: &mut Locations) {
    let sections = split_at_headings(text);
    trace!(count = sections.len(), "split moving sections");

    if let Some(section) = sections
        .iter()
        .find(|section| section.to_lowercase().contains("moving from"))
    {
        if let Some(zip) = first_capture(section, r"(\d{5})") {
            locations.from.zip = zip;
        }
        if let Some(state) = first_capture(section, r"\b([A-Z]{2})\b") {
            locations.from.state = state;
        }
        debug!(zip = %locations.from.zip, state = %locations.from.state, "moving-from section");
    }

    if let Some(section) = sections
        .iter()
        .find(|section| section.to_lowercase().contains("moving to"))
    {
        if let Some(zip) = first_capture(section, r"(\d{5})") {
            locations.to.zip = zip;
        }
        if let Some(state) = first_capture(section, r"\b([A-Z]{2})\b") {
            locations.to.state = state;
        }
        debug!(zip = %locations.to.zip, state = %locations.to.state, "moving-to section");
    }
}

/// Segments each starting at a "Moving From"/"Moving To" heading, plus the
/// prefix before the first one. Cut at match starts so every heading stays
/// at the front of its own segment.
fn split_at_headings(text: &str) -> Vec<&str> {
    let re = match Regex::new(r"(?i)Moving\s+(?:From|To)") {
        Ok(re) => re,
        Err(_) => return vec![text],
    };

    let starts: Vec<usize> = re.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![text];
    }

    let mut sections = Vec::with_capacity(starts.len() + 1);
    sections.push(&text[..starts[0]]);
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        sections.push(&text[start..end]);
    }
    sections
}

/// Proximity strategy: a state token within 100 characters of the zip.
fn states_near_zips(text: &str, locations: &mut Locations) {
    if locations.from.state.is_empty() {
        if let Some(state) = state_near(text, &locations.from.zip) {
            locations.from.state = state;
        }
    }
    if locations.to.state.is_empty() {
        if let Some(state) = state_near(text, &locations.to.zip) {
            locations.to.state = state;
        }
    }
}

fn state_near(text: &str, zip: &str) -> Option<String> {
    if zip.is_empty() {
        return None;
    }
    let position = text.find(zip)?;

    let mut start = position.saturating_sub(100);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (position + zip.len() + 100).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }

    first_capture(&text[start..end], r"\b([A-Z]{2})\b")
}

/// General fallback: the first two zip tokens and the first two bare state
/// tokens in document order become from and to.
fn general_scan(text: &str, locations: &mut Locations) {
    let zips = all_matches(text, r"\b\d{5}\b");
    if zips.len() >= 2 {
        if locations.from.zip.is_empty() {
            locations.from.zip = zips[0].clone();
        }
        if locations.to.zip.is_empty() {
            locations.to.zip = zips[1].clone();
        }
    }

    let states = all_matches(text, r"\b[A-Z]{2}\b");
    if states.len() >= 2 {
        if locations.from.state.is_empty() {
            locations.from.state = states[0].clone();
        }
        if locations.to.state.is_empty() {
            locations.to.state = states[1].clone();
        }
    }
}

/// Best-effort city lookup: the first word following each of the first two
/// city/town indicators.
fn city_names(text: &str, locations: &mut Locations) {
    const INDICATORS: [&str; 4] = ["city:", "city", "town:", "town"];

    for indicator in INDICATORS {
        let pattern = format!(r"(?i){}\s*([A-Za-z\s]+)", regex::escape(indicator));
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };

        let cities: Vec<String> = re
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().trim().split_whitespace().next())
            .map(String::from)
            .collect();

        if cities.len() >= 2 {
            if locations.from.city.is_empty() {
                locations.from.city = cities[0].clone();
            }
            if locations.to.city.is_empty() {
                locations.to.city = cities[1].clone();
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sectioned_extraction() {
        let text = "Moving From: Chicago IL 60601\nMoving To: Austin TX 73301";
        let locations = extract_locations(text);

        assert_eq!(locations.from.zip, "60601");
        assert_eq!(locations.from.state, "IL");
        assert_eq!(locations.to.zip, "73301");
        assert_eq!(locations.to.state, "TX");
    }

    #[test]
    fn test_general_fallback_assigns_in_document_order() {
        let text = "Quote covers 11111 first and then 22222 later on";
        let locations = extract_locations(text);

        assert_eq!(locations.from.zip, "11111");
        assert_eq!(locations.to.zip, "22222");
    }

    #[test]
    fn test_sectioned_value_wins_over_general_scan() {
        // 99999 appears first in document order; the sectioned pass still
        // owns the from zip.
        let text = "Reference 99999\nMoving From: 11111 AA\nMoving To: 22222 BB";
        let locations = extract_locations(text);

        assert_eq!(locations.from.zip, "11111");
        assert_eq!(locations.to.zip, "22222");
        assert_eq!(locations.from.state, "AA");
        assert_eq!(locations.to.state, "BB");
    }

    #[test]
    fn test_proximity_state_near_zip() {
        // The from section carries no state token; the nearest one sits
        // just before the heading.
        let text = "Service area IL\nMoving From: 60601\nMoving To: Austin TX 73301";
        let locations = extract_locations(text);

        assert_eq!(locations.from.zip, "60601");
        assert_eq!(locations.from.state, "IL");
        assert_eq!(locations.to.state, "TX");
    }

    #[test]
    fn test_city_indicators() {
        let text = "City: Springfield, 62701 and later City: Portland, 97201";
        let locations = extract_locations(text);

        assert_eq!(locations.from.city, "Springfield");
        assert_eq!(locations.to.city, "Portland");
    }

    #[test]
    fn test_single_zip_assigns_nothing() {
        let locations = extract_locations("only 12345 here");
        assert_eq!(locations.from.zip, "");
        assert_eq!(locations.to.zip, "");
    }

    #[test]
    fn test_no_content_stays_default() {
        let locations = extract_locations("");
        assert_eq!(locations, Locations::default());
    }
}
