//! Moving detail extraction: the second, independently read view
//!
//! Reads similar facts through different selectors than the job and
//! location groups and formats them for its own display context, without
//! unit suffixes.

use regex::Regex;
use tracing::debug;

use super::{first_capture, first_hit, CompiledSelectors, MovingDetails};
use crate::page::PageSnapshot;

pub fn extract_moving_details(page: &PageSnapshot, selectors: &CompiledSelectors) -> MovingDetails {
    let text = &page.text;
    let mut details = MovingDetails::default();

    let styled_cell = || page.first_text(&selectors.customer_name);
    let styled_anywhere = || page.first_text(&selectors.customer_name_loose);
    let bold_row = || alphabetic_bold(page, selectors);
    let strategies: [&dyn Fn() -> Option<String>; 3] = [&styled_cell, &styled_anywhere, &bold_row];

    if let Some(name) = first_hit(&strategies) {
        details.customer_name = name;
    }

    from_to_cells(page, selectors, text, &mut details);

    details.cubes = page
        .first_attr(&selectors.cubes_input, "value")
        .filter(|value| !value.is_empty())
        .or_else(|| first_capture(text, r"(?i)Cubes[:\s-]+(\d+)"))
        .unwrap_or_default();

    details.pickup_date = page
        .first_attr(&selectors.pickup_input, "value")
        .filter(|value| !value.is_empty())
        .or_else(|| first_capture(text, r"(?i)Pick\s+Up\s+Date[:\s-]+(\d{1,2}/\d{1,2}/\d{4})"))
        .unwrap_or_default();

    details.distance = page
        .first_text(&selectors.distance_banner)
        .and_then(|banner| first_capture(&banner, r"(?i)Distance[:\s]*(\d+)\s*Miles"))
        .or_else(|| first_capture(text, r"(?i)Distance[:\s]*(\d+)\s*Miles"))
        .unwrap_or_default();

    details
}

/// Bold table-row text qualifies as a name only when it is purely
/// alphabetic.
fn alphabetic_bold(page: &PageSnapshot, selectors: &CompiledSelectors) -> Option<String> {
    let candidate = page.first_text(&selectors.customer_name_bold)?;
    let re = match Regex::new(r"^[A-Za-z\s]+$") {
        Ok(re) => re,
        Err(_) => return None,
    };
    re.is_match(&candidate).then_some(candidate)
}

/// Six cells carrying the shared from/to class hold city, state and zip for
/// each side; with fewer cells, labeled-text patterns take over.
fn from_to_cells(
    page: &PageSnapshot,
    selectors: &CompiledSelectors,
    text: &str,
    details: &mut MovingDetails,
) {
    let cells = page.all_texts(&selectors.from_to_cells);
    debug!(count = cells.len(), "from/to cells");

    if cells.len() >= 6 {
        details.moving_from = join_place(&cells[0], &cells[1], &cells[2]);
        details.moving_to = join_place(&cells[3], &cells[4], &cells[5]);
        return;
    }

    if let Some(from) = first_capture(text, r"(?i)Moving\s+From[:\s-]+([A-Za-z\s]+)") {
        details.moving_from = from.trim().to_string();
    }
    if let Some(to) = first_capture(text, r"(?i)Moving\s+To[:\s-]+([A-Za-z0-9\s]+)") {
        details.moving_to = to.trim().to_string();
    }
}

/// `"city, state zip"`, with the zip dropped when missing and the whole
/// line dropped when city or state is missing.
fn join_place(city: &str, state: &str, zip: &str) -> String {
    let (city, state, zip) = (city.trim(), state.trim(), zip.trim());
    if city.is_empty() || state.is_empty() {
        return String::new();
    }

    let mut place = format!("{city}, {state}");
    if !zip.is_empty() {
        place.push(' ');
        place.push_str(zip);
    }
    place
}
