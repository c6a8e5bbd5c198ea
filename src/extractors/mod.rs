//! Page field extraction
//!
//! Each module extracts one group of fields from a captured page:
//! - Locations (from/to zip, city, state)
//! - Pricing (labeled charges)
//! - Job details (job number chain, status, pickup date, cubes, distance)
//! - Moving details (a second view read through different selectors)
//!
//! Strategies within a group run in a fixed order and the first non-empty
//! result wins. A group that finds nothing leaves its fields at their
//! defaults; that is a normal outcome, not an error.

mod job_details;
mod locations;
mod moving_details;
mod pricing;

pub use job_details::*;
pub use locations::*;
pub use moving_details::*;
pub use pricing::*;

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractError;
use crate::page::PageSnapshot;

/// Structured result of one extraction call.
///
/// Produced fresh per call, immutable once returned. Fields that could not
/// be recovered stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    pub locations: Locations,
    pub pricing: Pricing,
    pub job_details: JobDetails,
    pub moving_details: MovingDetails,
}

/// Origin and destination of the move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    pub from: Location,
    pub to: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub zip: String,
    pub city: String,
    pub state: String,
}

/// Currency-formatted charges, kept exactly as they appear on the page with
/// a leading `$` added when the page left it off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub initial_price: String,
    pub fuel_surcharge: String,
    pub extra_charges: String,
    pub total_estimate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub job_number: String,
    pub status: String,
    pub pickup_date: String,
    pub cubes: String,
    pub distance: String,
}

/// Second view over similar facts, read through different selectors.
///
/// Kept separate from the other groups: no single strategy is reliable
/// across all page variants, and downstream consumers depend on the
/// formatting differences between the two views (this one carries no unit
/// suffixes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingDetails {
    pub customer_name: String,
    pub moving_from: String,
    pub moving_to: String,
    pub cubes: String,
    pub pickup_date: String,
    pub distance: String,
}

/// CSS selectors used by the DOM-backed strategies.
///
/// The source pages drifted between revisions, so anything that differed is
/// a configuration value here rather than a hard-coded contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    /// Element holding the single department letter of the job number.
    pub dept_anchor: String,
    /// Styled customer-name element inside a three-column cell.
    pub customer_name: String,
    /// The same styled element anywhere on the page.
    pub customer_name_loose: String,
    /// Any bold text inside a table row.
    pub customer_name_bold: String,
    /// Table cells carrying the from/to city, state and zip.
    pub from_to_cells: String,
    /// Input holding the cube count.
    pub cubes_input: String,
    /// Input holding the pickup date.
    pub pickup_input: String,
    /// Element whose text carries the "Distance: N Miles" banner.
    pub distance_banner: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            dept_anchor: "#dept".into(),
            customer_name:
                r##"tr td[colspan="3"] font[face="Verdana"][color="#31557B"][size="4"] b"##.into(),
            customer_name_loose: r##"font[face="Verdana"][color="#31557B"][size="4"] b"##.into(),
            customer_name_bold: "tr td b".into(),
            from_to_cells: "td.FROMTO".into(),
            cubes_input: r#"input[name="CFLBS"]"#.into(),
            pickup_input: r#"input[name="PUDTE"]"#.into(),
            distance_banner: ".DISTANCE".into(),
        }
    }
}

impl Selectors {
    pub(crate) fn compile(&self) -> Result<CompiledSelectors, ExtractError> {
        Ok(CompiledSelectors {
            dept_anchor: compile(&self.dept_anchor)?,
            customer_name: compile(&self.customer_name)?,
            customer_name_loose: compile(&self.customer_name_loose)?,
            customer_name_bold: compile(&self.customer_name_bold)?,
            from_to_cells: compile(&self.from_to_cells)?,
            cubes_input: compile(&self.cubes_input)?,
            pickup_input: compile(&self.pickup_input)?,
            distance_banner: compile(&self.distance_banner)?,
        })
    }
}

pub(crate) struct CompiledSelectors {
    pub(crate) dept_anchor: Selector,
    pub(crate) customer_name: Selector,
    pub(crate) customer_name_loose: Selector,
    pub(crate) customer_name_bold: Selector,
    pub(crate) from_to_cells: Selector,
    pub(crate) cubes_input: Selector,
    pub(crate) pickup_input: Selector,
    pub(crate) distance_banner: Selector,
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|_| ExtractError::Selector(selector.to_string()))
}

/// Serializable `{success, data, error}` envelope for non-Rust callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<ExtractionRecord, ExtractError>> for ExtractionOutcome {
    fn from(result: Result<ExtractionRecord, ExtractError>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Extract every field group from the snapshot with the default selectors.
pub fn extract(page: &PageSnapshot) -> Result<ExtractionRecord, ExtractError> {
    extract_with(page, &Selectors::default())
}

/// Extract with a caller-supplied selector configuration.
///
/// Field misses never fail the call; the only error is a selector that does
/// not compile, reported before any extraction runs.
pub fn extract_with(
    page: &PageSnapshot,
    selectors: &Selectors,
) -> Result<ExtractionRecord, ExtractError> {
    let compiled = selectors.compile()?;

    let record = ExtractionRecord {
        locations: extract_locations(&page.text),
        pricing: extract_pricing(&page.text),
        job_details: extract_job_details(page, &compiled),
        moving_details: extract_moving_details(page, &compiled),
    };

    debug!(job_number = %record.job_details.job_number, "page analyzed");
    Ok(record)
}

/// Runs strategies in order; the first non-empty result wins.
pub(crate) fn first_hit(strategies: &[&dyn Fn() -> Option<String>]) -> Option<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy().filter(|value| !value.is_empty()))
}

/// First capture of `pattern` in `text`.
pub(crate) fn first_capture(text: &str, pattern: &str) -> Option<String> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return None,
    };

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every full match of `pattern` in `text`, in document order.
pub(crate) fn all_matches(text: &str, pattern: &str) -> Vec<String> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}


#[test]
fn test_full_page_extraction() {
    let page = PageSnapshot::from_html(
        r##"
        <html>
        <body>
            <table>
                <tr><td colspan="3"><font face="Verdana" color="#31557B" size="4"><b>John Smith</b></font></td></tr>
                <tr>
                    <td class="FROMTO">Dallas</td><td class="FROMTO">TX</td><td class="FROMTO">75201</td>
                    <td class="FROMTO">Denver</td><td class="FROMTO">CO</td><td class="FROMTO">80202</td>
                </tr>
            </table>
            <p>Moving From: Dallas TX 75201</p>
            <p>Moving To: Denver CO 80202</p>
            <p>Job No: B1234567</p>
            <p>Status: Booked</p>
            <p>612 Cubes</p>
            <p>Pick Up: 07/15/2026</p>
            <p>Distance: 800 Miles</p>
            <p>Initial Price: 1200.00</p>
            <p>Fuel Surcharge: $150.00</p>
            <p>Extra Charges: 75.50</p>
            <p>Total Estimate: $1,425.50</p>
            <input name="CFLBS" value="612">
            <input name="PUDTE" value="07/15/2026">
        </body>
        </html>
        "##,
    );

    let record = extract(&page).unwrap();

    assert_eq!(record.locations.from.zip, "75201");
    assert_eq!(record.locations.from.state, "TX");
    assert_eq!(record.locations.to.zip, "80202");
    assert_eq!(record.locations.to.state, "CO");

    assert_eq!(record.pricing.initial_price, "$1200.00");
    assert_eq!(record.pricing.fuel_surcharge, "$150.00");
    assert_eq!(record.pricing.extra_charges, "$75.50");
    assert_eq!(record.pricing.total_estimate, "$1,425.50");

    assert_eq!(record.job_details.job_number, "B1234567");
    assert_eq!(record.job_details.status, "Booked");
    assert_eq!(record.job_details.pickup_date, "07/15/2026");
    assert_eq!(record.job_details.cubes, "612 Cubes");
    assert_eq!(record.job_details.distance, "800 Miles");

    assert_eq!(record.moving_details.customer_name, "John Smith");
    assert_eq!(record.moving_details.moving_from, "Dallas, TX 75201");
    assert_eq!(record.moving_details.moving_to, "Denver, CO 80202");
    assert_eq!(record.moving_details.cubes, "612");
    assert_eq!(record.moving_details.pickup_date, "07/15/2026");
    assert_eq!(record.moving_details.distance, "800");
}
