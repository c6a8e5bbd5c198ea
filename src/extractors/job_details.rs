//! Job detail extraction
//!
//! The job number runs through a four-step fallback chain; the remaining
//! fields are single lookups with an input-field-first rule. Cube and
//! distance values carry their display suffixes in this view.

use tracing::debug;

use super::{all_matches, first_capture, first_hit, CompiledSelectors, JobDetails};
use crate::page::PageSnapshot;

pub fn extract_job_details(page: &PageSnapshot, selectors: &CompiledSelectors) -> JobDetails {
    let text = &page.text;
    let mut details = JobDetails::default();

    let structural = || dept_sibling(page, selectors);
    let pattern = || first_capture(text, r"([A-Z]\d{7})");
    let labeled = || first_capture(text, r"(?i)job\s*no[:\s]*([A-Z0-9]+)");
    let global = || all_matches(text, r"[A-Z]\d{7}").into_iter().next();
    let strategies: [&dyn Fn() -> Option<String>; 4] = [&structural, &pattern, &labeled, &global];

    if let Some(job_number) = first_hit(&strategies) {
        debug!(%job_number, "job number extracted");
        details.job_number = job_number;
    }

    if let Some(status) = first_capture(text, r"(?i)status[:\s]*([A-Za-z\s-]+)") {
        details.status = status.trim().to_string();
    }

    details.pickup_date = page
        .first_attr(&selectors.pickup_input, "value")
        .filter(|value| !value.is_empty())
        .or_else(|| first_capture(text, r"(?i)pick.?up[:\s]*(\d{1,2}/\d{1,2}/\d{4})"))
        .unwrap_or_default();

    details.cubes = page
        .first_attr(&selectors.cubes_input, "value")
        .filter(|value| !value.is_empty())
        .or_else(|| first_capture(text, r"(?i)(\d+)\s*cubes"))
        .map(|cubes| format!("{cubes} Cubes"))
        .unwrap_or_default();

    details.distance = distance_banner(page, selectors)
        .or_else(|| first_capture(text, r"(?i)distance[:\s]*(\d+)\s*miles"))
        .map(|miles| format!("{miles} Miles"))
        .unwrap_or_default();

    details
}

/// Structural strategy: the department letter sits in its own element and
/// the digits in the node right after it.
fn dept_sibling(page: &PageSnapshot, selectors: &CompiledSelectors) -> Option<String> {
    let letter = page.first_text(&selectors.dept_anchor)?;
    let trailing = page.next_sibling_text(&selectors.dept_anchor)?;
    let digits = first_capture(&trailing, r"(\d+)")?;
    Some(format!("{}{}", letter.trim(), digits))
}

fn distance_banner(page: &PageSnapshot, selectors: &CompiledSelectors) -> Option<String> {
    let banner = page.first_text(&selectors.distance_banner)?;
    first_capture(&banner, r"(?i)Distance[:\s]*(\d+)\s*Miles")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::Selectors;

    fn compiled() -> CompiledSelectors {
        Selectors::default().compile().unwrap()
    }

    #[test]
    fn test_structural_dept_match_wins_over_pattern() {
        let page = PageSnapshot::from_html(
            r#"
            <body>
                <td><span id="dept">B</span> 7654321</td>
                <p>Unrelated reference Z9999999</p>
            </body>
            "#,
        );

        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.job_number, "B7654321");
    }

    #[test]
    fn test_bare_pattern_match() {
        let page = PageSnapshot::from_parts("order ref B1234567 pending", "<body></body>");
        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.job_number, "B1234567");
    }

    #[test]
    fn test_labeled_job_number_fallback() {
        let page = PageSnapshot::from_parts("Job No: 55A filed yesterday", "<body></body>");
        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.job_number, "55A");
    }

    #[test]
    fn test_status_trimmed() {
        let page = PageSnapshot::from_parts("Status: In Transit 4", "<body></body>");
        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.status, "In Transit");
    }

    #[test]
    fn test_pickup_input_wins_over_text() {
        let page = PageSnapshot::from_parts(
            "Pick Up: 03/04/2026",
            r#"<body><input name="PUDTE" value="01/02/2026"></body>"#,
        );

        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.pickup_date, "01/02/2026");
    }

    #[test]
    fn test_pickup_text_fallback() {
        let page = PageSnapshot::from_parts("pick-up: 3/4/2026", "<body></body>");
        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.pickup_date, "3/4/2026");
    }

    #[test]
    fn test_cubes_suffixed_from_input_and_text() {
        let page = PageSnapshot::from_parts(
            "ignored",
            r#"<body><input name="CFLBS" value="612"></body>"#,
        );
        assert_eq!(extract_job_details(&page, &compiled()).cubes, "612 Cubes");

        let page = PageSnapshot::from_parts("load is 450 cubes total", "<body></body>");
        assert_eq!(extract_job_details(&page, &compiled()).cubes, "450 Cubes");
    }

    #[test]
    fn test_distance_banner_wins_over_text() {
        let page = PageSnapshot::from_parts(
            "Distance: 100 Miles",
            r#"<body><div class="DISTANCE">Distance: 439 Miles</div></body>"#,
        );

        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.distance, "439 Miles");
    }

    #[test]
    fn test_distance_text_fallback() {
        let page = PageSnapshot::from_parts("total distance: 800 miles", "<body></body>");
        let details = extract_job_details(&page, &compiled());
        assert_eq!(details.distance, "800 Miles");
    }

    #[test]
    fn test_no_job_markers_leaves_defaults() {
        let page = PageSnapshot::from_parts("nothing here", "<body></body>");
        let details = extract_job_details(&page, &compiled());
        assert_eq!(details, JobDetails::default());
    }
}
