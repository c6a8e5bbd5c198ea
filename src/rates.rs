//! Zone rate table
//!
//! Pricing comes from a published sheet: one row per zone with an inclusive
//! zip range, a base price and a per-mile surcharge. Lookups and quoting
//! are pure; fetching the sheet is an explicit blocking call.

use serde::Serialize;
use tracing::debug;

use crate::error::RateError;

#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rows: Vec<RateRow>,
}

#[derive(Debug, Clone)]
struct RateRow {
    zone: u32,
    zip_min: u32,
    zip_max: u32,
    base_price: f64,
    surcharge_per_mile: f64,
}

/// Price quote for one from/to zip pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub base_price: f64,
    pub distance: f64,
    pub surcharge_per_mile: f64,
    pub total_price: f64,
    pub from_zone: u32,
    pub to_zone: u32,
}

impl RateTable {
    /// Parse the CSV export of the rate sheet. Rows that do not carry a
    /// numeric zone, zip range and rates are skipped; an empty table is
    /// valid.
    pub fn parse_csv(csv: &str) -> Result<Self, RateError> {
        let mut lines = csv.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or(RateError::MissingHeader)?;
        let columns = split_row(header);

        let zone_col = column(&columns, "Zone")?;
        let range_col = column(&columns, "Zip Code Range")?;
        let base_col = column(&columns, "Base Price")?;
        let surcharge_col = column(&columns, "Surcharge Per Mile")?;

        let mut rows = Vec::new();
        for line in lines {
            let values = split_row(line);
            if let Some(row) = parse_row(&values, zone_col, range_col, base_col, surcharge_col) {
                rows.push(row);
            }
        }

        debug!(rows = rows.len(), "rate table parsed");
        Ok(Self { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zone whose zip range contains the given zip.
    pub fn zone_for_zip(&self, zip: &str) -> Option<u32> {
        let zip: u32 = zip.trim().parse().ok()?;
        self.rows
            .iter()
            .find(|row| zip >= row.zip_min && zip <= row.zip_max)
            .map(|row| row.zone)
    }

    /// Quote a move between two zips, using the higher of the two zones'
    /// per-mile surcharges on top of the origin zone's base price.
    pub fn quote(&self, from_zip: &str, to_zip: &str) -> Option<Quote> {
        let from_zone = self.zone_for_zip(from_zip)?;
        let to_zone = self.zone_for_zip(to_zip)?;

        let from_row = self.rows.iter().find(|row| row.zone == from_zone)?;
        let to_row = self.rows.iter().find(|row| row.zone == to_zone)?;

        let distance = estimate_distance(from_zip, to_zip);
        let surcharge_per_mile = from_row.surcharge_per_mile.max(to_row.surcharge_per_mile);
        let total_price = from_row.base_price + distance * surcharge_per_mile;

        debug!(from_zone, to_zone, total_price, "quote computed");
        Some(Quote {
            base_price: from_row.base_price,
            distance,
            surcharge_per_mile,
            total_price,
            from_zone,
            to_zone,
        })
    }
}

/// Rough mileage from the numeric spread between two zips, scaled down less
/// the further apart they are. Falls back to a flat 1000 when either zip is
/// not numeric.
pub fn estimate_distance(from_zip: &str, to_zip: &str) -> f64 {
    let (Ok(from), Ok(to)) = (
        from_zip.trim().parse::<i64>(),
        to_zip.trim().parse::<i64>(),
    ) else {
        return 1000.0;
    };

    let diff = (from - to).abs() as f64;
    if diff < 1000.0 {
        diff * 0.1
    } else if diff < 5000.0 {
        diff * 0.2
    } else if diff < 10000.0 {
        diff * 0.3
    } else {
        diff * 0.4
    }
}

/// Fetch and parse the published rate sheet.
///
/// Share links point at the sheet editor; the CSV lives behind the export
/// endpoint, so an `/edit...` suffix is rewritten first.
pub fn fetch_blocking(agent: &ureq::Agent, sheet_url: &str) -> Result<RateTable, RateError> {
    let csv_url = export_url(sheet_url);
    url::Url::parse(&csv_url)?;

    let csv = match agent.get(&csv_url).call() {
        Ok(resp) if resp.status().is_success() => {
            resp.into_body().read_to_string().unwrap_or_default()
        }
        Ok(resp) => return Err(RateError::Status(resp.status().as_u16())),
        Err(err) => return Err(RateError::Http(Box::new(err))),
    };

    RateTable::parse_csv(&csv)
}

fn export_url(sheet_url: &str) -> String {
    match sheet_url.split_once("/edit") {
        Some((base, _)) => format!("{base}/export?format=csv&gid=0"),
        None => sheet_url.to_string(),
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|value| value.trim().replace('"', ""))
        .collect()
}

fn column(columns: &[String], name: &str) -> Result<usize, RateError> {
    columns
        .iter()
        .position(|column| column == name)
        .ok_or_else(|| RateError::MissingColumn(name.to_string()))
}

fn parse_row(
    values: &[String],
    zone: usize,
    range: usize,
    base: usize,
    surcharge: usize,
) -> Option<RateRow> {
    let (zip_min, zip_max) = values
        .get(range)?
        .split_once('-')
        .and_then(|(min, max)| Some((min.trim().parse().ok()?, max.trim().parse().ok()?)))?;

    Some(RateRow {
        zone: values.get(zone)?.parse().ok()?,
        zip_min,
        zip_max,
        base_price: values.get(base)?.parse().ok()?,
        surcharge_per_mile: values.get(surcharge)?.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Zone,Zip Code Range,Base Price,Surcharge Per Mile
1,10000-29999,500.00,1.50
2,30000-59999,650.00,2.00
3,60000-99999,800.00,2.50
";

    #[test]
    fn test_parse_and_zone_lookup() {
        let table = RateTable::parse_csv(SHEET).unwrap();
        assert!(!table.is_empty());

        assert_eq!(table.zone_for_zip("10001"), Some(1));
        assert_eq!(table.zone_for_zip("75201"), Some(3));
        assert_eq!(table.zone_for_zip("00100"), None);
        assert_eq!(table.zone_for_zip("not-a-zip"), None);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let sheet = "\
Zone,Zip Code Range,Base Price,Surcharge Per Mile
1,10000-29999,500.00,1.50
oops,not-a-range,free,none
";
        let table = RateTable::parse_csv(sheet).unwrap();
        assert_eq!(table.zone_for_zip("15000"), Some(1));
        assert_eq!(table.zone_for_zip("95000"), None);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = RateTable::parse_csv("Zone,Base Price\n1,500.00\n").unwrap_err();
        assert!(err.to_string().contains("Zip Code Range"));
    }

    #[test]
    fn test_distance_tiers() {
        assert_eq!(estimate_distance("10000", "10500"), 50.0);
        assert_eq!(estimate_distance("10000", "14000"), 800.0);
        assert_eq!(estimate_distance("10000", "19000"), 2700.0);
        assert_eq!(estimate_distance("10000", "30000"), 8000.0);
        assert_eq!(estimate_distance("abcde", "10000"), 1000.0);
    }

    #[test]
    fn test_quote_uses_higher_surcharge() {
        let table = RateTable::parse_csv(SHEET).unwrap();
        let quote = table.quote("15000", "75000").unwrap();

        assert_eq!(quote.from_zone, 1);
        assert_eq!(quote.to_zone, 3);
        assert_eq!(quote.base_price, 500.00);
        assert_eq!(quote.surcharge_per_mile, 2.50);
        // 60000 apart -> 0.4 per unit
        assert_eq!(quote.distance, 24000.0);
        assert_eq!(quote.total_price, 500.00 + 24000.0 * 2.50);
    }

    #[test]
    fn test_quote_requires_both_zones() {
        let table = RateTable::parse_csv(SHEET).unwrap();
        assert!(table.quote("15000", "00100").is_none());
    }

    #[test]
    fn test_export_url_rewrite() {
        assert_eq!(
            export_url("https://sheets.example.com/d/abc123/edit?gid=0#gid=0"),
            "https://sheets.example.com/d/abc123/export?format=csv&gid=0"
        );
        assert_eq!(
            export_url("https://sheets.example.com/d/abc123/export?format=csv"),
            "https://sheets.example.com/d/abc123/export?format=csv"
        );
    }
}
