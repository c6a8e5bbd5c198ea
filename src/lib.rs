//! Field extraction engine for moving-company job pages
//!
//! Recovers structured data from a page's rendered text and DOM:
//! - Locations (from/to zip, city, state)
//! - Pricing (initial price, fuel surcharge, extra charges, total estimate)
//! - Job details (job number, status, pickup date, cubes, distance)
//! - Moving details (customer name, from/to lines, cubes, pickup date, distance)
//!
//! Also carries the zone rate table the price calculator runs on.

pub mod error;
pub mod extractors;
pub mod ffi;
pub mod page;
pub mod rates;

pub use error::*;
pub use extractors::*;
pub use ffi::*;
pub use page::*;
pub use rates::*;
