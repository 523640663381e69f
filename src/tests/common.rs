// src/tests/common.rs

//! Common data and helpers shared by tests.

use crate::data::datetime::{DateTime, DateTimeL, FixedOffset, TimeZone, Utc};

use ::lazy_static::lazy_static;

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref FO_P1: FixedOffset = FixedOffset::east_opt(3600).unwrap();
    pub static ref FO_M8: FixedOffset = FixedOffset::east_opt(-8 * 3600).unwrap();
}

/// Create a `DateTimeL` in `fo`.
pub fn ymdhms(
    fo: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    fo.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// A fixed "now" for datetimes missing components; 2023-12-01 05:06:07 UTC.
pub fn utc_now_fixed() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 1, 5, 6, 7)
        .unwrap()
}
