//! Timestamp conversions for codec implementations.
//!
//! The engine represents every timestamp as Unix epoch seconds truncated to
//! 32 bits (see [`PropertyValue::Time`](crate::property::PropertyValue::Time)).
//! Codecs that store broken-down civil time, such as the DOS date fields of
//! ZIP, convert through [`chrono::NaiveDateTime`] in UTC.
//!
//! # Precision
//!
//! Conversions into epoch seconds drop the sub-second part. Times before
//! 1970 clamp to 0 and times past 2106 clamp to `u32::MAX`.
//!
//! ```rust
//! use arcbridge::timestamp::{from_epoch_secs, to_epoch_secs};
//! use chrono::Datelike;
//!
//! let t = from_epoch_secs(951_782_400);
//! assert_eq!((t.year(), t.month(), t.day()), (2000, 2, 29));
//! assert_eq!(to_epoch_secs(t), 951_782_400);
//! ```

use chrono::{DateTime, NaiveDateTime};

/// Converts a UTC civil time to epoch seconds, clamped into the 32-bit range.
pub fn to_epoch_secs(time: NaiveDateTime) -> u32 {
    let secs = time.and_utc().timestamp();
    secs.clamp(0, i64::from(u32::MAX)) as u32
}

/// Breaks epoch seconds down into UTC civil time.
pub fn from_epoch_secs(secs: u32) -> NaiveDateTime {
    // every u32 second count is within chrono's range
    DateTime::from_timestamp(i64::from(secs), 0)
        .unwrap_or_default()
        .naive_utc()
}
