//! A date and time represented in a font file.

use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::scalar::{ReadScalar, ValueType};

/// A simple date and time: seconds since 1904-01-01 00:00:00 UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct LongDateTime(i64);

impl LongDateTime {
    pub const fn new(secs: i64) -> Self {
        LongDateTime(secs)
    }

    /// The number of seconds since the font epoch, 1904-01-01 00:00:00 UTC.
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

// `Duration::seconds` itself only covers about 292 million years.
const MAX_RENDERED_SECS: i64 = i64::MAX / 1000;

impl fmt::Display for LongDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let date = (self.0.abs() < MAX_RENDERED_SECS)
            .then(|| epoch.checked_add_signed(Duration::seconds(self.0)))
            .flatten();
        match date {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
            // Far enough out of range that a calendar date is meaningless.
            None => write!(f, "{} seconds since 1904", self.0),
        }
    }
}

impl ReadScalar for LongDateTime {
    const RAW_BYTE_LEN: usize = 8;
    const VALUE_TYPE: ValueType = ValueType::LongDateTime;

    #[inline]
    fn read_be(data: &[u8]) -> Option<Self> {
        data.get(..8)
            .map(|b| LongDateTime(i64::from_be_bytes(b.try_into().unwrap())))
    }
}
