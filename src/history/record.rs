//! A single completed draw.

use crate::selector::TicketNumber;
use chrono::{DateTime, Local, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// 0001-01-01T00:00:00.000Z
const EARLIEST_MILLIS: i64 = -62_135_596_800_000;
/// 9999-12-31T23:59:59.999Z
const LATEST_MILLIS: i64 = 253_402_300_799_999;

/// Outcome of one draw plus its free-text memo.
///
/// Serialized as `{"winner": 5, "timestamp": "<ISO-8601>", "memo": ""}`.
/// Timestamps are kept at millisecond precision so they survive a
/// round-trip through their text form unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    winner: TicketNumber,
    #[serde(with = "iso_millis")]
    timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "memo_or_empty")]
    memo: String,
}

impl DrawRecord {
    /// Record with an empty memo; `at` is truncated to milliseconds.
    ///
    /// `at` is clamped to years 0001 through 9999, the range a four-digit
    /// ISO-8601 timestamp can express, so every record reloads.
    pub fn new(winner: TicketNumber, at: DateTime<Utc>) -> Self {
        let earliest = DateTime::<Utc>::from_timestamp_millis(EARLIEST_MILLIS)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let latest = DateTime::<Utc>::from_timestamp_millis(LATEST_MILLIS)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            winner,
            timestamp: at.clamp(earliest, latest).trunc_subsecs(3),
            memo: String::new(),
        }
    }

    pub fn winner(&self) -> TicketNumber {
        self.winner
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Replace the memo with `text` trimmed; blank text clears it.
    pub(crate) fn set_memo(&mut self, text: &str) {
        self.memo = text.trim().to_string();
    }

    /// One history row in local time: `"5  2024/03/01 18:04:09"`, with
    /// the memo on a second line when present.
    pub fn summary(&self) -> String {
        self.summary_in(&Local)
    }

    pub fn summary_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let when = self.timestamp.with_timezone(tz).format("%Y/%m/%d %H:%M:%S");
        if self.memo.is_empty() {
            format!("{}  {}", self.winner, when)
        } else {
            format!("{}  {}\n  {}", self.winner, when, self.memo)
        }
    }
}

fn memo_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
