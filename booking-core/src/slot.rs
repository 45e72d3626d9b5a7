use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Bookable hours, 08:00 through 20:00 with the 13:00 lunch break removed.
pub const OPERATING_HOURS: [&str; 12] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00",
    "19:00", "20:00",
];

/// The two bookable spaces. Every slot tracks both independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Court,
    Gourmet,
}

impl ResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Court => "Quadra",
            ResourceType::Gourmet => "Área Gourmet",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedKeyError {
    #[error("slot key `{0}` is not in `YYYY-MM-DD-HH:MM` form")]
    Shape(String),
    #[error("`{0}` is not a valid calendar date")]
    Date(String),
    #[error("`{0}` is not within operating hours")]
    Hour(String),
}

/// Canonical identity of one bookable (date, hour) cell.
///
/// The string form `"YYYY-MM-DD-HH:MM"` is the only identity that ever
/// reaches a map key or the wire; two keys are equal iff their canonical
/// strings are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    date: NaiveDate,
    hour: &'static str,
}

impl SlotKey {
    /// Builds a key from a calendar day and an operating hour.
    pub fn encode(date: NaiveDate, hour: &str) -> Result<Self, MalformedKeyError> {
        let hour = OPERATING_HOURS
            .iter()
            .find(|h| **h == hour)
            .copied()
            .ok_or_else(|| MalformedKeyError::Hour(hour.to_string()))?;
        Ok(SlotKey { date, hour })
    }

    /// Parses a canonical key string back into its (date, hour) parts.
    pub fn parse(raw: &str) -> Result<Self, MalformedKeyError> {
        if raw.len() != 16 || raw.as_bytes().get(10) != Some(&b'-') {
            return Err(MalformedKeyError::Shape(raw.to_string()));
        }
        let date = parse_day(&raw[..10])?;
        Self::encode(date, &raw[11..])
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> &'static str {
        self.hour
    }

    /// Inverse of [`SlotKey::encode`].
    pub fn decode(&self) -> (NaiveDate, &'static str) {
        (self.date, self.hour)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format("%Y-%m-%d"), self.hour)
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = SlotKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a `YYYY-MM-DD-HH:MM` slot key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SlotKey, E> {
                SlotKey::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// Derives the calendar day from a raw date string.
///
/// Accepts `YYYY-MM-DD` with an optional `T...` suffix (spreadsheet rows
/// arrive as full ISO timestamps). The day is re-derived through a local-noon
/// anchor rather than midnight so a timestamp that drifted across a timezone
/// boundary cannot land on the wrong day.
pub fn parse_day(raw: &str) -> Result<NaiveDate, MalformedKeyError> {
    let clean = raw.split('T').next().unwrap_or("").trim();
    let date = NaiveDate::parse_from_str(clean, "%Y-%m-%d")
        .map_err(|_| MalformedKeyError::Date(raw.to_string()))?;
    // Noon anchor: construct the timestamp at 12:00 and take its date.
    let anchored = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| MalformedKeyError::Date(raw.to_string()))?;
    Ok(anchored.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn encode_decode_round_trips_every_operating_hour() {
        let date = day(2026, 1, 5);
        for hour in OPERATING_HOURS {
            let key = SlotKey::encode(date, hour).unwrap();
            assert_eq!(key.decode(), (date, hour));
            assert_eq!(SlotKey::parse(&key.to_string()).unwrap(), key);
        }
    }

    #[test]
    fn canonical_form_is_date_dash_hour() {
        let key = SlotKey::encode(day(2026, 1, 5), "09:00").unwrap();
        assert_eq!(key.to_string(), "2026-01-05-09:00");
    }

    #[test]
    fn rejects_lunch_break_and_off_hours() {
        let date = day(2026, 1, 5);
        assert_eq!(
            SlotKey::encode(date, "13:00"),
            Err(MalformedKeyError::Hour("13:00".into()))
        );
        assert!(SlotKey::encode(date, "21:00").is_err());
        assert!(SlotKey::parse("2026-01-05-07:00").is_err());
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(matches!(
            SlotKey::parse("not-a-key"),
            Err(MalformedKeyError::Shape(_))
        ));
        assert!(matches!(
            SlotKey::parse("2026-02-30-09:00"),
            Err(MalformedKeyError::Date(_))
        ));
    }

    #[test]
    fn parse_day_ignores_timestamp_suffix() {
        assert_eq!(
            parse_day("2026-01-05T00:00:00.000Z").unwrap(),
            day(2026, 1, 5)
        );
        assert_eq!(parse_day("2026-01-05").unwrap(), day(2026, 1, 5));
        assert!(parse_day("05/01/2026").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn keys_order_chronologically() {
        let a = SlotKey::parse("2026-01-05-09:00").unwrap();
        let b = SlotKey::parse("2026-01-05-14:00").unwrap();
        let c = SlotKey::parse("2026-01-06-08:00").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn serde_uses_the_canonical_string() {
        let key = SlotKey::parse("2026-01-05-09:00").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2026-01-05-09:00\"");
        let back: SlotKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<SlotKey>("\"2026-01-05-13:00\"").is_err());
    }
}
