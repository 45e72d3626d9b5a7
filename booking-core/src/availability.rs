use crate::slot::{parse_day, ResourceType, SlotKey, OPERATING_HOURS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Occupancy flags for one slot. A missing record means both spaces free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    #[serde(default)]
    pub court: bool,
    #[serde(default)]
    pub gourmet: bool,
}

impl OccupancyRecord {
    pub fn get(&self, resource: ResourceType) -> bool {
        match resource {
            ResourceType::Court => self.court,
            ResourceType::Gourmet => self.gourmet,
        }
    }

    fn set(&mut self, resource: ResourceType, value: bool) {
        match resource {
            ResourceType::Court => self.court = value,
            ResourceType::Gourmet => self.gourmet = value,
        }
    }

    pub fn any(&self) -> bool {
        self.court || self.gourmet
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("availability payload must be a JSON object or array, got {0}")]
    InvalidPayload(&'static str),
}

/// Full occupancy map at a point in time.
///
/// Treated as immutable-and-replaced: every mutation path returns a fresh
/// snapshot with a higher version, so a caller holding a clone can never
/// observe a half-applied update. The version is a local monotonic counter,
/// not persisted; [`crate::session::Session`] uses it to discard refreshes
/// that lost a race against a user write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    slots: BTreeMap<SlotKey, OccupancyRecord>,
    #[serde(default)]
    version: u64,
}

impl AvailabilitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn slots(&self) -> &BTreeMap<SlotKey, OccupancyRecord> {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_occupied(&self, key: &SlotKey, resource: ResourceType) -> bool {
        self.slots.get(key).is_some_and(|r| r.get(resource))
    }

    /// Normalizes a backend payload into a snapshot.
    ///
    /// Accepts three shapes: the canonical `SlotKey -> {court, gourmet}`
    /// object, an array of spreadsheet-style rows, or an object whose values
    /// are arrays of such rows (the Sheets proxy wraps its tabs that way).
    /// Malformed rows are skipped; anything that is not an object or array
    /// fails as a whole.
    pub fn load(raw: &Value, free_marker: &str) -> Result<Self, LoadError> {
        let mut slots = BTreeMap::new();
        match raw {
            Value::Array(rows) => {
                for row in rows {
                    ingest_row(&mut slots, row, free_marker);
                }
            }
            Value::Object(map) => {
                let nested_rows = map.values().any(Value::is_array);
                if nested_rows {
                    for value in map.values() {
                        if let Value::Array(rows) = value {
                            for row in rows {
                                ingest_row(&mut slots, row, free_marker);
                            }
                        }
                    }
                } else {
                    for (raw_key, value) in map {
                        let Ok(key) = SlotKey::parse(raw_key) else {
                            continue;
                        };
                        let Ok(record) = serde_json::from_value::<OccupancyRecord>(value.clone())
                        else {
                            continue;
                        };
                        if record.any() {
                            slots.insert(key, record);
                        }
                    }
                }
            }
            Value::Null => return Err(LoadError::InvalidPayload("null")),
            Value::Bool(_) => return Err(LoadError::InvalidPayload("bool")),
            Value::Number(_) => return Err(LoadError::InvalidPayload("number")),
            Value::String(_) => return Err(LoadError::InvalidPayload("string")),
        }
        Ok(AvailabilitySnapshot { slots, version: 0 })
    }

    /// Per-key OR-combination with `delta`. Never clears a flag: once a
    /// confirmed booking set it, only an admin toggle or a full resync may
    /// unset it.
    pub fn merge(&self, delta: &AvailabilitySnapshot) -> AvailabilitySnapshot {
        let mut slots = self.slots.clone();
        for (key, record) in &delta.slots {
            let entry = slots.entry(*key).or_default();
            entry.court |= record.court;
            entry.gourmet |= record.gourmet;
        }
        AvailabilitySnapshot {
            slots,
            version: self.version + 1,
        }
    }

    /// Marks every given key occupied for `resource` (confirmed-booking path).
    pub fn with_occupied(&self, keys: &[SlotKey], resource: ResourceType) -> AvailabilitySnapshot {
        let mut slots = self.slots.clone();
        for key in keys {
            slots.entry(*key).or_default().set(resource, true);
        }
        AvailabilitySnapshot {
            slots,
            version: self.version + 1,
        }
    }

    /// Flips one flag outright. Admin-only path: this is the single place
    /// a `true` flag can turn `false` outside a resync.
    pub fn with_toggled(&self, key: SlotKey, resource: ResourceType) -> AvailabilitySnapshot {
        let mut slots = self.slots.clone();
        let entry = slots.entry(key).or_default();
        let current = entry.get(resource);
        entry.set(resource, !current);
        if !entry.any() {
            slots.remove(&key);
        }
        AvailabilitySnapshot {
            slots,
            version: self.version + 1,
        }
    }

    /// Adopts a freshly fetched occupancy map while keeping the local
    /// version counter monotonic, so later refresh-vs-write comparisons
    /// stay valid across resyncs.
    pub fn refreshed_from(&self, fetched: AvailabilitySnapshot) -> AvailabilitySnapshot {
        AvailabilitySnapshot {
            slots: fetched.slots,
            version: self.version + 1,
        }
    }

    /// The plain `SlotKey -> flags` object of the storage contract, without
    /// the local version counter.
    pub fn to_wire(&self) -> Value {
        let map = self
            .slots
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    serde_json::json!({ "court": v.court, "gourmet": v.gourmet }),
                )
            })
            .collect();
        Value::Object(map)
    }
}

/// Spreadsheet occupancy rule: a cell is busy when it holds anything that is
/// not empty and not the free marker (case-insensitive). `"RESERVADO"`,
/// a client name, even a stray `0` all count as busy; only `""`, null, or
/// the marker itself mean free.
fn is_marked_occupied(value: &Value, free_marker: &str) -> bool {
    let text = match value {
        Value::Null => return false,
        Value::String(s) => s.trim().to_uppercase(),
        other => other.to_string().trim().to_uppercase(),
    };
    !text.is_empty() && text != free_marker.to_uppercase()
}

fn hour_cell<'a>(row: &'a serde_json::Map<String, Value>, hour: &str, suffix: char) -> Option<&'a Value> {
    let padded = format!("{}{}", &hour[..2], suffix);
    let bare = format!("{}{}", hour[..2].trim_start_matches('0'), suffix);
    row.get(&bare).or_else(|| row.get(&padded))
}

fn ingest_row(
    slots: &mut BTreeMap<SlotKey, OccupancyRecord>,
    row: &Value,
    free_marker: &str,
) {
    let Value::Object(fields) = row else {
        return;
    };
    let raw_date = ["Data", "data", "date", "Date"]
        .iter()
        .find_map(|name| fields.get(*name));
    let Some(raw_date) = raw_date else {
        return;
    };
    let raw_date = match raw_date {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let Ok(date) = parse_day(&raw_date) else {
        return;
    };

    for hour in OPERATING_HOURS {
        let court = hour_cell(fields, hour, 'A')
            .is_some_and(|v| is_marked_occupied(v, free_marker));
        let gourmet = hour_cell(fields, hour, 'G')
            .is_some_and(|v| is_marked_occupied(v, free_marker));
        if !(court || gourmet) {
            continue;
        }
        let Ok(key) = SlotKey::encode(date, hour) else {
            continue;
        };
        let entry = slots.entry(key).or_default();
        entry.court |= court;
        entry.gourmet |= gourmet;
    }
}
