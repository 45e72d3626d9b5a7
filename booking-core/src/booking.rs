use crate::selection::FinalizedSelection;
use crate::slot::{ResourceType, SlotKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Prices in whole reais. Configuration, not business logic; the shape of
/// the total formula is what must stay fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub court: u32,
    pub gourmet: u32,
    pub ball: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Volei,
    Futevolei,
    Frescobol,
}

impl Sport {
    pub fn label(&self) -> &'static str {
        match self {
            Sport::Volei => "Vôlei",
            Sport::Futevolei => "Futevôlei",
            Sport::Frescobol => "Frescobol",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no slots selected; pick at least one hour before checking out")]
pub struct EmptySelectionError;

/// One line of the checkout summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub key: SlotKey,
    pub resource: ResourceType,
}

/// Selected slots of one calendar day, in hour order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
}

/// A priced, immutable booking request. Built from a finalized selection;
/// never mutates it, never touches the availability store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub court_slots: Vec<SlotKey>,
    pub gourmet_slots: Vec<SlotKey>,
    pub sport: Sport,
    pub include_ball: bool,
    pub days: Vec<DayGroup>,
    pub total: u32,
}

impl BookingRequest {
    /// Prices and groups a finalized selection.
    ///
    /// The ball fee is a single per-request charge, applied only when at
    /// least one court slot exists, no matter how many hours were picked.
    pub fn build(
        selection: &FinalizedSelection,
        prices: &PriceTable,
        sport: Sport,
        include_ball: bool,
    ) -> Result<BookingRequest, EmptySelectionError> {
        if selection.is_empty() {
            return Err(EmptySelectionError);
        }

        let court_count = selection.court_slots.len() as u32;
        let gourmet_count = selection.gourmet_slots.len() as u32;
        let ball_fee = if court_count > 0 && include_ball {
            prices.ball
        } else {
            0
        };
        let total = court_count * prices.court + gourmet_count * prices.gourmet + ball_fee;

        let mut by_day: BTreeMap<NaiveDate, Vec<LineItem>> = BTreeMap::new();
        for (keys, resource) in [
            (&selection.court_slots, ResourceType::Court),
            (&selection.gourmet_slots, ResourceType::Gourmet),
        ] {
            for key in keys {
                by_day
                    .entry(key.date())
                    .or_default()
                    .push(LineItem { key: *key, resource });
            }
        }
        let days = by_day
            .into_iter()
            .map(|(date, mut items)| {
                items.sort_by_key(|item| item.key);
                DayGroup { date, items }
            })
            .collect();

        Ok(BookingRequest {
            court_slots: selection.court_slots.clone(),
            gourmet_slots: selection.gourmet_slots.clone(),
            sport,
            include_ball,
            days,
            total,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.court_slots.len() + self.gourmet_slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> SlotKey {
        SlotKey::parse(raw).unwrap()
    }

    fn prices() -> PriceTable {
        PriceTable {
            court: 120,
            gourmet: 150,
            ball: 25,
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        let selection = FinalizedSelection {
            court_slots: vec![],
            gourmet_slots: vec![],
        };
        assert_eq!(
            BookingRequest::build(&selection, &prices(), Sport::Volei, true),
            Err(EmptySelectionError)
        );
    }

    #[test]
    fn two_court_slots_with_ball() {
        let selection = FinalizedSelection {
            court_slots: vec![key("2026-01-05-09:00"), key("2026-01-05-10:00")],
            gourmet_slots: vec![],
        };
        let request =
            BookingRequest::build(&selection, &prices(), Sport::Volei, true).unwrap();
        assert_eq!(request.total, 2 * 120 + 25);
    }

    #[test]
    fn ball_fee_is_once_per_request_and_needs_a_court_slot() {
        let gourmet_only = FinalizedSelection {
            court_slots: vec![],
            gourmet_slots: vec![key("2026-01-05-14:00")],
        };
        let request =
            BookingRequest::build(&gourmet_only, &prices(), Sport::Volei, true).unwrap();
        assert_eq!(request.total, 150);

        let three_courts = FinalizedSelection {
            court_slots: vec![
                key("2026-01-05-09:00"),
                key("2026-01-06-09:00"),
                key("2026-01-07-09:00"),
            ],
            gourmet_slots: vec![],
        };
        let request =
            BookingRequest::build(&three_courts, &prices(), Sport::Futevolei, true).unwrap();
        assert_eq!(request.total, 3 * 120 + 25);
    }

    #[test]
    fn mixed_selection_totals_and_ignores_ball_when_unchecked() {
        let selection = FinalizedSelection {
            court_slots: vec![key("2026-01-05-09:00")],
            gourmet_slots: vec![key("2026-01-05-14:00"), key("2026-01-06-14:00")],
        };
        let request =
            BookingRequest::build(&selection, &prices(), Sport::Frescobol, false).unwrap();
        assert_eq!(request.total, 120 + 2 * 150);
    }

    #[test]
    fn days_group_by_date_in_hour_order() {
        let selection = FinalizedSelection {
            court_slots: vec![key("2026-01-06-09:00"), key("2026-01-05-10:00")],
            gourmet_slots: vec![key("2026-01-05-08:00")],
        };
        let request =
            BookingRequest::build(&selection, &prices(), Sport::Volei, false).unwrap();
        assert_eq!(request.days.len(), 2);
        assert_eq!(request.days[0].date.to_string(), "2026-01-05");
        assert_eq!(request.days[0].items[0].key, key("2026-01-05-08:00"));
        assert_eq!(request.days[0].items[1].key, key("2026-01-05-10:00"));
        assert_eq!(request.days[1].date.to_string(), "2026-01-06");
        assert_eq!(request.slot_count(), 3);
    }

    #[test]
    fn build_does_not_consume_the_selection() {
        let selection = FinalizedSelection {
            court_slots: vec![key("2026-01-05-09:00")],
            gourmet_slots: vec![],
        };
        let before = selection.clone();
        let _ = BookingRequest::build(&selection, &prices(), Sport::Volei, false).unwrap();
        assert_eq!(selection, before);
    }
}
