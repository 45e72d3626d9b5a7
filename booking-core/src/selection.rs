use crate::availability::AvailabilitySnapshot;
use crate::slot::{ResourceType, SlotKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Capability of the current visitor. Checked once, at the tracker boundary;
/// nothing downstream re-inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRole {
    Guest,
    Admin,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("direct slot editing requires the admin capability")]
pub struct AdminRequired;

/// A slot the user picked became occupied between selection and confirm.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{} selected slot(s) were booked by someone else in the meantime", stale.len())]
pub struct ConflictOnConfirm {
    pub stale: Vec<SlotKey>,
}

/// Point-in-time copy of both selection sets, handed to the request builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedSelection {
    pub court_slots: Vec<SlotKey>,
    pub gourmet_slots: Vec<SlotKey>,
}

impl FinalizedSelection {
    pub fn is_empty(&self) -> bool {
        self.court_slots.is_empty() && self.gourmet_slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.court_slots.len() + self.gourmet_slots.len()
    }
}

/// Per-session working set of tentatively chosen slots.
///
/// One set per resource type; switching the active type keeps the other
/// set intact. A guest toggle can never admit a key the snapshot marks
/// occupied for the active resource, and days before `min_day` are locked
/// for guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTracker {
    role: SessionRole,
    resource: ResourceType,
    min_day: NaiveDate,
    court: BTreeSet<SlotKey>,
    gourmet: BTreeSet<SlotKey>,
}

impl SelectionTracker {
    pub fn new(role: SessionRole, min_day: NaiveDate) -> Self {
        SelectionTracker {
            role,
            resource: ResourceType::Court,
            min_day,
            court: BTreeSet::new(),
            gourmet: BTreeSet::new(),
        }
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == SessionRole::Admin
    }

    pub fn set_role(&mut self, role: SessionRole) {
        self.role = role;
    }

    pub fn resource(&self) -> ResourceType {
        self.resource
    }

    /// Changes which set subsequent toggles affect. The other set survives:
    /// a visitor may be mid-selection on both spaces at once.
    pub fn set_resource_type(&mut self, resource: ResourceType) {
        self.resource = resource;
    }

    fn set_for(&self, resource: ResourceType) -> &BTreeSet<SlotKey> {
        match resource {
            ResourceType::Court => &self.court,
            ResourceType::Gourmet => &self.gourmet,
        }
    }

    fn set_for_mut(&mut self, resource: ResourceType) -> &mut BTreeSet<SlotKey> {
        match resource {
            ResourceType::Court => &mut self.court,
            ResourceType::Gourmet => &mut self.gourmet,
        }
    }

    pub fn selected(&self, resource: ResourceType) -> &BTreeSet<SlotKey> {
        self.set_for(resource)
    }

    pub fn is_selected(&self, key: &SlotKey) -> bool {
        self.set_for(self.resource).contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.court.is_empty() && self.gourmet.is_empty()
    }

    /// Whether a guest may interact with this day at all.
    pub fn day_is_open(&self, date: NaiveDate) -> bool {
        self.is_admin() || date >= self.min_day
    }

    /// Ratchets the guest floor forward as real time passes. Days never
    /// reopen, so a floor behind `today` only ever moves up.
    pub fn observe_today(&mut self, today: NaiveDate) {
        if today > self.min_day {
            self.min_day = today;
        }
    }

    /// Flips membership of `key` in the active set. A no-op when the
    /// snapshot already marks the slot occupied for the active resource or
    /// the day is locked; returns whether anything changed.
    pub fn toggle(&mut self, snapshot: &AvailabilitySnapshot, key: SlotKey) -> bool {
        if !self.day_is_open(key.date()) {
            return false;
        }
        if snapshot.is_occupied(&key, self.resource) {
            return false;
        }
        let resource = self.resource;
        let set = self.set_for_mut(resource);
        if !set.remove(&key) {
            set.insert(key);
        }
        true
    }

    /// Empties the active set (resource switch keeps the other one).
    pub fn clear(&mut self) {
        let resource = self.resource;
        self.set_for_mut(resource).clear();
    }

    /// Empties both sets: modal close, cancel, or successful submit.
    pub fn clear_all(&mut self) {
        self.court.clear();
        self.gourmet.clear();
    }

    /// Admin-only direct edit: flips the occupancy flag itself, bypassing
    /// the selection sets and the occupied guard.
    pub fn admin_toggle(
        &self,
        snapshot: &AvailabilitySnapshot,
        key: SlotKey,
        resource: ResourceType,
    ) -> Result<AvailabilitySnapshot, AdminRequired> {
        if !self.is_admin() {
            return Err(AdminRequired);
        }
        Ok(snapshot.with_toggled(key, resource))
    }

    /// Drops selected keys the snapshot now marks occupied (stale entries
    /// are invalidated lazily after each sync). Returns what was dropped.
    pub fn prune_conflicts(&mut self, snapshot: &AvailabilitySnapshot) -> Vec<SlotKey> {
        let mut stale = Vec::new();
        for resource in [ResourceType::Court, ResourceType::Gourmet] {
            let set = self.set_for_mut(resource);
            let conflicting: Vec<SlotKey> = set
                .iter()
                .filter(|k| snapshot.is_occupied(k, resource))
                .copied()
                .collect();
            for key in conflicting {
                set.remove(&key);
                stale.push(key);
            }
        }
        stale
    }

    /// Re-checks every selected key against the snapshot and snapshots the
    /// sets for the request builder. Rejects instead of silently booking
    /// over a slot someone else took since selection.
    pub fn finalize(
        &self,
        snapshot: &AvailabilitySnapshot,
    ) -> Result<FinalizedSelection, ConflictOnConfirm> {
        let stale: Vec<SlotKey> = self
            .court
            .iter()
            .filter(|k| snapshot.is_occupied(k, ResourceType::Court))
            .chain(
                self.gourmet
                    .iter()
                    .filter(|k| snapshot.is_occupied(k, ResourceType::Gourmet)),
            )
            .copied()
            .collect();
        if !stale.is_empty() {
            return Err(ConflictOnConfirm { stale });
        }
        Ok(FinalizedSelection {
            court_slots: self.court.iter().copied().collect(),
            gourmet_slots: self.gourmet.iter().copied().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::AvailabilitySnapshot;

    fn key(raw: &str) -> SlotKey {
        SlotKey::parse(raw).unwrap()
    }

    fn min_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    fn tracker(role: SessionRole) -> SelectionTracker {
        SelectionTracker::new(role, min_day())
    }

    #[test]
    fn toggle_adds_then_removes() {
        let snapshot = AvailabilitySnapshot::new();
        let mut t = tracker(SessionRole::Guest);
        let k = key("2026-01-05-09:00");
        assert!(t.toggle(&snapshot, k));
        assert!(t.is_selected(&k));
        assert!(t.toggle(&snapshot, k));
        assert!(!t.is_selected(&k));
    }

    #[test]
    fn guest_cannot_select_an_occupied_slot() {
        let k = key("2026-01-05-09:00");
        let snapshot = AvailabilitySnapshot::new().with_occupied(&[k], ResourceType::Court);
        let mut t = tracker(SessionRole::Guest);
        assert!(!t.toggle(&snapshot, k));
        assert!(t.is_empty());

        // Same hour is still free for the other space.
        t.set_resource_type(ResourceType::Gourmet);
        assert!(t.toggle(&snapshot, k));
    }

    #[test]
    fn selection_never_overlaps_occupancy_for_its_resource() {
        let keys = [
            "2026-01-05-08:00",
            "2026-01-05-09:00",
            "2026-01-05-10:00",
            "2026-01-06-14:00",
        ];
        let occupied = [key("2026-01-05-09:00"), key("2026-01-06-14:00")];
        let snapshot = AvailabilitySnapshot::new().with_occupied(&occupied, ResourceType::Court);
        let mut t = tracker(SessionRole::Guest);
        for raw in keys {
            t.toggle(&snapshot, key(raw));
        }
        for k in t.selected(ResourceType::Court) {
            assert!(!snapshot.is_occupied(k, ResourceType::Court));
        }
        assert_eq!(t.selected(ResourceType::Court).len(), 2);
    }

    #[test]
    fn guest_cannot_touch_days_before_the_window() {
        let snapshot = AvailabilitySnapshot::new();
        let mut t = tracker(SessionRole::Guest);
        assert!(!t.toggle(&snapshot, key("2025-12-31-09:00")));
        let mut admin = tracker(SessionRole::Admin);
        assert!(admin.toggle(&snapshot, key("2025-12-31-09:00")));
    }

    #[test]
    fn the_day_floor_only_ratchets_forward() {
        let snapshot = AvailabilitySnapshot::new();
        let mut t = tracker(SessionRole::Guest);
        t.observe_today(NaiveDate::from_ymd_opt(2026, 1, 6).unwrap());
        assert!(!t.toggle(&snapshot, key("2026-01-05-09:00")));
        assert!(t.toggle(&snapshot, key("2026-01-06-09:00")));

        // Observing an earlier day never reopens anything.
        t.observe_today(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert!(!t.day_is_open(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()));
    }

    #[test]
    fn resource_switch_keeps_the_other_set() {
        let snapshot = AvailabilitySnapshot::new();
        let mut t = tracker(SessionRole::Guest);
        t.toggle(&snapshot, key("2026-01-05-09:00"));
        t.set_resource_type(ResourceType::Gourmet);
        t.toggle(&snapshot, key("2026-01-05-14:00"));
        assert_eq!(t.selected(ResourceType::Court).len(), 1);
        assert_eq!(t.selected(ResourceType::Gourmet).len(), 1);

        // clear() only empties the active set
        t.clear();
        assert_eq!(t.selected(ResourceType::Court).len(), 1);
        assert!(t.selected(ResourceType::Gourmet).is_empty());

        t.clear_all();
        assert!(t.is_empty());
    }

    #[test]
    fn admin_toggle_needs_the_capability() {
        let snapshot = AvailabilitySnapshot::new();
        let guest = tracker(SessionRole::Guest);
        assert_eq!(
            guest.admin_toggle(&snapshot, key("2026-01-05-09:00"), ResourceType::Court),
            Err(AdminRequired)
        );
    }

    #[test]
    fn admin_booked_slot_blocks_later_guest_toggle() {
        let snapshot = AvailabilitySnapshot::new();
        let admin = tracker(SessionRole::Admin);
        let k = key("2026-01-05-09:00");
        let snapshot = admin
            .admin_toggle(&snapshot, k, ResourceType::Court)
            .unwrap();
        assert!(snapshot.is_occupied(&k, ResourceType::Court));

        let mut guest = tracker(SessionRole::Guest);
        assert!(!guest.toggle(&snapshot, k));
        assert!(guest.is_empty());
    }

    #[test]
    fn finalize_rejects_stale_keys() {
        let snapshot = AvailabilitySnapshot::new();
        let mut t = tracker(SessionRole::Guest);
        let k = key("2026-01-05-09:00");
        t.toggle(&snapshot, k);

        // Someone else books the slot before confirm.
        let refreshed = snapshot.with_occupied(&[k], ResourceType::Court);
        let err = t.finalize(&refreshed).unwrap_err();
        assert_eq!(err.stale, vec![k]);

        // Lazy invalidation clears it and finalize succeeds empty-handed.
        assert_eq!(t.prune_conflicts(&refreshed), vec![k]);
        assert!(t.finalize(&refreshed).unwrap().is_empty());
    }

    #[test]
    fn finalize_snapshots_both_sets() {
        let snapshot = AvailabilitySnapshot::new();
        let mut t = tracker(SessionRole::Guest);
        t.toggle(&snapshot, key("2026-01-05-09:00"));
        t.set_resource_type(ResourceType::Gourmet);
        t.toggle(&snapshot, key("2026-01-05-14:00"));
        let finalized = t.finalize(&snapshot).unwrap();
        assert_eq!(finalized.court_slots, vec![key("2026-01-05-09:00")]);
        assert_eq!(finalized.gourmet_slots, vec![key("2026-01-05-14:00")]);
        assert_eq!(finalized.len(), 2);
        // Building a request must not deplete the tracker.
        assert!(!t.is_empty());
    }
}
