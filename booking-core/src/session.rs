use crate::availability::AvailabilitySnapshot;
use crate::booking::BookingRequest;
use crate::config::ArenaConfig;
use crate::selection::{
    AdminRequired, ConflictOnConfirm, FinalizedSelection, SelectionTracker, SessionRole,
};
use crate::slot::{ResourceType, SlotKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The session controller: single owner of the availability snapshot plus
/// the visitor's selection tracker. Components operate on this object
/// instead of ambient globals; the snapshot is only ever replaced whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    config: ArenaConfig,
    snapshot: AvailabilitySnapshot,
    tracker: SelectionTracker,
    /// A local write (confirm or admin edit) that has not reached the
    /// backend yet. While set, refreshes merge instead of replacing.
    #[serde(default)]
    unsynced_write: bool,
}

impl Session {
    pub fn new(config: ArenaConfig, role: SessionRole) -> Self {
        let tracker = SelectionTracker::new(role, config.window_lower);
        Session {
            config,
            snapshot: AvailabilitySnapshot::new(),
            tracker,
            unsynced_write: false,
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &AvailabilitySnapshot {
        &self.snapshot
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn version(&self) -> u64 {
        self.snapshot.version()
    }

    pub fn is_admin(&self) -> bool {
        self.tracker.is_admin()
    }

    pub fn set_role(&mut self, role: SessionRole) {
        self.tracker.set_role(role);
    }

    pub fn resource(&self) -> ResourceType {
        self.tracker.resource()
    }

    pub fn set_resource_type(&mut self, resource: ResourceType) {
        self.tracker.set_resource_type(resource);
    }

    pub fn toggle(&mut self, key: SlotKey) -> bool {
        self.tracker.toggle(&self.snapshot, key)
    }

    pub fn clear_selection(&mut self) {
        self.tracker.clear_all();
    }

    /// Locks days that have slipped into the past since the session began.
    pub fn observe_today(&mut self, today: NaiveDate) {
        self.tracker.observe_today(today);
    }

    /// Drops selected keys the current snapshot marks occupied, returning
    /// what was dropped. The recovery path after a rejected finalize.
    pub fn prune_stale(&mut self) -> Vec<SlotKey> {
        self.tracker.prune_conflicts(&self.snapshot)
    }

    /// Admin direct edit: flips the flag in the snapshot and returns the
    /// new snapshot so the caller can push it to the backend slot by slot.
    pub fn admin_toggle(
        &mut self,
        key: SlotKey,
        resource: ResourceType,
    ) -> Result<AvailabilitySnapshot, AdminRequired> {
        let next = self.tracker.admin_toggle(&self.snapshot, key, resource)?;
        self.snapshot = next.clone();
        self.unsynced_write = true;
        Ok(next)
    }

    pub fn finalize(&self) -> Result<FinalizedSelection, ConflictOnConfirm> {
        self.tracker.finalize(&self.snapshot)
    }

    /// Confirmed-payment path: merges the request's keys into the snapshot,
    /// clears the working selection, and returns the snapshot to persist
    /// (the state as it existed at the moment of confirmation).
    pub fn confirm(&mut self, request: &BookingRequest) -> AvailabilitySnapshot {
        self.snapshot = self
            .snapshot
            .with_occupied(&request.court_slots, ResourceType::Court)
            .with_occupied(&request.gourmet_slots, ResourceType::Gourmet);
        self.tracker.clear_all();
        self.unsynced_write = true;
        self.snapshot.clone()
    }

    pub fn has_unsynced_write(&self) -> bool {
        self.unsynced_write
    }

    /// Marks the last local write as flushed to the backend. Until this is
    /// called, refreshes cannot drop the written keys.
    pub fn mark_synced(&mut self) {
        self.unsynced_write = false;
    }

    /// Applies a background refresh, unless a local write landed after the
    /// fetch was issued: a poll that raced a confirmation and lost is
    /// discarded rather than last-write-wins over the user's booking.
    ///
    /// While a local write is still waiting to be persisted, the fetched
    /// snapshot is merged in rather than adopted wholesale, so a remote
    /// state that predates the failed write cannot erase it. Stale
    /// selections are pruned lazily on every accepted refresh.
    pub fn apply_refresh(&mut self, fetched: AvailabilitySnapshot, issued_at_version: u64) -> bool {
        if self.snapshot.version() > issued_at_version {
            return false;
        }
        self.snapshot = if self.unsynced_write {
            self.snapshot.merge(&fetched)
        } else {
            self.snapshot.refreshed_from(fetched)
        };
        self.tracker.prune_conflicts(&self.snapshot);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingRequest, Sport};

    fn key(raw: &str) -> SlotKey {
        SlotKey::parse(raw).unwrap()
    }

    fn session(role: SessionRole) -> Session {
        Session::new(ArenaConfig::default(), role)
    }

    #[test]
    fn confirm_merges_and_clears_the_selection() {
        let mut s = session(SessionRole::Guest);
        let k = key("2026-01-05-09:00");
        assert!(s.toggle(k));
        let finalized = s.finalize().unwrap();
        let request = BookingRequest::build(
            &finalized,
            &s.config().price_table(),
            Sport::Volei,
            false,
        )
        .unwrap();
        let persisted = s.confirm(&request);
        assert!(persisted.is_occupied(&k, ResourceType::Court));
        assert!(s.tracker().is_empty());
        assert!(s.snapshot().is_occupied(&k, ResourceType::Court));
    }

    #[test]
    fn stale_refresh_is_discarded_after_a_local_write() {
        let mut s = session(SessionRole::Admin);
        let issued_at = s.version();

        // User write lands while the poll is in flight.
        s.admin_toggle(key("2026-01-05-09:00"), ResourceType::Court)
            .unwrap();
        let stale = AvailabilitySnapshot::new();
        assert!(!s.apply_refresh(stale, issued_at));
        assert!(s
            .snapshot()
            .is_occupied(&key("2026-01-05-09:00"), ResourceType::Court));
    }

    #[test]
    fn refresh_prunes_conflicting_selections() {
        let mut s = session(SessionRole::Guest);
        let k = key("2026-01-05-09:00");
        assert!(s.toggle(k));

        let issued_at = s.version();
        let fetched = AvailabilitySnapshot::new().with_occupied(&[k], ResourceType::Court);
        assert!(s.apply_refresh(fetched, issued_at));
        assert!(s.tracker().is_empty());
        assert!(s.finalize().unwrap().is_empty());
    }

    #[test]
    fn refresh_cannot_drop_a_booking_the_backend_has_not_seen() {
        let mut s = session(SessionRole::Guest);
        let k = key("2026-01-05-09:00");
        assert!(s.toggle(k));
        let finalized = s.finalize().unwrap();
        let request = BookingRequest::build(
            &finalized,
            &s.config().price_table(),
            Sport::Volei,
            false,
        )
        .unwrap();
        s.confirm(&request);
        assert!(s.has_unsynced_write());

        // Persist failed; a poll issued after the confirm returns the
        // remote state, which still lacks the booking.
        let issued_at = s.version();
        assert!(s.apply_refresh(AvailabilitySnapshot::new(), issued_at));
        assert!(s.snapshot().is_occupied(&k, ResourceType::Court));

        // Once the write lands, refresh adopts the remote state again.
        s.mark_synced();
        let issued_at = s.version();
        assert!(s.apply_refresh(AvailabilitySnapshot::new(), issued_at));
        assert!(!s.snapshot().is_occupied(&k, ResourceType::Court));
    }

    #[test]
    fn guest_cannot_admin_toggle() {
        let mut s = session(SessionRole::Guest);
        assert!(s
            .admin_toggle(key("2026-01-05-09:00"), ResourceType::Court)
            .is_err());
    }
}
