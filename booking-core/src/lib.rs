//! Slot availability and selection model for the arena booking widget.
//!
//! Pure domain logic, no I/O: everything here compiles for both the server
//! and the wasm client. The web crate wires these pieces to Leptos and to a
//! concrete [`sync::SyncBackend`].

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod config;
pub mod selection;
pub mod session;
pub mod slot;
pub mod sync;

pub use availability::{AvailabilitySnapshot, LoadError, OccupancyRecord};
pub use booking::{BookingRequest, DayGroup, EmptySelectionError, LineItem, PriceTable, Sport};
pub use calendar::{MonthGrid, NavigationBounds};
pub use config::ArenaConfig;
pub use selection::{
    AdminRequired, ConflictOnConfirm, FinalizedSelection, SelectionTracker, SessionRole,
};
pub use session::Session;
pub use slot::{MalformedKeyError, ResourceType, SlotKey, OPERATING_HOURS};
pub use sync::{SyncBackend, SyncError};
