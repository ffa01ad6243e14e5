//! # hours-store
//!
//! Storage contract, in-memory reference store, audit trail, and the
//! operation façade for site operating-hours schedules.
//!
//! [`hours_engine`] owns the pure resolution logic; this crate owns the
//! rows. [`ScheduleStore`] is the persistence seam (writes apply mutation
//! and audit entries atomically), [`MemoryStore`] is the bundled backend,
//! and [`ScheduleService`] strings validation, storage, expansion, and
//! projections together into the operations a transport exposes.
//!
//! ## Modules
//!
//! - [`store`] -- the [`ScheduleStore`] trait, row types, write payloads
//! - [`memory`] -- in-memory [`ScheduleStore`] implementation
//! - [`changelog`] -- append-only audit entries and their constructors
//! - [`service`] -- the [`ScheduleService`] operation façade
//! - [`error`] -- error types

pub mod changelog;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;

pub use changelog::{
    BaseHoursDiff, ChangeAction, ChangeDraft, ChangeId, ChangeLogEntry, ChangeSource, SYSTEM_ACTOR,
};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use service::ScheduleService;
pub use store::{
    BaseHoursChange, BaseHoursId, BaseHoursRow, NewOccurrence, OccurrenceRecord, OccurrenceUpdate,
    ScheduleStore, SiteId, StoredRule,
};
