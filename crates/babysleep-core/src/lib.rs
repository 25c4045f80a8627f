//! # Babysleep Core Library
//!
//! Core business logic for the babysleep scheduler: a pattern-learning
//! model trained on historical sleep records, and a schedule engine that
//! predicts a day's naps and bedtime from a morning wake time and
//! re-derives the rest of the day as the user corrects events. The CLI
//! binary is a thin layer over this crate.
//!
//! ## Key Components
//!
//! - [`model::train`]: positional-mean trainer producing [`ModelParameters`]
//! - [`ScheduleEngine`]: prediction and forward-only correction over a
//!   [`DaySchedule`]
//! - [`DataStore`]: JSON persistence for the sleep log, model, and
//!   current schedule
//! - [`calendar`]: Google Calendar sync, one entry per nap plus one for
//!   the night

pub mod calendar;
pub mod engine;
pub mod error;
pub mod model;
pub mod record;
pub mod storage;

pub use engine::{DaySchedule, EventKind, EventStatus, ScheduleEngine, ScheduledEvent};
pub use error::{CoreError, Result, StorageError, SyncError};
pub use model::ModelParameters;
pub use record::{HistoricalRecord, NapInterval};
pub use storage::{Config, DataStore, DayEntry, SleepLog, StoredSchedule};
