//! Scheduler subsystem
//!
//! A weighted, group-based virtual-time scheduler. Contexts belong to a
//! small fixed set of groups (driver, multimedia, app, background and the
//! like); each group accrues virtual time scaled by its weight while one
//! of its members runs, and the group with the smallest virtual time runs
//! next, round-robin among its members.
//!
//! ## Key mechanisms
//! - **Virtual time (vtime)**: advances by `elapsed / weight`, so a
//!   low-weight group exhausts its share faster under contention
//! - **Warp**: a vtime credit granted when a group turns non-empty,
//!   biasing latency-sensitive groups without breaking long-term fairness
//! - **Rotation**: intra-group fairness by moving whoever ran to the back
//! - **Deadline**: every decision programs the injected timer with the
//!   absolute time at which fairness must be revisited, bounded by the
//!   configured min/max timeouts
//!
//! ## Module Organization
//!
//! - `types`: handle types, configuration, counters
//! - `context`: schedulable context records (arena entries)
//! - `group`: weighted groups and their ready lists
//! - `core`: the decision loop (ready/unready/yield/update)
//! - `stats`: introspection and the diagnostic state dump

mod context;
mod core;
mod group;
mod stats;
mod types;

// Re-export the scheduler surface
pub use context::Context;
pub use core::Scheduler;
pub use group::Group;

// Re-export types for external use
pub use types::{ContextId, GroupConfig, GroupId, SchedulerConfig, SchedulerStats};
pub use types::{VTicks, Weight};
pub use types::{DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_TIMEOUT, MAX_CONTEXTS, MAX_GROUPS};
