//! Depth-chart resolution engine.
//!
//! Given a formation's slots and the full sparse assignment history, compute
//! the effective roster for an arbitrary `(scenario, year, month)` query
//! point. Scenarios are copy-on-write overlays: a named scenario reads as
//! "the baseline, except where explicitly overridden", and months with no
//! explicit record inherit the latest earlier record on the timeline.
//!
//! The engine is a pure, synchronous computation over data already
//! materialised in memory — no I/O, no shared mutable state. It is safe to
//! call concurrently over the same immutable snapshot; callers own snapshot
//! consistency.

pub mod error;
pub mod history;
pub mod provenance;
pub mod query;
pub mod rank;
pub mod resolve;

pub use error::{InvalidQuery, ResolveError};
pub use provenance::EffectiveAssignment;
pub use query::ChartQuery;
pub use resolve::{resolve, resolve_with_athletes};
