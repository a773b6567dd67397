//! `sm-core` — foundational types for the streetmap routing workspace.
//!
//! This crate is a dependency of every other `sm-*` crate.  It has no `sm-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `IntersectionId`, `SegmentId`, `StreetId`               |
//! | [`geo`]       | `LatLon`, `PlanarPoint`, `Projection`                   |
//! | [`config`]    | `RoutingConfig`                                         |
//! | [`error`]     | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoutingConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_M, LatLon, PlanarPoint, Projection};
pub use ids::{IntersectionId, SegmentId, StreetId};
