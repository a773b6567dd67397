//! `sm-route` — shortest-time search over the street graph.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`search`]     | `SearchState`, `search`, `search_into`                    |
//! | [`trace`]      | `trace_back`                                              |
//! | [`path`]       | `Route`, `find_path`, `path_travel_time`, `path_intersections` |
//! | [`router`]     | `Router` trait, `AStarRouter`, `DijkstraRouter`           |
//! | [`directions`] | `Turn`, `turn_direction`, `directions`                    |
//! | [`error`]      | `RouteError`, `RouteResult<T>`                            |
//!
//! # Cost units
//!
//! Times are `f64` seconds, distances `f64` metres.  The turn penalty is a
//! caller-supplied number of seconds added whenever the street id changes
//! between consecutive segments.

pub mod directions;
pub mod error;
pub mod path;
pub mod router;
pub mod search;
pub mod trace;

#[cfg(test)]
mod tests;

pub use directions::{Turn, directions, turn_direction};
pub use error::{RouteError, RouteResult};
pub use path::{Route, find_path, path_intersections, path_travel_time};
pub use router::{AStarRouter, DijkstraRouter, Router};
pub use search::{SearchState, search, search_into};
pub use trace::trace_back;
