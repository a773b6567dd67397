//! `sm-courier` — pickup-and-delivery touring on top of `sm-route`.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`delivery`] | `Delivery`, `StopKind`                                    |
//! | [`matrix`]   | `PathMatrix`, `Subpath`                                   |
//! | [`tour`]     | `Tour`, `TourPlanner`, `plan_courier_tour`                |
//! | [`error`]    | `CourierError`, `CourierResult<T>`                        |
//!
//! # Pipeline
//!
//! 1. [`PathMatrix::build`] runs one full search per point of interest and
//!    keeps the shortest path between every ordered pair of points.
//! 2. [`TourPlanner::plan`] builds a tour from the matrix alone: greedy
//!    nearest-feasible construction from every depot, one tail-swap
//!    improvement, best result kept.
//!
//! The planner is a heuristic.  It guarantees feasibility of what it
//! returns, not optimality.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Enables [`PathMatrix::build_parallel`].                   |

pub mod delivery;
pub mod error;
pub mod matrix;
pub mod tour;


pub use delivery::{Delivery, StopKind};
pub use error::{CourierError, CourierResult};
pub use matrix::{PathMatrix, Subpath};
pub use tour::{Tour, TourPlanner, plan_courier_tour};
