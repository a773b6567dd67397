//! `sm-graph` — the read-only street graph.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`network`] | `StreetMap`, `StreetMapBuilder`, `SegmentSpec`                |
//! | [`loader`]  | `load_csv_dir`, `load_readers`                                |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs independent `build()` precomputation tasks on Rayon. |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `sm-core` types.     |

pub mod error;
pub mod loader;
pub mod network;


pub use error::{GraphError, GraphResult};
pub use loader::{load_csv_dir, load_readers};
pub use network::{Intersection, SegmentSpec, Street, StreetMap, StreetMapBuilder, StreetSegment};
