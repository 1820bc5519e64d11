//! Quadtree level-of-detail over horizontal terrain.
//!
//! The world is a square of `2^max_lod` finest chunks per side, centred on the
//! origin in X and Z. Each node covers `chunk_size * lod_scale` base voxels per
//! side and is displayed by exactly one chunk mesh with cells
//! `lod_scale` voxels wide.
//!
//! ```text
//!   lod_scale 4        lod_scale 2          lod_scale 1
//!  ┌───────────┐     ┌─────┬─────┐     ┌──┬──┬─────┐
//!  │           │     │  2  │  3  │     │  │  │     │
//!  │           │ ──► ├─────┼─────┤ ──► ├──┼──┤  3  │
//!  │           │     │  0  │  1  │     │  │  │     │
//!  └───────────┘     └─────┴─────┘     └──┴──┴─────┘
//! ```

mod arena;
mod config;
mod loader;
mod node;
mod state;

pub use arena::NodeArena;
pub use config::{ConfigError, LoaderConfig, MAX_LOD_LIMIT};
pub use loader::QuadTreeLoader;
pub use node::{NodeHandle, QuadTreeNode, QUADRANT_OFFSETS};
pub use state::{LoaderStats, NodeState};
