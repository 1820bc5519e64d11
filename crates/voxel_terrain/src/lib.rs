//! voxel_terrain - Engine independent streaming terrain meshing
//!
//! This crate streams marching-cubes terrain around a moving camera. A
//! quadtree over the horizontal plane picks a level of detail per region,
//! chunk meshes are extracted off-thread from a scalar density field, and
//! finished meshes are handed to an engine through a small render sink trait.
//!
//! # Features
//!
//! - **Marching Cubes**: Classic table-driven extraction with a cached sample
//!   lattice and optional edge interpolation
//! - **Quadtree LOD**: Split near the camera, merge far away, with coarse
//!   fallbacks shown until finer chunks are resident
//! - **Async Generation**: Bounded, cancellable job queue on the rayon pool
//! - **Render Sink**: Upload/visibility/destroy callbacks, no graphics API
//!   dependency
//!
//! # Example
//!
//! ```ignore
//! use voxel_terrain::{LoaderConfig, PerlinTerrainField, QuadTreeLoader, RecordingSink};
//!
//! let mut loader = QuadTreeLoader::new(
//!     LoaderConfig::default(),
//!     PerlinTerrainField::new(1337),
//!     RecordingSink::new(),
//! )?;
//!
//! // Once per frame:
//! let stats = loader.update(camera_position);
//! println!("{} chunks visible", stats.visible_chunks);
//! ```

pub mod chunk_store;
pub mod edge_table;
pub mod field;
pub mod marching_cubes;
pub mod metrics;
pub mod quadtree;
pub mod render_sink;
pub mod scheduler;
pub mod types;

// Re-export commonly used items
pub use chunk_store::{ChunkStore, CompleteOutcome, LoadedChunk, StoreError};
pub use edge_table::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
pub use field::{FieldFn, GroundPlaneField, PerlinTerrainField, ScalarField, SphereField};
pub use marching_cubes::{MarchingCubes, SampleLattice};
pub use metrics::{RollingWindow, SchedulerMetrics};
pub use quadtree::{
  ConfigError, LoaderConfig, LoaderStats, NodeHandle, NodeState, QuadTreeLoader, QuadTreeNode,
};
pub use render_sink::{NullSink, RecordingSink, RenderHandle, RenderSink};
pub use scheduler::{
  ChunkCompletion, ChunkGenerationScheduler, ChunkRequest, ExecutionMode, RequestStatus,
  SchedulerConfig, WorkSource,
};
pub use types::{ChunkKey, MeshOutput, MinMaxAABB, VoxelCoord};
