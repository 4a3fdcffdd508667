// ============================================
// Mesh Module - Геометрия чанков terrain
// ============================================

pub mod vertex;
pub mod slice;
pub mod pool;
pub mod chunk_data;
pub mod generator;

pub use vertex::{pack_color, unpack_color, TerrainVertex};
pub use slice::{slice_triangle, SlicedMesh, Triangle};
pub use pool::BufferPool;
pub use chunk_data::TerrainChunkData;
pub use generator::{TerrainGenerator, DEFAULT_CHUNK_SIZE, DEFAULT_POOL_CAPACITY};
