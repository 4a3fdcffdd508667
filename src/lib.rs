// ============================================
// Terrain Stream - Бесконечный процедурный ландшафт
// ============================================

pub mod config;
pub mod error;
pub mod terrain;

pub use config::TerrainConfig;
pub use error::TerrainError;
pub use terrain::{
    ChunkManager, GeneratorSeed, GridCoord, MeshLayer, MeshUploader, NoiseSeed,
    StreamingStats, TerrainChunk, TerrainChunkData, TerrainGenerator, TerrainVertex,
};
