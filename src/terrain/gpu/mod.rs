// ============================================
// GPU Module - Загруженные чанки и граница с рендером
// ============================================

mod chunk;
mod uploader;
pub mod culling;

pub use chunk::TerrainChunk;
pub use uploader::{MeshLayer, MeshUploader};
pub use culling::is_chunk_in_front;
