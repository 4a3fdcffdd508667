// ============================================
// Terrain Module - Процедурный ландшафт со стримингом чанков
// ============================================
//
// generation - шум, высоты и цвета (чистые функции от сида)
// mesh       - геометрия чанка: сетка, разрезание по воде, пулы буферов
// gpu        - граница с рендером: загрузка мешей и их владение
// manager    - окно чанков вокруг камеры и фоновая генерация

pub mod coord;
pub mod seed;
pub mod generation;
pub mod mesh;
pub mod gpu;
pub mod manager;

pub use coord::GridCoord;
pub use seed::{GeneratorSeed, NoiseSeed};
pub use mesh::{TerrainChunkData, TerrainGenerator, TerrainVertex};
pub use gpu::{MeshLayer, MeshUploader, TerrainChunk};
pub use manager::{ChunkManager, StreamingStats};
