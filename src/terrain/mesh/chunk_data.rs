// ============================================
// Terrain Chunk Data - Результат генерации чанка
// ============================================

use crate::terrain::coord::GridCoord;
use super::vertex::TerrainVertex;

/// Сгенерированные, но ещё не загруженные на GPU данные чанка
///
/// Буферы взяты из пула генератора. После загрузки их нужно вернуть
/// через `TerrainGenerator::recycle` - это забирает владение, так что
/// прочитать их после возврата нельзя.
#[derive(Debug)]
pub struct TerrainChunkData {
    pub coord: GridCoord,
    /// Надводная часть (пустая, если весь чанк под водой)
    pub above: Vec<TerrainVertex>,
    /// Подводная часть (пустая, если весь чанк над водой)
    pub below: Vec<TerrainVertex>,
}

impl TerrainChunkData {
    #[inline]
    pub fn above_count(&self) -> usize {
        self.above.len()
    }

    #[inline]
    pub fn below_count(&self) -> usize {
        self.below.len()
    }
}
