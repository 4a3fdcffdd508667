// ============================================
// Terrain Chunk - Загруженный на GPU чанк
// ============================================

use crate::terrain::coord::GridCoord;
use crate::terrain::mesh::TerrainChunkData;
use super::uploader::{MeshLayer, MeshUploader};

/// GPU ресурсы одного чанка: надводный и подводный меши
///
/// Любой из них может отсутствовать (чанк целиком под водой или над ней).
/// Живёт, пока чанк в окне; ресурсы освобождаются при Drop.
#[derive(Debug)]
pub struct TerrainChunk<M> {
    pub coord: GridCoord,
    terrain: Option<M>,
    underwater: Option<M>,
    terrain_vertices: usize,
    underwater_vertices: usize,
}

impl<M> TerrainChunk<M> {
    /// Загрузить данные чанка через рендер
    pub fn upload<U>(data: &TerrainChunkData, uploader: &mut U) -> Self
    where
        U: MeshUploader<Mesh = M>,
    {
        let terrain = (!data.above.is_empty())
            .then(|| uploader.upload(data.coord, MeshLayer::Terrain, &data.above));
        let underwater = (!data.below.is_empty())
            .then(|| uploader.upload(data.coord, MeshLayer::Underwater, &data.below));

        Self {
            coord: data.coord,
            terrain,
            underwater,
            terrain_vertices: data.above_count(),
            underwater_vertices: data.below_count(),
        }
    }

    /// Надводный меш
    pub fn terrain(&self) -> Option<&M> {
        self.terrain.as_ref()
    }

    /// Подводный меш
    pub fn underwater(&self) -> Option<&M> {
        self.underwater.as_ref()
    }

    pub fn vertex_counts(&self) -> (usize, usize) {
        (self.terrain_vertices, self.underwater_vertices)
    }

    /// Освободить GPU ресурсы
    pub fn dispose(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::mesh::TerrainVertex;

    struct CountingUploader {
        uploads: Vec<(GridCoord, MeshLayer, usize)>,
    }

    impl MeshUploader for CountingUploader {
        type Mesh = usize;

        fn upload(&mut self, coord: GridCoord, layer: MeshLayer, vertices: &[TerrainVertex]) -> usize {
            self.uploads.push((coord, layer, vertices.len()));
            vertices.len()
        }
    }

    #[test]
    fn test_empty_side_is_not_uploaded() {
        let data = TerrainChunkData {
            coord: GridCoord::new(2, 3),
            above: vec![TerrainVertex::default(); 6],
            below: Vec::new(),
        };
        let mut uploader = CountingUploader { uploads: Vec::new() };
        let chunk = TerrainChunk::upload(&data, &mut uploader);

        assert_eq!(uploader.uploads, vec![(GridCoord::new(2, 3), MeshLayer::Terrain, 6)]);
        assert_eq!(chunk.terrain(), Some(&6));
        assert!(chunk.underwater().is_none());
        assert_eq!(chunk.vertex_counts(), (6, 0));
    }

    #[test]
    fn test_dispose_drops_meshes() {
        use std::rc::Rc;

        struct RcUploader(Rc<()>);
        impl MeshUploader for RcUploader {
            type Mesh = Rc<()>;
            fn upload(&mut self, _: GridCoord, _: MeshLayer, _: &[TerrainVertex]) -> Rc<()> {
                self.0.clone()
            }
        }

        let token = Rc::new(());
        let data = TerrainChunkData {
            coord: GridCoord::default(),
            above: vec![TerrainVertex::default(); 3],
            below: vec![TerrainVertex::default(); 3],
        };
        let chunk = TerrainChunk::upload(&data, &mut RcUploader(token.clone()));
        assert_eq!(Rc::strong_count(&token), 3);
        chunk.dispose();
        assert_eq!(Rc::strong_count(&token), 1);
    }
}
