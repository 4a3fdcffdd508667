// ============================================
// Mesh Uploader - Граница с рендером
// ============================================
//
// Рендер поставляет операцию загрузки меша: сырые вершины ->
// непрозрачный GPU ресурс. Освобождение ресурса - это Drop типа `Mesh`
// (как у wgpu::Buffer), отдельного вызова "удалить меш" нет.

use crate::terrain::coord::GridCoord;
use crate::terrain::mesh::TerrainVertex;

/// Какая часть чанка загружается
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshLayer {
    /// Надводный terrain
    Terrain,
    /// Подводный terrain
    Underwater,
}

/// Загрузчик мешей на GPU (реализуется рендером)
pub trait MeshUploader {
    /// Ресурс меша; освобождается при Drop
    type Mesh;

    /// Загрузить вершины. Вызывается только для непустых массивов,
    /// вершины идут тройками (список треугольников).
    fn upload(&mut self, coord: GridCoord, layer: MeshLayer, vertices: &[TerrainVertex]) -> Self::Mesh;
}
