// ============================================
// Grid Coord - Идентификатор чанка
// ============================================

use serde::{Deserialize, Serialize};

/// Координаты чанка на бесконечной логической плоскости: (x, y).
/// Ось `y` сетки соответствует мировой оси Z.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Чанк, содержащий мировую точку (x, z)
    #[inline]
    pub fn from_world(world_x: f32, world_z: f32, chunk_size: i32) -> Self {
        let size = chunk_size as f32;
        Self {
            x: (world_x / size).floor() as i32,
            y: (world_z / size).floor() as i32,
        }
    }

    /// Квадрат евклидова расстояния (в чанках)
    #[inline]
    pub fn distance_sq(self, other: GridCoord) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    #[inline]
    pub fn manhattan(self, other: GridCoord) -> i64 {
        (self.x as i64 - other.x as i64).abs() + (self.y as i64 - other.y as i64).abs()
    }

    /// Мировая позиция угла чанка с минимальными координатами
    #[inline]
    pub fn world_origin(self, chunk_size: i32) -> (f32, f32) {
        let size = chunk_size as i64;
        ((self.x as i64 * size) as f32, (self.y as i64 * size) as f32)
    }
}
