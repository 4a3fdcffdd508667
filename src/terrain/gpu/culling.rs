// ============================================
// Chunk Culling - Грубая проверка видимости чанка
// ============================================
//
// Отсекаем чанки, AABB которых целиком позади камеры. Точный frustum
// culling остаётся за рендером - ему нужна матрица проекции.

use ultraviolet::Vec3;

use crate::terrain::coord::GridCoord;

/// Границы terrain по высоте для AABB чанка
const MIN_Y: f32 = -300.0;
const MAX_Y: f32 = 300.0;

/// Проверяет, находится ли AABB полностью снаружи плоскости
/// (nx, ny, nz, d): nx*x + ny*y + nz*z + d >= 0 означает "внутри"
fn is_aabb_outside_plane(plane: &[f32; 4], min: Vec3, max: Vec3) -> bool {
    let px = if plane[0] >= 0.0 { max.x } else { min.x };
    let py = if plane[1] >= 0.0 { max.y } else { min.y };
    let pz = if plane[2] >= 0.0 { max.z } else { min.z };

    plane[0] * px + plane[1] * py + plane[2] * pz + plane[3] < 0.0
}

/// Чанк хотя бы частично перед камерой
pub fn is_chunk_in_front(
    camera_position: Vec3,
    camera_direction: Vec3,
    coord: GridCoord,
    chunk_size: i32,
) -> bool {
    if camera_direction.mag_sq() <= f32::EPSILON {
        return true;
    }
    let n = camera_direction.normalized();
    let plane = [n.x, n.y, n.z, -n.dot(camera_position)];

    let (min_x, min_z) = coord.world_origin(chunk_size);
    let size = chunk_size as f32;
    let min = Vec3::new(min_x, MIN_Y, min_z);
    let max = Vec3::new(min_x + size, MAX_Y, min_z + size);

    !is_aabb_outside_plane(&plane, min, max)
}
