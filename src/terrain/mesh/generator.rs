// ============================================
// Terrain Generator - Генерация геометрии чанка
// ============================================
//
// Чистая функция (сид, x, y) -> TerrainChunkData. Общее состояние -
// только пулы буферов, они синхронизированы внутри.
//
// 1. Сетка высот (chunk_size * cells_per_unit)^2 ячеек, строка за строкой:
//    верхние углы ячейки берутся из предыдущей строки.
// 2. Два треугольника на ячейку -> разрезание по воде.
// 3. Плоская нормаль и цвет на каждый треугольник.

use std::mem;

use ultraviolet::{Vec2, Vec3};

use crate::terrain::coord::GridCoord;
use crate::terrain::generation::{gen_point, sample_terrain, shade_triangle};
use crate::terrain::seed::GeneratorSeed;
use super::chunk_data::TerrainChunkData;
use super::pool::BufferPool;
use super::slice::{SlicedMesh, Triangle};
use super::vertex::{pack_color, TerrainVertex};

/// Размер чанка по умолчанию (в мировых единицах)
pub const DEFAULT_CHUNK_SIZE: i32 = 32;
/// Буферов каждого типа в пуле по умолчанию
pub const DEFAULT_POOL_CAPACITY: usize = 16;

/// Генератор геометрии чанков с пулами буферов
pub struct TerrainGenerator {
    chunk_size: i32,
    cells_per_unit: u32,
    triangle_pool: BufferPool<Triangle>,
    vertex_pool: BufferPool<TerrainVertex>,
    row_pool: BufferPool<f32>,
}

impl TerrainGenerator {
    pub fn new(chunk_size: i32, cells_per_unit: u32, pool_capacity: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            cells_per_unit: cells_per_unit.max(1),
            triangle_pool: BufferPool::new(pool_capacity),
            vertex_pool: BufferPool::new(pool_capacity),
            row_pool: BufferPool::new(pool_capacity),
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Ячеек на сторону чанка
    #[inline]
    pub fn cells_per_side(&self) -> i32 {
        self.chunk_size * self.cells_per_unit as i32
    }

    /// Мировая координата узла сетки. Считается от целого индекса, чтобы
    /// соседние чанки давали побитово одинаковые вершины на общей границе.
    #[inline(always)]
    fn lattice_to_world(&self, index: i64) -> f32 {
        (index as f64 / self.cells_per_unit as f64) as f32
    }

    /// Сгенерировать чанк (gx, gy)
    pub fn generate(&self, seed: &GeneratorSeed, grid_x: i32, grid_y: i32) -> TerrainChunkData {
        let coord = GridCoord::new(grid_x, grid_y);
        let n = self.cells_per_side();
        let cells = (n * n) as usize;

        let mut mesh = SlicedMesh::from_buffers(
            self.triangle_pool.checkout(cells * 2),
            self.triangle_pool.checkout(cells),
            self.triangle_pool.checkout(cells),
        );

        self.build_triangles(seed, coord, &mut mesh);

        let above = self.shade(seed, &mesh.above);
        let below = self.shade(seed, &mesh.below);

        // Поверхность воды в минимальном ядре не выгружается
        let SlicedMesh { above: a, below: b, water: w } = mesh;
        self.triangle_pool.give_back(a);
        self.triangle_pool.give_back(b);
        self.triangle_pool.give_back(w);

        TerrainChunkData { coord, above, below }
    }

    /// Вернуть буферы чанка в пул
    pub fn recycle(&self, data: TerrainChunkData) {
        self.vertex_pool.give_back(data.above);
        self.vertex_pool.give_back(data.below);
    }

    fn build_triangles(&self, seed: &GeneratorSeed, coord: GridCoord, mesh: &mut SlicedMesh) {
        let n = self.cells_per_side();
        // Индексы узлов в i64: на краю сетки чанков i32 переполняется
        let base_x = coord.x as i64 * n as i64;
        let base_z = coord.y as i64 * n as i64;
        let row_len = (n + 1) as usize;

        let sample_row = |row: &mut Vec<f32>, lz: i32| {
            row.clear();
            let z = self.lattice_to_world(base_z + lz as i64);
            for i in 0..=n as i64 {
                let x = self.lattice_to_world(base_x + i);
                row.push(sample_terrain(Vec2::new(x, z), seed).0);
            }
        };

        let mut prev = self.row_pool.checkout(row_len);
        let mut cur = self.row_pool.checkout(row_len);
        sample_row(&mut prev, 0);

        for j in 0..n {
            sample_row(&mut cur, j + 1);
            let z0 = self.lattice_to_world(base_z + j as i64);
            let z1 = self.lattice_to_world(base_z + j as i64 + 1);

            for i in 0..n as usize {
                let x0 = self.lattice_to_world(base_x + i as i64);
                let x1 = self.lattice_to_world(base_x + i as i64 + 1);

                let p00 = Vec3::new(x0, prev[i], z0);
                let p10 = Vec3::new(x1, prev[i + 1], z0);
                let p01 = Vec3::new(x0, cur[i], z1);
                let p11 = Vec3::new(x1, cur[i + 1], z1);

                // Обход против часовой стрелки при взгляде сверху (+Y)
                mesh.push([p00, p01, p11]);
                mesh.push([p00, p11, p10]);
            }

            mem::swap(&mut prev, &mut cur);
        }

        self.row_pool.give_back(prev);
        self.row_pool.give_back(cur);
    }

    fn shade(&self, seed: &GeneratorSeed, triangles: &[Triangle]) -> Vec<TerrainVertex> {
        if triangles.is_empty() {
            return Vec::new();
        }

        let mut out = self.vertex_pool.checkout(triangles.len() * 3);
        for &[a, b, c] in triangles {
            let normal = flat_normal(a, b, c);
            let centroid = (a + b + c) / 3.0;
            let climate = gen_point(Vec2::new(centroid.x, centroid.z), seed);
            let shade = shade_triangle(centroid.y, normal, &climate);
            let color = pack_color(shade.color);

            out.push(TerrainVertex::new(a, normal, color, shade.lighting));
            out.push(TerrainVertex::new(b, normal, color, shade.lighting));
            out.push(TerrainVertex::new(c, normal, color, shade.lighting));
        }
        out
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, 1, DEFAULT_POOL_CAPACITY)
    }
}

/// Нормаль треугольника; для вырожденного - вверх
#[inline]
fn flat_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = (b - a).cross(c - a);
    if n.mag_sq() > f32::EPSILON * f32::EPSILON {
        n.normalized()
    } else {
        Vec3::unit_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_generator() -> TerrainGenerator {
        TerrainGenerator::new(8, 1, 8)
    }

    fn area_xz(v: &[TerrainVertex]) -> f32 {
        let (a, b, c) = (v[0].position, v[1].position, v[2].position);
        ((b[0] - a[0]) * (c[2] - a[2]) - (c[0] - a[0]) * (b[2] - a[2])) * 0.5
    }

    #[test]
    fn test_generate_is_deterministic() {
        let seed = GeneratorSeed::from_u64(2024);
        let a = small_generator().generate(&seed, 3, -2);
        let b = small_generator().generate(&seed, 3, -2);
        assert_eq!(a.above_count(), b.above_count());
        assert_eq!(a.below_count(), b.below_count());
        assert_eq!(TerrainVertex::as_bytes(&a.above), TerrainVertex::as_bytes(&b.above));
        assert_eq!(TerrainVertex::as_bytes(&a.below), TerrainVertex::as_bytes(&b.below));
    }

    #[test]
    fn test_pooled_generation_matches_fresh() {
        let seed = GeneratorSeed::default();
        let generator = small_generator();
        let first = generator.generate(&seed, 0, 0);
        let bytes = TerrainVertex::as_bytes(&first.above).to_vec();
        generator.recycle(first);
        let _other = generator.generate(&seed, 5, 5);
        let again = generator.generate(&seed, 0, 0);
        assert_eq!(TerrainVertex::as_bytes(&again.above), &bytes[..]);
    }

    #[test]
    fn test_chunk_area_is_covered() {
        let generator = small_generator();
        for (x, y) in [(0, 0), (-4, 7), (12, -30)] {
            let data = generator.generate(&GeneratorSeed::from_u64(11), x, y);
            assert_eq!(data.above_count() % 3, 0);
            assert_eq!(data.below_count() % 3, 0);
            let area: f32 = data
                .above
                .chunks(3)
                .chain(data.below.chunks(3))
                .map(area_xz)
                .sum();
            // Все куски с одним обходом: модуль суммы равен площади чанка
            assert!((area.abs() - 64.0).abs() < 1e-2, "area = {}", area);
        }
    }

    #[test]
    fn test_sides_respect_water_plane() {
        let generator = small_generator();
        for i in -3..3 {
            let data = generator.generate(&GeneratorSeed::from_u64(3), i * 7, i * 5);
            assert!(data.above.iter().all(|v| v.position[1] >= 0.0));
            assert!(data.below.iter().all(|v| v.position[1] <= 0.0));
            for v in data.above.iter().chain(data.below.iter()) {
                assert!(v.normal[1] > 0.0, "terrain faces must point up");
            }
        }
    }

    #[test]
    fn test_neighbour_chunks_share_border_heights() {
        let seed = GeneratorSeed::from_u64(8);
        let generator = small_generator();
        let left = generator.generate(&seed, 0, 0);
        let right = generator.generate(&seed, 1, 0);

        let border = |data: &TerrainChunkData| {
            let mut points: Vec<(u32, u32)> = data
                .above
                .iter()
                .chain(data.below.iter())
                .filter(|v| v.position[0] == 8.0 && v.position[2].fract() == 0.0)
                .map(|v| (v.position[2].to_bits(), v.position[1].to_bits()))
                .collect();
            points.sort_unstable();
            points.dedup();
            points
        };
        assert_eq!(border(&left), border(&right));
        assert_eq!(border(&left).len(), 9);
    }

    #[test]
    fn test_far_chunks_generate() {
        let generator = TerrainGenerator::new(32, 1, 4);
        let seed = GeneratorSeed::default();
        for (x, y) in [(70_000_000, 0), (i32::MAX, i32::MIN), (i32::MIN, i32::MAX)] {
            let data = generator.generate(&seed, x, y);
            assert_eq!(data.coord, GridCoord::new(x, y));
            assert!(data.above_count() + data.below_count() > 0);
            assert_eq!((data.above_count() + data.below_count()) % 3, 0);
            for v in data.above.iter().chain(data.below.iter()) {
                assert!(v.position.iter().all(|c| c.is_finite()));
                assert!(v.normal.iter().all(|c| c.is_finite()));
            }
        }
    }

    #[test]
    fn test_recycle_returns_buffers() {
        let generator = small_generator();
        let data = generator.generate(&GeneratorSeed::default(), 0, 0);
        let before = generator.vertex_pool.available();
        let returned = (!data.above.is_empty()) as usize + (!data.below.is_empty()) as usize;
        generator.recycle(data);
        assert_eq!(generator.vertex_pool.available(), before + returned);
    }
}
