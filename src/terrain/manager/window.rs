// ============================================
// Chunk Window - Тороидальное окно чанков
// ============================================
//
// Квадрат (2R+1)^2 слотов вокруг центра. Массив слотов фиксированного
// размера адресуется со смещением по модулю:
//
//   slot = ((grid - grid_start + offset) mod size)
//
// При сдвиге окна содержимое массива не переезжает - очищаются только
// уходящие столбцы/строки, а смещение и grid_start сдвигаются.
//
// Координаты окна считаются по модулю 2^32 (wrapping): у края сетки i32
// окно не паникует, а чанки за краем не попадают в круг загрузки.

use std::ops::Range;

use log::debug;

use crate::terrain::coord::GridCoord;
use crate::terrain::gpu::TerrainChunk;

/// Окно загруженных чанков
pub struct ChunkWindow<M> {
    /// Радиус загрузки R
    radius: i32,
    /// Сторона окна 2R+1
    size: i32,
    /// Чанк окна с минимальными координатами
    grid_start: GridCoord,
    offset_x: i32,
    offset_y: i32,
    slots: Vec<Option<TerrainChunk<M>>>,
}

impl<M> ChunkWindow<M> {
    pub fn new(radius: i32, center: GridCoord) -> Self {
        let radius = radius.max(0);
        let size = 2 * radius + 1;
        let slots = (0..size * size).map(|_| None).collect();
        Self {
            radius,
            size,
            grid_start: Self::start_for(center, radius),
            offset_x: 0,
            offset_y: 0,
            slots,
        }
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn grid_start(&self) -> GridCoord {
        self.grid_start
    }

    #[inline]
    pub fn center(&self) -> GridCoord {
        GridCoord::new(
            self.grid_start.x.wrapping_add(self.radius),
            self.grid_start.y.wrapping_add(self.radius),
        )
    }

    #[inline]
    fn start_for(center: GridCoord, radius: i32) -> GridCoord {
        GridCoord::new(center.x.wrapping_sub(radius), center.y.wrapping_sub(radius))
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Внутри квадрата окна
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        let ix = coord.x.wrapping_sub(self.grid_start.x);
        let iy = coord.y.wrapping_sub(self.grid_start.y);
        (0..self.size).contains(&ix) && (0..self.size).contains(&iy)
    }

    /// Внутри круга загрузки: центр чанка ближе R + 0.5 к центру окна
    ///
    /// Граница R^2 + R, а не R^2: иначе окно радиуса 1 загрузило бы
    /// только крест из 5 чанков вместо всех 9.
    #[inline]
    pub fn in_load_radius(&self, coord: GridCoord) -> bool {
        let r = self.radius as i64;
        coord.distance_sq(self.center()) <= r * r + r
    }

    /// Индекс слота для координаты, `None` вне окна
    #[inline]
    pub fn grid_to_slot(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let ax = (coord.x.wrapping_sub(self.grid_start.x) + self.offset_x) % self.size;
        let ay = (coord.y.wrapping_sub(self.grid_start.y) + self.offset_y) % self.size;
        Some((ay * self.size + ax) as usize)
    }

    /// Координата чанка, которому сейчас принадлежит слот
    #[inline]
    pub fn slot_to_grid(&self, slot: usize) -> GridCoord {
        let slot = slot as i32;
        let ax = slot % self.size;
        let ay = slot / self.size;
        let ix = (ax - self.offset_x).rem_euclid(self.size);
        let iy = (ay - self.offset_y).rem_euclid(self.size);
        GridCoord::new(self.grid_start.x.wrapping_add(ix), self.grid_start.y.wrapping_add(iy))
    }

    pub fn get(&self, coord: GridCoord) -> Option<&TerrainChunk<M>> {
        self.grid_to_slot(coord).and_then(|slot| self.slots[slot].as_ref())
    }

    pub fn is_loaded(&self, coord: GridCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Свободный слот для координаты (в окне и пустой)
    pub fn vacant_slot(&self, coord: GridCoord) -> Option<usize> {
        self.grid_to_slot(coord).filter(|&slot| self.slots[slot].is_none())
    }

    /// Положить чанк в слот, полученный из `vacant_slot`
    pub fn store(&mut self, slot: usize, chunk: TerrainChunk<M>) {
        debug_assert!(self.slots[slot].is_none(), "slot {} is already occupied", slot);
        debug_assert_eq!(self.slot_to_grid(slot), chunk.coord);
        self.slots[slot] = Some(chunk);
    }

    /// Загруженные чанки
    pub fn loaded(&self) -> impl Iterator<Item = &TerrainChunk<M>> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Координаты пустых слотов внутри круга загрузки
    pub fn empty_in_load_radius(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| self.slot_to_grid(i))
            .filter(|&coord| self.in_load_radius(coord))
    }

    /// Освободить все слоты. Возвращает число выгруженных чанков.
    pub fn clear(&mut self) -> usize {
        let mut evicted = 0;
        for slot in &mut self.slots {
            if slot.take().is_some() {
                evicted += 1;
            }
        }
        evicted
    }

    /// Сдвинуть окно на новый центр. Возвращает число выгруженных чанков.
    ///
    /// Сдвиг на сторону окна и больше - полный сброс. Иначе оси
    /// обрабатываются по очереди: сначала X целиком, затем Y.
    pub fn recenter(&mut self, center: GridCoord) -> usize {
        let new_start = Self::start_for(center, self.radius);
        let dx = new_start.x.wrapping_sub(self.grid_start.x);
        let dy = new_start.y.wrapping_sub(self.grid_start.y);

        if dx == 0 && dy == 0 {
            return 0;
        }

        if dx.unsigned_abs() >= self.size as u32 || dy.unsigned_abs() >= self.size as u32 {
            let evicted = self.clear();
            self.grid_start = new_start;
            self.offset_x = 0;
            self.offset_y = 0;
            debug!("Window reset to {:?}, evicted {} chunks", center, evicted);
            return evicted;
        }

        let evicted = self.shift_x(dx) + self.shift_y(dy);
        debug!("Window moved by ({}, {}) to {:?}, evicted {} chunks", dx, dy, center, evicted);
        evicted
    }

    /// Относительные индексы уходящих столбцов/строк
    fn leaving(&self, delta: i32) -> Range<i32> {
        if delta > 0 {
            0..delta
        } else {
            self.size + delta..self.size
        }
    }

    fn shift_x(&mut self, dx: i32) -> usize {
        if dx == 0 {
            return 0;
        }
        let mut evicted = 0;
        for ix in self.leaving(dx) {
            let ax = (ix + self.offset_x) % self.size;
            for ay in 0..self.size {
                if self.slots[(ay * self.size + ax) as usize].take().is_some() {
                    evicted += 1;
                }
            }
        }
        self.offset_x = (self.offset_x + dx).rem_euclid(self.size);
        self.grid_start.x = self.grid_start.x.wrapping_add(dx);
        evicted
    }

    fn shift_y(&mut self, dy: i32) -> usize {
        if dy == 0 {
            return 0;
        }
        let mut evicted = 0;
        for iy in self.leaving(dy) {
            let ay = (iy + self.offset_y) % self.size;
            for ax in 0..self.size {
                if self.slots[(ay * self.size + ax) as usize].take().is_some() {
                    evicted += 1;
                }
            }
        }
        self.offset_y = (self.offset_y + dy).rem_euclid(self.size);
        self.grid_start.y = self.grid_start.y.wrapping_add(dy);
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::mesh::TerrainChunkData;
    use crate::terrain::gpu::{MeshLayer, MeshUploader};
    use crate::terrain::mesh::TerrainVertex;

    struct NullUploader;

    impl MeshUploader for NullUploader {
        type Mesh = ();
        fn upload(&mut self, _: GridCoord, _: MeshLayer, _: &[TerrainVertex]) -> Self::Mesh {}
    }

    fn chunk(coord: GridCoord) -> TerrainChunk<()> {
        let data = TerrainChunkData {
            coord,
            above: vec![TerrainVertex::default(); 3],
            below: Vec::new(),
        };
        TerrainChunk::upload(&data, &mut NullUploader)
    }

    fn fill(window: &mut ChunkWindow<()>) {
        for slot in 0..window.slot_count() {
            let coord = window.slot_to_grid(slot);
            if window.vacant_slot(coord).is_some() {
                window.store(slot, chunk(coord));
            }
        }
    }

    fn loaded_coords(window: &ChunkWindow<()>) -> Vec<GridCoord> {
        let mut coords: Vec<_> = window.loaded().map(|c| c.coord).collect();
        coords.sort_by_key(|c| (c.x, c.y));
        coords
    }

    #[test]
    fn test_grid_slot_bijection_after_moves() {
        let mut window: ChunkWindow<()> = ChunkWindow::new(3, GridCoord::new(0, 0));
        for center in [(1, 0), (3, -2), (-1, 4), (-2, -2), (40, 40)] {
            window.recenter(GridCoord::new(center.0, center.1));

            let mut seen = vec![false; window.slot_count()];
            let start = window.grid_start();
            for y in start.y..start.y + window.size() {
                for x in start.x..start.x + window.size() {
                    let g = GridCoord::new(x, y);
                    let slot = window.grid_to_slot(g).expect("in-window coord must map");
                    assert!(!seen[slot], "slot {} mapped twice", slot);
                    seen[slot] = true;
                    assert_eq!(window.slot_to_grid(slot), g);
                }
            }
            assert!(seen.iter().all(|&s| s));

            let outside = GridCoord::new(start.x - 1, start.y);
            assert_eq!(window.grid_to_slot(outside), None);
            let outside = GridCoord::new(start.x, start.y + window.size());
            assert_eq!(window.grid_to_slot(outside), None);
        }
    }

    #[test]
    fn test_shift_evicts_only_leaving_column() {
        let mut window = ChunkWindow::new(1, GridCoord::new(0, 0));
        fill(&mut window);
        assert_eq!(window.loaded_count(), 9);

        let evicted = window.recenter(GridCoord::new(1, 0));
        assert_eq!(evicted, 3);

        let expected: Vec<_> = (0..=1)
            .flat_map(|x| (-1..=1).map(move |y| GridCoord::new(x, y)))
            .collect();
        assert_eq!(loaded_coords(&window), expected);
        for y in -1..=1 {
            assert!(window.vacant_slot(GridCoord::new(2, y)).is_some());
        }
    }

    #[test]
    fn test_diagonal_shift_is_applied_per_axis() {
        let mut window = ChunkWindow::new(2, GridCoord::new(0, 0));
        fill(&mut window);
        let evicted = window.recenter(GridCoord::new(-2, 1));
        // 2 столбца по 5, затем 1 строка из оставшихся 3 столбцов
        assert_eq!(evicted, 10 + 3);
        assert_eq!(window.loaded_count(), 25 - 13);
        for chunk in window.loaded() {
            assert!(window.contains(chunk.coord));
            assert!(window.is_loaded(chunk.coord));
        }
    }

    #[test]
    fn test_large_jump_resets_window() {
        let mut window = ChunkWindow::new(1, GridCoord::new(0, 0));
        fill(&mut window);
        let evicted = window.recenter(GridCoord::new(3, 0));
        assert_eq!(evicted, 9);
        assert_eq!(window.center(), GridCoord::new(3, 0));
        assert_eq!(window.loaded_count(), 0);
    }

    #[test]
    fn test_window_at_grid_edge() {
        let mut window: ChunkWindow<()> = ChunkWindow::new(1, GridCoord::new(i32::MAX, 0));
        assert_eq!(window.center(), GridCoord::new(i32::MAX, 0));

        // Столбец за краем адресуется, но в круг загрузки не входит
        let beyond = GridCoord::new(i32::MIN, 0);
        assert!(window.grid_to_slot(beyond).is_some());
        assert!(!window.in_load_radius(beyond));
        assert_eq!(window.empty_in_load_radius().count(), 6);

        fill(&mut window);
        assert_eq!(window.recenter(GridCoord::new(i32::MIN, 0)), 3);
        assert_eq!(window.center(), GridCoord::new(i32::MIN, 0));
        assert_eq!(window.recenter(GridCoord::new(0, i32::MIN)), 6);
        assert_eq!(window.center(), GridCoord::new(0, i32::MIN));
    }

    #[test]
    fn test_load_radius_is_a_disc() {
        let window: ChunkWindow<()> = ChunkWindow::new(3, GridCoord::new(0, 0));
        assert!(window.in_load_radius(GridCoord::new(3, 0)));
        assert!(window.in_load_radius(GridCoord::new(2, 2)));
        assert!(!window.in_load_radius(GridCoord::new(3, 3)));
        assert!(!window.in_load_radius(GridCoord::new(3, 2)));
        let small: ChunkWindow<()> = ChunkWindow::new(1, GridCoord::new(0, 0));
        assert_eq!(small.empty_in_load_radius().count(), 9);
    }
}
