// ============================================
// Chunk Manager - Стриминг чанков вокруг камеры
// ============================================
//
// Владелец окна загруженных чанков, очередей и рабочих потоков.
//
//   set_center_chunk ──> окно сдвигается ──> пустые слоты в очередь
//   рабочие потоки   ──> генерация        ──> ready
//   process_chunks   ──> ready (ближайший) ──> uploader ──> слот окна
//
// Окно меняется только через &mut self, то есть только в потоке-владельце.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info, trace};
use rayon::prelude::*;
use ultraviolet::Vec3;

use crate::config::TerrainConfig;
use crate::error::TerrainError;
use crate::terrain::coord::GridCoord;
use crate::terrain::gpu::{is_chunk_in_front, MeshUploader, TerrainChunk};
use crate::terrain::mesh::TerrainGenerator;
use crate::terrain::seed::GeneratorSeed;
use super::queues::WorkQueues;
use super::stats::StreamingStats;
use super::window::ChunkWindow;
use super::workers::{default_worker_count, join_workers, spawn_workers};

/// Менеджер стриминга terrain
///
/// `M` - тип меша, который возвращает рендер (см. [`MeshUploader`]).
pub struct ChunkManager<M> {
    render_radius: i32,
    extra_loaded_radius: i32,
    window: ChunkWindow<M>,
    generator: Arc<TerrainGenerator>,
    queues: Arc<WorkQueues>,
    workers: Vec<JoinHandle<()>>,
    disposed: bool,

    /// Позиция камеры для `visible_chunks`
    pub camera_position: Vec3,
    /// Направление взгляда для `visible_chunks`
    pub camera_direction: Vec3,
}

impl<M> ChunkManager<M> {
    /// Менеджер с настройками по умолчанию для заданного сида и радиуса
    pub fn new(seed: GeneratorSeed, render_radius: i32, center: GridCoord) -> Result<Self, TerrainError> {
        let config = TerrainConfig {
            render_radius,
            generator_seed: Some(seed),
            ..Default::default()
        };
        Self::with_config(&config, center)
    }

    pub fn with_config(config: &TerrainConfig, center: GridCoord) -> Result<Self, TerrainError> {
        config.validate()?;

        let generator = Arc::new(TerrainGenerator::new(
            config.chunk_size,
            config.cells_per_unit,
            config.pool_capacity,
        ));
        let queues = Arc::new(WorkQueues::new(config.generator_seed()));
        let worker_count = config.worker_threads.unwrap_or_else(default_worker_count);
        let workers = spawn_workers(worker_count, &queues, &generator)?;

        let load_radius = config.render_radius + config.extra_loaded_radius;
        let mut manager = Self {
            render_radius: config.render_radius,
            extra_loaded_radius: config.extra_loaded_radius,
            window: ChunkWindow::new(load_radius, center),
            generator,
            queues,
            workers,
            disposed: false,
            camera_position: Vec3::zero(),
            camera_direction: Vec3::zero(),
        };

        info!(
            "ChunkManager created: center {:?}, render radius {}, load radius {}, {} workers",
            center, manager.render_radius, load_radius, worker_count
        );
        manager.start_loading_unloaded_chunks();
        Ok(manager)
    }

    // ============================================
    // Параметры
    // ============================================

    #[inline]
    pub fn chunk_render_radius(&self) -> i32 {
        self.render_radius
    }

    /// Радиус загрузки: радиус отрисовки плюс запас
    #[inline]
    pub fn load_radius(&self) -> i32 {
        self.window.radius()
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.generator.chunk_size()
    }

    #[inline]
    pub fn center(&self) -> GridCoord {
        self.window.center()
    }

    /// Сменить радиус отрисовки. Все загруженные чанки выгружаются.
    pub fn set_chunk_render_radius(&mut self, radius: i32) -> Result<(), TerrainError> {
        if radius <= 0 {
            return Err(TerrainError::InvalidRenderRadius(radius));
        }
        if radius == self.render_radius {
            return Ok(());
        }

        let center = self.window.center();
        let evicted = self.window.clear();
        self.render_radius = radius;
        self.window = ChunkWindow::new(radius + self.extra_loaded_radius, center);
        info!("Render radius set to {}, evicted {} chunks", radius, evicted);

        self.start_loading_unloaded_chunks();
        Ok(())
    }

    pub fn generator_seed(&self) -> GeneratorSeed {
        self.queues.seed()
    }

    /// Сменить сид генерации
    ///
    /// Не ждёт рабочие потоки: начинается новая эпоха, результаты старой
    /// отбрасываются. Равный по значению сид ничего не меняет.
    pub fn set_generator_seed(&mut self, seed: GeneratorSeed) {
        if seed == self.generator_seed() {
            return;
        }

        let stale = self.queues.begin_epoch(seed);
        for data in stale {
            self.generator.recycle(data);
        }
        let evicted = self.window.clear();
        info!("Generator seed changed, evicted {} chunks", evicted);

        self.start_loading_unloaded_chunks();
    }

    // ============================================
    // Окно
    // ============================================

    /// Центрировать окно на чанке (x, y)
    pub fn set_center_chunk(&mut self, grid_x: i32, grid_y: i32) {
        let center = GridCoord::new(grid_x, grid_y);
        if center == self.window.center() {
            return;
        }
        self.window.recenter(center);
        self.start_loading_unloaded_chunks();
    }

    /// Центрировать окно на чанке, содержащем мировую точку (x, z)
    pub fn set_center_position(&mut self, world_x: f32, world_z: f32) {
        let center = GridCoord::from_world(world_x, world_z, self.chunk_size());
        self.set_center_chunk(center.x, center.y);
    }

    /// Загруженный чанк в (x, y)
    pub fn get_chunk_at(&self, grid_x: i32, grid_y: i32) -> Option<&TerrainChunk<M>> {
        self.window.get(GridCoord::new(grid_x, grid_y))
    }

    /// Все загруженные чанки (для списка отрисовки)
    pub fn loaded_chunks(&self) -> impl Iterator<Item = &TerrainChunk<M>> {
        self.window.loaded()
    }

    /// Загруженные чанки, не лежащие целиком позади камеры
    pub fn visible_chunks(&self) -> impl Iterator<Item = &TerrainChunk<M>> {
        let position = self.camera_position;
        let direction = self.camera_direction;
        let chunk_size = self.chunk_size();
        self.window
            .loaded()
            .filter(move |chunk| is_chunk_in_front(position, direction, chunk.coord, chunk_size))
    }

    // ============================================
    // Загрузка
    // ============================================

    /// Загрузить все готовые чанки через рендер, ближайшие к центру первыми.
    /// Возвращает число загруженных чанков.
    pub fn process_chunks<U>(&mut self, uploader: &mut U) -> usize
    where
        U: MeshUploader<Mesh = M>,
    {
        let center = self.window.center();
        let mut uploaded = 0;

        while let Some(data) = self.queues.take_nearest_ready(center) {
            match self.window.vacant_slot(data.coord) {
                Some(slot) => {
                    trace!(
                        "Uploading chunk {:?} ({} + {} vertices)",
                        data.coord,
                        data.above_count(),
                        data.below_count()
                    );
                    let chunk = TerrainChunk::upload(&data, uploader);
                    self.window.store(slot, chunk);
                    uploaded += 1;
                }
                None => debug!("Discarding stale chunk {:?}", data.coord),
            }
            self.generator.recycle(data);
        }
        uploaded
    }

    /// Сгенерировать всю очередь синхронно (пул rayon) и загрузить результат
    ///
    /// Для первого кадра, чтобы окно не заполнялось постепенно.
    pub fn generate_initial<U>(&mut self, uploader: &mut U) -> usize
    where
        U: MeshUploader<Mesh = M>,
    {
        let jobs = self.queues.claim_all();
        let generator = &self.generator;

        let results: Vec<_> = jobs
            .into_par_iter()
            .map(|job| {
                let data = generator.generate(&job.seed, job.coord.x, job.coord.y);
                (job, data)
            })
            .collect();

        let generated = results.len();
        for (job, data) in results {
            if let Some(stale) = self.queues.complete(&job, data) {
                self.generator.recycle(stale);
            }
        }

        let uploaded = self.process_chunks(uploader);
        info!("Initial generation: {} chunks generated, {} uploaded", generated, uploaded);
        uploaded
    }

    // ============================================
    // Состояние
    // ============================================

    pub fn stats(&self) -> StreamingStats {
        self.queues.stats(self.window.loaded_count())
    }

    /// Ждать, пока рабочие потоки не разберут очередь. `false` по таймауту.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        self.queues.wait_until_idle(timeout)
    }

    /// Остановить рабочие потоки и выгрузить все чанки
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        for data in self.queues.shutdown() {
            self.generator.recycle(data);
        }
        join_workers(std::mem::take(&mut self.workers));
        let evicted = self.window.clear();
        info!("ChunkManager disposed, released {} chunks", evicted);
    }

    /// Поставить в очередь пустые слоты внутри круга загрузки
    fn start_loading_unloaded_chunks(&mut self) {
        if self.disposed {
            return;
        }
        let window = &self.window;
        let candidates: Vec<GridCoord> = window.empty_in_load_radius().collect();
        let added = self
            .queues
            .schedule(window.center(), candidates, |coord| window.in_load_radius(coord));
        trace!("Queued {} chunks around {:?}", added, window.center());
    }

    #[cfg(test)]
    fn inject_ready(&self, data: crate::terrain::mesh::TerrainChunkData) {
        self.queues.push_ready(data);
    }
}

impl<M> Drop for ChunkManager<M> {
    fn drop(&mut self) {
        self.dispose();
    }
}
