// ============================================
// Work Queues - Очереди генерации и загрузки
// ============================================
//
// Единственное разделяемое между потоками изменяемое состояние.
// Один мьютекс на все три очереди, поэтому порядка захвата нет.
//
// Инвариант: координата находится не более чем в одном из
// {pending, in_flight, ready, загруженный слот}.
//
// Смена сида не ждёт рабочие потоки: номер эпохи увеличивается, а
// результаты старой эпохи отбрасываются при поступлении.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::terrain::coord::GridCoord;
use crate::terrain::mesh::TerrainChunkData;
use crate::terrain::seed::GeneratorSeed;
use super::stats::StreamingStats;

/// Задание на генерацию, захваченное рабочим потоком
#[derive(Clone, Copy, Debug)]
pub(crate) struct GenerateJob {
    pub coord: GridCoord,
    pub seed: GeneratorSeed,
    pub epoch: u64,
}

pub(crate) struct QueueState {
    /// Ожидают генерации; отсортированы так, что ближайший к центру в конце
    pub pending: Vec<GridCoord>,
    /// Захвачены рабочими потоками
    pub in_flight: HashSet<GridCoord>,
    /// Сгенерированы, ждут загрузки на GPU
    pub ready: Vec<TerrainChunkData>,
    pub seed: GeneratorSeed,
    pub epoch: u64,
    pub shutdown: bool,
}

impl QueueState {
    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    /// Уже запрошена (в любой из очередей)
    fn is_requested(&self, coord: GridCoord) -> bool {
        self.in_flight.contains(&coord) || self.ready.iter().any(|d| d.coord == coord)
    }
}

pub(crate) struct WorkQueues {
    state: Mutex<QueueState>,
    /// Появилась работа или пора завершаться
    work_available: Condvar,
    /// Завершилась генерация или очередь очищена
    progress: Condvar,
}

impl WorkQueues {
    pub fn new(seed: GeneratorSeed) -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: Vec::new(),
                in_flight: HashSet::new(),
                ready: Vec::new(),
                seed,
                epoch: 0,
                shutdown: false,
            }),
            work_available: Condvar::new(),
            progress: Condvar::new(),
        }
    }

    /// Паника в рабочем потоке не должна блокировать поток-владелец
    pub fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed(&self) -> GeneratorSeed {
        self.lock().seed
    }

    /// Пересчитать очередь генерации
    ///
    /// Задания вне круга загрузки снимаются, новые координаты добавляются,
    /// затем очередь сортируется по манхэттенскому расстоянию до центра по
    /// убыванию (ближайший в конце).
    pub fn schedule<I, F>(&self, center: GridCoord, candidates: I, in_load_radius: F) -> usize
    where
        I: IntoIterator<Item = GridCoord>,
        F: Fn(GridCoord) -> bool,
    {
        let mut state = self.lock();
        let before = state.pending.len();
        state.pending.retain(|&c| in_load_radius(c));
        let dropped = before - state.pending.len();

        let mut queued: HashSet<GridCoord> = state.pending.iter().copied().collect();
        let mut added = 0;
        for coord in candidates {
            if queued.contains(&coord) || state.is_requested(coord) {
                continue;
            }
            queued.insert(coord);
            state.pending.push(coord);
            added += 1;
        }

        state.pending.sort_by_key(|c| std::cmp::Reverse(c.manhattan(center)));

        if added > 0 {
            self.work_available.notify_all();
        }
        if dropped > 0 {
            self.progress.notify_all();
        }
        added
    }

    /// Забрать ближайшее задание. Блокирует, пока нет работы.
    /// `None` - пора завершаться.
    pub fn claim(&self) -> Option<GenerateJob> {
        let mut state = self.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(coord) = state.pending.pop() {
                state.in_flight.insert(coord);
                return Some(GenerateJob { coord, seed: state.seed, epoch: state.epoch });
            }
            state = self
                .work_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Забрать все ожидающие задания сразу (синхронный прогрев)
    pub fn claim_all(&self) -> Vec<GenerateJob> {
        let mut state = self.lock();
        let seed = state.seed;
        let epoch = state.epoch;
        let coords: Vec<GridCoord> = state.pending.drain(..).rev().collect();
        state.in_flight.extend(coords.iter().copied());
        coords
            .into_iter()
            .map(|coord| GenerateJob { coord, seed, epoch })
            .collect()
    }

    /// Сдать результат. Результат устаревшей эпохи возвращается обратно
    /// вызывающему (для возврата буферов в пул).
    pub fn complete(&self, job: &GenerateJob, data: TerrainChunkData) -> Option<TerrainChunkData> {
        let mut state = self.lock();
        let stale = if state.epoch == job.epoch {
            state.in_flight.remove(&job.coord);
            state.ready.push(data);
            None
        } else {
            Some(data)
        };
        drop(state);
        self.progress.notify_all();
        stale
    }

    /// Достать готовый результат, ближайший к центру (квадрат евклидова расстояния)
    pub fn take_nearest_ready(&self, center: GridCoord) -> Option<TerrainChunkData> {
        let mut state = self.lock();
        let nearest = state
            .ready
            .iter()
            .enumerate()
            .min_by_key(|(_, d)| d.coord.distance_sq(center))
            .map(|(i, _)| i)?;
        Some(state.ready.swap_remove(nearest))
    }

    /// Новая эпоха: сбросить все очереди и сменить сид.
    /// Возвращает готовые, но не загруженные результаты старой эпохи.
    pub fn begin_epoch(&self, seed: GeneratorSeed) -> Vec<TerrainChunkData> {
        let mut state = self.lock();
        state.pending.clear();
        state.in_flight.clear();
        state.seed = seed;
        state.epoch += 1;
        let stale = std::mem::take(&mut state.ready);
        drop(state);
        self.progress.notify_all();
        stale
    }

    /// Сигнал завершения рабочим потокам.
    /// Возвращает готовые, но не загруженные результаты.
    pub fn shutdown(&self) -> Vec<TerrainChunkData> {
        let mut state = self.lock();
        state.shutdown = true;
        state.pending.clear();
        let ready = std::mem::take(&mut state.ready);
        drop(state);
        self.work_available.notify_all();
        self.progress.notify_all();
        ready
    }

    /// Ждать, пока не останется ожидающих и выполняемых заданий
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while !state.is_idle() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .progress
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
        true
    }

    pub fn stats(&self, loaded: usize) -> StreamingStats {
        let state = self.lock();
        StreamingStats {
            pending: state.pending.len(),
            in_flight: state.in_flight.len(),
            ready: state.ready.len(),
            loaded,
            epoch: state.epoch,
        }
    }

    #[cfg(test)]
    pub fn push_ready(&self, data: TerrainChunkData) {
        self.lock().ready.push(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(coord: GridCoord) -> TerrainChunkData {
        TerrainChunkData { coord, above: Vec::new(), below: Vec::new() }
    }

    #[test]
    fn test_schedule_orders_nearest_last() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        let center = GridCoord::new(0, 0);
        let coords = [(3, 0), (0, 1), (2, 2), (0, 0), (-1, -1)].map(|(x, y)| GridCoord::new(x, y));
        assert_eq!(queues.schedule(center, coords, |_| true), 5);

        let order: Vec<GridCoord> = queues.claim_all().into_iter().map(|j| j.coord).collect();
        let expected = [(0, 0), (0, 1), (-1, -1), (3, 0), (2, 2)].map(|(x, y)| GridCoord::new(x, y));
        assert_eq!(order, expected.to_vec());
        assert_eq!(queues.stats(0).in_flight, 5);
    }

    #[test]
    fn test_claim_pops_nearest_and_marks_in_flight() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        let center = GridCoord::new(5, 5);
        let coords = [(7, 5), (5, 6), (9, 9)].map(|(x, y)| GridCoord::new(x, y));
        queues.schedule(center, coords, |_| true);

        let job = queues.claim().unwrap();
        assert_eq!(job.coord, GridCoord::new(5, 6));
        let stats = queues.stats(0);
        assert_eq!((stats.pending, stats.in_flight), (2, 1));

        // Повторный запрос той же координаты не дублирует её
        assert_eq!(queues.schedule(center, [GridCoord::new(5, 6)], |_| true), 0);
    }

    #[test]
    fn test_schedule_drops_work_outside_radius() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        let center = GridCoord::new(0, 0);
        queues.schedule(center, [GridCoord::new(1, 0), GridCoord::new(4, 0)], |_| true);
        queues.schedule(center, [], |c| c.x < 2);
        assert_eq!(queues.stats(0).pending, 1);
    }

    #[test]
    fn test_stale_epoch_results_are_returned() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        let coord = GridCoord::new(1, 1);
        queues.schedule(coord, [coord], |_| true);
        let job = queues.claim().unwrap();

        queues.begin_epoch(GeneratorSeed::from_u64(1));
        assert!(queues.stats(0).in_flight == 0);

        let stale = queues.complete(&job, data(coord));
        assert!(stale.is_some());
        assert_eq!(queues.stats(0).ready, 0);
    }

    #[test]
    fn test_take_nearest_ready() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        for (x, y) in [(2, 1), (1, 0), (3, 0)] {
            queues.push_ready(data(GridCoord::new(x, y)));
        }
        let center = GridCoord::new(0, 0);
        let order: Vec<GridCoord> = std::iter::from_fn(|| queues.take_nearest_ready(center))
            .map(|d| d.coord)
            .collect();
        assert_eq!(order, vec![GridCoord::new(1, 0), GridCoord::new(2, 1), GridCoord::new(3, 0)]);
    }

    #[test]
    fn test_claim_returns_none_after_shutdown() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        queues.schedule(GridCoord::default(), [GridCoord::default()], |_| true);
        queues.shutdown();
        assert!(queues.claim().is_none());
    }

    #[test]
    fn test_wait_until_idle_times_out_with_pending_work() {
        let queues = WorkQueues::new(GeneratorSeed::default());
        assert!(queues.wait_until_idle(Duration::from_millis(1)));
        queues.schedule(GridCoord::default(), [GridCoord::default()], |_| true);
        assert!(!queues.wait_until_idle(Duration::from_millis(20)));
    }
}
