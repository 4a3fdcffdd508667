// ============================================
// Generation Workers - Фоновые потоки генерации
// ============================================
//
// Каждый поток в цикле забирает ближайшее задание из очереди, генерирует
// чанк вне блокировки и сдаёт результат. Результат устаревшей эпохи
// сразу возвращается в пул генератора.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, trace, warn};

use crate::terrain::mesh::TerrainGenerator;
use super::queues::WorkQueues;

/// Число потоков по умолчанию: все ядра, кроме одного (владельца)
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Запустить `count` рабочих потоков `terrain-gen-N`
pub(crate) fn spawn_workers(
    count: usize,
    queues: &Arc<WorkQueues>,
    generator: &Arc<TerrainGenerator>,
) -> io::Result<Vec<JoinHandle<()>>> {
    let mut handles = Vec::with_capacity(count);
    for index in 0..count {
        let worker_queues = Arc::clone(queues);
        let worker_generator = Arc::clone(generator);
        let handle = thread::Builder::new()
            .name(format!("terrain-gen-{}", index))
            .spawn(move || worker_loop(&worker_queues, &worker_generator));

        match handle {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                // Уже запущенные потоки не должны остаться висеть
                queues.shutdown();
                join_workers(handles);
                return Err(err);
            }
        }
    }
    Ok(handles)
}

fn worker_loop(queues: &WorkQueues, generator: &TerrainGenerator) {
    while let Some(job) = queues.claim() {
        trace!("Generating chunk {:?} (epoch {})", job.coord, job.epoch);
        let data = generator.generate(&job.seed, job.coord.x, job.coord.y);

        if let Some(stale) = queues.complete(&job, data) {
            debug!("Discarding chunk {:?} from stale epoch {}", stale.coord, job.epoch);
            generator.recycle(stale);
        }
    }
    trace!("Worker {:?} stopped", thread::current().name());
}

/// Дождаться завершения потоков. Паника потока только логируется.
pub(crate) fn join_workers(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        let name = handle.thread().name().unwrap_or("terrain-gen").to_string();
        if handle.join().is_err() {
            warn!("Worker {} panicked", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use crate::terrain::coord::GridCoord;
    use crate::terrain::seed::GeneratorSeed;

    #[test]
    fn test_default_worker_count_is_positive() {
        assert!(default_worker_count() >= 1);
    }

    #[test]
    fn test_spawned_workers_share_queues() {
        let queues = Arc::new(WorkQueues::new(GeneratorSeed::default()));
        let generator = Arc::new(TerrainGenerator::new(4, 1, 4));
        assert!(spawn_workers(0, &queues, &generator).unwrap().is_empty());

        let handles = spawn_workers(3, &queues, &generator).unwrap();
        assert_eq!(handles.len(), 3);
        // Каждый поток держит свою копию Arc
        assert_eq!(Arc::strong_count(&queues), 4);
        assert_eq!(handles[1].thread().name(), Some("terrain-gen-1"));

        queues.shutdown();
        join_workers(handles);
        assert_eq!(Arc::strong_count(&queues), 1);
    }

    #[test]
    fn test_workers_drain_queue_and_stop() {
        let _ = env_logger::builder().is_test(true).try_init();

        let queues = Arc::new(WorkQueues::new(GeneratorSeed::from_u64(5)));
        let generator = Arc::new(TerrainGenerator::new(4, 1, 4));
        let handles = spawn_workers(2, &queues, &generator).unwrap();

        let center = GridCoord::new(0, 0);
        let coords = (-1..=1).flat_map(|x| (-1..=1).map(move |y| GridCoord::new(x, y)));
        assert_eq!(queues.schedule(center, coords, |_| true), 9);
        assert!(queues.wait_until_idle(Duration::from_secs(30)));
        assert_eq!(queues.stats(0).ready, 9);

        let (tx, rx) = mpsc::channel();
        let stopper = Arc::clone(&queues);
        thread::spawn(move || {
            stopper.shutdown();
            join_workers(handles);
            let _ = tx.send(());
        });
        assert!(rx.recv_timeout(Duration::from_secs(10)).is_ok());
    }
}
