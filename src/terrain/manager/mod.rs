// ============================================
// Manager Module - Окно чанков, очереди и рабочие потоки
// ============================================

mod window;
mod queues;
mod workers;
mod stats;
mod manager;

pub use window::ChunkWindow;
pub use workers::default_worker_count;
pub use stats::StreamingStats;
pub use manager::ChunkManager;
