// ============================================
// Terrain Stream Demo - Прогон камеры без рендера
// ============================================
//
// Использование: terrain-stream [config.json]
//
// Камера летит по прямой, каждый кадр окно центрируется на ней и
// готовые чанки "загружаются" в счётчик байтов вместо GPU.

use std::process::ExitCode;
use std::time::Duration;

use log::{error, info};
use ultraviolet::Vec3;

use terrain_stream::{
    ChunkManager, GridCoord, MeshLayer, MeshUploader, TerrainConfig, TerrainError, TerrainVertex,
};

const FRAMES: u32 = 240;
const SPEED: f32 = 4.0;
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Считает загруженные меши вместо настоящего GPU
#[derive(Default)]
struct CountingUploader {
    meshes: usize,
    bytes: usize,
}

impl MeshUploader for CountingUploader {
    /// Размер буфера в байтах
    type Mesh = usize;

    fn upload(&mut self, _coord: GridCoord, _layer: MeshLayer, vertices: &[TerrainVertex]) -> usize {
        let bytes = TerrainVertex::as_bytes(vertices).len();
        self.meshes += 1;
        self.bytes += bytes;
        bytes
    }
}

fn run() -> Result<(), TerrainError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            TerrainConfig::load(path)?
        }
        None => TerrainConfig::default(),
    };

    let mut manager: ChunkManager<usize> = ChunkManager::with_config(&config, GridCoord::new(0, 0))?;
    let mut uploader = CountingUploader::default();

    manager.generate_initial(&mut uploader);
    info!("Initial window: {:?}", manager.stats());

    let direction = Vec3::new(1.0, 0.0, 0.5).normalized();
    let mut position = Vec3::new(0.0, 40.0, 0.0);
    manager.camera_direction = direction;

    for frame in 0..FRAMES {
        position += direction * SPEED;
        manager.camera_position = position;
        manager.set_center_position(position.x, position.z);
        manager.process_chunks(&mut uploader);

        if frame % 60 == 0 {
            info!(
                "Frame {}: center {:?}, {} visible, {:?}",
                frame,
                manager.center(),
                manager.visible_chunks().count(),
                manager.stats()
            );
        }
        std::thread::sleep(FRAME_TIME);
    }

    manager.wait_until_idle(Duration::from_secs(5));
    manager.process_chunks(&mut uploader);
    info!(
        "Done: {} meshes uploaded, {:.1} MiB, final {:?}",
        uploader.meshes,
        uploader.bytes as f64 / (1024.0 * 1024.0),
        manager.stats()
    );

    manager.dispose();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
