// ============================================
// Terrain Config - Настройки стриминга из JSON
// ============================================
//
// Пример:
//
//   {
//     "render_radius": 8,
//     "extra_loaded_radius": 3,
//     "chunk_size": 32,
//     "worker_threads": 4,
//     "seed": 1337
//   }
//
// Отсутствующие поля берутся по умолчанию.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::terrain::mesh::{DEFAULT_CHUNK_SIZE, DEFAULT_POOL_CAPACITY};
use crate::terrain::seed::GeneratorSeed;

/// Запас загрузки за радиусом отрисовки по умолчанию (скрывает появление чанков)
pub const DEFAULT_EXTRA_LOADED_RADIUS: i32 = 3;
pub const DEFAULT_RENDER_RADIUS: i32 = 6;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Видимый радиус в чанках (> 0)
    pub render_radius: i32,
    /// Дополнительный радиус загрузки
    pub extra_loaded_radius: i32,
    /// Сторона чанка в мировых единицах
    pub chunk_size: i32,
    /// Плотность вершин: ячеек сетки на мировую единицу
    pub cells_per_unit: u32,
    /// `None` - все ядра, кроме одного
    pub worker_threads: Option<usize>,
    /// Свободных буферов в каждом пуле генератора
    pub pool_capacity: usize,
    pub seed: u64,
    /// Явный сид; перекрывает `seed`
    pub generator_seed: Option<GeneratorSeed>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            render_radius: DEFAULT_RENDER_RADIUS,
            extra_loaded_radius: DEFAULT_EXTRA_LOADED_RADIUS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cells_per_unit: 1,
            worker_threads: None,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            seed: DEFAULT_SEED,
            generator_seed: None,
        }
    }
}

impl TerrainConfig {
    /// Загрузить настройки из JSON строки
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        let config: TerrainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Загрузить настройки из файла
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TerrainError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.render_radius <= 0 {
            return Err(TerrainError::InvalidRenderRadius(self.render_radius));
        }
        if self.extra_loaded_radius < 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "extra_loaded_radius must be >= 0, got {}",
                self.extra_loaded_radius
            )));
        }
        if self.chunk_size <= 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk_size must be > 0, got {}",
                self.chunk_size
            )));
        }
        if self.cells_per_unit == 0 {
            return Err(TerrainError::InvalidConfig("cells_per_unit must be > 0".into()));
        }
        Ok(())
    }

    /// Итоговый сид генерации
    pub fn generator_seed(&self) -> GeneratorSeed {
        self.generator_seed
            .unwrap_or_else(|| GeneratorSeed::from_u64(self.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = TerrainConfig::from_json_str(r#"{ "render_radius": 9 }"#).unwrap();
        assert_eq!(config.render_radius, 9);
        assert_eq!(config.extra_loaded_radius, DEFAULT_EXTRA_LOADED_RADIUS);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.worker_threads, None);
        assert_eq!(config.generator_seed(), GeneratorSeed::from_u64(DEFAULT_SEED));
    }

    #[test]
    fn test_explicit_generator_seed_wins() {
        let mut config = TerrainConfig { seed: 1, ..Default::default() };
        config.generator_seed = Some(GeneratorSeed::from_u64(2));
        assert_eq!(config.generator_seed(), GeneratorSeed::from_u64(2));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = TerrainConfig::from_json_str(r#"{ "render_radius": 0 }"#).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidRenderRadius(0)));

        let err = TerrainConfig::from_json_str(r#"{ "chunk_size": -4 }"#).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidConfig(_)));

        let err = TerrainConfig::from_json_str(r#"{ "cells_per_unit": 0 }"#).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidConfig(_)));

        let err = TerrainConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TerrainError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = TerrainConfig::load("/definitely/not/here/terrain.json").unwrap_err();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
