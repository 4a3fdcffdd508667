// ============================================
// Terrain Errors - Ошибки конфигурации и API
// ============================================

use std::fmt;

/// Ошибки стриминга terrain
///
/// Генерация чанков не может завершиться ошибкой, поэтому здесь только
/// нарушения предусловий на границе API и ошибки загрузки конфигурации.
#[derive(Debug)]
pub enum TerrainError {
    /// Радиус отрисовки должен быть > 0
    InvalidRenderRadius(i32),
    /// Некорректное значение в конфигурации
    InvalidConfig(String),
    Io(std::io::Error),
    Parse(String),
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::InvalidRenderRadius(r) => {
                write!(f, "chunk render radius must be > 0, got {}", r)
            }
            TerrainError::InvalidConfig(msg) => write!(f, "invalid terrain config: {}", msg),
            TerrainError::Io(e) => write!(f, "io error: {}", e),
            TerrainError::Parse(msg) => write!(f, "failed to parse terrain config: {}", msg),
        }
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TerrainError {
    fn from(e: std::io::Error) -> Self {
        TerrainError::Io(e)
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(e: serde_json::Error) -> Self {
        TerrainError::Parse(e.to_string())
    }
}
