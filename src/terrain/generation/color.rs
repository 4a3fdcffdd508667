// ============================================
// Terrain Colors - Цвета по высоте и климату
// ============================================
//
// Цвет выбирается по высоте треугольника (основной признак), затем
// смешивается по влажности/растительности и крутизне склона.
// Коэффициенты смешивания квантуются грубыми шагами, чтобы соседние
// треугольники не давали полосатость.
//
// Пороги и формулы - художественные параметры, а не протокол.

use ultraviolet::Vec3;

use super::height::ClimateSample;

/// Верхняя граница пляжа
pub const BEACH_TOP: f32 = 9.0;
/// Нижняя граница снега/скал (без учёта растительности)
pub const GRASS_TOP_BASE: f32 = 70.0;
const GRASS_TOP_VEGETATION: f32 = 25.0;
/// Глубина, на которой дно полностью темнеет
const OCEAN_DARK_DEPTH: f32 = 30.0;

const OCEAN_FLOOR: [f32; 3] = [0.32, 0.30, 0.22];
const WET_SAND: [f32; 3] = [0.62, 0.55, 0.38];
const DRY_SAND: [f32; 3] = [0.86, 0.79, 0.58];
const DRY_GRASS: [f32; 3] = [0.56, 0.58, 0.28];
const LUSH_GRASS: [f32; 3] = [0.20, 0.46, 0.16];
const ROCK: [f32; 3] = [0.45, 0.42, 0.40];
const SNOW: [f32; 3] = [0.94, 0.95, 0.97];

/// Склоны круче этого (normal.y меньше) начинают становиться скалой
const GRASS_SLOPE: f32 = 0.78;
const SNOW_SLOPE: f32 = 0.8;

/// Цвет и параметры освещения треугольника
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleShade {
    pub color: [f32; 3],
    /// [сила блика, блеск]
    pub lighting: [f32; 2],
}

#[inline(always)]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let s = 1.0 - t;
    [a[0] * s + b[0] * t, a[1] * s + b[1] * t, a[2] * s + b[2] * t]
}

/// Округление коэффициента до шага 1/steps
#[inline(always)]
pub fn quantize(t: f32, steps: f32) -> f32 {
    (t.clamp(0.0, 1.0) * steps).round() / steps
}

/// Граница травы для данной растительности
#[inline]
pub fn grass_top(climate: &ClimateSample) -> f32 {
    GRASS_TOP_BASE + GRASS_TOP_VEGETATION * climate.vegetation
}

/// Цвет треугольника по высоте центроида, нормали и климату
pub fn shade_triangle(altitude: f32, normal: Vec3, climate: &ClimateSample) -> TriangleShade {
    if altitude < 0.0 {
        // Дно: чем глубже, тем темнее
        let depth = quantize(-altitude / OCEAN_DARK_DEPTH, 4.0);
        return TriangleShade {
            color: lerp3(WET_SAND, OCEAN_FLOOR, depth),
            lighting: [0.1, 8.0],
        };
    }

    if altitude < BEACH_TOP {
        // Пляж: мокрый песок у воды, влажность расширяет мокрую полосу
        let wet = quantize((1.0 - altitude / BEACH_TOP) * (0.5 + climate.humidity), 4.0);
        return TriangleShade {
            color: lerp3(DRY_SAND, WET_SAND, wet),
            lighting: [0.1 + 0.4 * wet, 16.0],
        };
    }

    let top = grass_top(climate);
    if altitude < top {
        let lush = quantize(climate.humidity * 0.6 + climate.vegetation * 0.4, 6.0);
        let grass = lerp3(DRY_GRASS, LUSH_GRASS, lush);
        let steep = quantize((GRASS_SLOPE - normal.y) / (GRASS_SLOPE - 0.45), 3.0);
        return TriangleShade {
            color: lerp3(grass, ROCK, steep),
            lighting: [0.05 + 0.1 * steep, 4.0],
        };
    }

    // Выше травы: снег на пологих местах, скала на склонах
    let cover = quantize((normal.y - SNOW_SLOPE) / (1.0 - SNOW_SLOPE) * (0.6 + climate.humidity), 3.0);
    TriangleShade {
        color: lerp3(ROCK, SNOW, cover),
        lighting: [0.15 + 0.35 * cover, 8.0 + 24.0 * cover],
    }
}
