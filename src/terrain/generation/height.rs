// ============================================
// Height Map - Генерация карты высот и климата
// ============================================
//
// Высота = крупный 12-октавный рельеф со смещением к уровню моря.
// Над водой добавляются гребни и эрозия (их вклад растёт с высотой),
// под водой - подмыв дна, пропорциональный глубине.

use ultraviolet::Vec2;

use crate::terrain::seed::GeneratorSeed;
use super::noise::{fractal_noise, noise, perlin};

/// Масштаб климатического шума влажности (крупные пятна)
const HUMIDITY_SCALE: f32 = 0.0015;
const HUMIDITY_OCTAVES: u32 = 9;
const VEGETATION_SCALE: f32 = 0.011;

const BASE_SCALE: f32 = 0.0011;
const BASE_OCTAVES: u32 = 12;
/// Смещение базового шума: значения ниже уходят под воду
const SEA_BIAS: f32 = 0.47;
const HEIGHT_RANGE: f32 = 320.0;

const RIDGE_SCALE: f32 = 0.0045;
const ROUGH_SCALE: f32 = 0.021;
const ROUGH_OCTAVES: u32 = 5;
const RIDGE_HEIGHT: f32 = 55.0;
const ROUGH_HEIGHT: f32 = 12.0;
/// Высота, на которой детализация гор достигает полной силы
const DETAIL_FULL_ALTITUDE: f32 = 45.0;

const EROSION_SCALE: f32 = 0.0062;
const EROSION_OCTAVES: u32 = 6;
const EROSION_STRENGTH: f32 = 0.8;

/// Климатические данные точки
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    /// Влажность - крупномасштабный фрактальный шум
    pub humidity: f32,
    /// Растительность - одна октава шума
    pub vegetation: f32,
}

/// Климат в мировой точке (x, z)
#[inline]
pub fn gen_point(position: Vec2, seed: &GeneratorSeed) -> ClimateSample {
    let humidity = fractal_noise(position * HUMIDITY_SCALE, HUMIDITY_OCTAVES, &seed.humidity);
    let vegetation = noise(position * VEGETATION_SCALE, &seed.vegetation);
    ClimateSample { humidity, vegetation }
}

/// Высота terrain в мировой точке (x, z). Уровень моря = 0.
#[inline]
pub fn gen_height(position: Vec2, seed: &GeneratorSeed, climate: &ClimateSample) -> f32 {
    let base = fractal_noise(position * BASE_SCALE, BASE_OCTAVES, &seed.height);
    let mut height = (base - SEA_BIAS) * HEIGHT_RANGE;

    if height > 0.0 {
        // Квадратичный ease-in: у берега гор нет
        let t = (height / DETAIL_FULL_ALTITUDE).clamp(0.0, 1.0);
        let ease = t * t;

        let ridge = 1.0 - (perlin(position * RIDGE_SCALE, &seed.height) * 2.0 - 1.0).abs();
        let rough = fractal_noise(position * ROUGH_SCALE, ROUGH_OCTAVES, &seed.height);

        // Растительность сглаживает гребни и добавляет мелкие холмы
        let veg = climate.vegetation;
        let detail = ridge * ridge * RIDGE_HEIGHT * (1.0 - 0.6 * veg) + rough * ROUGH_HEIGHT * veg;
        height += ease * detail;
    } else {
        let erosion = fractal_noise(position * EROSION_SCALE, EROSION_OCTAVES, &seed.extra);
        let sharp = (erosion * 1.6).powi(8).min(1.0);
        height -= sharp * (-height) * EROSION_STRENGTH;
    }

    height
}

/// Климат и высота одной точки
#[inline]
pub fn sample_terrain(position: Vec2, seed: &GeneratorSeed) -> (f32, ClimateSample) {
    let climate = gen_point(position, seed);
    (gen_height(position, seed, &climate), climate)
}
