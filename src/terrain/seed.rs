// ============================================
// Generator Seed - Сиды шумовых слоёв
// ============================================
//
// Сид генератора - неизменяемое значение из четырёх независимых сидов
// шума. Два сида с одинаковыми полями взаимозаменяемы: ChunkManager
// сравнивает их по значению, а не по идентичности.

use serde::{Deserialize, Serialize};

/// Сид одного шумового слоя для хеша `fract(sin(dot(p, dot_seed)) * multiplier)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSeed {
    pub dot_seed: [f32; 2],
    pub multiplier: f32,
}

impl NoiseSeed {
    pub const fn new(dot_x: f32, dot_y: f32, multiplier: f32) -> Self {
        Self { dot_seed: [dot_x, dot_y], multiplier }
    }
}

impl Default for NoiseSeed {
    fn default() -> Self {
        Self::new(12.9898, 78.233, 43758.5453)
    }
}

/// Полный сид генератора terrain
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSeed {
    pub height: NoiseSeed,
    pub humidity: NoiseSeed,
    pub vegetation: NoiseSeed,
    /// Подмыв морского дна
    pub extra: NoiseSeed,
}

impl GeneratorSeed {
    pub const fn new(
        height: NoiseSeed,
        humidity: NoiseSeed,
        vegetation: NoiseSeed,
        extra: NoiseSeed,
    ) -> Self {
        Self { height, humidity, vegetation, extra }
    }

    /// Детерминированно выводит четыре сида из целого числа (SplitMix64)
    pub fn from_u64(seed: u64) -> Self {
        let mut state = seed;
        let mut layer = || {
            let dot_x = unit_f32(splitmix64(&mut state)) * 90.0 + 10.0;
            let dot_y = unit_f32(splitmix64(&mut state)) * 90.0 + 10.0;
            let multiplier = unit_f32(splitmix64(&mut state)) * 40000.0 + 20000.0;
            NoiseSeed::new(dot_x, dot_y, multiplier)
        };
        let height = layer();
        let humidity = layer();
        let vegetation = layer();
        let extra = layer();
        Self { height, humidity, vegetation, extra }
    }
}

impl Default for GeneratorSeed {
    fn default() -> Self {
        Self::new(
            NoiseSeed::default(),
            NoiseSeed::new(39.3468, 11.1355, 24634.6345),
            NoiseSeed::new(73.1568, 52.2350, 31421.7723),
            NoiseSeed::new(26.6513, 91.7749, 53758.1237),
        )
    }
}

#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Старшие 24 бита -> [0, 1)
#[inline]
fn unit_f32(bits: u64) -> f32 {
    (bits >> 40) as f32 / (1u64 << 24) as f32
}
