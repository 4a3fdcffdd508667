// ============================================
// Noise Functions - Шумовые функции для генерации
// ============================================
//
// Все функции чистые и детерминированные: одинаковые (позиция, сид)
// всегда дают побитово одинаковый результат. На этом держится
// безопасная перегенерация чанков после выгрузки.

use ultraviolet::Vec2;

use crate::terrain::seed::NoiseSeed;

/// Смещение для второй компоненты градиента Perlin
const GRADIENT_OFFSET: Vec2 = Vec2 { x: 57.0, y: 113.0 };

/// Наибольшее f32 меньше 1.0 (округление f64 -> f32 не должно давать 1.0)
const MAX_UNIT: f32 = 0.999_999_94;

#[inline(always)]
fn fract(v: f64) -> f64 {
    v - v.floor()
}

#[inline(always)]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline(always)]
fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Хеш `fract(sin(dot(p, dot_seed)) * multiplier)`, значение в 0.0..1.0
///
/// Дешёвый некриптографический хеш. Вычисляется в f64, чтобы большие
/// множители не съедали дробную часть.
#[inline(always)]
pub fn random(position: Vec2, seed: &NoiseSeed) -> f32 {
    let dot = position.x as f64 * seed.dot_seed[0] as f64
        + position.y as f64 * seed.dot_seed[1] as f64;
    (fract(dot.sin() * seed.multiplier as f64) as f32).min(MAX_UNIT)
}

/// 2D Value Noise - интерполяция `random` по 4 узлам решётки
#[inline]
pub fn noise(position: Vec2, seed: &NoiseSeed) -> f32 {
    let xi = position.x.floor();
    let yi = position.y.floor();
    let xf = smoothstep(position.x - xi);
    let yf = smoothstep(position.y - yi);

    let n00 = random(Vec2::new(xi, yi), seed);
    let n10 = random(Vec2::new(xi + 1.0, yi), seed);
    let n01 = random(Vec2::new(xi, yi + 1.0), seed);
    let n11 = random(Vec2::new(xi + 1.0, yi + 1.0), seed);

    let nx0 = n00 + xf * (n10 - n00);
    let nx1 = n01 + xf * (n11 - n01);

    nx0 + yf * (nx1 - nx0)
}

#[inline(always)]
fn gradient(corner: Vec2, seed: &NoiseSeed) -> Vec2 {
    Vec2::new(
        random(corner, seed) * 2.0 - 1.0,
        random(corner + GRADIENT_OFFSET, seed) * 2.0 - 1.0,
    )
}

/// 2D Gradient Noise, значение в 0.0..1.0
#[inline]
pub fn perlin(position: Vec2, seed: &NoiseSeed) -> f32 {
    let base = Vec2::new(position.x.floor(), position.y.floor());
    let local = position - base;

    let corner = |dx: f32, dy: f32| {
        let offset = Vec2::new(dx, dy);
        gradient(base + offset, seed).dot(local - offset)
    };

    let g00 = corner(0.0, 0.0);
    let g10 = corner(1.0, 0.0);
    let g01 = corner(0.0, 1.0);
    let g11 = corner(1.0, 1.0);

    let u = smootherstep(local.x);
    let v = smootherstep(local.y);

    let nx0 = g00 + u * (g10 - g00);
    let nx1 = g01 + u * (g11 - g01);
    let value = nx0 + v * (nx1 - nx0);

    (value * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// FBM 2D - сумма октав `noise` с удвоением частоты и половинной амплитудой
#[inline]
pub fn fractal_noise(position: Vec2, octaves: u32, seed: &NoiseSeed) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;

    for _ in 0..octaves {
        value += amplitude * noise(position * frequency, seed);
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value
}
