// ============================================
// Generation Module - Шум, высоты и цвета terrain
// ============================================

pub mod noise;
pub mod height;
pub mod color;

pub use noise::{random, noise, perlin, fractal_noise};
pub use height::{gen_point, gen_height, sample_terrain, ClimateSample};
pub use color::{shade_triangle, TriangleShade};
