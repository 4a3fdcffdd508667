// ============================================
// Terrain Vertex - Структура вершины
// ============================================

use ultraviolet::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// RGBA8, упакованный в u32 (r в младшем байте)
    pub color: u32,
    /// [сила блика, блеск] - одинаковые для всех вершин треугольника
    pub lighting: [f32; 2],
}

impl TerrainVertex {
    /// Создать вершину
    pub fn new(position: Vec3, normal: Vec3, color: u32, lighting: [f32; 2]) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            normal: [normal.x, normal.y, normal.z],
            color,
            lighting,
        }
    }

    /// Сырые байты массива вершин для загрузки в GPU буфер
    #[inline]
    pub fn as_bytes(vertices: &[TerrainVertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Упаковать цвет [0..1]^3 в RGBA8 (альфа = 255)
#[inline]
pub fn pack_color(color: [f32; 3]) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    channel(color[0]) | (channel(color[1]) << 8) | (channel(color[2]) << 16) | (255 << 24)
}

/// Обратная операция к `pack_color`
#[inline]
pub fn unpack_color(packed: u32) -> [f32; 3] {
    let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
    [channel(0), channel(8), channel(16)]
}
