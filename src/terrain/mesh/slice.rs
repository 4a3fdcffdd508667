// ============================================
// Water Slicing - Разрезание треугольников плоскостью воды
// ============================================
//
// Плоскость воды - Y = 0. Треугольник, пересекающий её, режется по
// двум рёбрам, идущим от "одинокой" вершины. Точки разреза получают
// Y ровно 0.0 (а не почти 0), иначе шов между надводной и подводной
// частью даёт щели.
//
// Обход вершин (winding) сохраняется во всех кусках.

use ultraviolet::Vec3;

/// Треугольник в мировых координатах
pub type Triangle = [Vec3; 3];

/// Результат разрезания: надводные, подводные треугольники и
/// плоская поверхность воды над подводной частью
#[derive(Debug, Default)]
pub struct SlicedMesh {
    pub above: Vec<Triangle>,
    pub below: Vec<Triangle>,
    pub water: Vec<Triangle>,
}

impl SlicedMesh {
    /// Собрать из готовых (например, взятых из пула) буферов
    pub fn from_buffers(
        mut above: Vec<Triangle>,
        mut below: Vec<Triangle>,
        mut water: Vec<Triangle>,
    ) -> Self {
        above.clear();
        below.clear();
        water.clear();
        Self { above, below, water }
    }

    /// Разрезать треугольник и разложить куски по буферам
    pub fn push(&mut self, tri: Triangle) {
        slice_triangle(tri, &mut self.above, &mut self.below, &mut self.water);
    }
}

#[inline(always)]
fn flatten(tri: Triangle) -> Triangle {
    tri.map(|v| Vec3::new(v.x, 0.0, v.z))
}

/// Точка на ребре a-b, где Y проходит через 0
#[inline(always)]
fn water_crossing(a: Vec3, b: Vec3) -> Vec3 {
    let t = a.y / (a.y - b.y);
    let mut p = a + (b - a) * t;
    p.y = 0.0;
    p
}

/// Разрезать треугольник плоскостью Y = 0
///
/// Вершина с Y >= 0 считается надводной.
pub fn slice_triangle(
    tri: Triangle,
    above: &mut Vec<Triangle>,
    below: &mut Vec<Triangle>,
    water: &mut Vec<Triangle>,
) {
    let is_above = [tri[0].y >= 0.0, tri[1].y >= 0.0, tri[2].y >= 0.0];
    let above_count = is_above.iter().filter(|&&a| a).count();

    match above_count {
        3 => above.push(tri),
        0 => {
            below.push(tri);
            water.push(flatten(tri));
        }
        _ => {
            // Одинокая вершина - та, что в меньшинстве
            let lone_is_above = above_count == 1;
            let lone = is_above.iter().position(|&a| a == lone_is_above).unwrap_or(0);

            // Циклический сдвиг сохраняет обход
            let a = tri[lone];
            let b = tri[(lone + 1) % 3];
            let c = tri[(lone + 2) % 3];

            let ab = water_crossing(a, b);
            let ac = water_crossing(a, c);

            let tip = [a, ab, ac];
            let quad = [[ab, b, c], [ab, c, ac]];

            if lone_is_above {
                above.push(tip);
                below.extend_from_slice(&quad);
                water.push(flatten(quad[0]));
                water.push(flatten(quad[1]));
            } else {
                below.push(tip);
                above.extend_from_slice(&quad);
                water.push(flatten(tip));
            }
        }
    }
}
