use super::{c_from, c_into, CellKernel, Frag, PassInputs};
use crate::common::packer::Packing3D;
use crate::common::surface::ComputeSurface;
use crate::config::{C, F};

/// Разворот битов индекса i для длины n (n -- степень двойки)
#[inline]
pub fn reverse_bits(i: usize, n: usize) -> usize {
    let mut u = 1;
    let mut d = n >> 1;
    let mut rev = 0;
    while u < n {
        rev += d * ((i & u) / u);
        u <<= 1;
        d >>= 1;
    }
    rev
}

/// Индексы пары бабочки для позиции i при текущем размере блока:
/// (индекс четного элемента, индекс нечетного, номер поворотного
/// множителя в блоке, знак вклада нечетного элемента).
#[inline]
fn butterfly_pair(i: usize, block_size: usize) -> (usize, usize, usize, F) {
    let half = block_size / 2;
    let j = i % block_size;
    if j < half {
        (i, i + half, j, 1.0)
    } else {
        (i - half, i, j - half, -1.0)
    }
}

/// Поворотный множитель для номера k в блоке block_size при полной длине n:
/// косинус из таблицы, синус -- из нее же сдвигом на четверть периода.
#[inline]
fn twiddle(table: &ComputeSurface, k: usize, block_size: usize, n: usize, angle_sign: F) -> C {
    let t = k * (n / block_size);
    let cos_val = table.fetch(t as isize, 0)[0];
    // при n = 2 единственный угол нулевой, сдвиг на четверть вырождается
    let sin_val = if n < 4 {
        0.0
    } else if t < n / 4 {
        -table.fetch((t + n / 4) as isize, 0)[0]
    } else {
        table.fetch((t - n / 4) as isize, 0)[0]
    };
    C::new(cos_val, angle_sign * sin_val)
}

/// Одна стадия бабочки вдоль одного индекса; общая для всех ядер
#[inline]
fn butterfly_1d(
    table: &ComputeSurface,
    fetch: impl Fn(usize) -> C,
    i: usize,
    block_size: usize,
    n: usize,
    angle_sign: F,
    scale: F,
) -> C {
    let (even_i, odd_i, k, sign) = butterfly_pair(i, block_size);
    let w = twiddle(table, k, block_size, n, angle_sign);
    let even = fetch(even_i);
    let odd = fetch(odd_i);
    scale * (even + sign * w * odd)
}

/// Разворот битов по обеим осям за один проход (2D)
pub struct RevBitSortKernel2D;

impl CellKernel for RevBitSortKernel2D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let x = reverse_bits(frag.x, frag.width);
        let y = reverse_bits(frag.y, frag.height);
        src.fetch(x as isize, y as isize)
    }
}

/// Стадия бабочки вдоль одной оси двумерного поля
pub struct FftIterKernel2D {
    /// 0 -- вдоль ширины, 1 -- вдоль высоты
    pub axis: usize,
    pub block_size: usize,
    pub size: usize,
    pub angle_sign: F,
    pub scale: F,
}

impl CellKernel for FftIterKernel2D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let table = inputs.get("cos_table");
        let i = if self.axis == 0 { frag.x } else { frag.y };
        let fetch = |j: usize| {
            if self.axis == 0 {
                c_from(src.fetch(j as isize, frag.y as isize))
            } else {
                c_from(src.fetch(frag.x as isize, j as isize))
            }
        };
        c_into(butterfly_1d(
            table,
            fetch,
            i,
            self.block_size,
            self.size,
            self.angle_sign,
            self.scale,
        ))
    }
}

/// Слитая стадия бабочки квадратного поля: обе оси за один проход,
/// вдвое меньше проходов, чем при последовательной обработке осей
pub struct FftIterSquareKernel2D {
    pub block_size: usize,
    pub size: usize,
    pub angle_sign: F,
    pub scale: F,
}

impl CellKernel for FftIterSquareKernel2D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let table = inputs.get("cos_table");
        let n = self.size;
        let (ex, ox, kx, sx) = butterfly_pair(frag.x, self.block_size);
        let (ey, oy, ky, sy) = butterfly_pair(frag.y, self.block_size);
        let wx = twiddle(table, kx, self.block_size, n, self.angle_sign);
        let wy = twiddle(table, ky, self.block_size, n, self.angle_sign);
        let at = |x: usize, y: usize| c_from(src.fetch(x as isize, y as isize));
        // разделимость: сначала бабочка по x на обеих строках пары,
        // затем бабочка по y; масштаб применяется на каждую ось
        let row_e = self.scale * (at(ex, ey) + sx * wx * at(ox, ey));
        let row_o = self.scale * (at(ex, oy) + sx * wx * at(ox, oy));
        c_into(self.scale * (row_e + sy * wy * row_o))
    }
}

/// Обмен квадрантов: нулевая частота в центр (чистая переиндексация)
pub struct FftShiftKernel2D;

impl CellKernel for FftShiftKernel2D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let x = (frag.x + frag.width / 2) % frag.width;
        let y = (frag.y + frag.height / 2) % frag.height;
        src.fetch(x as isize, y as isize)
    }
}

/// Разворот битов по всем трем осям упакованного объема за один проход
pub struct RevBitSortKernel3D {
    pub pack: Packing3D,
}

impl CellKernel for RevBitSortKernel3D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let (x, y, z) = self.pack.to_3d(frag.x, frag.y);
        let (u, v) = self.pack.to_2d(
            reverse_bits(x, self.pack.width),
            reverse_bits(y, self.pack.height),
            reverse_bits(z, self.pack.length),
        );
        src.fetch(u as isize, v as isize)
    }
}

/// Стадия бабочки вдоль одной оси упакованного трехмерного поля
pub struct FftIterKernel3D {
    pub pack: Packing3D,
    /// ось объема: 0, 1 или 2
    pub axis: usize,
    pub block_size: usize,
    pub size: usize,
    pub angle_sign: F,
    pub scale: F,
}

impl CellKernel for FftIterKernel3D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let table = inputs.get("cos_table");
        let (x, y, z) = self.pack.to_3d(frag.x, frag.y);
        let i = [x, y, z][self.axis];
        let fetch = |j: usize| {
            let mut xyz = [x, y, z];
            xyz[self.axis] = j;
            let (u, v) = self.pack.to_2d(xyz[0], xyz[1], xyz[2]);
            c_from(src.fetch(u as isize, v as isize))
        };
        c_into(butterfly_1d(
            table,
            fetch,
            i,
            self.block_size,
            self.size,
            self.angle_sign,
            self.scale,
        ))
    }
}

/// Слитая стадия бабочки кубического поля: все три оси за один проход
pub struct FftIterCubeKernel3D {
    pub pack: Packing3D,
    pub block_size: usize,
    pub size: usize,
    pub angle_sign: F,
    pub scale: F,
}

impl CellKernel for FftIterCubeKernel3D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let table = inputs.get("cos_table");
        let n = self.size;
        let (x, y, z) = self.pack.to_3d(frag.x, frag.y);
        let (ex, ox, kx, sx) = butterfly_pair(x, self.block_size);
        let (ey, oy, ky, sy) = butterfly_pair(y, self.block_size);
        let (ez, oz, kz, sz) = butterfly_pair(z, self.block_size);
        let wx = twiddle(table, kx, self.block_size, n, self.angle_sign);
        let wy = twiddle(table, ky, self.block_size, n, self.angle_sign);
        let wz = twiddle(table, kz, self.block_size, n, self.angle_sign);
        let at = |x: usize, y: usize, z: usize| {
            let (u, v) = self.pack.to_2d(x, y, z);
            c_from(src.fetch(u as isize, v as isize))
        };
        // разделимость по осям: x, затем y, затем z;
        // масштаб применяется на каждую ось
        let plane = |zi: usize| {
            let row_e = self.scale * (at(ex, ey, zi) + sx * wx * at(ox, ey, zi));
            let row_o = self.scale * (at(ex, oy, zi) + sx * wx * at(ox, oy, zi));
            self.scale * (row_e + sy * wy * row_o)
        };
        c_into(self.scale * (plane(ez) + sz * wz * plane(oz)))
    }
}

/// Обмен октантов упакованного объема
pub struct FftShiftKernel3D {
    pub pack: Packing3D,
}

impl CellKernel for FftShiftKernel3D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let src = inputs.get("tex");
        let (x, y, z) = self.pack.to_3d(frag.x, frag.y);
        let (u, v) = self.pack.to_2d(
            (x + self.pack.width / 2) % self.pack.width,
            (y + self.pack.height / 2) % self.pack.height,
            (z + self.pack.length / 2) % self.pack.length,
        );
        src.fetch(u as isize, v as isize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_reversal_involution() {
        for n in [2, 8, 16, 64] {
            for i in 0..n {
                assert!(reverse_bits(i, n) < n);
                assert_eq!(reverse_bits(reverse_bits(i, n), n), i);
            }
        }
        assert_eq!(reverse_bits(1, 8), 4);
        assert_eq!(reverse_bits(3, 8), 6);
        assert_eq!(reverse_bits(6, 16), 6);
    }
}
