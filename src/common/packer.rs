use crate::config::F;
use crate::error::Error;

/// Максимальная длина стороны двумерной поверхности
pub const MAX_SURFACE_SIDE: usize = 10000;

/// Если n -- полный квадрат, возвращает (√n, √n), иначе ближайшую к √n
/// пару делителей (d0 ≥ d1). Перебор линейный: n -- длина сетки, она мала.
pub fn decompose(n: usize) -> (usize, usize) {
    let mut i = 1;
    while i * i < n {
        i += 1;
    }
    while n % i != 0 {
        i -= 1;
    }
    let other = n / i;
    (other.max(i), other.min(i))
}

/// Упаковка трехмерной сетки (w, h, l) в двумерную поверхность:
/// срезы по z выкладываются плиткой wstack x hstack.
/// Фиксируется на все время жизни сетки данного размера.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packing3D {
    pub width: usize,
    pub height: usize,
    pub length: usize,
    pub width2d: usize,
    pub height2d: usize,
}

impl Packing3D {
    pub fn new(width: usize, height: usize, length: usize) -> Result<Self, Error> {
        let (d0, d1) = decompose(length);
        let try0 = (width * d0, height * d1);
        let try1 = (width * d1, height * d0);
        let (width2d, height2d) = if try0.0 < MAX_SURFACE_SIDE && try0.1 < MAX_SURFACE_SIDE {
            try0
        } else if try1.0 < MAX_SURFACE_SIDE && try1.1 < MAX_SURFACE_SIDE {
            try1
        } else {
            return Err(Error::PackingOverflow {
                width,
                height,
                length,
                try0,
                try1,
                max: MAX_SURFACE_SIDE,
            });
        };
        Ok(Self {
            width,
            height,
            length,
            width2d,
            height2d,
        })
    }

    /// Число плиток вдоль стороны поверхности
    fn wstack(&self) -> usize {
        self.width2d / self.width
    }

    /// Координата ячейки (x, y, z) на двумерной поверхности
    pub fn to_2d(&self, x: usize, y: usize, z: usize) -> (usize, usize) {
        let wstack = self.wstack();
        let u = (z % wstack) * self.width + x;
        let v = (z / wstack) * self.height + y;
        (u, v)
    }

    /// Обратное отображение; точный обратный к `to_2d` для любой ячейки
    pub fn to_3d(&self, u: usize, v: usize) -> (usize, usize, usize) {
        let wstack = self.wstack();
        let x = u % self.width;
        let y = v % self.height;
        let z = (v / self.height) * wstack + u / self.width;
        (x, y, z)
    }

    /// Дробные uv-координаты по uvw-координатам объема; шаг плитки 1/d
    pub fn uvw_to_uv(&self, uvw: [F; 3]) -> [F; 2] {
        let wstack = self.wstack();
        let x_index = self.width as F * uvw[0].rem_euclid(1.0);
        let y_index = self.height as F * uvw[1].rem_euclid(1.0);
        let z_index =
            (self.length as F * uvw[2]).floor().rem_euclid(self.length as F) as usize;
        let u_index = (z_index % wstack) as F * self.width as F + x_index;
        let v_index = (z_index / wstack) as F * self.height as F + y_index;
        [u_index / self.width2d as F, v_index / self.height2d as F]
    }

    /// Дробные uvw-координаты объема по uv-координатам поверхности
    pub fn uv_to_uvw(&self, uv: [F; 2]) -> [F; 3] {
        let wstack = self.wstack() as F;
        let hstack = (self.height2d / self.height) as F;
        let u = (uv[0] * wstack).rem_euclid(1.0);
        let v = (uv[1] * hstack).rem_euclid(1.0);
        let w = ((uv[1] * hstack).floor() * wstack + (uv[0] * wstack).floor() + 0.5)
            / self.length as F;
        [u, v, w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_pairs() {
        assert_eq!(decompose(1), (1, 1));
        assert_eq!(decompose(4), (2, 2));
        assert_eq!(decompose(6), (3, 2));
        assert_eq!(decompose(8), (4, 2));
        assert_eq!(decompose(10), (5, 2));
        assert_eq!(decompose(64), (8, 8));
        assert_eq!(decompose(7), (7, 1));
    }

    #[test]
    fn packing_area_invariant() {
        for (w, h, l) in [(4, 4, 6), (8, 8, 8), (16, 16, 10), (8, 16, 4)] {
            let pack = Packing3D::new(w, h, l).unwrap();
            assert_eq!(pack.width2d * pack.height2d, w * h * l);
        }
    }

    #[test]
    fn coordinates_round_trip() {
        for (w, h, l) in [(4, 4, 6), (8, 8, 8), (16, 16, 10), (8, 16, 4)] {
            let pack = Packing3D::new(w, h, l).unwrap();
            for z in 0..l {
                for y in 0..h {
                    for x in 0..w {
                        let (u, v) = pack.to_2d(x, y, z);
                        assert!(u < pack.width2d && v < pack.height2d);
                        assert_eq!(pack.to_3d(u, v), (x, y, z));
                    }
                }
            }
        }
    }

    #[test]
    fn fractional_coordinates_agree_with_integer_maps() {
        // центр ячейки должен попадать в ту же плитку, что и целочисленное
        // отображение, и возвращаться обратно тем же центром
        for (w, h, l) in [(4, 4, 6), (8, 8, 8), (16, 16, 10), (8, 16, 4)] {
            let pack = Packing3D::new(w, h, l).unwrap();
            for z in 0..l {
                for y in 0..h {
                    for x in 0..w {
                        let uvw = [
                            (x as F + 0.5) / w as F,
                            (y as F + 0.5) / h as F,
                            (z as F + 0.5) / l as F,
                        ];
                        let [u, v] = pack.uvw_to_uv(uvw);
                        let (cu, cv) = pack.to_2d(x, y, z);
                        assert_eq!((u * pack.width2d as F).floor() as usize, cu);
                        assert_eq!((v * pack.height2d as F).floor() as usize, cv);
                        let back = pack.uv_to_uvw([u, v]);
                        for (a, b) in back.iter().zip(uvw.iter()) {
                            assert!(
                                (a - b).abs() < 1e-5,
                                "({x},{y},{z}) in {w}x{h}x{l}: {back:?} != {uvw:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn packing_overflow_is_fatal() {
        // 1024*1024 плиток по 1024 не влезают при любом порядке множителей
        let result = Packing3D::new(1024, 1024, 1024);
        assert!(matches!(result, Err(Error::PackingOverflow { .. })));
    }
}
