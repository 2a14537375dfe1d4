use crate::common::packer::Packing3D;
use crate::common::surface::{ComputeSurface, SurfaceFormat, SurfaceParams};
use crate::config::{C, F};
use ndarray::prelude::*;

/// Параметры поверхности комплексного поля: канал 0 -- действительная
/// часть, канал 1 -- мнимая
pub fn complex_field_params(width: usize, height: usize) -> SurfaceParams {
    SurfaceParams::new(SurfaceFormat::RG32F, width, height)
}

/// Загружает двумерную волновую функцию в поверхность;
/// ось 0 массива -- высота (y), ось 1 -- ширина (x)
pub fn upload_2d(psi: &Array2<C>) -> ComputeSurface {
    let (h, w) = psi.dim();
    let mut raw: Vec<F> = Vec::with_capacity(2 * w * h);
    for z in psi.iter() {
        raw.push(z.re);
        raw.push(z.im);
    }
    let mut surface = ComputeSurface::new(complex_field_params(w, h));
    surface.upload(&raw);
    surface
}

/// Читает двумерную волновую функцию из поверхности
pub fn read_2d(surface: &ComputeSurface) -> Array2<C> {
    assert_eq!(surface.channels(), 2, "complex field must have 2 channels");
    let (w, h) = (surface.width(), surface.height());
    let raw = surface.read();
    Array2::from_shape_fn((h, w), |(i, j)| {
        let base = 2 * (i * w + j);
        C::new(raw[base], raw[base + 1])
    })
}

/// Загружает трехмерную волновую функцию (оси: z, y, x) в поверхность
/// согласно упаковке
pub fn upload_3d(psi: &Array3<C>, pack: &Packing3D) -> ComputeSurface {
    let (l, h, w) = psi.dim();
    assert_eq!(
        (w, h, l),
        (pack.width, pack.height, pack.length),
        "wave function shape does not match the packing"
    );
    let mut raw: Vec<F> = vec![0.0; 2 * pack.width2d * pack.height2d];
    for ((z, y, x), value) in psi.indexed_iter() {
        let (u, v) = pack.to_2d(x, y, z);
        let base = 2 * (v * pack.width2d + u);
        raw[base] = value.re;
        raw[base + 1] = value.im;
    }
    let mut surface = ComputeSurface::new(complex_field_params(pack.width2d, pack.height2d));
    surface.upload(&raw);
    surface
}

/// Читает трехмерную волновую функцию из упакованной поверхности
pub fn read_3d(surface: &ComputeSurface, pack: &Packing3D) -> Array3<C> {
    assert_eq!(surface.channels(), 2, "complex field must have 2 channels");
    assert_eq!(
        (surface.width(), surface.height()),
        (pack.width2d, pack.height2d),
        "surface shape does not match the packing"
    );
    let raw = surface.read();
    Array3::from_shape_fn((pack.length, pack.height, pack.width), |(z, y, x)| {
        let (u, v) = pack.to_2d(x, y, z);
        let base = 2 * (v * pack.width2d + u);
        C::new(raw[base], raw[base + 1])
    })
}
