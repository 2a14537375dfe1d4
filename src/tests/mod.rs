mod fft2d;
mod fft3d;

use crate::config::{C, F};
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Случайное комплексное поле с воспроизводимым зерном
pub fn random_field_2d(height: usize, width: usize, seed: u64) -> Array2<C> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((height, width), |_| {
        C::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    })
}

/// Случайное комплексное поле (оси: z, y, x)
pub fn random_field_3d(length: usize, height: usize, width: usize, seed: u64) -> Array3<C> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn((length, height, width), |_| {
        C::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    })
}

/// Покомпонентное сравнение с допуском, отнесенным к максимуму модуля
pub fn assert_fields_close<D: Dimension>(a: &Array<C, D>, b: &Array<C, D>, tol: F) {
    assert_eq!(a.dim(), b.dim());
    let scale = a
        .iter()
        .map(|z| z.norm())
        .fold(1.0 as F, F::max);
    for (za, zb) in a.iter().zip(b.iter()) {
        assert!(
            (za - zb).norm() <= tol * scale,
            "fields differ: {za} vs {zb} (tol {tol}, scale {scale})"
        );
    }
}
