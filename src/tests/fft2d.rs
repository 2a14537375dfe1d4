use super::{assert_fields_close, random_field_2d};
use crate::common::wave_function::{read_2d, upload_2d};
use crate::config::{C, F};
use crate::dim2::fft_maker::FftMaker2D;
use crate::traits::fft_maker::FftMaker;
use ndarray::prelude::*;
use ndrustfft::{ndfft_par, FftHandler};

/// Эталонное преобразование через ndrustfft (вдоль обеих осей)
fn reference_fft_2d(arr: &Array2<C>) -> Array2<C> {
    let (h, w) = arr.dim();
    let mut handler0: FftHandler<F> = FftHandler::new(h);
    let mut handler1: FftHandler<F> = FftHandler::new(w);
    let mut tmp: Array2<C> = Array2::zeros((h, w));
    let mut out: Array2<C> = Array2::zeros((h, w));
    ndfft_par(arr, &mut tmp, &mut handler0, 0);
    ndfft_par(&tmp, &mut out, &mut handler1, 1);
    out
}

fn round_trip(height: usize, width: usize, seed: u64) {
    let psi = random_field_2d(height, width, seed);
    let src = upload_2d(&psi);
    let mut freq = src.clone();
    let mut back = src.clone();
    let mut fft = FftMaker2D::new();
    fft.fft(&mut freq, &src).unwrap();
    fft.ifft(&mut back, &freq).unwrap();
    assert_fields_close(&read_2d(&back), &psi, 1e-4);
}

#[test]
fn round_trip_square() {
    round_trip(8, 8, 1);
    round_trip(64, 64, 2);
}

#[test]
fn round_trip_rectangular() {
    round_trip(32, 16, 3);
    round_trip(16, 32, 4);
}

#[test]
fn matches_reference_square() {
    let psi = random_field_2d(16, 16, 5);
    let src = upload_2d(&psi);
    let mut freq = src.clone();
    FftMaker2D::new().fft(&mut freq, &src).unwrap();
    assert_fields_close(&read_2d(&freq), &reference_fft_2d(&psi), 1e-4);
}

#[test]
fn matches_reference_rectangular() {
    let psi = random_field_2d(8, 32, 6);
    let src = upload_2d(&psi);
    let mut freq = src.clone();
    FftMaker2D::new().fft(&mut freq, &src).unwrap();
    assert_fields_close(&read_2d(&freq), &reference_fft_2d(&psi), 1e-4);
}

#[test]
fn linearity() {
    let x = random_field_2d(8, 8, 7);
    let y = random_field_2d(8, 8, 8);
    let a = C::new(0.8, -0.3);
    let b = C::new(-1.2, 0.5);
    let combined: Array2<C> = x.mapv(|v| a * v) + y.mapv(|v| b * v);

    let mut fft = FftMaker2D::new();
    let sx = upload_2d(&x);
    let sy = upload_2d(&y);
    let sc = upload_2d(&combined);
    let mut fx = sx.clone();
    let mut fy = sy.clone();
    let mut fc = sc.clone();
    fft.fft(&mut fx, &sx).unwrap();
    fft.fft(&mut fy, &sy).unwrap();
    fft.fft(&mut fc, &sc).unwrap();

    let expected = read_2d(&fx).mapv(|v| a * v) + read_2d(&fy).mapv(|v| b * v);
    assert_fields_close(&read_2d(&fc), &expected, 1e-4);
}

#[test]
fn parseval() {
    // прямое преобразование без нормировки: sum|X|^2 = N sum|x|^2
    let psi = random_field_2d(16, 32, 9);
    let src = upload_2d(&psi);
    let mut freq = src.clone();
    FftMaker2D::new().fft(&mut freq, &src).unwrap();
    let n = (16 * 32) as F;
    let space: F = psi.iter().map(|z| z.norm_sqr()).sum();
    let momentum: F = read_2d(&freq).iter().map(|z| z.norm_sqr()).sum();
    assert!(
        (momentum - n * space).abs() <= 1e-3 * n * space,
        "parseval violated: {momentum} vs {}",
        n * space
    );
}

#[test]
fn shift_involution() {
    let psi = random_field_2d(16, 8, 10);
    let src = upload_2d(&psi);
    let mut once = src.clone();
    let mut twice = src.clone();
    let mut fft = FftMaker2D::new();
    fft.fftshift(&mut once, &src);
    fft.fftshift(&mut twice, &once);
    assert_fields_close(&read_2d(&twice), &psi, 0.0);
}

#[test]
fn shift_centers_zero_frequency() {
    // постоянное поле: вся энергия в нулевом бине, после сдвига -- в центре
    let psi: Array2<C> = Array2::from_elem((8, 8), C::new(1.0, 0.0));
    let src = upload_2d(&psi);
    let mut freq = src.clone();
    let mut centered = src.clone();
    let mut fft = FftMaker2D::new();
    fft.fft(&mut freq, &src).unwrap();
    fft.fftshift(&mut centered, &freq);
    let out = read_2d(&centered);
    for ((i, j), z) in out.indexed_iter() {
        let expected = if (i, j) == (4, 4) { 64.0 } else { 0.0 };
        assert!(
            (z.norm() - expected).abs() < 1e-3,
            "bin ({i},{j}) = {z}"
        );
    }
}

#[test]
fn transform_length_over_capacity_is_an_error() {
    let psi = random_field_2d(1, 4096, 11);
    let src = upload_2d(&psi);
    let mut freq = src.clone();
    let result = FftMaker2D::new().fft(&mut freq, &src);
    assert!(matches!(result, Err(crate::Error::TwiddleLength { .. })));
}
