use super::{assert_fields_close, random_field_3d};
use crate::common::wave_function::{read_3d, upload_3d};
use crate::config::{C, F};
use crate::dim3::fft_maker::FftMaker3D;
use crate::traits::fft_maker::FftMaker;
use ndarray::prelude::*;
use ndrustfft::{ndfft_par, FftHandler};

/// Эталонное преобразование через ndrustfft (вдоль всех трех осей)
fn reference_fft_3d(arr: &Array3<C>) -> Array3<C> {
    let (l, h, w) = arr.dim();
    let mut handlers: [FftHandler<F>; 3] =
        [FftHandler::new(l), FftHandler::new(h), FftHandler::new(w)];
    let mut tmp: Array3<C> = Array3::zeros((l, h, w));
    let mut out: Array3<C> = arr.clone();
    for (axis, handler) in handlers.iter_mut().enumerate() {
        ndfft_par(&out, &mut tmp, handler, axis);
        std::mem::swap(&mut out, &mut tmp);
    }
    out
}

fn round_trip(grid: [usize; 3], seed: u64) {
    let [w, h, l] = grid;
    let psi = random_field_3d(l, h, w, seed);
    let mut fft = FftMaker3D::new(grid).unwrap();
    let pack = fft.packing();
    let src = upload_3d(&psi, &pack);
    let mut freq = src.clone();
    let mut back = src.clone();
    fft.fft(&mut freq, &src).unwrap();
    fft.ifft(&mut back, &freq).unwrap();
    assert_fields_close(&read_3d(&back, &pack), &psi, 1e-4);
}

#[test]
fn round_trip_cube() {
    round_trip([8, 8, 8], 21);
    round_trip([16, 16, 16], 22);
}

#[test]
fn round_trip_mixed_axes() {
    round_trip([8, 16, 4], 23);
    round_trip([4, 4, 16], 24);
}

#[test]
fn matches_reference_cube() {
    let psi = random_field_3d(8, 8, 8, 25);
    let mut fft = FftMaker3D::new([8, 8, 8]).unwrap();
    let pack = fft.packing();
    let src = upload_3d(&psi, &pack);
    let mut freq = src.clone();
    fft.fft(&mut freq, &src).unwrap();
    assert_fields_close(&read_3d(&freq, &pack), &reference_fft_3d(&psi), 1e-4);
}

#[test]
fn matches_reference_mixed_axes() {
    let psi = random_field_3d(4, 16, 8, 26);
    let mut fft = FftMaker3D::new([8, 16, 4]).unwrap();
    let pack = fft.packing();
    let src = upload_3d(&psi, &pack);
    let mut freq = src.clone();
    fft.fft(&mut freq, &src).unwrap();
    assert_fields_close(&read_3d(&freq, &pack), &reference_fft_3d(&psi), 1e-4);
}

#[test]
fn shift_involution() {
    let psi = random_field_3d(4, 8, 8, 27);
    let mut fft = FftMaker3D::new([8, 8, 4]).unwrap();
    let pack = fft.packing();
    let src = upload_3d(&psi, &pack);
    let mut once = src.clone();
    let mut twice = src.clone();
    fft.fftshift(&mut once, &src);
    fft.fftshift(&mut twice, &once);
    assert_fields_close(&read_3d(&twice, &pack), &psi, 0.0);
}

#[test]
fn inverse_scaling_compounds_over_axes() {
    // постоянное поле: прямое дает N в нулевом бине,
    // обратное от дельты возвращает константу 1
    let psi: Array3<C> = Array3::from_elem((4, 8, 8), C::new(1.0, 0.0));
    let mut fft = FftMaker3D::new([8, 8, 4]).unwrap();
    let pack = fft.packing();
    let src = upload_3d(&psi, &pack);
    let mut freq = src.clone();
    fft.fft(&mut freq, &src).unwrap();
    let spectrum = read_3d(&freq, &pack);
    let n = (8 * 8 * 4) as F;
    assert!((spectrum[[0, 0, 0]].re - n).abs() < 1e-2);
    let mut back = src.clone();
    fft.ifft(&mut back, &freq).unwrap();
    assert_fields_close(&read_3d(&back, &pack), &psi, 1e-4);
}
