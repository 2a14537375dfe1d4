use ndarray::prelude::*;
use splitsurf::common::params::SimulationParameters;
use splitsurf::common::reduce::Reducer;
use splitsurf::common::surface::ComputeSurface;
use splitsurf::common::wave_function::{complex_field_params, upload_2d};
use splitsurf::config::{C, F};
use splitsurf::dim2::ssfm::SSFM2D;
use splitsurf::traits::ssfm::SSFM;
use splitsurf::{measure_time, print_and_log};
use std::time::Instant;

fn main() {
    // префикс для сохранения
    let out_prefix = "out/dim2";

    // параметры расчетной области
    let n: usize = 64;
    let length: F = 16.0;
    let dx = length / n as F;
    let cell_volume = dx * dx;
    let coord = |idx: usize| (idx as F - n as F / 2.0) * dx;

    // гармонический потенциал V = w^2 r^2 / 2
    let omega: F = 1.0;
    let mut potential = ComputeSurface::new(complex_field_params(n, n));
    let mut v_raw: Vec<F> = vec![0.0; 2 * n * n];
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (coord(j), coord(i));
            v_raw[2 * (i * n + j)] = 0.5 * omega * omega * (x * x + y * y);
        }
    }
    potential.upload(&v_raw);

    // начальная волновая функция: смещенный гауссов пакет
    let sigma: F = 1.0;
    let x0: F = 2.0;
    let psi0: Array2<C> = Array2::from_shape_fn((n, n), |(i, j)| {
        let (x, y) = (coord(j) - x0, coord(i));
        C::new((-(x * x + y * y) / (2.0 * sigma * sigma)).exp(), 0.0)
    });

    let mut psi_i = upload_2d(&psi0);
    let mut psi_f = psi_i.clone();

    let mut ssfm = SSFM2D::new();
    let mut reducer = Reducer::new();
    reducer.normalize(&mut psi_i, cell_volume);

    //============================================================
    //          релаксация в мнимом времени к основному состоянию
    //============================================================
    let mut params = SimulationParameters::<2>::new(
        1.0,
        C::new(1.0, 0.0),
        C::new(0.0, -0.05),
        [length, length],
        [n, n],
    );
    let relax_steps = 200;
    let total_time = Instant::now();
    measure_time!("relaxation", {
        for _ in 0..relax_steps {
            ssfm.time_step_evol(&mut psi_f, &mut psi_i, None, &potential, &params, None)
                .unwrap();
            std::mem::swap(&mut psi_i, &mut psi_f);
            // мнимое время не унитарно, норму восстанавливаем вручную
            reducer.normalize(&mut psi_i, cell_volume);
        }
    });
    print_and_log!(
        "relaxation done: norm = {:.6}",
        reducer.norm_squared(&psi_i) * cell_volume
    );
    psi_i
        .save_as_npy(format!("{out_prefix}/psi_ground.npy").as_str())
        .unwrap();

    //============================================================
    //                эволюция в действительном времени
    //============================================================
    params.dt = C::new(0.01, 0.0);
    let nt = 100;
    let mut psi_p = ComputeSurface::new(complex_field_params(n, n));
    for i in 0..nt {
        let capture_momentum = i % 25 == 0;
        measure_time!("SSFM", {
            ssfm.time_step_evol(
                &mut psi_f,
                &mut psi_i,
                None,
                &potential,
                &params,
                capture_momentum.then_some(&mut psi_p),
            )
            .unwrap();
        });
        std::mem::swap(&mut psi_i, &mut psi_f);
        params.t += params.dt;
        print_and_log!(
            "STEP {}/{}, t = {:.3}, norm = {:.6}",
            i,
            nt,
            params.t.re,
            reducer.norm_squared(&psi_i) * cell_volume
        );
        if capture_momentum {
            psi_p
                .save_as_npy(format!("{out_prefix}/psi_p_t_{i}.npy").as_str())
                .unwrap();
            psi_i
                .save_as_npy(format!("{out_prefix}/psi_x_t_{i}.npy").as_str())
                .unwrap();
        }
    }
    print_and_log!("total: {:.3}", total_time.elapsed().as_secs_f32());
}
