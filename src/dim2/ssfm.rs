use crate::common::params::SimulationParameters;
use crate::common::surface::ComputeSurface;
use crate::config::{F, PI};
use crate::error::Error;
use crate::kernels::split_step::{PEvolKernel2D, XEvolKernel};
use crate::kernels::PassInputs;
use crate::traits::fft_maker::FftMaker;
use crate::traits::ssfm::SSFM;
use super::fft_maker::FftMaker2D;

/// Заполняет поверхность аналитической кинетической энергией
/// |p|^2 / 2m по частотам сетки; канал 0 -- действительная часть.
/// Для драйверов, подставляющих свою кинетику через поверхность.
pub fn init_default_kinetic_energy_2d(
    dst: &mut ComputeSurface,
    dimensions: [F; 2],
    m: F,
) {
    let (width, height) = (dst.width(), dst.height());
    let ch = dst.channels();
    let mut arr: Vec<F> = vec![0.0; width * height * ch];
    for i in 0..height {
        for j in 0..width {
            let i_freq = if i < height / 2 {
                i as F
            } else {
                i as F - height as F
            };
            let j_freq = if j < width / 2 {
                j as F
            } else {
                j as F - width as F
            };
            let px = 2.0 * PI * j_freq / dimensions[0];
            let py = 2.0 * PI * i_freq / dimensions[1];
            arr[ch * (i * width + j)] = (px * px + py * py) / (2.0 * m);
        }
    }
    dst.upload(&arr);
}

/// Эволюция двумерной волновой функции на шаг dt методом расщепления
/// Стрэнга: exp(-iV dt/2ħ), FFT, exp(-iT dt/ħ), обратное FFT,
/// exp(-iV dt/2ħ).
#[derive(Debug, Default)]
pub struct SSFM2D {
    fft_maker: FftMaker2D,
}

impl SSFM2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fft_maker(&mut self) -> &mut FftMaker2D {
        &mut self.fft_maker
    }
}

impl SSFM<2> for SSFM2D {
    fn time_step_evol(
        &mut self,
        psi_f: &mut ComputeSurface,
        psi_i: &mut ComputeSurface,
        kinetic: Option<&ComputeSurface>,
        potential: &ComputeSurface,
        params: &SimulationParameters<2>,
        psi_p_out: Option<&mut ComputeSurface>,
    ) -> Result<(), Error> {
        let x_evol = XEvolKernel {
            dt: params.dt / 2.0,
            hbar: params.hbar,
        };
        let p_evol = PEvolKernel2D {
            dt: params.dt,
            m: params.m,
            hbar: params.hbar,
            dimensions: params.dimensions,
            use_custom: kinetic.is_some(),
        };

        psi_f.run_pass(
            &x_evol,
            &PassInputs::new().with("psi", psi_i).with("potential", potential),
        );
        self.fft_maker.fft(psi_i, psi_f)?;
        if let Some(psi_p) = psi_p_out {
            self.fft_maker.fftshift(psi_p, psi_i);
        }
        let mut p_inputs = PassInputs::new().with("psi", psi_i);
        if let Some(ke) = kinetic {
            p_inputs = p_inputs.with("kinetic", ke);
        }
        psi_f.run_pass(&p_evol, &p_inputs);
        self.fft_maker.ifft(psi_i, psi_f)?;
        psi_f.run_pass(
            &x_evol,
            &PassInputs::new().with("psi", psi_i).with("potential", potential),
        );
        Ok(())
    }
}
