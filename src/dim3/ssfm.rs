use super::fft_maker::FftMaker3D;
use crate::common::packer::Packing3D;
use crate::common::params::SimulationParameters;
use crate::common::surface::ComputeSurface;
use crate::config::{F, PI};
use crate::error::Error;
use crate::kernels::split_step::{PEvolKernel3D, XEvolKernel};
use crate::kernels::PassInputs;
use crate::traits::fft_maker::FftMaker;
use crate::traits::ssfm::SSFM;

/// Заполняет упакованную поверхность аналитической кинетической
/// энергией |p|^2 / 2m трехмерной сетки; канал 0 -- действительная часть
pub fn init_default_kinetic_energy_3d(
    dst: &mut ComputeSurface,
    pack: &Packing3D,
    dimensions: [F; 3],
    m: F,
) {
    let (width2d, height2d) = (dst.width(), dst.height());
    assert_eq!(
        (width2d, height2d),
        (pack.width2d, pack.height2d),
        "kinetic energy surface does not match the packing"
    );
    let ch = dst.channels();
    let freq = |i: usize, n: usize| {
        if i < n / 2 {
            i as F
        } else {
            i as F - n as F
        }
    };
    let mut arr: Vec<F> = vec![0.0; width2d * height2d * ch];
    for v in 0..height2d {
        for u in 0..width2d {
            let (x, y, z) = pack.to_3d(u, v);
            let px = 2.0 * PI * freq(x, pack.width) / dimensions[0];
            let py = 2.0 * PI * freq(y, pack.height) / dimensions[1];
            let pz = 2.0 * PI * freq(z, pack.length) / dimensions[2];
            arr[ch * (v * width2d + u)] = (px * px + py * py + pz * pz) / (2.0 * m);
        }
    }
    dst.upload(&arr);
}

/// Эволюция трехмерной волновой функции на шаг dt методом расщепления
/// Стрэнга; структура идентична двумерному случаю, отличаются только
/// движок FFT и формула кинетической энергии.
#[derive(Debug)]
pub struct SSFM3D {
    fft_maker: FftMaker3D,
}

impl SSFM3D {
    pub fn new(grid_dimensions: [usize; 3]) -> Result<Self, Error> {
        Ok(Self {
            fft_maker: FftMaker3D::new(grid_dimensions)?,
        })
    }

    pub fn packing(&self) -> Packing3D {
        self.fft_maker.packing()
    }

    pub fn fft_maker(&mut self) -> &mut FftMaker3D {
        &mut self.fft_maker
    }
}

impl SSFM<3> for SSFM3D {
    fn time_step_evol(
        &mut self,
        psi_f: &mut ComputeSurface,
        psi_i: &mut ComputeSurface,
        kinetic: Option<&ComputeSurface>,
        potential: &ComputeSurface,
        params: &SimulationParameters<3>,
        psi_p_out: Option<&mut ComputeSurface>,
    ) -> Result<(), Error> {
        let x_evol = XEvolKernel {
            dt: params.dt / 2.0,
            hbar: params.hbar,
        };
        let p_evol = PEvolKernel3D {
            pack: self.fft_maker.packing(),
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
