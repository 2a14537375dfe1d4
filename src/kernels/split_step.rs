use super::{c_from, c_into, CellKernel, Frag, PassInputs};
use crate::common::packer::Packing3D;
use crate::config::{C, F, I, PI};

/// Частота бина i при длине оси n (отрицательная во второй половине)
#[inline]
fn bin_freq(i: usize, n: usize) -> F {
    if i < n / 2 {
        i as F
    } else {
        i as F - n as F
    }
}

/// Полушаг в координатном пространстве: psi *= exp(-i V dt / hbar),
/// V комплексный из каналов 0/1 входа "potential" (мнимая часть --
/// поглощающий потенциал). dt приходит уже поделенным пополам.
pub struct XEvolKernel {
    pub dt: C,
    pub hbar: F,
}

impl CellKernel for XEvolKernel {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let psi = c_from(inputs.get("psi").fetch(frag.x as isize, frag.y as isize));
        let v = c_from(
            inputs
                .get("potential")
                .fetch(frag.x as isize, frag.y as isize),
        );
        c_into((-I * v * self.dt / self.hbar).exp() * psi)
    }
}

/// Полный шаг в импульсном пространстве двумерного поля:
/// psi *= exp(-i T(p) dt / hbar). T(p) -- либо аналитическая
/// |p|^2 / 2m из частот сетки и физических размеров области, либо
/// комплексное поле из каналов 0/1 входа "kinetic".
pub struct PEvolKernel2D {
    pub dt: C,
    pub m: C,
    pub hbar: F,
    pub dimensions: [F; 2],
    pub use_custom: bool,
}

impl CellKernel for PEvolKernel2D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let psi = c_from(inputs.get("psi").fetch(frag.x as isize, frag.y as isize));
        let ke: C = if self.use_custom {
            c_from(
                inputs
                    .get("kinetic")
                    .fetch(frag.x as isize, frag.y as isize),
            )
        } else {
            let px = 2.0 * PI * bin_freq(frag.x, frag.width) / self.dimensions[0];
            let py = 2.0 * PI * bin_freq(frag.y, frag.height) / self.dimensions[1];
            (px * px + py * py) / (2.0 * self.m)
        };
        c_into((-I * ke * self.dt / self.hbar).exp() * psi)
    }
}

/// Полный шаг в импульсном пространстве упакованного трехмерного поля
pub struct PEvolKernel3D {
    pub pack: Packing3D,
    pub dt: C,
    pub m: C,
    pub hbar: F,
    pub dimensions: [F; 3],
    pub use_custom: bool,
}

impl CellKernel for PEvolKernel3D {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4] {
        let psi = c_from(inputs.get("psi").fetch(frag.x as isize, frag.y as isize));
        let ke: C = if self.use_custom {
            c_from(
                inputs
                    .get("kinetic")
                    .fetch(frag.x as isize, frag.y as isize),
            )
        } else {
            let (x, y, z) = self.pack.to_3d(frag.x, frag.y);
            let px = 2.0 * PI * bin_freq(x, self.pack.width) / self.dimensions[0];
            let py = 2.0 * PI * bin_freq(y, self.pack.height) / self.dimensions[1];
            let pz = 2.0 * PI * bin_freq(z, self.pack.length) / self.dimensions[2];
            (px * px + py * py + pz * pz) / (2.0 * self.m)
        };
        c_into((-I * ke * self.dt / self.hbar).exp() * psi)
    }
}
