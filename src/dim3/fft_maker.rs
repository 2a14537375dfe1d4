use crate::common::packer::Packing3D;
use crate::common::surface::{ComputeSurface, DoubleBuffer, SurfacePool, SurfaceParams};
use crate::common::twiddle::TwiddleCache;
use crate::config::F;
use crate::error::Error;
use crate::kernels::fft::{
    FftIterCubeKernel3D, FftIterKernel3D, FftShiftKernel3D, RevBitSortKernel3D,
};
use crate::kernels::util::CopyKernel;
use crate::kernels::PassInputs;
use crate::traits::fft_maker::FftMaker;

/// Итеративное FFT Кули-Тьюки над трехмерными полями, упакованными
/// в двумерные поверхности. Упаковка фиксируется при создании
/// и действует на все время жизни сетки данного размера.
#[derive(Debug)]
pub struct FftMaker3D {
    pack: Packing3D,
    twiddle: TwiddleCache,
    iter: Option<DoubleBuffer>,
    pool: SurfacePool,
}

impl FftMaker3D {
    pub fn new(grid_dimensions: [usize; 3]) -> Result<Self, Error> {
        let [w, h, l] = grid_dimensions;
        Ok(Self {
            pack: Packing3D::new(w, h, l)?,
            twiddle: TwiddleCache::new(),
            iter: None,
            pool: SurfacePool::new(),
        })
    }

    pub fn packing(&self) -> Packing3D {
        self.pack
    }

    fn refresh_iter(&mut self, params: SurfaceParams) {
        if let Some(iter) = &self.iter {
            if iter.params() == params {
                return;
            }
            let (a, b) = self.iter.take().unwrap().into_parts();
            self.pool.recycle(a);
            self.pool.recycle(b);
        }
        self.iter = Some(DoubleBuffer::new(
            self.pool.acquire(params),
            self.pool.acquire(params),
        ));
    }

    fn transform(
        &mut self,
        dst: &mut ComputeSurface,
        src: &ComputeSurface,
        is_inverse: bool,
    ) -> Result<(), Error> {
        assert_eq!(
            dst.params(),
            src.params(),
            "fft: dst and src must match in shape and format"
        );
        assert_eq!(
            (src.width(), src.height()),
            (self.pack.width2d, self.pack.height2d),
            "fft: field does not match the engine's packing"
        );
        let pack = self.pack;
        debug_assert!(
            pack.width.is_power_of_two()
                && pack.height.is_power_of_two()
                && pack.length.is_power_of_two(),
            "fft axis lengths must be powers of two"
        );
        self.refresh_iter(src.params());
        let Self { twiddle, iter, .. } = self;
        let iter = iter.as_mut().expect("iteration pair was just refreshed");
        let angle_sign: F = if is_inverse { 1.0 } else { -1.0 };

        iter.current_mut()
            .run_pass(&RevBitSortKernel3D { pack }, &PassInputs::new().with("tex", src));

        if pack.width == pack.height && pack.height == pack.length {
            // кубический быстрый путь: все три оси за один проход
            let size = pack.width;
            twiddle.ensure(size)?;
            let mut block_size = 2;
            while block_size <= size {
                let scale = if is_inverse && block_size == size {
                    1.0 / size as F
                } else {
                    1.0
                };
                let kernel = FftIterCubeKernel3D {
                    pack,
                    block_size,
                    size,
                    angle_sign,
                    scale,
                };
                let (current, next) = iter.split();
                next.run_pass(
                    &kernel,
                    &PassInputs::new()
                        .with("tex", current)
                        .with("cos_table", twiddle.surface()),
                );
                iter.swap();
                block_size *= 2;
            }
        } else {
            // последовательно по осям объема: 0, 1, 2
            for (axis, size) in [(0, pack.width), (1, pack.height), (2, pack.length)] {
                twiddle.ensure(size)?;
                let mut block_size = 2;
                while block_size <= size {
                    let scale = if is_inverse && block_size == size {
                        1.0 / size as F
                    } else {
                        1.0
                    };
                    let kernel = FftIterKernel3D {
                        pack,
                        axis,
                        block_size,
                        size,
                        angle_sign,
                        scale,
                    };
                    let (current, next) = iter.split();
                    next.run_pass(
                        &kernel,
                        &PassInputs::new()
                            .with("tex", current)
                            .with("cos_table", twiddle.surface()),
                    );
                    iter.swap();
                    block_size *= 2;
                }
            }
        }
        dst.run_pass(&CopyKernel, &PassInputs::new().with("tex", iter.current()));
        Ok(())
    }
}

impl FftMaker for FftMaker3D {
    fn fft(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) -> Result<(), Error> {
        self.transform(dst, src, false)
    }

    fn ifft(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) -> Result<(), Error> {
        self.transform(dst, src, true)
    }

    fn fftshift(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) {
        dst.run_pass(
            &FftShiftKernel3D { pack: self.pack },
            &PassInputs::new().with("tex", src),
        );
    }
}
