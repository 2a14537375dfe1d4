use crate::common::surface::{ComputeSurface, DoubleBuffer, SurfacePool, SurfaceParams};
use crate::common::twiddle::TwiddleCache;
use crate::config::F;
use crate::error::Error;
use crate::kernels::fft::{
    FftIterKernel2D, FftIterSquareKernel2D, FftShiftKernel2D, RevBitSortKernel2D,
};
use crate::kernels::util::CopyKernel;
use crate::kernels::PassInputs;
use crate::traits::fft_maker::FftMaker;

/// Итеративное FFT Кули-Тьюки над двумерными комплексными полями.
///
/// Длины осей должны быть степенями двойки; это предусловие,
/// во время выполнения проверяется только в отладочной сборке.
#[derive(Debug, Default)]
pub struct FftMaker2D {
    twiddle: TwiddleCache,
    iter: Option<DoubleBuffer>,
    pool: SurfacePool,
}

impl FftMaker2D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Пара итерационных буферов под форму и формат текущего поля;
    /// прежняя пара другой формы уходит в пул
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
        debug_assert!(
            src.width().is_power_of_two() && src.height().is_power_of_two(),
            "fft axis lengths must be powers of two"
        );
        self.refresh_iter(src.params());
        let Self { twiddle, iter, .. } = self;
        let iter = iter.as_mut().expect("iteration pair was just refreshed");
        let angle_sign = if is_inverse { 1.0 } else { -1.0 };

        iter.current_mut()
            .run_pass(&RevBitSortKernel2D, &PassInputs::new().with("tex", src));

        let (width, height) = (src.width(), src.height());
        if width == height {
            // квадратный быстрый путь: обе оси за один проход
            twiddle.ensure(width)?;
            let mut block_size = 2;
            while block_size <= width {
                let scale = if is_inverse && block_size == width {
                    1.0 / width as F
                } else {
                    1.0
                };
                let kernel = FftIterSquareKernel2D {
                    block_size,
                    size: width,
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
            // последовательно: вдоль ширины, затем вдоль высоты
            for (axis, size) in [(0, width), (1, height)] {
                twiddle.ensure(size)?;
                let mut block_size = 2;
                while block_size <= size {
                    let scale = if is_inverse && block_size == size {
                        1.0 / size as F
                    } else {
                        1.0
                    };
                    let kernel = FftIterKernel2D {
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

impl FftMaker for FftMaker2D {
    fn fft(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) -> Result<(), Error> {
        self.transform(dst, src, false)
    }

    fn ifft(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) -> Result<(), Error> {
        self.transform(dst, src, true)
    }

    fn fftshift(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) {
        dst.run_pass(&FftShiftKernel2D, &PassInputs::new().with("tex", src));
    }
}
