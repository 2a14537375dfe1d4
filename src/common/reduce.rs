use crate::common::surface::{
    ComputeSurface, InterpMode, SurfaceFormat, SurfacePool, SurfaceParams, WrapMode,
};
use crate::config::F;
use crate::kernels::util::{AbsSquareKernel, CopyKernel, ScaleKernel};
use crate::kernels::PassInputs;

/// Параллельное суммирование поверхности степенными по двойке
/// уменьшениями. Временные поверхности берутся из собственного пула
/// и возвращаются в него после прохода.
#[derive(Debug, Default)]
pub struct Reducer {
    pool: SurfacePool,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    fn level_params(format: SurfaceFormat, width: usize, height: usize) -> SurfaceParams {
        // последний уровень 1x1 всегда в полных четырех каналах
        let format = if width == 1 && height == 1 {
            SurfaceFormat::RGBA32F
        } else {
            format
        };
        SurfaceParams {
            format,
            width,
            height,
            wrap: WrapMode::Repeat,
            interp: InterpMode::Linear,
        }
    }

    /// Суммирует квадратную поверхность со стороной-степенью двойки:
    /// каждый проход складывает блоки 2x2 (box-filter с масштабом 4),
    /// пока не останется одна ячейка.
    fn reduce_square(&mut self, src: &ComputeSurface) -> [F; 4] {
        let format = src.params().format;
        let mut prev: Option<ComputeSurface> = None;
        let mut w = src.width() / 2;
        loop {
            let mut next = self.pool.acquire(Self::level_params(format, w, w));
            {
                let input = prev.as_ref().unwrap_or(src);
                next.run_pass(&ScaleKernel { scale: 4.0 }, &PassInputs::new().with("tex", input));
            }
            if let Some(s) = prev.take() {
                self.pool.recycle(s);
            }
            if w == 1 {
                let value = next.fetch(0, 0);
                self.pool.recycle(next);
                return value;
            }
            prev = Some(next);
            w /= 2;
        }
    }

    /// Сумма всех ячеек поверхности; обе стороны -- степени двойки
    /// (предусловие, не проверяется). Прямоугольная поверхность
    /// сначала ужимается вдоль длинной оси (масштаб 2) до квадратной.
    pub fn reduce_sum(&mut self, surface: &ComputeSurface) -> [F; 4] {
        let (w, h) = (surface.width(), surface.height());
        if w == h {
            if w == 1 {
                return surface.fetch(0, 0);
            }
            return self.reduce_square(surface);
        }
        let format = surface.params().format;
        let mut prev: Option<ComputeSurface> = None;
        let (mut cw, mut ch) = (w, h);
        while cw != ch {
            if cw > ch {
                cw /= 2;
            } else {
                ch /= 2;
            }
            let mut next = self.pool.acquire(Self::level_params(format, cw, ch));
            {
                let input = prev.as_ref().unwrap_or(surface);
                next.run_pass(&ScaleKernel { scale: 2.0 }, &PassInputs::new().with("tex", input));
            }
            if let Some(s) = prev.take() {
                self.pool.recycle(s);
            }
            prev = Some(next);
        }
        let square = prev.expect("rectangular reduction produced no intermediate");
        let value = if cw == 1 {
            square.fetch(0, 0)
        } else {
            self.reduce_square(&square)
        };
        self.pool.recycle(square);
        value
    }

    /// Квадрат нормы комплексного поля: sum |psi|^2 по всем ячейкам
    pub fn norm_squared(&mut self, psi: &ComputeSurface) -> F {
        let params = SurfaceParams {
            format: SurfaceFormat::R32F,
            ..psi.params()
        };
        let mut abs2 = self.pool.acquire(params);
        abs2.run_pass(&AbsSquareKernel, &PassInputs::new().with("tex", psi));
        let sum = self.reduce_sum(&abs2);
        self.pool.recycle(abs2);
        sum[0]
    }

    /// Нормирует поле на единичную полную вероятность:
    /// psi /= sqrt(sum |psi|^2 * cell_volume).
    ///
    /// При нулевой или NaN сумме масштабирование пропускается и поле
    /// остается нетронутым; возвращает, была ли выполнена нормировка.
    pub fn normalize(&mut self, psi: &mut ComputeSurface, cell_volume: F) -> bool {
        let sum = self.norm_squared(psi) * cell_volume;
        if !(sum > 0.0) || sum.is_nan() {
            return false;
        }
        let factor = 1.0 / sum.sqrt();
        let mut scaled = self.pool.acquire(psi.params());
        scaled.run_pass(&ScaleKernel { scale: factor }, &PassInputs::new().with("tex", psi));
        psi.run_pass(&CopyKernel, &PassInputs::new().with("tex", &scaled));
        self.pool.recycle(scaled);
        true
    }
}
