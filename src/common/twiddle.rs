use crate::common::surface::{ComputeSurface, InterpMode, SurfaceFormat, SurfaceParams, WrapMode};
use crate::config::{F, PI};
use crate::error::Error;

/// Максимальная поддерживаемая половина длины преобразования
pub const MAX_HALF_LENGTH: usize = 1024;

/// Таблица косинусов cos(2πi/n), i из [0, n/2), для бабочек FFT.
/// Синусы читаются из той же таблицы сдвигом на четверть периода.
/// Перестраивается при смене длины преобразования; длины с n/2 выше
/// емкости -- явная ошибка, а не молчаливо устаревшая таблица.
#[derive(Debug)]
pub struct TwiddleCache {
    length: usize,
    ind: Vec<F>,
    quad: Option<ComputeSurface>,
}

impl Default for TwiddleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TwiddleCache {
    pub fn new() -> Self {
        Self {
            length: 0,
            ind: vec![0.0; MAX_HALF_LENGTH],
            quad: None,
        }
    }

    /// Перестраивает таблицу под длину n, если она еще не закэширована
    pub fn ensure(&mut self, n: usize) -> Result<(), Error> {
        if n == self.length {
            return Ok(());
        }
        if n / 2 > MAX_HALF_LENGTH {
            return Err(Error::TwiddleLength {
                n,
                max: MAX_HALF_LENGTH,
            });
        }
        self.length = n;
        if n >= 8 {
            // точные значения на осях и первый октант,
            // остальные квадранты по симметрии
            self.ind[0] = 1.0;
            self.ind[n / 8] = 1.0 / (2.0 as F).sqrt();
            self.ind[n / 4] = 0.0;
            self.ind[3 * n / 8] = -1.0 / (2.0 as F).sqrt();
            for i in 1..n / 8 {
                let c = (i as F * 2.0 * PI / n as F).cos();
                let s = (i as F * 2.0 * PI / n as F).sin();
                self.ind[i] = c;
                self.ind[n / 4 - i] = s;
                self.ind[n / 4 + i] = -s;
                self.ind[n / 2 - i] = -c;
            }
        } else {
            // при n < 8 индексы осей совпадают, заполняем напрямую
            for i in 0..n / 2 {
                self.ind[i] = (i as F * 2.0 * PI / n as F).cos();
            }
        }
        let params = SurfaceParams {
            format: SurfaceFormat::R32F,
            width: n / 2,
            height: 1,
            wrap: WrapMode::Repeat,
            interp: InterpMode::Nearest,
        };
        let mut quad = match self.quad.take() {
            Some(mut q) => {
                q.reset(params);
                q
            }
            None => ComputeSurface::new(params),
        };
        quad.upload(&self.ind[..n / 2]);
        self.quad = Some(quad);
        Ok(())
    }

    /// Поверхность с таблицей; `ensure` должен быть вызван раньше
    pub fn surface(&self) -> &ComputeSurface {
        self.quad
            .as_ref()
            .expect("twiddle cache queried before ensure()")
    }

    pub fn length(&self) -> usize {
        self.length
    }
}
