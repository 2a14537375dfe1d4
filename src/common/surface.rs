use crate::config::F;
use crate::kernels::{CellKernel, Frag, PassInputs};
use crate::macros::check_path;
use ndarray::prelude::*;
use ndarray_npy::WriteNpyExt;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::sync::atomic::{AtomicU64, Ordering};

/// Формат ячейки: количество каналов и точность.
/// Бэкенд хранит все форматы как f32; точность участвует
/// только в ключе пула.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    R32F,
    RG32F,
    RGBA32F,
    R16F,
    RG16F,
    RGBA16F,
}

impl SurfaceFormat {
    pub fn channels(self) -> usize {
        match self {
            SurfaceFormat::R32F | SurfaceFormat::R16F => 1,
            SurfaceFormat::RG32F | SurfaceFormat::RG16F => 2,
            SurfaceFormat::RGBA32F | SurfaceFormat::RGBA16F => 4,
        }
    }
}

/// Режим обертки координат за границей поверхности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

/// Режим интерполяции при дробной выборке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpMode {
    Nearest,
    Linear,
}

/// Параметры поверхности; ключ пула переиспользования
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceParams {
    pub format: SurfaceFormat,
    pub width: usize,
    pub height: usize,
    pub wrap: WrapMode,
    pub interp: InterpMode,
}

impl SurfaceParams {
    pub fn new(format: SurfaceFormat, width: usize, height: usize) -> Self {
        Self {
            format,
            width,
            height,
            wrap: WrapMode::Repeat,
            interp: InterpMode::Linear,
        }
    }
}

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(0);

/// Двумерный массив ячеек (1, 2 или 4 канала).
///
/// Единственный примитив мутации -- `run_pass`: ядро вычисляется
/// независимо для каждой ячейки и полностью перезаписывает содержимое.
/// Поверхность-цель не может входить в список входов своего прохода.
#[derive(Debug)]
pub struct ComputeSurface {
    params: SurfaceParams,
    id: u64,
    data: Vec<F>,
}

impl Clone for ComputeSurface {
    /// Копия получает собственный идентификатор: она -- отдельный
    /// ресурс и может участвовать в проходах вместе с оригиналом
    fn clone(&self) -> Self {
        Self {
            params: self.params,
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            data: self.data.clone(),
        }
    }
}

impl ComputeSurface {
    pub fn new(params: SurfaceParams) -> Self {
        let size = params.width * params.height * params.format.channels();
        Self {
            params,
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            data: vec![0.0; size],
        }
    }

    pub fn params(&self) -> SurfaceParams {
        self.params
    }

    pub fn width(&self) -> usize {
        self.params.width
    }

    pub fn height(&self) -> usize {
        self.params.height
    }

    pub fn channels(&self) -> usize {
        self.params.format.channels()
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Меняет форму и формат на месте, отбрасывая содержимое
    pub fn reset(&mut self, params: SurfaceParams) {
        let size = params.width * params.height * params.format.channels();
        self.params = params;
        self.data.clear();
        self.data.resize(size, 0.0);
    }

    /// Загружает сырой массив; длина должна совпадать точно
    pub fn upload(&mut self, arr: &[F]) {
        assert_eq!(
            arr.len(),
            self.data.len(),
            "upload: array length {} does not match surface size {}",
            arr.len(),
            self.data.len()
        );
        self.data.copy_from_slice(arr);
    }

    /// Возвращает копию сырого содержимого
    pub fn read(&self) -> Vec<F> {
        self.data.clone()
    }

    fn wrap_index(&self, i: isize, n: usize) -> usize {
        match self.params.wrap {
            WrapMode::Repeat => i.rem_euclid(n as isize) as usize,
            WrapMode::Clamp => i.clamp(0, n as isize - 1) as usize,
        }
    }

    /// Чтение ячейки по целочисленному индексу с оберткой;
    /// отсутствующие каналы читаются как 0
    pub fn fetch(&self, x: isize, y: isize) -> [F; 4] {
        let xi = self.wrap_index(x, self.params.width);
        let yi = self.wrap_index(y, self.params.height);
        let ch = self.channels();
        let base = (yi * self.params.width + xi) * ch;
        let mut out = [0.0; 4];
        out[..ch].copy_from_slice(&self.data[base..base + ch]);
        out
    }

    /// Дробная выборка в координатах uv из [0, 1); центр ячейки (i+0.5)/n
    pub fn sample(&self, u: F, v: F) -> [F; 4] {
        let tx = u * self.params.width as F - 0.5;
        let ty = v * self.params.height as F - 0.5;
        match self.params.interp {
            InterpMode::Nearest => {
                self.fetch(tx.round() as isize, ty.round() as isize)
            }
            InterpMode::Linear => {
                let x0 = tx.floor();
                let y0 = ty.floor();
                let fx = tx - x0;
                let fy = ty - y0;
                let (x0, y0) = (x0 as isize, y0 as isize);
                let c00 = self.fetch(x0, y0);
                let c10 = self.fetch(x0 + 1, y0);
                let c01 = self.fetch(x0, y0 + 1);
                let c11 = self.fetch(x0 + 1, y0 + 1);
                let mut out = [0.0; 4];
                for k in 0..4 {
                    let top = c00[k] * (1.0 - fx) + c10[k] * fx;
                    let bot = c01[k] * (1.0 - fx) + c11[k] * fx;
                    out[k] = top * (1.0 - fy) + bot * fy;
                }
                out
            }
        }
    }

    /// Выполняет проход ядра по всем ячейкам, полностью перезаписывая
    /// содержимое. Ячейки независимы; проход распараллелен по строкам.
    pub fn run_pass<K: CellKernel>(&mut self, kernel: &K, inputs: &PassInputs) {
        assert!(
            !inputs.contains_id(self.id),
            "run_pass: target surface may not appear among its own inputs"
        );
        let width = self.params.width;
        let height = self.params.height;
        let ch = self.channels();
        self.data
            .par_chunks_mut(width * ch)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..width {
                    let frag = Frag {
                        x,
                        y,
                        width,
                        height,
                    };
                    let value = kernel.eval(&frag, inputs);
                    row[x * ch..(x + 1) * ch].copy_from_slice(&value[..ch]);
                }
            });
    }

    /// Сохраняет сырое содержимое в .npy: (height, width, channels)
    pub fn save_as_npy(&self, path: &str) -> Result<(), crate::error::Error> {
        check_path!(path);
        let arr = Array3::from_shape_vec(
            (self.params.height, self.params.width, self.channels()),
            self.data.clone(),
        )
        .expect("surface data length is consistent with its shape");
        let writer = BufWriter::new(File::create(path).map_err(ndarray_npy::WriteNpyError::from)?);
        arr.write_npy(writer)?;
        Ok(())
    }
}

/// Пул переиспользования поверхностей, ключ -- структурное равенство
/// параметров. Вставка и извлечение не синхронизированы: пул принадлежит
/// одному владельцу (движку) и одной вычислительной очереди.
#[derive(Debug, Default)]
pub struct SurfacePool {
    free: HashMap<SurfaceParams, Vec<ComputeSurface>>,
}

impl SurfacePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Возвращает поверхность запрошенной формы: из пула, если есть,
    /// иначе создает новую
    pub fn acquire(&mut self, params: SurfaceParams) -> ComputeSurface {
        match self.free.get_mut(&params).and_then(|v| v.pop()) {
            Some(s) => s,
            None => ComputeSurface::new(params),
        }
    }

    /// Возвращает поверхность в пул вместо уничтожения
    pub fn recycle(&mut self, surface: ComputeSurface) {
        self.free.entry(surface.params()).or_default().push(surface);
    }
}

/// Явная пара ping-pong буферов: проход никогда не читает поверхность,
/// в которую пишет, поэтому каждая итеративная стадия меняет пару местами.
#[derive(Debug)]
pub struct DoubleBuffer {
    bufs: [ComputeSurface; 2],
    cur: usize,
}

impl DoubleBuffer {
    pub fn new(a: ComputeSurface, b: ComputeSurface) -> Self {
        assert_eq!(a.params(), b.params(), "ping-pong pair must match in shape");
        Self { bufs: [a, b], cur: 0 }
    }

    pub fn params(&self) -> SurfaceParams {
        self.bufs[0].params()
    }

    pub fn current(&self) -> &ComputeSurface {
        &self.bufs[self.cur]
    }

    pub fn current_mut(&mut self) -> &mut ComputeSurface {
        &mut self.bufs[self.cur]
    }

    /// Текущий буфер на чтение и следующий на запись
    pub fn split(&mut self) -> (&ComputeSurface, &mut ComputeSurface) {
        let (left, right) = self.bufs.split_at_mut(1);
        if self.cur == 0 {
            (&left[0], &mut right[0])
        } else {
            (&right[0], &mut left[0])
        }
    }

    pub fn swap(&mut self) {
        self.cur = 1 - self.cur;
    }

    /// Разбирает пару обратно на поверхности (для возврата в пул)
    pub fn into_parts(self) -> (ComputeSurface, ComputeSurface) {
        let [a, b] = self.bufs;
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{CellKernel, Frag, PassInputs};

    struct FillKernel {
        value: [F; 4],
    }

    impl CellKernel for FillKernel {
        fn eval(&self, _frag: &Frag, _inputs: &PassInputs) -> [F; 4] {
            self.value
        }
    }

    fn params(w: usize, h: usize) -> SurfaceParams {
        SurfaceParams::new(SurfaceFormat::RG32F, w, h)
    }

    #[test]
    fn pass_overwrites_all_cells() {
        let mut s = ComputeSurface::new(params(4, 4));
        s.run_pass(
            &FillKernel {
                value: [1.5, -2.0, 0.0, 0.0],
            },
            &PassInputs::new(),
        );
        let data = s.read();
        for cell in data.chunks(2) {
            assert_eq!(cell, [1.5, -2.0]);
        }
    }

    #[test]
    fn clone_is_a_distinct_resource() {
        let s = ComputeSurface::new(params(4, 4));
        let copy = s.clone();
        assert_ne!(copy.id(), s.id());
        // копия может входить в проход по оригиналу и наоборот
        let inputs = PassInputs::new().with("tex", &copy);
        assert!(!inputs.contains_id(s.id()));
        assert!(inputs.contains_id(copy.id()));
    }

    #[test]
    fn pool_reuses_identical_shape() {
        let mut pool = SurfacePool::new();
        let s = pool.acquire(params(8, 8));
        let id = s.id();
        pool.recycle(s);
        assert_eq!(pool.acquire(params(8, 8)).id(), id);
        // другая форма -- новая поверхность
        assert_ne!(pool.acquire(params(8, 4)).id(), id);
    }

    #[test]
    fn double_buffer_swaps() {
        let mut db = DoubleBuffer::new(
            ComputeSurface::new(params(4, 4)),
            ComputeSurface::new(params(4, 4)),
        );
        let first = db.current().id();
        db.swap();
        assert_ne!(db.current().id(), first);
        db.swap();
        assert_eq!(db.current().id(), first);
    }

    #[test]
    fn linear_sampling_averages_neighbours() {
        let mut s = ComputeSurface::new(SurfaceParams::new(SurfaceFormat::R32F, 2, 1));
        s.upload(&[1.0, 3.0]);
        // центр поверхности лежит между двумя ячейками
        assert!((s.sample(0.5, 0.5)[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn repeat_wrap_fetch() {
        let mut s = ComputeSurface::new(SurfaceParams::new(SurfaceFormat::R32F, 2, 2));
        s.upload(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.fetch(-1, 0)[0], 2.0);
        assert_eq!(s.fetch(2, 0)[0], 1.0);
        assert_eq!(s.fetch(0, -1)[0], 3.0);
    }
}
