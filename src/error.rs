use ndarray_npy::WriteNpyError;
use thiserror::Error;

/// Ошибки конфигурации и ввода-вывода.
///
/// Нарушения предусловий вызывающей стороны (несовпадение форм поверхностей,
/// целевая поверхность среди входов прохода) не попадают сюда: они приводят
/// к панике через `assert!` сразу в месте вызова.
#[derive(Debug, Error)]
pub enum Error {
    /// Трехмерная сетка не укладывается в двумерную поверхность
    /// ни при одном порядке множителей разложения.
    #[error(
        "3D grid {width}x{height}x{length} with possible 2D representations \
         {try0:?} or {try1:?} exceeds the maximum surface side length {max}"
    )]
    PackingOverflow {
        width: usize,
        height: usize,
        length: usize,
        try0: (usize, usize),
        try1: (usize, usize),
        max: usize,
    },

    /// Длина преобразования превышает емкость таблицы поворотных множителей
    #[error(
        "transform length {n} exceeds the twiddle table capacity \
         (maximum supported half-length is {max})"
    )]
    TwiddleLength { n: usize, max: usize },

    /// Ошибка записи .npy
    #[error("npy write error: {0}")]
    WriteNpy(#[from] WriteNpyError),
}
