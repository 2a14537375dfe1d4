use crate::common::surface::ComputeSurface;
use crate::error::Error;

/// Трейт для дискретного преобразования Фурье над комплексными полями
/// на вычислительных поверхностях.
///
/// Экземпляр владеет собственной парой ping-pong буферов и таблицей
/// поворотных множителей, поэтому одновременные преобразования разных
/// форм требуют разных экземпляров (один поток на экземпляр).
pub trait FftMaker {
    /// прямое преобразование Фурье (без нормировки)
    fn fft(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) -> Result<(), Error>;

    /// обратное преобразование Фурье (нормировка 1/N на каждую ось)
    fn ifft(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface) -> Result<(), Error>;

    /// перенос нулевой частоты в центр; чистая переиндексация
    fn fftshift(&mut self, dst: &mut ComputeSurface, src: &ComputeSurface);
}
