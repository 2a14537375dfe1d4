use crate::common::params::SimulationParameters;
use crate::common::surface::ComputeSurface;
use crate::error::Error;

/// Трейт для эволюции на временной шаг методом SSFM (расщепление Стрэнга)
/// над комплексными полями на вычислительных поверхностях.
///
/// Все поверхности должны совпадать по форме и формату -- это
/// предусловие вызывающей стороны, внутри не проверяется.
pub trait SSFM<const D: usize> {
    /// Эволюция на шаг dt: полушаг по потенциалу, прямое FFT,
    /// необязательный снимок импульсного пространства, полный шаг
    /// по кинетической энергии, обратное FFT, полушаг по потенциалу.
    ///
    /// `psi_i` используется как рабочий буфер и затирается;
    /// результат остается в `psi_f`. Перенормировка не выполняется.
    fn time_step_evol(
        &mut self,
        psi_f: &mut ComputeSurface,
        psi_i: &mut ComputeSurface,
        kinetic: Option<&ComputeSurface>,
        potential: &ComputeSurface,
        params: &SimulationParameters<D>,
        psi_p_out: Option<&mut ComputeSurface>,
    ) -> Result<(), Error>;
}
