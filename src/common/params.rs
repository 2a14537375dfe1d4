use crate::config::{C, F};

/// Параметры симуляции; драйвер меняет их между тиками,
/// пропагатор читает их как неизменяемый вход.
///
/// dt комплексный: действительная часть -- унитарный шаг эволюции,
/// мнимая -- неунитарное затухание (релаксация в мнимом времени
/// для поиска основного состояния). Масса тоже может быть комплексной.
#[derive(Debug, Clone, Copy)]
pub struct SimulationParameters<const D: usize> {
    /// накопленное время симуляции; драйвер продвигает t += dt.re
    pub t: C,
    pub dt: C,
    pub m: C,
    pub hbar: F,
    /// физические размеры расчетной области
    pub dimensions: [F; D],
    /// число ячеек вдоль каждой оси; каждое -- степень двойки
    pub grid_dimensions: [usize; D],
}

impl<const D: usize> SimulationParameters<D> {
    pub fn new(hbar: F, m: C, dt: C, dimensions: [F; D], grid_dimensions: [usize; D]) -> Self {
        debug_assert!(
            grid_dimensions.iter().all(|n| n.is_power_of_two()),
            "grid axis lengths must be powers of two"
        );
        Self {
            t: C::new(0.0, 0.0),
            dt,
            m,
            hbar,
            dimensions,
            grid_dimensions,
        }
    }
}
