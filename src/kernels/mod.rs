//! Ядра проходов над вычислительными поверхностями.
//! Каждое ядро вычисляется независимо для каждой ячейки целевой
//! поверхности; скалярные параметры -- типизированные поля структуры
//! ядра, именованные поверхности-входы передаются через `PassInputs`.

pub mod fft;
pub mod split_step;
pub mod util;

use crate::common::surface::ComputeSurface;
use crate::config::{C, F};

/// Координаты ячейки внутри прохода
#[derive(Debug, Clone, Copy)]
pub struct Frag {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Frag {
    /// uv-координаты центра ячейки
    pub fn uv(&self) -> [F; 2] {
        [
            (self.x as F + 0.5) / self.width as F,
            (self.y as F + 0.5) / self.height as F,
        ]
    }
}

/// Именованные поверхности-входы прохода
#[derive(Debug, Default)]
pub struct PassInputs<'a> {
    entries: Vec<(&'static str, &'a ComputeSurface)>,
}

impl<'a> PassInputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, surface: &'a ComputeSurface) -> Self {
        self.entries.push((name, surface));
        self
    }

    /// Вход по имени; отсутствие входа -- нарушение предусловия
    pub fn get(&self, name: &str) -> &'a ComputeSurface {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| *s)
            .unwrap_or_else(|| panic!("pass input `{name}` is not bound"))
    }

    pub(crate) fn contains_id(&self, id: u64) -> bool {
        self.entries.iter().any(|(_, s)| s.id() == id)
    }
}

/// Ядро, вычисляемое для каждой ячейки; возвращает до четырех каналов,
/// целевая поверхность забирает первые `channels()` из них
pub trait CellKernel: Sync {
    fn eval(&self, frag: &Frag, inputs: &PassInputs) -> [F; 4];
}

/// Комплексное число из каналов 0/1 ячейки
#[inline]
pub fn c_from(cell: [F; 4]) -> C {
    C::new(cell[0], cell[1])
}

/// Каналы ячейки из комплексного числа
#[inline]
pub fn c_into(z: C) -> [F; 4] {
    [z.re, z.im, 0.0, 0.0]
}
