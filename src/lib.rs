//! Эволюция комплексного скалярного поля (волновой функции) на
//! регулярной 2D/3D сетке методом расщепления оператора (схема Стрэнга).
//!
//! Шаг Фурье реализован как итеративное FFT Кули-Тьюки, выполняемое
//! целиком попроходными ядрами над вычислительными поверхностями:
//! перестановка с разворотом битов, стадии бабочек радикса 2,
//! кэш поворотных множителей, слитые быстрые пути для квадратных
//! и кубических сеток. Трехмерные сетки упаковываются в двумерные
//! поверхности плитками срезов; нормы полей считаются параллельной
//! редукцией степенными по двойке уменьшениями.
//!
//! <!-- MathJax для рендеринга формул -->
//! <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
//! <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
//!
//! Схема расщепления на шаг dt:
//! \\[ \psi \leftarrow e^{-iV dt/2\hbar}\, \mathcal{F}^{-1}
//!    e^{-iT(p) dt/\hbar}\, \mathcal{F}\, e^{-iV dt/2\hbar}\, \psi \\]

pub mod common;
pub mod config;
pub mod dim2;
pub mod dim3;
pub mod error;
pub mod kernels;
pub mod macros;
pub mod traits;

pub use config::{C, F, I, PI};
pub use error::Error;

#[cfg(test)]
mod tests;
