use num_complex::Complex;

// тип данных: f32 согласован с форматами вычислительных поверхностей
pub type F = f32;

// комплексный тип данных, согласованный с F
pub type C = Complex<F>;

// константы
pub const PI: F = std::f32::consts::PI;
pub const I: C = Complex::I;
