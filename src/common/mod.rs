pub mod packer;
pub mod params;
pub mod reduce;
pub mod surface;
pub mod twiddle;
pub mod wave_function;
