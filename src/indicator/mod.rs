pub mod atr;
pub mod engine;
pub mod ewma;
pub mod rolling;
