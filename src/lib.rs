pub mod config;
pub mod error;
pub mod horus;
pub mod indicator;
pub mod model;
pub mod portfolio;
pub mod risk;
pub mod roostoo;
pub mod strategy;
pub mod trader;
