pub mod config;
pub mod display;
pub mod ensemble;
pub mod linalg;
pub mod models;
pub mod sampler;
pub mod scoring;
pub mod tag_predictor;
