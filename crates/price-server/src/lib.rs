//! Price server - HTTP front end for the used-car price predictor

pub mod api;
pub mod config;
