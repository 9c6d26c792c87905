//! Hand-gesture recognition pipeline: landmark frames in, debounced
//! gesture events and abstract system commands out.
//!
//! Stages are plain threads joined by bounded crossbeam channels. Feature
//! extraction and classification are pure and deterministic; all temporal
//! behavior lives in the stabilizer.

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod features;
pub mod logger;
pub mod metrics;
pub mod pipeline;
pub mod poses;
pub mod source;
pub mod stabilizer;
pub mod types;
pub mod utils;
