//! Reconocimiento de gestos de una mano a partir de los 21 landmarks 2D que
//! entrega un modelo externo de seguimiento.

pub mod config;
pub mod csv_loader;
pub mod finger_state;
pub mod gesture_buffer;
pub mod gesture_classifier;
pub mod landmarks;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use config::{ConfigError, PipelineConfig};
pub use landmarks::LandmarkError;
pub use pipeline::{FrameReport, GesturePipeline, LandmarkFrame};
pub use types::{FingerId, FingerState, GestureLabel};
