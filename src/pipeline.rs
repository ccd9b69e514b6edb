//! Pipeline por sesión: landmarks → dedos → gesto → ventana de estabilización.
//!
//! Cada flujo de frames (cámara, mano) debe tener su propio `GesturePipeline`;
//! la ventana no se comparte entre flujos.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::finger_state::{FingerClassifier, FingerStates};
use crate::gesture_buffer::{GestureBuffer, MissPolicy};
use crate::gesture_classifier::GestureClassifier;
use crate::landmarks::{to_hand_points, LandmarkError};
use crate::types::{GestureLabel, NormalizedLandmark};

/// Entrada de un frame: tamaño en píxeles y, si se detectó una mano, sus 21 landmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub landmarks: Option<Vec<NormalizedLandmark>>,
}

impl LandmarkFrame {
    pub fn with_hand(width: u32, height: u32, landmarks: Vec<NormalizedLandmark>) -> Self {
        Self {
            width,
            height,
            landmarks: Some(landmarks),
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            landmarks: None,
        }
    }
}

/// Resultado de procesar un frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Estado de los dedos (solo si hubo mano)
    pub finger_states: Option<FingerStates>,
    /// Gesto del frame, sin estabilizar
    pub label: Option<GestureLabel>,
    /// Gesto confirmado por la ventana
    pub confirmed: Option<GestureLabel>,
}

pub struct GesturePipeline {
    fingers: FingerClassifier,
    classifier: GestureClassifier,
    buffer: GestureBuffer,
    miss_policy: MissPolicy,
    last_confirmed: Option<GestureLabel>,
}

impl GesturePipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            fingers: FingerClassifier::new(config.thresholds),
            classifier: GestureClassifier::new(config.rules.clone(), config.fallback),
            buffer: GestureBuffer::new(config.window_size, config.sentinel),
            miss_policy: config.miss_policy,
            last_confirmed: None,
        }
    }

    /// Procesa un frame. Un frame mal formado devuelve error y no toca la ventana.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Result<FrameReport, LandmarkError> {
        let Some(landmarks) = frame.landmarks.as_deref() else {
            self.buffer.observe_miss(self.miss_policy);
            if self.miss_policy == MissPolicy::Reset {
                self.last_confirmed = None;
            }
            debug!("Frame sin mano ({:?})", self.miss_policy);
            return Ok(FrameReport::default());
        };

        let hand = to_hand_points(landmarks, frame.width, frame.height)?;
        let states = self.fingers.classify(&hand);
        let label = self.classifier.classify(&states);
        let confirmed = self.buffer.push(label);

        debug!(
            straight = ?states.straight(),
            bent = ?states.bent(),
            "Gesto del frame: {}",
            label
        );

        if let Some(gesture) = confirmed {
            if self.last_confirmed != Some(gesture) {
                info!("Gesto confirmado: {}", gesture);
            }
            self.last_confirmed = Some(gesture);
        }

        Ok(FrameReport {
            finger_states: Some(states),
            label: Some(label),
            confirmed,
        })
    }

    /// Vacía la ventana (cambio de sesión o de mano)
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.last_confirmed = None;
    }

    pub fn buffer(&self) -> &GestureBuffer {
        &self.buffer
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }
}

impl Default for GesturePipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}
