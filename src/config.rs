use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::finger_state::FingerThresholds;
use crate::gesture_buffer::MissPolicy;
use crate::gesture_classifier::{default_rules, GestureRule};
use crate::types::{FingerId, GestureLabel, WINDOW_SIZE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Window size must be at least 1")]
    ZeroWindow,

    #[error("Invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("Rule '{label}' requires {finger} to be both straight and bent")]
    ContradictoryRule {
        label: GestureLabel,
        finger: FingerId,
    },

    #[error("Rule '{label}' references the wrist, which has no finger state")]
    WristInRule { label: GestureLabel },

    #[error("Rule table is empty")]
    EmptyRuleTable,

    #[error("Sentinel '{label}' is also emitted by the classifier and could never be confirmed")]
    SentinelCollision { label: GestureLabel },
}

/// Parámetros ajustables del pipeline.
/// Los campos ausentes en el JSON toman el valor por defecto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frames consecutivos iguales para confirmar un gesto (default: 30)
    pub window_size: usize,
    /// Comportamiento ante frames sin mano (default: hold)
    pub miss_policy: MissPolicy,
    /// Etiqueta con la que arranca la ventana (default: none)
    pub sentinel: GestureLabel,
    /// Etiqueta para combinaciones sin regla (default: unknown)
    pub fallback: GestureLabel,
    pub thresholds: FingerThresholds,
    /// Tabla de reglas, evaluada en orden
    pub rules: Vec<GestureRule>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            miss_policy: MissPolicy::default(),
            sentinel: GestureLabel::None,
            fallback: GestureLabel::Unknown,
            thresholds: FingerThresholds::default(),
            rules: default_rules(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }

        let t = &self.thresholds;
        let angles = [
            ("index_min_angle_deg", t.index_min_angle_deg),
            ("middle_min_angle_deg", t.middle_min_angle_deg),
            ("ring_min_angle_deg", t.ring_min_angle_deg),
            ("pinky_min_angle_deg", t.pinky_min_angle_deg),
        ];
        for (name, value) in angles {
            if !value.is_finite() || !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if !t.thumb_min_ratio.is_finite() || t.thumb_min_ratio <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "thumb_min_ratio",
                value: t.thumb_min_ratio,
            });
        }

        if self.rules.is_empty() {
            return Err(ConfigError::EmptyRuleTable);
        }
        // la ventana nunca confirma el centinela
        if self.fallback == self.sentinel {
            return Err(ConfigError::SentinelCollision {
                label: self.sentinel,
            });
        }
        for rule in &self.rules {
            if rule.straight.contains(&FingerId::Wrist) || rule.bent.contains(&FingerId::Wrist) {
                return Err(ConfigError::WristInRule { label: rule.label });
            }
            if let Some(finger) = rule.straight.intersection(&rule.bent).next() {
                return Err(ConfigError::ContradictoryRule {
                    label: rule.label,
                    finger: *finger,
                });
            }
            if rule.label == self.sentinel {
                return Err(ConfigError::SentinelCollision { label: rule.label });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 30);
        assert_eq!(config.miss_policy, MissPolicy::Hold);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "window_size": 10,
            "miss_policy": "reset",
            "thresholds": {"thumb_min_ratio": 1.2}
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.miss_policy, MissPolicy::Reset);
        assert_eq!(config.thresholds.thumb_min_ratio, 1.2);
        assert_eq!(config.thresholds.index_min_angle_deg, 140.0);
        assert_eq!(config.rules, default_rules());
    }

    #[test]
    fn test_round_trips_through_json() {
        let json = serde_json::to_string(&PipelineConfig::default()).unwrap();
        assert_eq!(
            PipelineConfig::from_json_str(&json).unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"window_size": 0}"#),
            Err(ConfigError::ZeroWindow)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_angle() {
        let json = r#"{"thresholds": {"ring_min_angle_deg": 200.0}}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold {
                name: "ring_min_angle_deg",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_contradictory_rule() {
        let json = r#"{"rules": [{"label": "point", "straight": ["index"], "bent": ["index"]}]}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ContradictoryRule {
                finger: FingerId::Index,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_wrist_in_rule() {
        let json = r#"{"rules": [{"label": "fist", "bent": ["wrist"]}]}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::WristInRule { .. }));
    }

    #[test]
    fn test_rejects_empty_rules() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"rules": []}"#),
            Err(ConfigError::EmptyRuleTable)
        ));
    }

    #[test]
    fn test_rejects_sentinel_equal_to_fallback() {
        let json = r#"{"window_size": 3, "sentinel": "unknown"}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SentinelCollision {
                label: GestureLabel::Unknown
            }
        ));
    }

    #[test]
    fn test_rejects_sentinel_used_by_rule() {
        let json = r#"{"rules": [{"label": "none", "straight": ["index"]}]}"#;
        let err = PipelineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SentinelCollision {
                label: GestureLabel::None
            }
        ));

        let json = r#"{"sentinel": "peace"}"#;
        assert!(matches!(
            PipelineConfig::from_json_str(json),
            Err(ConfigError::SentinelCollision {
                label: GestureLabel::Peace
            })
        ));
    }

    #[test]
    fn test_custom_sentinel_outside_vocabulary_is_valid() {
        let json = r#"{"sentinel": "love", "rules": [{"label": "fist", "bent": ["index"]}]}"#;
        assert!(PipelineConfig::from_json_str(json).is_ok());
    }

    #[test]
    fn test_unknown_label_is_a_json_error() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"fallback": "wave"}"#),
            Err(ConfigError::JsonError(_))
        ));
    }
}
