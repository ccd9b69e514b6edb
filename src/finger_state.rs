use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{FingerId, FingerPoints, FingerState, HandPoints, Point};

/// Longitud mínima (en píxeles) para considerar un segmento válido
const MIN_SEGMENT_LEN: f32 = 1e-6;

/// Punto de referencia del test del pulgar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbReference {
    /// |punta - MCP meñique| / |MCP pulgar - MCP meñique|
    #[default]
    PinkyKnuckle,
    /// |punta - muñeca| / |MCP índice - muñeca|
    Wrist,
}

/// Umbrales calibrados del clasificador de dedos
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerThresholds {
    /// Ángulo interior mínimo (grados) para considerar el índice estirado
    pub index_min_angle_deg: f32,
    pub middle_min_angle_deg: f32,
    pub ring_min_angle_deg: f32,
    pub pinky_min_angle_deg: f32,
    /// Ratio mínimo de distancias (según `thumb_reference`) para considerar
    /// el pulgar estirado
    pub thumb_min_ratio: f32,
    pub thumb_reference: ThumbReference,
}

impl Default for FingerThresholds {
    fn default() -> Self {
        Self {
            index_min_angle_deg: 140.0,
            middle_min_angle_deg: 140.0,
            ring_min_angle_deg: 140.0,
            pinky_min_angle_deg: 140.0,
            thumb_min_ratio: 0.9,
            thumb_reference: ThumbReference::default(),
        }
    }
}

impl FingerThresholds {
    /// Umbral de ángulo de un dedo de flexión. El pulgar usa `thumb_min_ratio`.
    pub fn min_angle_deg(&self, finger: FingerId) -> Option<f32> {
        match finger {
            FingerId::Index => Some(self.index_min_angle_deg),
            FingerId::Middle => Some(self.middle_min_angle_deg),
            FingerId::Ring => Some(self.ring_min_angle_deg),
            FingerId::Pinky => Some(self.pinky_min_angle_deg),
            FingerId::Wrist | FingerId::Thumb => None,
        }
    }
}

/// Estado de los cinco dedos en un frame, en el orden de `FingerId::DIGITS`.
/// Los conjuntos de doblados y estirados son complementarios por construcción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FingerStates([FingerState; 5]);

impl FingerStates {
    pub fn new(states: [FingerState; 5]) -> Self {
        Self(states)
    }

    /// Estado de un dedo. La muñeca no tiene estado.
    pub fn get(&self, finger: FingerId) -> Option<FingerState> {
        finger.digit_index().map(|i| self.0[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (FingerId, FingerState)> + '_ {
        FingerId::DIGITS.iter().copied().zip(self.0.iter().copied())
    }

    pub fn bent(&self) -> BTreeSet<FingerId> {
        self.with_state(FingerState::Bent)
    }

    pub fn straight(&self) -> BTreeSet<FingerId> {
        self.with_state(FingerState::Straight)
    }

    fn with_state(&self, state: FingerState) -> BTreeSet<FingerId> {
        self.iter()
            .filter(|(_, s)| *s == state)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Clasificador geométrico de dedos doblados/estirados
#[derive(Debug, Clone, Default)]
pub struct FingerClassifier {
    thresholds: FingerThresholds,
}

impl FingerClassifier {
    pub fn new(thresholds: FingerThresholds) -> Self {
        Self { thresholds }
    }

    /// Clasifica los cinco dedos de una mano
    pub fn classify(&self, hand: &HandPoints) -> FingerStates {
        FingerStates::new([
            self.classify_thumb(hand),
            self.classify_curl(FingerId::Index, &hand.index),
            self.classify_curl(FingerId::Middle, &hand.middle),
            self.classify_curl(FingerId::Ring, &hand.ring),
            self.classify_curl(FingerId::Pinky, &hand.pinky),
        ])
    }

    /// Dedos índice a meñique: ángulo interior entre el segmento MCP→PIP y el
    /// segmento DIP→punta. Un dedo estirado ronda los 180°.
    ///
    /// No se usa el ángulo en la PIP (MCP→PIP frente a PIP→DIP): la falange
    /// media es corta y con la punta vuelta hacia la palma ese ángulo apenas
    /// cambia. Comparar la falange proximal con la distal acumula la flexión
    /// de PIP y DIP en un solo ángulo.
    ///
    /// Geometría degenerada (segmento de longitud cero) → `Straight`.
    pub fn classify_curl(&self, finger: FingerId, points: &FingerPoints) -> FingerState {
        let Some(min_angle) = self.thresholds.min_angle_deg(finger) else {
            return FingerState::Straight;
        };
        let [mcp, pip, dip, tip] = points.0;

        match interior_angle_deg(mcp, pip, dip, tip) {
            Some(angle) if angle < min_angle => FingerState::Bent,
            _ => FingerState::Straight,
        }
    }

    /// Pulgar: se abduce en vez de flexionarse en el plano, así que se compara
    /// la distancia de la punta a un ancla con la de un nudillo de referencia
    /// a esa misma ancla. Una punta recogida hacia la palma da un ratio pequeño.
    ///
    /// - `PinkyKnuckle` (por defecto): ancla en el MCP del meñique, nudillo
    ///   de referencia el MCP del pulgar. Un pulgar doblado sobre el puño
    ///   sigue lejos de la muñeca pero cruza hacia el lado del meñique.
    /// - `Wrist`: ancla en la muñeca, nudillo de referencia el MCP del índice.
    ///
    /// Geometría degenerada (pulgar colapsado o referencia nula) → `Straight`.
    pub fn classify_thumb(&self, hand: &HandPoints) -> FingerState {
        let mcp = hand.thumb.0[1];
        let tip = hand.thumb.tip();
        let (anchor, knuckle) = match self.thresholds.thumb_reference {
            ThumbReference::PinkyKnuckle => (hand.pinky.base(), mcp),
            ThumbReference::Wrist => (hand.wrist, hand.index.base()),
        };

        let reference = knuckle.distance(anchor);
        if reference < MIN_SEGMENT_LEN || mcp.distance(tip) < MIN_SEGMENT_LEN {
            return FingerState::Straight;
        }

        let ratio = tip.distance(anchor) / reference;
        if ratio < self.thresholds.thumb_min_ratio {
            FingerState::Bent
        } else {
            FingerState::Straight
        }
    }
}

/// Ángulo interior (grados) entre los segmentos `a→b` y `c→d` unidos en la
/// articulación media: 180° si son colineales, 0° si el segundo vuelve sobre
/// el primero. `None` si algún segmento tiene longitud cero.
pub fn interior_angle_deg(a: Point, b: Point, c: Point, d: Point) -> Option<f32> {
    let (v1x, v1y) = a.to(b);
    let (v2x, v2y) = c.to(d);

    let len1 = (v1x * v1x + v1y * v1y).sqrt();
    let len2 = (v2x * v2x + v2y * v2y).sqrt();
    if len1 < MIN_SEGMENT_LEN || len2 < MIN_SEGMENT_LEN {
        return None;
    }

    let dot = v1x * v2x + v1y * v2y;
    let cross = v1x * v2y - v1y * v2x;
    let deviation = cross.abs().atan2(dot).to_degrees();
    Some(180.0 - deviation)
}
