use serde::{Deserialize, Serialize};
use std::fmt;

/// Número de landmarks que entrega el modelo de seguimiento por mano
pub const NUM_LANDMARKS: usize = 21;

/// Puntos por dedo (de proximal a distal, la punta al final)
pub const POINTS_PER_FINGER: usize = 4;

/// Tamaño por defecto de la ventana de estabilización (frames)
pub const WINDOW_SIZE: usize = 30;

/// Landmark en coordenadas normalizadas [0, 1] tal como lo entrega el tracker.
/// Se serializa como `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for NormalizedLandmark {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<NormalizedLandmark> for [f32; 2] {
    fn from(lm: NormalizedLandmark) -> Self {
        [lm.x, lm.y]
    }
}

/// Coordenada 2D en píxeles de un frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector que va de `self` a `other`
    pub fn to(self, other: Point) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        let (dx, dy) = self.to(other);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Identificador de grupo de puntos de la mano
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerId {
    Wrist,
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerId {
    /// Los cinco dedos que se clasifican (todo menos la muñeca)
    pub const DIGITS: [FingerId; 5] = [
        FingerId::Thumb,
        FingerId::Index,
        FingerId::Middle,
        FingerId::Ring,
        FingerId::Pinky,
    ];

    /// Posición del dedo dentro de `DIGITS`. La muñeca no tiene.
    pub fn digit_index(self) -> Option<usize> {
        match self {
            FingerId::Wrist => None,
            FingerId::Thumb => Some(0),
            FingerId::Index => Some(1),
            FingerId::Middle => Some(2),
            FingerId::Ring => Some(3),
            FingerId::Pinky => Some(4),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FingerId::Wrist => "wrist",
            FingerId::Thumb => "thumb",
            FingerId::Index => "index",
            FingerId::Middle => "middle",
            FingerId::Ring => "ring",
            FingerId::Pinky => "pinky",
        }
    }
}

impl fmt::Display for FingerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Estado de un dedo en un frame. No existe estado "desconocido".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerState {
    Bent,
    Straight,
}

/// Los 4 puntos de un dedo en orden anatómico (punta al final)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FingerPoints(pub [Point; POINTS_PER_FINGER]);

impl FingerPoints {
    pub fn base(&self) -> Point {
        self.0[0]
    }

    pub fn tip(&self) -> Point {
        self.0[POINTS_PER_FINGER - 1]
    }
}

/// Puntos de una mano agrupados por dedo, en píxeles
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandPoints {
    pub wrist: Point,
    pub thumb: FingerPoints,
    pub index: FingerPoints,
    pub middle: FingerPoints,
    pub ring: FingerPoints,
    pub pinky: FingerPoints,
}

/// Vocabulario cerrado de gestos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    /// Centinela: la ventana todavía no vio ningún gesto
    None,
    /// Combinación de dedos sin regla asociada
    Unknown,
    Fist,
    OpenPalm,
    Point,
    Peace,
    Three,
    Four,
    ThumbsUp,
    Call,
    Rock,
    Love,
}

impl GestureLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::None => "none",
            GestureLabel::Unknown => "unknown",
            GestureLabel::Fist => "fist",
            GestureLabel::OpenPalm => "open_palm",
            GestureLabel::Point => "point",
            GestureLabel::Peace => "peace",
            GestureLabel::Three => "three",
            GestureLabel::Four => "four",
            GestureLabel::ThumbsUp => "thumbs_up",
            GestureLabel::Call => "call",
            GestureLabel::Rock => "rock",
            GestureLabel::Love => "love",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_index_skips_wrist() {
        assert_eq!(FingerId::Wrist.digit_index(), None);
        for (i, id) in FingerId::DIGITS.iter().enumerate() {
            assert_eq!(id.digit_index(), Some(i));
        }
    }

    #[test]
    fn test_label_serde_matches_display() {
        let json = serde_json::to_string(&GestureLabel::ThumbsUp).unwrap();
        assert_eq!(json, "\"thumbs_up\"");
        let back: GestureLabel = serde_json::from_str("\"open_palm\"").unwrap();
        assert_eq!(back, GestureLabel::OpenPalm);
        assert_eq!(back.to_string(), "open_palm");
    }

    #[test]
    fn test_landmark_parses_from_pair() {
        let lm: NormalizedLandmark = serde_json::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(lm, NormalizedLandmark::new(0.25, 0.75));
    }
}
