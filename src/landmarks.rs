//! Adaptador de landmarks: 21 puntos normalizados → grupos por dedo en píxeles.
//!
//! Índices anatómicos: 0 muñeca, 1-4 pulgar, 5-8 índice, 9-12 medio,
//! 13-16 anular, 17-20 meñique.

use std::ops::Range;

use thiserror::Error;

use crate::types::{
    FingerId, FingerPoints, HandPoints, NormalizedLandmark, Point, NUM_LANDMARKS, POINTS_PER_FINGER,
};

pub const WRIST: usize = 0;
pub const THUMB: Range<usize> = 1..5;
pub const INDEX: Range<usize> = 5..9;
pub const MIDDLE: Range<usize> = 9..13;
pub const RING: Range<usize> = 13..17;
pub const PINKY: Range<usize> = 17..21;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Invalid point count for {finger}: expected {expected}, got {actual}")]
    FingerArity {
        finger: FingerId,
        expected: usize,
        actual: usize,
    },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("Empty frame: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
}

impl FingerPoints {
    /// Construye el grupo de un dedo validando que tenga exactamente 4 puntos
    pub fn from_slice(finger: FingerId, points: &[Point]) -> Result<Self, LandmarkError> {
        let arr: [Point; POINTS_PER_FINGER] =
            points.try_into().map_err(|_| LandmarkError::FingerArity {
                finger,
                expected: POINTS_PER_FINGER,
                actual: points.len(),
            })?;
        Ok(Self(arr))
    }
}

/// Escala los landmarks al tamaño del frame y los reagrupa por dedo.
///
/// Las coordenadas se truncan a píxel entero, igual que hace el bucle de
/// captura al dibujar sobre la imagen.
pub fn to_hand_points(
    landmarks: &[NormalizedLandmark],
    width: u32,
    height: u32,
) -> Result<HandPoints, LandmarkError> {
    if landmarks.len() != NUM_LANDMARKS {
        return Err(LandmarkError::LandmarkCount {
            expected: NUM_LANDMARKS,
            actual: landmarks.len(),
        });
    }
    if width == 0 || height == 0 {
        return Err(LandmarkError::EmptyFrame { width, height });
    }

    let w = width as f32;
    let h = height as f32;
    let mut pixels = Vec::with_capacity(NUM_LANDMARKS);
    for (index, lm) in landmarks.iter().enumerate() {
        if !lm.x.is_finite() || !lm.y.is_finite() {
            return Err(LandmarkError::NonFinite { index });
        }
        pixels.push(Point::new((lm.x * w).trunc(), (lm.y * h).trunc()));
    }

    Ok(HandPoints {
        wrist: pixels[WRIST],
        thumb: FingerPoints::from_slice(FingerId::Thumb, &pixels[THUMB])?,
        index: FingerPoints::from_slice(FingerId::Index, &pixels[INDEX])?,
        middle: FingerPoints::from_slice(FingerId::Middle, &pixels[MIDDLE])?,
        ring: FingerPoints::from_slice(FingerId::Ring, &pixels[RING])?,
        pinky: FingerPoints::from_slice(FingerId::Pinky, &pixels[PINKY])?,
    })
}
