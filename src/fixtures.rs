//! Manos sintéticas para tests

use crate::landmarks::to_hand_points;
use crate::types::{HandPoints, NormalizedLandmark};

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

const WRIST: (f32, f32) = (0.5, 0.9);
const PINKY_MCP: (f32, f32) = (0.65, 0.64);
const CURL_MCPS: [(f32, f32); 4] = [(0.42, 0.6), (0.5, 0.58), (0.58, 0.6), PINKY_MCP];

fn lm((x, y): (f32, f32)) -> NormalizedLandmark {
    NormalizedLandmark::new(x, y)
}

/// Mano derecha de frente con la palma hacia la cámara. `straight` indica,
/// en el orden pulgar..meñique, qué dedos están estirados.
pub fn hand_landmarks(straight: [bool; 5]) -> Vec<NormalizedLandmark> {
    let mut out = Vec::with_capacity(21);
    out.push(lm(WRIST));

    out.push(lm((0.42, 0.85)));
    out.push(lm((0.36, 0.78)));
    if straight[0] {
        out.push(lm((0.31, 0.72)));
        out.push(lm((0.27, 0.67)));
    } else {
        // punta recogida sobre la palma
        out.push(lm((0.42, 0.72)));
        out.push(lm((0.5, 0.7)));
    }

    for (i, &(mx, my)) in CURL_MCPS.iter().enumerate() {
        out.push(lm((mx, my)));
        if straight[i + 1] {
            out.push(lm((mx, my - 0.08)));
            out.push(lm((mx, my - 0.14)));
            out.push(lm((mx, my - 0.19)));
        } else {
            // la punta vuelve hacia la palma
            out.push(lm((mx, my - 0.06)));
            out.push(lm((mx + 0.01, my - 0.05)));
            out.push(lm((mx + 0.01, my - 0.01)));
        }
    }

    out
}

pub fn hand_pixels(straight: [bool; 5]) -> HandPoints {
    to_hand_points(&hand_landmarks(straight), FRAME_WIDTH, FRAME_HEIGHT)
        .expect("synthetic hand has 21 landmarks")
}
