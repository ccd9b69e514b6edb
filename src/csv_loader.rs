use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::{Reader, ReaderBuilder};

use crate::types::{NormalizedLandmark, NUM_LANDMARKS};

/// Landmarks de un frame grabado; `None` si en ese frame no hubo mano
pub type RecordedFrame = Option<Vec<NormalizedLandmark>>;

/// Carga una grabación de landmarks desde un CSV en el formato
/// frame,landmark,x,y ordenado por frame y landmark.
pub fn load_frames_from_csv(path: impl AsRef<Path>) -> Result<Vec<RecordedFrame>> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;
    read_frames(reader).with_context(|| format!("CSV inválido: {:?}", path))
}

/// Igual que `load_frames_from_csv` pero desde cualquier lector
pub fn load_frames_from_reader<R: Read>(input: R) -> Result<Vec<RecordedFrame>> {
    read_frames(ReaderBuilder::new().has_headers(true).from_reader(input))
}

fn read_frames<R: Read>(mut reader: Reader<R>) -> Result<Vec<RecordedFrame>> {
    let mut frames: BTreeMap<usize, BTreeMap<usize, NormalizedLandmark>> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida", row))?;
        if record.len() < 4 {
            bail!("La fila {} no tiene 4 columnas", row);
        }

        let frame: usize = record[0]
            .trim()
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row))?;
        let landmark: usize = record[1]
            .trim()
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row))?;
        ensure!(
            landmark < NUM_LANDMARKS,
            "Landmark {} fuera de rango (fila {})",
            landmark,
            row
        );

        let x: f32 = record[2]
            .trim()
            .parse()
            .with_context(|| format!("x inválida en fila {}", row))?;
        let y: f32 = record[3]
            .trim()
            .parse()
            .with_context(|| format!("y inválida en fila {}", row))?;

        let points = frames.entry(frame).or_default();
        if points.insert(landmark, NormalizedLandmark::new(x, y)).is_some() {
            bail!("Landmark {} repetido (fila {})", landmark, row);
        }
    }

    let max_frame = *frames
        .keys()
        .next_back()
        .ok_or_else(|| anyhow!("El CSV no contiene datos"))?;

    // Los frames sin filas son frames sin mano
    let recording = (0..=max_frame)
        .map(|idx| {
            frames
                .remove(&idx)
                .map(|points| points.into_values().collect())
        })
        .collect();

    Ok(recording)
}
