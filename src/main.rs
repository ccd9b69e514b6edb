/*
Reconocimiento de gestos de mano en tiempo real

Lee un frame por línea desde stdin (JSON), por ejemplo:
    {"width": 640, "height": 480, "landmarks": [[0.51, 0.88], ...]}
    {"width": 640, "height": 480, "landmarks": null}

y escribe en stdout una línea por cada frame con gesto confirmado:
    {"frame": 57, "gesture": "peace"}

Los logs van a stderr (RUST_LOG=debug para ver cada frame).
*/

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, unbounded, Sender};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gestomano::{GestureLabel, GesturePipeline, LandmarkFrame, PipelineConfig};

#[derive(Parser, Debug)]
#[command(
    name = "gestomano",
    about = "Clasificador de gestos de mano por landmarks"
)]
struct Cli {
    /// Configuración JSON (ventana, umbrales, reglas)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Serialize)]
struct ConfirmedGesture {
    frame: u64,
    gesture: GestureLabel,
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path)),
        None => Ok(PipelineConfig::default()),
    }
}

/// Envía por `tx` cada línea JSON válida de `input`, numerada por línea.
/// Termina en EOF, con un error de lectura o en cuanto el receptor desaparece.
/// Devuelve el número de frames enviados.
fn forward_frames<R: BufRead>(input: R, tx: &Sender<(u64, LandmarkFrame)>) -> usize {
    let mut sent = 0;
    for (idx, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Error leyendo stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LandmarkFrame>(&line) {
            Ok(frame) => {
                if tx.send((idx as u64, frame)).is_err() {
                    break;
                }
                sent += 1;
            }
            Err(e) => warn!("Línea {} descartada: {}", idx + 1, e),
        }
    }
    sent
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let mut pipeline = GesturePipeline::new(&config);
    info!(
        "Ventana de {} frames, {} reglas, sin mano: {:?}",
        pipeline.buffer().window_size(),
        config.rules.len(),
        config.miss_policy
    );
    info!("Gestos: {:?}", pipeline.classifier().get_labels());

    // Canal para recibir frames del tracker
    let (tx_frame, rx_frame) = bounded::<(u64, LandmarkFrame)>(100);
    // Canal hacia la salida
    let (tx_gesture, rx_gesture) = unbounded::<ConfirmedGesture>();

    let reader = std::thread::spawn(move || forward_frames(io::stdin().lock(), &tx_frame));

    let writer = std::thread::spawn(move || -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for confirmed in rx_gesture {
            serde_json::to_writer(&mut out, &confirmed)?;
            writeln!(out)?;
            out.flush()?;
        }
        Ok(())
    });

    let mut frames_received = 0u64;
    let mut frames_skipped = 0u64;
    let mut output_closed = false;

    for (idx, frame) in rx_frame {
        frames_received += 1;
        match pipeline.process(&frame) {
            Ok(report) => {
                if let Some(gesture) = report.confirmed {
                    if tx_gesture
                        .send(ConfirmedGesture {
                            frame: idx,
                            gesture,
                        })
                        .is_err()
                    {
                        output_closed = true;
                        break;
                    }
                }
            }
            Err(e) => {
                frames_skipped += 1;
                warn!("Frame {} descartado: {}", idx, e);
            }
        }
    }
    drop(tx_gesture);

    if output_closed {
        // el lector puede seguir bloqueado en stdin hasta EOF: no se espera,
        // el hilo muere con el proceso
        warn!("Salida cerrada, se deja de leer stdin");
    } else if reader.join().is_err() {
        error!("El hilo lector terminó con pánico");
    }
    match writer.join() {
        Ok(result) => result?,
        Err(_) => error!("El hilo de salida terminó con pánico"),
    }

    info!(
        "Fin de la entrada: {} frames, {} descartados",
        frames_received, frames_skipped
    );
    Ok(())
}
