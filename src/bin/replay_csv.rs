use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gestomano::csv_loader::load_frames_from_csv;
use gestomano::types::FingerState;
use gestomano::{GestureLabel, GesturePipeline, LandmarkFrame, PipelineConfig};

/// Reproduce una grabación de landmarks (frame,landmark,x,y) por el pipeline
#[derive(Parser, Debug)]
#[command(name = "replay_csv")]
struct Args {
    /// Archivo CSV con la grabación
    csv: PathBuf,

    /// Ancho del frame original en píxeles
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Alto del frame original en píxeles
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Configuración JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Imprime el estado de cada dedo por frame
    #[arg(long)]
    dump_states: bool,
}

fn state_char(state: FingerState) -> char {
    match state {
        FingerState::Straight => '|',
        FingerState::Bent => '_',
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    println!("🎞️  Reproduciendo landmarks desde {:?}", args.csv);

    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => PipelineConfig::default(),
    };
    let recording = load_frames_from_csv(&args.csv)?;
    info!("{} frames cargados", recording.len());

    let mut pipeline = GesturePipeline::new(&config);
    info!("Vocabulario: {:?}", pipeline.classifier().get_labels());
    let mut confirmed_frames: BTreeMap<GestureLabel, usize> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut without_hand = 0usize;

    for (idx, landmarks) in recording.into_iter().enumerate() {
        if landmarks.is_none() {
            without_hand += 1;
        }
        let frame = LandmarkFrame {
            width: args.width,
            height: args.height,
            landmarks,
        };

        let report = match pipeline.process(&frame) {
            Ok(report) => report,
            Err(e) => {
                skipped += 1;
                warn!("Frame {} descartado: {}", idx, e);
                continue;
            }
        };

        if let Some(gesture) = report.confirmed {
            *confirmed_frames.entry(gesture).or_insert(0) += 1;
        }

        if args.dump_states {
            let fingers: String = report
                .finger_states
                .map(|s| s.iter().map(|(_, st)| state_char(st)).collect())
                .unwrap_or_else(|| "-----".to_string());
            println!(
                "  {:05}  {}  {:<10} {}",
                idx,
                fingers,
                report.label.map(|l| l.as_str()).unwrap_or("-"),
                report
                    .confirmed
                    .map(|l| format!("✓ {}", l))
                    .unwrap_or_default()
            );
        }
    }

    println!(
        "\n📊 Frames sin mano: {}, descartados: {}",
        without_hand, skipped
    );
    if confirmed_frames.is_empty() {
        println!("⚠️  Ningún gesto confirmado");
    } else {
        println!("🥇 Frames con gesto confirmado:");
        for (label, count) in &confirmed_frames {
            println!("  {:<12} {:>6}", label, count);
        }
    }

    Ok(())
}
