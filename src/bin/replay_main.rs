// replay_main.rs
use log::{error, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::process;
use traffic_canvas::communication::messages::StreamEvent;
use traffic_canvas::rendering::BitmapSurface;
use traffic_canvas::{FrameController, RenderConfig, RenderResult, RoadId};

// Renders a JSON-lines recording through the live code path and saves the last frame.
fn replay(input: &str, config: RenderConfig) -> RenderResult<()> {
    let (width, height) = config.canvas_size();
    let surface = BitmapSurface::new(width, height, config.background);
    let output = config.frame_output.clone();
    let mut controller = FrameController::new(config, surface)?;

    let reader = BufReader::new(File::open(input)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        controller.handle_event(StreamEvent::SimulationState(line.into_bytes()));
    }

    let stats = controller.stats();
    info!(
        "Replayed {} frame(s), rejected {} snapshot(s)",
        stats.frames_rendered, stats.snapshots_rejected
    );
    if let Some(step) = stats.last_step {
        for road in RoadId::ALL {
            println!("{}", controller.panel().line(road));
        }
        controller.surface().save_png(&output)?;
        info!("Step {} written to {}", step, output.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: replay_main <snapshots.jsonl> [config.json]");
        process::exit(2);
    };
    let config = match args.next() {
        Some(path) => match RenderConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => RenderConfig::default(),
    };

    if let Err(e) = replay(&input, config) {
        error!("Replay failed: {}", e);
        process::exit(1);
    }
}
