// viewer_main.rs
use log::{debug, error, info};
use std::process;
use traffic_canvas::communication::stream_client::consume_snapshots;
use traffic_canvas::global_variables::{AMQP_URL, QUEUE_SIMULATION_STATE};
use traffic_canvas::rendering::BitmapSurface;
use traffic_canvas::{FrameController, RenderConfig, RenderResult, RoadId};

fn load_config() -> RenderConfig {
    match std::env::args().nth(1) {
        Some(path) => match RenderConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Could not load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => RenderConfig::default(),
    }
}

fn run_viewer(config: RenderConfig) -> RenderResult<()> {
    let (width, height) = config.canvas_size();
    let surface = BitmapSurface::new(width, height, config.background);
    let output = config.frame_output.clone();
    let mut controller = FrameController::new(config, surface)?;

    consume_snapshots(AMQP_URL, QUEUE_SIMULATION_STATE, |event| {
        if let Some(step) = controller.handle_event(event) {
            for road in RoadId::ALL {
                info!("{}", controller.panel().line(road));
            }
            match controller.surface().save_png(&output) {
                Ok(()) => debug!("Step {} written to {}", step, output.display()),
                Err(e) => error!("Could not write {}: {}", output.display(), e),
            }
        }
    })?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let config = load_config();
    info!(
        "Rendering {}x{} canvas from queue '{}'",
        config.canvas_width(),
        config.canvas_height,
        QUEUE_SIMULATION_STATE
    );

    // The amiquip consumer blocks, keep it off the async workers.
    let viewer = tokio::task::spawn_blocking(move || run_viewer(config));
    match viewer.await {
        Ok(Ok(())) => info!("Viewer stopped."),
        Ok(Err(e)) => error!("Viewer error: {}", e),
        Err(e) => error!("Viewer task failed: {}", e),
    }
}
