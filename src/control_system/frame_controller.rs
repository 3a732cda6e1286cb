use crate::communication::messages::StreamEvent;
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::models::snapshot::{RoadId, Snapshot};
use crate::monitoring::metrics_log::MetricsLog;
use crate::monitoring::metrics_panel::MetricsPanel;
use crate::rendering::scene::RoadSceneRenderer;
use crate::rendering::surface::RenderSurface;
use log::{debug, error, info, warn};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Rendering,
}

/// Counters kept across frames. Snapshot contents are never retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_rendered: u64,
    pub snapshots_rejected: u64,
    pub last_step: Option<u64>,
}

/// Owns the surface and turns each snapshot into one complete frame.
///
/// Rendering is synchronous and run-to-completion, so a newer snapshot can
/// only ever replace a finished frame. Invalid payloads are rejected before
/// the surface is touched and the previous frame stays visible.
///
/// Frames are drawn into a back surface and swapped in only once every
/// primitive succeeded, so a drawing error also keeps the previous frame.
pub struct FrameController<S: RenderSurface> {
    config: RenderConfig,
    surface: S,
    back: S,
    scene: RoadSceneRenderer,
    panel: MetricsPanel,
    metrics_log: Option<MetricsLog>,
    state: FrameState,
    stats: FrameStats,
}

impl<S: RenderSurface + Clone> FrameController<S> {
    pub fn new(config: RenderConfig, surface: S) -> RenderResult<Self> {
        config.validate()?;
        if surface.size() != config.canvas_size() {
            return Err(RenderError::Config(format!(
                "surface is {:?} but the config describes {:?}",
                surface.size(),
                config.canvas_size()
            )));
        }
        Ok(Self {
            scene: RoadSceneRenderer::from_config(&config),
            panel: MetricsPanel::from_config(&config),
            metrics_log: config.metrics_csv.clone().map(MetricsLog::new),
            config,
            back: surface.clone(),
            surface,
            state: FrameState::Idle,
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn panel(&self) -> &MetricsPanel {
        &self.panel
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Entry point for one `simulation_state` payload. Returns the rendered step.
    pub fn handle_snapshot(&mut self, payload: Value) -> RenderResult<u64> {
        let snapshot = Snapshot::from_value(payload).map_err(|e| self.reject(e))?;
        self.render(&snapshot)
    }

    /// Same as [`handle_snapshot`](Self::handle_snapshot) for a raw message body.
    pub fn handle_message(&mut self, body: &[u8]) -> RenderResult<u64> {
        let snapshot = Snapshot::from_slice(body).map_err(|e| self.reject(e))?;
        self.render(&snapshot)
    }

    /// Dispatches a stream event. Never fails: lifecycle events are only logged
    /// and render failures are logged and dropped. Returns the step when a frame was drawn.
    pub fn handle_event(&mut self, event: StreamEvent) -> Option<u64> {
        match event {
            StreamEvent::Connect => {
                info!("Connected to simulation stream.");
                None
            }
            StreamEvent::Disconnect => {
                info!("Disconnected from simulation stream; keeping the last frame.");
                None
            }
            StreamEvent::ConnectError(reason) => {
                error!("Connection error: {}", reason);
                None
            }
            StreamEvent::SimulationState(body) => match self.handle_message(&body) {
                Ok(step) => Some(step),
                Err(RenderError::MalformedSnapshot(_)) => None,
                Err(e) => {
                    error!("Failed to render frame: {}", e);
                    None
                }
            },
        }
    }

    /// Clears the surface and draws a full frame: lane bands, the shared grid,
    /// road 1 vehicles, road 2 vehicles, then the metrics panel.
    pub fn render(&mut self, snapshot: &Snapshot) -> RenderResult<u64> {
        self.state = FrameState::Rendering;
        let result = self.draw_frame(snapshot);
        self.state = FrameState::Idle;
        result?;
        std::mem::swap(&mut self.surface, &mut self.back);

        self.panel.update(snapshot);
        if let Some(log) = &self.metrics_log {
            if let Err(e) = log.append(snapshot) {
                warn!("Could not append metrics to {}: {}", log.path().display(), e);
            }
        }

        self.stats.frames_rendered += 1;
        self.stats.last_step = Some(snapshot.step);
        debug!(
            "Rendered step {} ({} / {} vehicles)",
            snapshot.step,
            snapshot.vehicles(RoadId::Road1).len(),
            snapshot.vehicles(RoadId::Road2).len()
        );
        Ok(snapshot.step)
    }

    fn draw_frame(&mut self, snapshot: &Snapshot) -> RenderResult<()> {
        self.back.clear()?;
        for road in RoadId::ALL {
            self.scene.draw_band(&mut self.back, road)?;
        }
        self.scene.draw_grid(&mut self.back)?;
        for road in RoadId::ALL {
            let vehicles = snapshot.vehicles(road);
            let drawn = self.scene.draw_vehicles(&mut self.back, road, vehicles)?;
            if drawn < vehicles.len() {
                debug!(
                    "Step {}: {} of {} vehicles on {} were off the canvas",
                    snapshot.step,
                    vehicles.len() - drawn,
                    vehicles.len(),
                    road
                );
            }
        }
        Ok(())
    }

    fn reject(&mut self, e: RenderError) -> RenderError {
        self.stats.snapshots_rejected += 1;
        warn!("Invalid simulation state received: {}", e);
        e
    }
}
