use crate::config::RenderConfig;
use crate::models::snapshot::{RoadId, RoadMetrics, Snapshot};

/// Fixed two-decimal rendering used for density and average speed.
pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

/// `Road N | Density: d | Avg Speed: s | Stopped: n [| Max-Vel: v]`
pub fn format_metrics_line(
    road: RoadId,
    metrics: Option<&RoadMetrics>,
    max_speed: Option<f64>,
) -> String {
    let mut line = match metrics {
        Some(m) => format!(
            "{} | Density: {} | Avg Speed: {} | Stopped: {}",
            road,
            format_two_decimals(m.density),
            format_two_decimals(m.average_speed),
            m.stopped_vehicles
        ),
        None => format!("{} | metrics unavailable", road),
    };
    if let Some(vmax) = max_speed {
        line.push_str(&format!(" | Max-Vel: {}", vmax));
    }
    line
}

/// One text region per road, overwritten on every frame.
#[derive(Debug, Clone, Default)]
pub struct MetricsPanel {
    regions: [String; 2],
    max_speed: Option<f64>,
}

impl MetricsPanel {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            regions: Default::default(),
            max_speed: config.show_max_speed.then_some(config.max_speed),
        }
    }

    pub fn update(&mut self, snapshot: &Snapshot) {
        for road in RoadId::ALL {
            self.regions[road.index()] =
                format_metrics_line(road, snapshot.road_metrics(road), self.max_speed);
        }
    }

    /// Current text of a road's region; empty until the first frame.
    pub fn line(&self, road: RoadId) -> &str {
        &self.regions[road.index()]
    }
}
