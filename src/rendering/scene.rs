use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::models::snapshot::{RoadId, Vehicle};
use crate::rendering::glyph::VehicleGlyphRenderer;
use crate::rendering::mapper::CoordinateMapper;
use crate::rendering::surface::{Rect, RenderSurface, Rgba};
use log::debug;

const ROAD_SURFACE: Rgba = Rgba::rgba(52, 58, 64, 0.3);
const GRID_LINE: Rgba = Rgba::rgba(0, 0, 0, 0.6);

/// Static road elements plus the vehicles on them.
#[derive(Debug, Clone)]
pub struct RoadSceneRenderer {
    mapper: CoordinateMapper,
    glyphs: VehicleGlyphRenderer,
    canvas_height: f64,
    road_height: f64,
    grid_width: f64,
    lane_centers: [f64; 2],
    highlight_leaders: [bool; 2],
}

impl RoadSceneRenderer {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            mapper: CoordinateMapper::from_config(config),
            glyphs: VehicleGlyphRenderer::from_config(config),
            canvas_height: config.canvas_height as f64,
            road_height: config.road_height as f64,
            grid_width: config.grid_width,
            lane_centers: RoadId::ALL.map(|road| config.lane_center(road)),
            highlight_leaders: config.highlight_leaders,
        }
    }

    pub fn lane_center(&self, road: RoadId) -> f64 {
        self.lane_centers[road.index()]
    }

    /// Translucent band across the full width, centred on the lane.
    pub fn draw_band<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        road: RoadId,
    ) -> RenderResult<()> {
        let top = self.lane_center(road) - self.road_height / 2.0;
        let band = Rect::new(0.0, top, self.mapper.canvas_width(), self.road_height);
        surface.fill_rect(band, ROAD_SURFACE)
    }

    /// Full-height line at every cell boundary. Drawn once per frame, shared by both roads.
    pub fn draw_grid<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> RenderResult<()> {
        for x in self.mapper.cell_boundaries() {
            surface.line((x, 0.0), (x, self.canvas_height), GRID_LINE, self.grid_width)?;
        }
        Ok(())
    }

    /// Draws the road's vehicles in list order and returns how many landed on
    /// the canvas. Only index 0 is treated as the leader.
    pub fn draw_vehicles<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        road: RoadId,
        vehicles: &[Vehicle],
    ) -> RenderResult<usize> {
        let center_y = self.lane_center(road);
        let highlight = self.highlight_leaders[road.index()];
        let mut drawn = 0;

        for (index, vehicle) in vehicles.iter().enumerate() {
            let Some(x) = self.mapper.pixel_x(vehicle.position) else {
                debug!(
                    "{}: vehicle {} at position {} is off the canvas, skipped",
                    road, index, vehicle.position
                );
                continue;
            };
            self.glyphs
                .draw(surface, vehicle, x, center_y, highlight && index == 0)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::{DrawCommand, RecordingSurface};

    fn vehicle(position: f64, velocity: f64) -> Vehicle {
        Vehicle {
            position,
            velocity,
            adaptive_cruise_control: false,
        }
    }

    #[test]
    fn band_is_centred_on_the_lane() {
        let scene = RoadSceneRenderer::from_config(&RenderConfig::default());
        let mut surface = RecordingSurface::new(2000, 600);
        scene.draw_band(&mut surface, RoadId::Road2).unwrap();
        assert_eq!(
            surface.commands(),
            &[DrawCommand::FillRect {
                rect: Rect::new(0.0, 340.0, 2000.0, 120.0),
                color: ROAD_SURFACE
            }]
        );
    }

    #[test]
    fn grid_has_one_line_per_cell_boundary() {
        let scene = RoadSceneRenderer::from_config(&RenderConfig::default());
        let mut surface = RecordingSurface::new(2000, 600);
        scene.draw_grid(&mut surface).unwrap();
        assert_eq!(surface.commands().len(), 101);
        assert_eq!(
            surface.commands()[100],
            DrawCommand::Line {
                from: (2000.0, 0.0),
                to: (2000.0, 600.0),
                color: GRID_LINE,
                width: 1.5
            }
        );
    }

    #[test]
    fn only_the_first_vehicle_gets_the_leader_dot() {
        let scene = RoadSceneRenderer::from_config(&RenderConfig::default());
        let mut surface = RecordingSurface::new(2000, 600);
        let drawn = scene
            .draw_vehicles(
                &mut surface,
                RoadId::Road1,
                &[vehicle(10.0, 1.0), vehicle(20.0, 2.0), vehicle(30.0, 3.0)],
            )
            .unwrap();
        assert_eq!(drawn, 3);
        let dots: Vec<_> = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .collect();
        assert_eq!(dots.len(), 1);
        assert!(matches!(
            dots[0],
            DrawCommand::FillCircle { center: (x, _), .. } if *x == 210.0
        ));
    }

    #[test]
    fn leader_highlighting_can_be_disabled_per_road() {
        let config = RenderConfig {
            highlight_leaders: [true, false],
            ..RenderConfig::default()
        };
        let scene = RoadSceneRenderer::from_config(&config);
        let mut surface = RecordingSurface::new(2000, 600);
        scene
            .draw_vehicles(&mut surface, RoadId::Road2, &[vehicle(0.0, 1.0)])
            .unwrap();
        assert!(!surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillCircle { .. })));
    }

    #[test]
    fn off_canvas_vehicles_are_skipped_and_the_rest_still_drawn() {
        let scene = RoadSceneRenderer::from_config(&RenderConfig::default());
        let mut surface = RecordingSurface::new(2000, 600);
        let drawn = scene
            .draw_vehicles(
                &mut surface,
                RoadId::Road1,
                &[vehicle(140.0, 1.0), vehicle(-3.0, 1.0), vehicle(5.0, 1.0)],
            )
            .unwrap();
        assert_eq!(drawn, 1);
        assert!(matches!(
            surface.commands()[0],
            DrawCommand::FillRect { rect, .. } if rect.x == 100.0
        ));
        // The leader was skipped, so nobody gets the dot.
        assert!(!surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillCircle { .. })));
    }
}
