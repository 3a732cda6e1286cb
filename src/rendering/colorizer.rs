use crate::config::RenderConfig;
use crate::rendering::surface::Rgba;

/// Colour of a stopped vehicle.
pub const STOPPED: Rgba = Rgba::rgb(255, 0, 0);

/// Red -> yellow -> green velocity gradient.
///
/// Below the midpoint the green channel ramps up with red held at 255;
/// from the midpoint to `max_speed` the red channel ramps down with green
/// held at 255. Channels are floored and clamped to `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityColorizer {
    max_speed: f64,
    midpoint: f64,
}

impl VelocityColorizer {
    pub fn new(max_speed: f64, midpoint: f64) -> Self {
        Self {
            max_speed,
            midpoint,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.max_speed, config.gradient_midpoint)
    }

    pub fn color_for(&self, velocity: f64) -> Rgba {
        // Also catches NaN and the illegal negative velocities.
        if !(velocity > 0.0) {
            return STOPPED;
        }
        let velocity = velocity.min(self.max_speed);

        if velocity < self.midpoint {
            let green = channel(255.0 * velocity / self.midpoint);
            Rgba::rgb(255, green, 0)
        } else {
            let span = self.max_speed - self.midpoint;
            let red = if span > 0.0 {
                channel(255.0 * (1.0 - (velocity - self.midpoint) / span))
            } else {
                0
            };
            Rgba::rgb(red, 255, 0)
        }
    }
}

/// Floors and clamps a colour intensity into a byte.
pub fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colorizer() -> VelocityColorizer {
        VelocityColorizer::new(3.0, 2.0)
    }

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(colorizer().color_for(0.0).channels(), (255, 0, 0));
        assert_eq!(colorizer().color_for(3.0).channels(), (0, 255, 0));
        assert_eq!(colorizer().color_for(2.0).channels(), (255, 255, 0));
    }

    #[test]
    fn intermediate_values_are_floored() {
        assert_eq!(colorizer().color_for(1.0).channels(), (255, 127, 0));
        assert_eq!(colorizer().color_for(2.5).channels(), (127, 255, 0));
    }

    #[test]
    fn gradient_is_monotonic_across_the_speed_range() {
        let colorizer = colorizer();
        let mut previous = colorizer.color_for(0.0);
        for i in 1..=300 {
            let color = colorizer.color_for(i as f64 * 0.01);
            assert_eq!(color.b, 0);
            if previous.r == 255 && color.r == 255 {
                assert!(color.g >= previous.g);
            } else {
                assert_eq!(color.g, 255);
                assert!(color.r <= previous.r);
            }
            previous = color;
        }
    }

    #[test]
    fn illegal_velocities_degrade_gracefully() {
        let colorizer = colorizer();
        assert_eq!(colorizer.color_for(-1.0), STOPPED);
        assert_eq!(colorizer.color_for(f64::NAN), STOPPED);
        assert_eq!(colorizer.color_for(12.0).channels(), (0, 255, 0));
    }

    #[test]
    fn midpoint_equal_to_max_speed_jumps_straight_to_green() {
        let colorizer = VelocityColorizer::new(2.0, 2.0);
        assert_eq!(colorizer.color_for(1.0).channels(), (255, 127, 0));
        assert_eq!(colorizer.color_for(2.0).channels(), (0, 255, 0));
    }

    #[test]
    fn channel_clamps() {
        assert_eq!(channel(-4.0), 0);
        assert_eq!(channel(300.0), 255);
        assert_eq!(channel(12.9), 12);
    }
}
