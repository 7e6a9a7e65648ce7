//! Day/night cycle and the lighting parameters derived from it.
//!
//! The clock runs in minutes of a 24h day.  Its ratio through the day
//! drives both the sun's orbit and a set of colour keyframes that are
//! blended across the sunrise, daytime and sunset bands.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

use crate::error::ClockParseError;

pub const MINUTES_PER_DAY: f32 = 1440.0;

// ── Colour keyframes ────────────────────────────────────────────────────────

pub mod keyframes {
    use glam::Vec3;

    pub const LIGHT_SUNRISE: Vec3 = Vec3::new(1.0, 0.4, 0.2);
    pub const LIGHT_NOON:    Vec3 = Vec3::new(1.0, 1.0, 0.9);
    pub const LIGHT_SUNSET:  Vec3 = Vec3::new(1.0, 0.4, 0.2);
    pub const LIGHT_NIGHT:   Vec3 = Vec3::new(0.6, 0.7, 0.9);

    pub const AMBIENT_SUNRISE: Vec3 = Vec3::new(0.3, 0.2, 0.2);
    pub const AMBIENT_NOON:    Vec3 = Vec3::new(0.5, 0.5, 0.5);
    pub const AMBIENT_NIGHT:   Vec3 = Vec3::new(0.05, 0.05, 0.15);

    pub const SKY_SUNRISE: Vec3 = Vec3::new(0.6, 0.3, 0.3);
    pub const SKY_NOON:    Vec3 = Vec3::new(0.5, 0.8, 1.0);
    pub const SKY_NIGHT:   Vec3 = Vec3::new(0.01, 0.01, 0.05);
}

/// Colours handed to the lit pass for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingState {
    pub light_color: Vec3,
    pub ambient_color: Vec3,
    pub sky_color: Vec3,
}

#[inline]
fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Lighting for a point in the day, `ratio` in `[0, 1)` (0 = midnight).
pub fn lighting_at(ratio: f32) -> LightingState {
    use keyframes::*;

    if ratio > 0.2 && ratio < 0.3 {
        let i = (ratio - 0.2) / 0.1;
        LightingState {
            light_color: lerp(LIGHT_NIGHT, LIGHT_SUNRISE, i),
            ambient_color: lerp(AMBIENT_NIGHT, AMBIENT_SUNRISE, i),
            sky_color: lerp(SKY_NIGHT, SKY_SUNRISE, i),
        }
    } else if (0.3..=0.7).contains(&ratio) {
        let i = (ratio - 0.3) / 0.4;
        if i < 0.5 {
            let t = i * 2.0;
            LightingState {
                light_color: lerp(LIGHT_SUNRISE, LIGHT_NOON, t),
                ambient_color: lerp(AMBIENT_SUNRISE, AMBIENT_NOON, t),
                sky_color: lerp(SKY_SUNRISE, SKY_NOON, t),
            }
        } else {
            let t = (i - 0.5) * 2.0;
            LightingState {
                light_color: lerp(LIGHT_NOON, LIGHT_SUNSET, t),
                ambient_color: lerp(AMBIENT_NOON, AMBIENT_SUNRISE, t),
                sky_color: lerp(SKY_NOON, SKY_SUNRISE, t),
            }
        }
    } else if ratio > 0.7 && ratio < 0.8 {
        let i = (ratio - 0.7) / 0.1;
        LightingState {
            light_color: lerp(LIGHT_SUNSET, LIGHT_NIGHT, i),
            ambient_color: lerp(AMBIENT_SUNRISE, AMBIENT_NIGHT, i),
            sky_color: lerp(SKY_SUNRISE, SKY_NIGHT, i),
        }
    } else {
        LightingState {
            light_color: LIGHT_NIGHT,
            ambient_color: AMBIENT_NIGHT,
            sky_color: SKY_NIGHT,
        }
    }
}

/// Orthographic light-space matrix looking from `light_pos` at the origin.
///
/// `extent` is the half-width of the square shadow volume.
pub fn light_space_matrix(light_pos: Vec3, extent: f32, near: f32, far: f32) -> Mat4 {
    let projection = Mat4::orthographic_rh_gl(-extent, extent, -extent, extent, near, far);
    // look_at degenerates when the light is straight above the origin
    let up = if light_pos.normalize_or_zero().cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    projection * Mat4::look_at_rh(light_pos, Vec3::ZERO, up)
}

/// Parses `HH:MM` (24h, two digits each) into minutes past midnight.
pub fn parse_clock_time(text: &str) -> Result<f32, ClockParseError> {
    let format_err = || ClockParseError::Format(text.to_owned());
    let (h, m) = text.split_once(':').ok_or_else(format_err)?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(h) || !two_digits(m) {
        return Err(format_err());
    }
    let hours: u32 = h.parse().map_err(|_| format_err())?;
    let minutes: u32 = m.parse().map_err(|_| format_err())?;
    if hours > 23 {
        return Err(ClockParseError::Hour(hours));
    }
    if minutes > 59 {
        return Err(ClockParseError::Minute(minutes));
    }
    Ok((hours * 60 + minutes) as f32)
}

// ── Day cycle ───────────────────────────────────────────────────────────────

/// Clock plus sun orbit.
#[derive(Debug, Clone)]
pub struct DayCycle {
    minutes: f32,
    /// Clock minutes per real second.
    speed: f32,
    orbit_radius: f32,
    paused: bool,
    sun_enabled: bool,
}

impl Default for DayCycle {
    /// 08:00, two-minute days, orbit radius 75.
    fn default() -> Self {
        Self::new(480.0, 120.0, 75.0)
    }
}

impl DayCycle {
    /// `day_duration` is the real-time length of one full day in seconds.
    pub fn new(start_minutes: f32, day_duration: f32, orbit_radius: f32) -> Self {
        let speed = if day_duration > 0.0 { MINUTES_PER_DAY / day_duration } else { 0.0 };
        Self {
            minutes: start_minutes.rem_euclid(MINUTES_PER_DAY),
            speed,
            orbit_radius,
            paused: false,
            sun_enabled: true,
        }
    }

    /// Advances the clock by `dt` seconds unless paused.
    pub fn advance(&mut self, dt: f32) {
        if !self.paused {
            self.minutes = (self.minutes + self.speed * dt).rem_euclid(MINUTES_PER_DAY);
        }
    }

    #[inline]
    pub fn minutes(&self) -> f32 {
        self.minutes
    }

    pub fn set_minutes(&mut self, minutes: f32) {
        self.minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    }

    /// Parses `text` and jumps the clock there.  On error the clock is left
    /// where it was.
    pub fn set_clock_time(&mut self, text: &str) -> Result<(), ClockParseError> {
        let minutes = parse_clock_time(text)?;
        self.set_minutes(minutes);
        log::info!("time of day set to {}", self.clock_label());
        Ok(())
    }

    /// Current time as `HH:MM`.
    pub fn clock_label(&self) -> String {
        let total = self.minutes as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    #[inline]
    pub fn ratio(&self) -> f32 {
        self.minutes / MINUTES_PER_DAY
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_sun_enabled(&self) -> bool {
        self.sun_enabled
    }

    pub fn set_sun_enabled(&mut self, enabled: bool) {
        self.sun_enabled = enabled;
    }

    /// Sun position on its orbit around the origin.
    pub fn sun_position(&self) -> Vec3 {
        let ratio = self.ratio();
        let angle = ratio * TAU;
        let r = self.orbit_radius;
        Vec3::new(angle.cos() * r, (ratio * PI).sin() * (r * 0.5) + 5.0, angle.sin() * r)
    }

    /// Colours for the current time.  A disabled sun contributes no light.
    pub fn lighting(&self) -> LightingState {
        let mut state = lighting_at(self.ratio());
        if !self.sun_enabled {
            state.light_color = Vec3::ZERO;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noon_uses_noon_keyframes() {
        let s = lighting_at(0.5);
        assert!(s.light_color.abs_diff_eq(keyframes::LIGHT_NOON, 1e-6));
        assert!(s.ambient_color.abs_diff_eq(keyframes::AMBIENT_NOON, 1e-6));
        assert!(s.sky_color.abs_diff_eq(keyframes::SKY_NOON, 1e-6));
    }

    #[test]
    fn early_morning_is_night() {
        let s = lighting_at(0.1);
        assert_eq!(s.sky_color, keyframes::SKY_NIGHT);
        assert_eq!(s.light_color, keyframes::LIGHT_NIGHT);
    }

    #[test]
    fn dawn_is_between_night_and_sunrise() {
        let s = lighting_at(0.25);
        let mid = keyframes::SKY_NIGHT.lerp(keyframes::SKY_SUNRISE, 0.5);
        assert!(s.sky_color.abs_diff_eq(mid, 1e-5));
    }

    #[test]
    fn clock_wraps_around_midnight() {
        let mut day = DayCycle::new(1430.0, 120.0, 75.0);
        // 12 minutes per second
        day.advance(1.0);
        assert!((day.minutes() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut day = DayCycle::default();
        day.set_paused(true);
        day.advance(10.0);
        assert_eq!(day.minutes(), 480.0);
    }

    #[test]
    fn parse_accepts_valid_times() {
        assert_eq!(parse_clock_time("07:30"), Ok(450.0));
        assert_eq!(parse_clock_time("00:00"), Ok(0.0));
        assert_eq!(parse_clock_time("23:59"), Ok(1439.0));
    }

    #[test]
    fn parse_rejects_malformed_times() {
        assert_eq!(parse_clock_time("24:00"), Err(ClockParseError::Hour(24)));
        assert_eq!(parse_clock_time("12:60"), Err(ClockParseError::Minute(60)));
        assert!(matches!(parse_clock_time("7:30"), Err(ClockParseError::Format(_))));
        assert!(matches!(parse_clock_time("ab:cd"), Err(ClockParseError::Format(_))));
        assert!(matches!(parse_clock_time("0730"), Err(ClockParseError::Format(_))));
    }

    #[test]
    fn bad_time_leaves_clock_unchanged() {
        let mut day = DayCycle::default();
        assert!(day.set_clock_time("25:00").is_err());
        assert_eq!(day.minutes(), 480.0);
        day.set_clock_time("18:15").unwrap();
        assert_eq!(day.clock_label(), "18:15");
    }

    #[test]
    fn sun_is_lowest_at_midnight() {
        let mut day = DayCycle::default();
        day.set_minutes(0.0);
        let p = day.sun_position();
        assert!(p.abs_diff_eq(Vec3::new(75.0, 5.0, 0.0), 1e-4));
    }

    #[test]
    fn disabled_sun_is_dark() {
        let mut day = DayCycle::default();
        day.set_sun_enabled(false);
        assert_eq!(day.lighting().light_color, Vec3::ZERO);
    }

    #[test]
    fn light_space_projects_origin_inside_clip_volume() {
        let m = light_space_matrix(Vec3::new(-25.0, 40.0, -25.0), 60.0, 1.0, 200.0);
        let clip = m.project_point3(Vec3::ZERO);
        assert!(clip.abs().cmple(Vec3::ONE).all());

        // directly overhead must not produce NaNs
        let m = light_space_matrix(Vec3::new(0.0, 50.0, 0.0), 60.0, 1.0, 200.0);
        assert!(m.is_finite());
    }
}
