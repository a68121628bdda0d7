//! Pointer-proximity animator for the decorative blobs
//!
//! Each blob keeps three independent contributions to its transform:
//! - pointer repulsion (translation),
//! - scroll parallax (vertical translation, per-layer rate),
//! - click pulse (scale).
//!
//! The CSS transform is always rebuilt from all three, so one effect never
//! clobbers another.

use serde::{Deserialize, Serialize};

use super::config::BlobConfig;
use super::geometry::{css_number, px, Vec2};
use super::schedule::Generation;

/// Depth layer of a blob, taken from its class list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobRole {
    Foreground,
    Mid,
    Background,
    #[default]
    Generic,
}

impl BlobRole {
    /// Role from an element's `class` attribute
    pub fn from_class_name(class_name: &str) -> Self {
        class_name
            .split_whitespace()
            .find_map(|class| match class {
                "blob-foreground" => Some(BlobRole::Foreground),
                "blob-mid" => Some(BlobRole::Mid),
                "blob-background" => Some(BlobRole::Background),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Vertical parallax rate; generic blobs do not drift
    pub fn parallax_rate(self, config: &BlobConfig) -> Option<f64> {
        match self {
            BlobRole::Foreground => Some(config.foreground_rate),
            BlobRole::Mid => Some(config.mid_rate),
            BlobRole::Background => Some(config.background_rate),
            BlobRole::Generic => None,
        }
    }
}

/// Composed transform state of one blob
#[derive(Clone, Debug)]
pub struct Blob {
    pub role: BlobRole,
    pub pointer: Vec2,
    pub scroll_y: f64,
    pub scale: f64,
    pulse: Generation,
    transition_armed: bool,
}

impl Blob {
    pub fn new(role: BlobRole) -> Self {
        Self {
            role,
            pointer: Vec2::ZERO,
            scroll_y: 0.0,
            scale: 1.0,
            pulse: Generation::default(),
            transition_armed: false,
        }
    }

    /// CSS `transform` value for the current composition
    pub fn transform(&self) -> String {
        let offset = self.pointer + Vec2::new(0.0, self.scroll_y);
        let translate = format!("translate({}, {})", px(offset.x), px(offset.y));
        if self.scale == 1.0 {
            translate
        } else {
            format!("{translate} scale({})", css_number(self.scale))
        }
    }

    /// Start a pulse. Returns the ticket its revert must present, and whether
    /// the pulse transition still has to be written to the element.
    pub fn begin_pulse(&mut self, scale: f64) -> (Generation, bool) {
        self.scale = scale;
        let arm = !self.transition_armed;
        self.transition_armed = true;
        (self.pulse.bump(), arm)
    }

    /// End a pulse. Returns false if a newer pulse superseded this one.
    pub fn end_pulse(&mut self, ticket: Generation) -> bool {
        if !self.pulse.is_current(ticket) {
            return false;
        }
        self.scale = 1.0;
        true
    }
}

/// Displacement that pushes a blob centered at `center` away from `pointer`.
///
/// Inside the radius the push is `damping * radius * force` along the
/// pointer-to-center direction, where `force = (radius - d) / radius`.
/// At or beyond the radius, and exactly on the center (no direction), the
/// result is zero.
pub fn repulsion(pointer: Vec2, center: Vec2, config: &BlobConfig) -> Vec2 {
    let delta = pointer - center;
    let distance = delta.length();
    if distance >= config.repulsion_radius || distance == 0.0 {
        return Vec2::ZERO;
    }
    let force = (config.repulsion_radius - distance) / config.repulsion_radius;
    let direction = delta * (1.0 / distance);
    -direction * (force * config.repulsion_radius * config.repulsion_damping)
}

/// Whether a click lands close enough to a blob to pulse it
pub fn within_pulse(click: Vec2, center: Vec2, config: &BlobConfig) -> bool {
    click.distance(center) < config.pulse_radius
}

/// Parallax translation for a blob, or `None` past the active scroll range
pub fn parallax(
    role: BlobRole,
    offset: f64,
    viewport_height: f64,
    config: &BlobConfig,
) -> Option<f64> {
    if offset >= viewport_height * config.parallax_viewports {
        return None;
    }
    role.parallax_rate(config).map(|rate| offset * rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_class_name() {
        assert_eq!(BlobRole::from_class_name("blob blob-foreground"), BlobRole::Foreground);
        assert_eq!(BlobRole::from_class_name("blob-mid blob"), BlobRole::Mid);
        assert_eq!(BlobRole::from_class_name("blob  blob-background"), BlobRole::Background);
        assert_eq!(BlobRole::from_class_name("blob"), BlobRole::Generic);
        assert_eq!(BlobRole::from_class_name("blob-foregrounds"), BlobRole::Generic);
    }

    #[test]
    fn no_repulsion_at_or_beyond_radius() {
        let config = BlobConfig::default();
        let center = Vec2::new(500.0, 500.0);
        assert_eq!(repulsion(Vec2::new(620.0, 500.0), center, &config), Vec2::ZERO);
        assert_eq!(repulsion(Vec2::new(900.0, 100.0), center, &config), Vec2::ZERO);
    }

    #[test]
    fn repulsion_grows_as_pointer_approaches() {
        let config = BlobConfig::default();
        let center = Vec2::new(0.0, 0.0);
        let mut previous = 0.0;
        for d in (1..120).rev() {
            let push = repulsion(Vec2::new(d as f64, 0.0), center, &config);
            let magnitude = push.length();
            assert!(magnitude > previous, "push at d={} should exceed d={}", d, d + 1);
            previous = magnitude;
        }
        // Limit as d -> 0 is damping * radius
        assert!((previous - 36.0).abs() < 0.5);
    }

    #[test]
    fn repulsion_at_half_radius() {
        let config = BlobConfig::default();
        let push = repulsion(Vec2::new(60.0, 0.0), Vec2::new(0.0, 0.0), &config);
        assert!((push.x - -18.0).abs() < 1e-9, "got {:?}", push);
        assert!(push.y.abs() < 1e-9);

        let push = repulsion(Vec2::new(0.0, 90.0), Vec2::new(0.0, 0.0), &config);
        assert!((push.y - -9.0).abs() < 1e-9, "got {:?}", push);
    }

    #[test]
    fn repulsion_points_away_from_pointer() {
        let config = BlobConfig::default();
        let push = repulsion(Vec2::new(10.0, 20.0), Vec2::new(0.0, 0.0), &config);
        assert!(push.x < 0.0);
        assert!(push.y < 0.0);
    }

    #[test]
    fn pulse_radius_is_exclusive() {
        let config = BlobConfig::default();
        let center = Vec2::new(0.0, 0.0);
        assert!(within_pulse(Vec2::new(199.0, 0.0), center, &config));
        assert!(!within_pulse(Vec2::new(200.0, 0.0), center, &config));
    }

    #[test]
    fn background_moves_opposite_at_half_rate() {
        let config = BlobConfig::default();
        for offset in [0.0, 10.0, 333.0, 1999.0] {
            let fg = parallax(BlobRole::Foreground, offset, 1000.0, &config).unwrap();
            let bg = parallax(BlobRole::Background, offset, 1000.0, &config).unwrap();
            assert!((bg - (-0.5 * fg)).abs() < 1e-9);
        }
        assert_eq!(parallax(BlobRole::Foreground, 2000.0, 1000.0, &config), None);
        assert_eq!(parallax(BlobRole::Generic, 10.0, 1000.0, &config), None);
    }

    #[test]
    fn stale_pulse_end_is_ignored() {
        let mut blob = Blob::new(BlobRole::Mid);
        let (first, arm_first) = blob.begin_pulse(1.08);
        let (second, arm_second) = blob.begin_pulse(1.08);
        assert!(arm_first);
        assert!(!arm_second);

        assert!(!blob.end_pulse(first));
        assert_eq!(blob.scale, 1.08);
        assert!(blob.end_pulse(second));
        assert_eq!(blob.scale, 1.0);
    }

    #[test]
    fn transform_composes_all_contributions() {
        let mut blob = Blob::new(BlobRole::Foreground);
        assert_eq!(blob.transform(), "translate(0px, 0px)");
        blob.pointer = Vec2::new(-3.0, 4.0);
        blob.scroll_y = 12.0;
        assert_eq!(blob.transform(), "translate(-3px, 16px)");
        blob.begin_pulse(1.08);
        assert_eq!(blob.transform(), "translate(-3px, 16px) scale(1.08)");
    }
}
