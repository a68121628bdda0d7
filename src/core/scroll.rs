//! Scroll-driven page chrome: navbar auto-hide and hero parallax

use crate::core::config::{HeroConfig, NavbarConfig};

/// Navbar appearance for one scroll position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavbarStyle {
    pub shadow: bool,
    pub hidden: bool,
}

impl NavbarStyle {
    pub fn transform(&self) -> &'static str {
        if self.hidden {
            "translateY(-100%)"
        } else {
            "translateY(0)"
        }
    }
}

/// Remembers the previous scroll offset to tell scroll direction
#[derive(Clone, Debug, Default)]
pub struct NavbarTracker {
    last_offset: f64,
}

impl NavbarTracker {
    pub fn update(&mut self, offset: f64, config: &NavbarConfig) -> NavbarStyle {
        let style = NavbarStyle {
            shadow: offset > 0.0,
            hidden: offset > self.last_offset && offset > config.hide_after_px,
        };
        self.last_offset = offset;
        style
    }
}

/// Hero content position and fade for one scroll position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroStyle {
    pub translate_y: f64,
    pub opacity: f64,
}

/// `None` once the hero has scrolled a full viewport away; it then keeps
/// whatever was last applied.
pub fn hero_style(offset: f64, viewport_height: f64, config: &HeroConfig) -> Option<HeroStyle> {
    if offset >= viewport_height {
        return None;
    }
    Some(HeroStyle {
        translate_y: offset * config.rate,
        opacity: (1.0 - offset / config.fade_px).clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_scenario() {
        let config = NavbarConfig::default();
        let mut navbar = NavbarTracker::default();

        let top = navbar.update(0.0, &config);
        assert!(!top.shadow);
        assert!(!top.hidden);

        navbar.update(50.0, &config);
        let down = navbar.update(250.0, &config);
        assert!(down.shadow);
        assert!(down.hidden);
        assert_eq!(down.transform(), "translateY(-100%)");

        let up = navbar.update(100.0, &config);
        assert!(!up.hidden);
        assert_eq!(up.transform(), "translateY(0)");
    }

    #[test]
    fn scrolling_down_near_top_keeps_navbar() {
        let config = NavbarConfig::default();
        let mut navbar = NavbarTracker::default();
        assert!(!navbar.update(60.0, &config).hidden);
        assert!(!navbar.update(100.0, &config).hidden);
        assert!(navbar.update(101.0, &config).hidden);
    }

    #[test]
    fn hero_fades_and_clamps() {
        let config = HeroConfig::default();
        let start = hero_style(0.0, 1000.0, &config).unwrap();
        assert_eq!(start.opacity, 1.0);
        assert_eq!(start.translate_y, 0.0);

        let half = hero_style(300.0, 1000.0, &config).unwrap();
        assert!((half.opacity - 0.5).abs() < 1e-9);
        assert!((half.translate_y - 90.0).abs() < 1e-9);

        let past_fade = hero_style(900.0, 1000.0, &config).unwrap();
        assert_eq!(past_fade.opacity, 0.0);

        assert!(hero_style(1000.0, 1000.0, &config).is_none());
    }
}
