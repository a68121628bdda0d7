//! One-way fade-in of page sections and skill tags

use super::config::{RevealConfig, SkillsConfig};
use super::geometry::{css_number, px};

pub const HIDDEN_OPACITY: &str = "0";
pub const SHOWN_OPACITY: &str = "1";
pub const SHOWN_TRANSFORM: &str = "translateY(0)";

/// Intersection observer settings for one reveal kind
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverSpec {
    pub threshold: f64,
    pub root_margin: Option<String>,
    /// Stop watching the target after the first reveal
    pub unobserve_after_reveal: bool,
}

pub fn section_observer(config: &RevealConfig) -> ObserverSpec {
    ObserverSpec {
        threshold: config.threshold,
        root_margin: Some(config.root_margin.clone()),
        unobserve_after_reveal: false,
    }
}

pub fn skills_observer(config: &SkillsConfig) -> ObserverSpec {
    ObserverSpec {
        threshold: config.threshold,
        root_margin: None,
        unobserve_after_reveal: true,
    }
}

/// Styles a section starts with: hidden, lowered, transition pre-armed
pub fn section_initial_styles(config: &RevealConfig) -> [(&'static str, String); 3] {
    let duration = css_number(config.duration_s);
    [
        ("opacity", HIDDEN_OPACITY.to_string()),
        ("transform", format!("translateY({})", px(config.offset_px))),
        (
            "transition",
            format!("opacity {duration}s ease, transform {duration}s ease"),
        ),
    ]
}

/// Styles the skill tag at `index` starts with; later tags animate later
pub fn skill_tag_initial_styles(
    index: usize,
    config: &SkillsConfig,
) -> [(&'static str, String); 3] {
    let delay = index as f64 * config.stagger_s;
    [
        ("opacity", HIDDEN_OPACITY.to_string()),
        ("transform", format!("translateY({})", px(config.offset_px))),
        (
            "transition",
            format!(
                "all {}s ease {}s",
                css_number(config.duration_s),
                css_number(round_ms(delay))
            ),
        ),
    ]
}

/// Trim float noise such as 0.30000000000000004 to whole milliseconds
fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Which sections have already faded in
#[derive(Clone, Debug, Default)]
pub struct RevealTracker {
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
        }
    }

    /// Mark a section visible. True only the first time; out-of-range is ignored.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|&&seen| seen).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_styles_match_stock_look() {
        let styles = section_initial_styles(&RevealConfig::default());
        assert_eq!(styles[0], ("opacity", "0".to_string()));
        assert_eq!(styles[1], ("transform", "translateY(30px)".to_string()));
        assert_eq!(
            styles[2],
            ("transition", "opacity 0.8s ease, transform 0.8s ease".to_string())
        );
    }

    #[test]
    fn skill_tags_are_staggered() {
        let config = SkillsConfig::default();
        assert_eq!(skill_tag_initial_styles(0, &config)[2].1, "all 0.5s ease 0s");
        assert_eq!(skill_tag_initial_styles(3, &config)[2].1, "all 0.5s ease 0.3s");
        assert_eq!(skill_tag_initial_styles(12, &config)[2].1, "all 0.5s ease 1.2s");
    }

    #[test]
    fn sections_reveal_once() {
        let mut tracker = RevealTracker::new(2);
        assert!(tracker.reveal(1));
        assert!(!tracker.reveal(1));
        assert!(!tracker.reveal(7));
        assert_eq!(tracker.revealed_count(), 1);
    }

    #[test]
    fn only_skills_observer_unobserves() {
        assert!(!section_observer(&RevealConfig::default()).unobserve_after_reveal);
        assert!(skills_observer(&SkillsConfig::default()).unobserve_after_reveal);
        assert_eq!(skills_observer(&SkillsConfig::default()).root_margin, None);
    }
}
