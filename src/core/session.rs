//! Session controller shared by every page handler
//!
//! Handlers never touch the DOM directly. Each one updates session state
//! and returns the `Command`s the platform layer has to apply: style writes,
//! the theme attribute, and deferred tasks to run later.

use std::fmt;
use tracing::{debug, trace};

use super::blobs::{parallax, repulsion, within_pulse, Blob, BlobRole};
use super::config::FxConfig;
use super::geometry::{css_number, px, Rect, Vec2};
use super::reveal::{
    section_initial_styles, skill_tag_initial_styles, RevealTracker, SHOWN_OPACITY,
    SHOWN_TRANSFORM,
};
use super::schedule::{DeferredTask, FrameGate, Generation};
use super::scroll::{hero_style, NavbarTracker};
use super::theme::{PreferenceStore, Theme};

/// Page element addressed by a style write
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    ThemeToggle,
    Navbar,
    HeroContent,
    Blob(usize),
    Section(usize),
    SkillTag(usize),
    ProjectCard(usize),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::ThemeToggle => f.write_str("theme-toggle"),
            Target::Navbar => f.write_str("navbar"),
            Target::HeroContent => f.write_str("hero-content"),
            Target::Blob(i) => write!(f, "blob[{i}]"),
            Target::Section(i) => write!(f, "section[{i}]"),
            Target::SkillTag(i) => write!(f, "skill-tag[{i}]"),
            Target::ProjectCard(i) => write!(f, "project-card[{i}]"),
        }
    }
}

/// Side effect for the platform layer to perform
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Style {
        target: Target,
        property: &'static str,
        value: String,
    },
    /// Set `data-theme` on the document element
    ApplyTheme(Theme),
    /// Call `Session::run_deferred` with `task` after `delay_ms`
    Defer { delay_ms: u32, task: DeferredTask },
}

impl Command {
    fn style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Command::Style {
            target,
            property,
            value: value.into(),
        }
    }
}

/// Live geometry queries answered by the page
pub trait Layout {
    /// Current bounding box of a blob, `None` if it no longer exists
    fn blob_rect(&self, index: usize) -> Option<Rect>;
    fn viewport_height(&self) -> f64;
    fn scroll_offset(&self) -> f64;
}

/// Sizes of the element collections found on the page
#[derive(Clone, Debug, Default)]
pub struct PageShape {
    pub blobs: Vec<BlobRole>,
    pub sections: usize,
    pub skill_tags: usize,
    pub has_hero: bool,
    pub has_navbar: bool,
    pub has_theme_toggle: bool,
}

/// All mutable state for one page view
pub struct Session<S> {
    config: FxConfig,
    store: S,
    page: PageShape,
    theme: Theme,
    spin: Generation,
    pointer: Vec2,
    pointer_gate: FrameGate,
    scroll_gate: FrameGate,
    navbar: NavbarTracker,
    blobs: Vec<Blob>,
    sections: RevealTracker,
    skills_revealed: bool,
}

impl<S: PreferenceStore> Session<S> {
    pub fn new(config: FxConfig, store: S, page: PageShape) -> Self {
        let blobs = page.blobs.iter().copied().map(Blob::new).collect();
        let sections = RevealTracker::new(page.sections);
        Self {
            config,
            store,
            page,
            theme: Theme::default(),
            spin: Generation::default(),
            pointer: Vec2::ZERO,
            pointer_gate: FrameGate::default(),
            scroll_gate: FrameGate::default(),
            navbar: NavbarTracker::default(),
            blobs,
            sections,
            skills_revealed: false,
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn blob(&self, index: usize) -> Option<&Blob> {
        self.blobs.get(index)
    }

    pub fn skills_revealed(&self) -> bool {
        self.skills_revealed
    }

    /// Initial page state: stored theme plus hidden sections and skill tags
    pub fn start(&mut self) -> Vec<Command> {
        let stored = self.store.read(&self.config.theme.storage_key);
        self.theme = Theme::from_stored(stored.as_deref());
        debug!(stored = ?stored, theme = %self.theme, "Theme loaded");

        let mut commands = vec![Command::ApplyTheme(self.theme)];
        for index in 0..self.page.sections {
            for (property, value) in section_initial_styles(&self.config.reveal) {
                commands.push(Command::style(Target::Section(index), property, value));
            }
        }
        for index in 0..self.page.skill_tags {
            for (property, value) in skill_tag_initial_styles(index, &self.config.skills) {
                commands.push(Command::style(Target::SkillTag(index), property, value));
            }
        }
        commands
    }

    /// Flip the theme, persist it and spin the toggle icon
    pub fn toggle_theme(&mut self) -> Vec<Command> {
        self.theme = self.theme.toggled();
        if let Err(e) = self
            .store
            .write(&self.config.theme.storage_key, self.theme.as_str())
        {
            debug!(error = %e, "Theme preference not persisted");
        }
        debug!(theme = %self.theme, "Theme toggled");

        let mut commands = vec![Command::ApplyTheme(self.theme)];
        if self.page.has_theme_toggle {
            let ticket = self.spin.bump();
            commands.push(Command::style(Target::ThemeToggle, "transform", "rotate(360deg)"));
            commands.push(Command::Defer {
                delay_ms: self.config.theme.spin_ms,
                task: DeferredTask::ResetThemeSpin(ticket),
            });
        }
        commands
    }

    /// Record the pointer position. True if a frame must be requested.
    pub fn pointer_moved(&mut self, position: Vec2) -> bool {
        self.pointer = position;
        self.pointer_gate.request()
    }

    /// Recompute blob repulsion against the latest pointer position
    pub fn pointer_frame(&mut self, layout: &impl Layout) -> Vec<Command> {
        self.pointer_gate.release();
        let pointer = self.pointer;
        let mut commands = Vec::new();
        for (index, blob) in self.blobs.iter_mut().enumerate() {
            let Some(rect) = layout.blob_rect(index) else {
                continue;
            };
            let push = repulsion(pointer, rect.center(), &self.config.blobs);
            if push != blob.pointer {
                blob.pointer = push;
                commands.push(Command::style(Target::Blob(index), "transform", blob.transform()));
            }
        }
        trace!(x = pointer.x, y = pointer.y, writes = commands.len(), "Pointer frame");
        commands
    }

    /// Pulse every blob near a click
    pub fn clicked(&mut self, position: Vec2, layout: &impl Layout) -> Vec<Command> {
        let config = &self.config.blobs;
        let mut commands = Vec::new();
        for (index, blob) in self.blobs.iter_mut().enumerate() {
            let Some(rect) = layout.blob_rect(index) else {
                continue;
            };
            if !within_pulse(position, rect.center(), config) {
                continue;
            }
            let (generation, arm) = blob.begin_pulse(config.pulse_scale);
            if arm {
                commands.push(Command::style(
                    Target::Blob(index),
                    "transition",
                    format!("transform {}ms {}", config.pulse_ms, config.pulse_easing),
                ));
            }
            commands.push(Command::style(Target::Blob(index), "transform", blob.transform()));
            commands.push(Command::Defer {
                delay_ms: config.pulse_ms,
                task: DeferredTask::EndPulse { shape: index, generation },
            });
        }
        if !commands.is_empty() {
            debug!(x = position.x, y = position.y, "Blob pulse");
        }
        commands
    }

    /// Note a scroll event. True if a frame must be requested.
    pub fn scrolled(&mut self) -> bool {
        self.scroll_gate.request()
    }

    /// Navbar, hero and blob parallax for the current scroll offset
    pub fn scroll_frame(&mut self, layout: &impl Layout) -> Vec<Command> {
        self.scroll_gate.release();
        let offset = layout.scroll_offset();
        let viewport = layout.viewport_height();
        let mut commands = Vec::new();

        if self.page.has_navbar {
            let navbar = self.navbar.update(offset, &self.config.navbar);
            let shadow = if navbar.shadow {
                self.config.navbar.shadow.as_str()
            } else {
                "none"
            };
            commands.push(Command::style(Target::Navbar, "box-shadow", shadow));
            commands.push(Command::style(Target::Navbar, "transform", navbar.transform()));
        }

        if self.page.has_hero {
            if let Some(hero) = hero_style(offset, viewport, &self.config.hero) {
                commands.push(Command::style(
                    Target::HeroContent,
                    "transform",
                    format!("translateY({})", px(hero.translate_y)),
                ));
                commands.push(Command::style(
                    Target::HeroContent,
                    "opacity",
                    css_number(hero.opacity),
                ));
            }
        }

        for (index, blob) in self.blobs.iter_mut().enumerate() {
            if let Some(y) = parallax(blob.role, offset, viewport, &self.config.blobs) {
                blob.scroll_y = y;
                commands.push(Command::style(Target::Blob(index), "transform", blob.transform()));
            }
        }

        trace!(offset, viewport, writes = commands.len(), "Scroll frame");
        commands
    }

    /// A section crossed the reveal threshold
    pub fn section_visible(&mut self, index: usize) -> Vec<Command> {
        if !self.sections.reveal(index) {
            return Vec::new();
        }
        debug!(index, revealed = self.sections.revealed_count(), "Section revealed");
        vec![
            Command::style(Target::Section(index), "opacity", SHOWN_OPACITY),
            Command::style(Target::Section(index), "transform", SHOWN_TRANSFORM),
        ]
    }

    /// The skills section crossed its threshold; reveals every tag once
    pub fn skills_visible(&mut self) -> Vec<Command> {
        if self.skills_revealed {
            return Vec::new();
        }
        self.skills_revealed = true;
        debug!(tags = self.page.skill_tags, "Skill tags revealed");
        (0..self.page.skill_tags)
            .flat_map(|index| {
                [
                    Command::style(Target::SkillTag(index), "opacity", SHOWN_OPACITY),
                    Command::style(Target::SkillTag(index), "transform", SHOWN_TRANSFORM),
                ]
            })
            .collect()
    }

    /// Pointer entered or left a project card
    pub fn card_hover(&self, index: usize, entered: bool) -> Vec<Command> {
        let color = if entered { "var(--accent)" } else { "var(--border)" };
        vec![Command::style(Target::ProjectCard(index), "border-color", color)]
    }

    /// Run a task previously handed out through `Command::Defer`
    pub fn run_deferred(&mut self, task: DeferredTask) -> Vec<Command> {
        match task {
            DeferredTask::ResetThemeSpin(ticket) => {
                if !self.spin.is_current(ticket) {
                    trace!("Superseded theme spin reset skipped");
                    return Vec::new();
                }
                vec![Command::style(Target::ThemeToggle, "transform", "rotate(0deg)")]
            }
            DeferredTask::EndPulse { shape, generation } => {
                let Some(blob) = self.blobs.get_mut(shape) else {
                    return Vec::new();
                };
                if !blob.end_pulse(generation) {
                    trace!(shape, "Superseded pulse end skipped");
                    return Vec::new();
                }
                vec![Command::style(Target::Blob(shape), "transform", blob.transform())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::MemoryStore;

    struct FixedLayout {
        blobs: Vec<Rect>,
        viewport: f64,
        offset: f64,
    }

    impl Layout for FixedLayout {
        fn blob_rect(&self, index: usize) -> Option<Rect> {
            self.blobs.get(index).copied()
        }
        fn viewport_height(&self) -> f64 {
            self.viewport
        }
        fn scroll_offset(&self) -> f64 {
            self.offset
        }
    }

    fn page() -> PageShape {
        PageShape {
            blobs: vec![BlobRole::Foreground, BlobRole::Mid, BlobRole::Background],
            sections: 3,
            skill_tags: 4,
            has_hero: true,
            has_navbar: true,
            has_theme_toggle: true,
        }
    }

    fn layout() -> FixedLayout {
        FixedLayout {
            blobs: vec![
                Rect::new(100.0, 100.0, 100.0, 100.0),
                Rect::new(600.0, 100.0, 100.0, 100.0),
                Rect::new(100.0, 600.0, 100.0, 100.0),
            ],
            viewport: 800.0,
            offset: 0.0,
        }
    }

    fn session(store: MemoryStore) -> Session<MemoryStore> {
        Session::new(FxConfig::default(), store, page())
    }

    fn styles_for(commands: &[Command], target: Target) -> Vec<(&'static str, String)> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::Style { target: t, property, value } if *t == target => {
                    Some((*property, value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_applies_stored_theme() {
        let cases = [
            (None, Theme::Light),
            (Some("light"), Theme::Light),
            (Some("dark"), Theme::Dark),
        ];
        for (stored, expected) in cases {
            let store = match stored {
                Some(value) => MemoryStore::new().with("theme", value),
                None => MemoryStore::new(),
            };
            let mut session = session(store);
            let commands = session.start();
            assert_eq!(commands[0], Command::ApplyTheme(expected));
            assert_eq!(session.theme(), expected);
        }
    }

    #[test]
    fn start_hides_sections_and_tags() {
        let mut session = session(MemoryStore::new());
        let commands = session.start();
        assert_eq!(styles_for(&commands, Target::Section(2)).len(), 3);
        let tag = styles_for(&commands, Target::SkillTag(3));
        assert!(tag.contains(&("transition", "all 0.5s ease 0.3s".to_string())));
    }

    #[test]
    fn double_toggle_restores_theme_and_store() {
        let mut session = session(MemoryStore::new().with("theme", "dark"));
        session.start();
        session.toggle_theme();
        assert_eq!(session.store().read("theme").as_deref(), Some("light"));
        let commands = session.toggle_theme();
        assert_eq!(commands[0], Command::ApplyTheme(Theme::Dark));
        assert_eq!(session.store().read("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn second_toggle_supersedes_first_spin_reset() {
        let mut session = session(MemoryStore::new());
        session.start();
        let first = session.toggle_theme();
        let second = session.toggle_theme();

        let task_of = |commands: &[Command]| {
            commands.iter().find_map(|c| match c {
                Command::Defer { task, .. } => Some(*task),
                _ => None,
            })
        };
        let first_task = task_of(&first).unwrap();
        let second_task = task_of(&second).unwrap();

        assert!(session.run_deferred(first_task).is_empty());
        assert_eq!(
            styles_for(&session.run_deferred(second_task), Target::ThemeToggle),
            vec![("transform", "rotate(0deg)".to_string())]
        );
    }

    #[test]
    fn pointer_moves_coalesce_into_one_frame() {
        let mut session = session(MemoryStore::new());
        assert!(session.pointer_moved(Vec2::new(1.0, 1.0)));
        assert!(!session.pointer_moved(Vec2::new(2.0, 2.0)));
        assert!(!session.pointer_moved(Vec2::new(150.0, 140.0)));

        let commands = session.pointer_frame(&layout());
        // Only the blob centered at (150, 150) is within reach of the last position
        assert_eq!(styles_for(&commands, Target::Blob(0)).len(), 1);
        assert!(styles_for(&commands, Target::Blob(1)).is_empty());
        assert!(session.blob(0).unwrap().pointer.y > 0.0);
        assert!(session.pointer_moved(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn distant_click_changes_nothing() {
        let mut session = session(MemoryStore::new());
        let commands = session.clicked(Vec2::new(1400.0, 1400.0), &layout());
        assert!(commands.is_empty());
        for i in 0..3 {
            assert_eq!(session.blob(i).unwrap().scale, 1.0);
        }
    }

    #[test]
    fn pulse_end_keeps_pointer_translation() {
        let mut session = session(MemoryStore::new());
        let layout = layout();
        let commands = session.clicked(Vec2::new(150.0, 150.0), &layout);
        let task = commands
            .iter()
            .find_map(|c| match c {
                Command::Defer { task, delay_ms: 340 } => Some(*task),
                _ => None,
            })
            .unwrap();

        session.pointer_moved(Vec2::new(160.0, 150.0));
        session.pointer_frame(&layout);
        let pushed = session.blob(0).unwrap().pointer;
        assert_ne!(pushed, Vec2::ZERO);

        let end = session.run_deferred(task);
        assert_eq!(session.blob(0).unwrap().pointer, pushed);
        assert_eq!(session.blob(0).unwrap().scale, 1.0);
        assert!(!styles_for(&end, Target::Blob(0))[0].1.contains("scale"));
    }

    #[test]
    fn scroll_frame_runs_once_per_burst() {
        let mut session = session(MemoryStore::new());
        assert!(session.scrolled());
        assert!(!session.scrolled());
        let mut layout = layout();
        layout.offset = 400.0;
        let commands = session.scroll_frame(&layout);
        assert!(!styles_for(&commands, Target::Navbar).is_empty());
        assert_eq!(session.blob(0).unwrap().scroll_y, 400.0 * 0.12);
        assert!(session.scrolled());
    }

    #[test]
    fn parallax_holds_past_two_viewports() {
        let mut session = session(MemoryStore::new());
        let mut layout = layout();
        layout.offset = 1500.0;
        session.scroll_frame(&layout);
        let held = session.blob(2).unwrap().scroll_y;
        assert_eq!(held, 1500.0 * -0.06);

        layout.offset = 1700.0;
        let commands = session.scroll_frame(&layout);
        assert!(styles_for(&commands, Target::Blob(2)).is_empty());
        assert_eq!(session.blob(2).unwrap().scroll_y, held);
        assert!(styles_for(&commands, Target::HeroContent).is_empty());
    }

    #[test]
    fn every_foreground_blob_drifts() {
        let shape = PageShape {
            blobs: vec![BlobRole::Foreground, BlobRole::Generic, BlobRole::Foreground],
            ..page()
        };
        let mut session = Session::new(FxConfig::default(), MemoryStore::new(), shape);
        let mut layout = layout();
        layout.offset = 100.0;
        let commands = session.scroll_frame(&layout);

        assert_eq!(session.blob(0).unwrap().scroll_y, 100.0 * 0.12);
        assert_eq!(session.blob(2).unwrap().scroll_y, 100.0 * 0.12);
        assert_eq!(session.blob(1).unwrap().scroll_y, 0.0);
        assert!(!styles_for(&commands, Target::Blob(2)).is_empty());
        assert!(styles_for(&commands, Target::Blob(1)).is_empty());
    }

    #[test]
    fn skills_reveal_once() {
        let mut session = session(MemoryStore::new());
        let first = session.skills_visible();
        assert_eq!(first.len(), 8);
        assert!(session.skills_revealed());
        assert!(session.skills_visible().is_empty());
    }

    #[test]
    fn section_reveal_writes_once() {
        let mut session = session(MemoryStore::new());
        assert_eq!(session.section_visible(1).len(), 2);
        assert!(session.section_visible(1).is_empty());
    }

    #[test]
    fn card_hover_colors() {
        let session = session(MemoryStore::new());
        assert_eq!(
            styles_for(&session.card_hover(0, true), Target::ProjectCard(0)),
            vec![("border-color", "var(--accent)".to_string())]
        );
        assert_eq!(
            styles_for(&session.card_hover(0, false), Target::ProjectCard(0)),
            vec![("border-color", "var(--border)".to_string())]
        );
    }
}
