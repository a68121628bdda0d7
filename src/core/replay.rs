//! Headless replay of scripted page input
//!
//! Drives a `Session` with a list of input steps against an in-memory page,
//! using a virtual clock for deferred tasks. Lets the effects be checked
//! without a browser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::blobs::BlobRole;
use super::config::FxConfig;
use super::geometry::{Rect, Vec2};
use super::schedule::DeferredTask;
use super::session::{Command, Layout, PageShape, Session, Target};
use super::theme::{MemoryStore, PreferenceStore, Theme};
use crate::error::FxError;

/// Scripted page plus the input to feed it
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_viewport")]
    pub viewport_height: f64,
    #[serde(default)]
    pub blobs: Vec<BlobSpec>,
    #[serde(default)]
    pub sections: usize,
    #[serde(default)]
    pub skill_tags: usize,
    #[serde(default)]
    pub project_cards: usize,
    #[serde(default = "yes")]
    pub has_hero: bool,
    #[serde(default = "yes")]
    pub has_navbar: bool,
    #[serde(default = "yes")]
    pub has_theme_toggle: bool,
    /// Value already in the preference store when the page loads
    #[serde(default)]
    pub stored_theme: Option<String>,
    pub steps: Vec<Step>,
}

fn default_viewport() -> f64 {
    800.0
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlobSpec {
    #[serde(default)]
    pub role: BlobRole,
    pub rect: Rect,
}

/// One input event
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PointerMove { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    Scroll { offset: f64 },
    /// Run any pending animation-frame work
    Frame,
    ToggleTheme,
    IntersectSection { index: usize },
    IntersectSkills,
    CardEnter { index: usize },
    CardLeave { index: usize },
    /// Move the virtual clock forward, firing due deferred tasks
    Advance { ms: u32 },
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, FxError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FxError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), FxError> {
        for step in &self.steps {
            match *step {
                Step::IntersectSection { index } if index >= self.sections => {
                    return Err(FxError::Scenario(format!("no section {index}")));
                }
                Step::CardEnter { index } | Step::CardLeave { index }
                    if index >= self.project_cards =>
                {
                    return Err(FxError::Scenario(format!("no project card {index}")));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Final page state after a replay
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub theme_attribute: Option<Theme>,
    pub stored_theme: Option<String>,
    /// Element name -> property -> value
    pub styles: BTreeMap<String, BTreeMap<String, String>>,
    pub elapsed_ms: u64,
    pub frames: u32,
}

impl Report {
    pub fn style(&self, target: Target, property: &str) -> Option<&str> {
        self.styles
            .get(&target.to_string())
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }
}

/// In-memory stand-in for the page; blob rects are static layout boxes
struct HeadlessPage {
    blob_rects: Vec<Rect>,
    viewport_height: f64,
    offset: f64,
    theme_attribute: Option<Theme>,
    styles: BTreeMap<Target, BTreeMap<&'static str, String>>,
}

impl Layout for HeadlessPage {
    fn blob_rect(&self, index: usize) -> Option<Rect> {
        self.blob_rects.get(index).copied()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }
}

struct Timer {
    due_ms: u64,
    seq: u64,
    task: DeferredTask,
}

/// Replay driver: session, headless page and virtual clock
pub struct Replay {
    session: Session<MemoryStore>,
    page: HeadlessPage,
    project_cards: usize,
    now_ms: u64,
    timers: Vec<Timer>,
    next_seq: u64,
    pointer_frame_pending: bool,
    scroll_frame_pending: bool,
    frames: u32,
}

impl Replay {
    pub fn new(config: FxConfig, scenario: &Scenario) -> Self {
        let store = match &scenario.stored_theme {
            Some(value) => MemoryStore::new().with(&config.theme.storage_key, value),
            None => MemoryStore::new(),
        };
        let shape = PageShape {
            blobs: scenario.blobs.iter().map(|b| b.role).collect(),
            sections: scenario.sections,
            skill_tags: scenario.skill_tags,
            has_hero: scenario.has_hero,
            has_navbar: scenario.has_navbar,
            has_theme_toggle: scenario.has_theme_toggle,
        };
        let page = HeadlessPage {
            blob_rects: scenario.blobs.iter().map(|b| b.rect).collect(),
            viewport_height: scenario.viewport_height,
            offset: 0.0,
            theme_attribute: None,
            styles: BTreeMap::new(),
        };
        Self {
            session: Session::new(config, store, shape),
            page,
            project_cards: scenario.project_cards,
            now_ms: 0,
            timers: Vec::new(),
            next_seq: 0,
            pointer_frame_pending: false,
            scroll_frame_pending: false,
            frames: 0,
        }
    }

    /// Load the page, then feed every step in order
    pub fn run(mut self, steps: &[Step]) -> Report {
        let commands = self.session.start();
        self.apply(commands);
        for step in steps {
            self.step(step);
        }
        self.report()
    }

    pub fn step(&mut self, step: &Step) {
        debug!(?step, now_ms = self.now_ms, "Replay step");
        let commands = match *step {
            Step::PointerMove { x, y } => {
                if self.session.pointer_moved(Vec2::new(x, y)) {
                    self.pointer_frame_pending = true;
                }
                Vec::new()
            }
            Step::Click { x, y } => self.session.clicked(Vec2::new(x, y), &self.page),
            Step::Scroll { offset } => {
                self.page.offset = offset;
                if self.session.scrolled() {
                    self.scroll_frame_pending = true;
                }
                Vec::new()
            }
            Step::Frame => self.frame(),
            Step::ToggleTheme => self.session.toggle_theme(),
            Step::IntersectSection { index } => self.session.section_visible(index),
            Step::IntersectSkills => self.session.skills_visible(),
            Step::CardEnter { index } if index < self.project_cards => {
                self.session.card_hover(index, true)
            }
            Step::CardLeave { index } if index < self.project_cards => {
                self.session.card_hover(index, false)
            }
            Step::CardEnter { .. } | Step::CardLeave { .. } => Vec::new(),
            Step::Advance { ms } => {
                self.advance(ms);
                Vec::new()
            }
        };
        self.apply(commands);
    }

    fn frame(&mut self) -> Vec<Command> {
        self.frames += 1;
        let mut commands = Vec::new();
        if std::mem::take(&mut self.scroll_frame_pending) {
            commands.extend(self.session.scroll_frame(&self.page));
        }
        if std::mem::take(&mut self.pointer_frame_pending) {
            commands.extend(self.session.pointer_frame(&self.page));
        }
        commands
    }

    fn advance(&mut self, ms: u32) {
        let until = self.now_ms + u64::from(ms);
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_ms <= until)
                .min_by_key(|(_, t)| (t.due_ms, t.seq))
                .map(|(i, _)| i);
            let Some(i) = next else {
                break;
            };
            let timer = self.timers.remove(i);
            self.now_ms = timer.due_ms;
            let commands = self.session.run_deferred(timer.task);
            self.apply(commands);
        }
        self.now_ms = until;
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Style { target, property, value } => {
                    self.page.styles.entry(target).or_default().insert(property, value);
                }
                Command::ApplyTheme(theme) => self.page.theme_attribute = Some(theme),
                Command::Defer { delay_ms, task } => {
                    self.timers.push(Timer {
                        due_ms: self.now_ms + u64::from(delay_ms),
                        seq: self.next_seq,
                        task,
                    });
                    self.next_seq += 1;
                }
            }
        }
    }

    fn report(self) -> Report {
        let key = &self.session.config().theme.storage_key;
        let report = Report {
            theme_attribute: self.page.theme_attribute,
            stored_theme: self.session.store().read(key),
            styles: self
                .page
                .styles
                .iter()
                .map(|(target, props)| {
                    let props = props
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.clone()))
                        .collect();
                    (target.to_string(), props)
                })
                .collect(),
            elapsed_ms: self.now_ms,
            frames: self.frames,
        };
        info!(
            elements = report.styles.len(),
            elapsed_ms = report.elapsed_ms,
            frames = report.frames,
            "Replay finished"
        );
        report
    }
}

/// Replay a whole scenario with the given config
pub fn replay(config: FxConfig, scenario: &Scenario) -> Report {
    Replay::new(config, scenario).run(&scenario.steps)
}
