//! Platform-agnostic core - shared between the browser glue and the replay CLI

pub mod anchor;
pub mod blobs;
pub mod config;
pub mod geometry;
pub mod replay;
pub mod reveal;
pub mod schedule;
pub mod scroll;
pub mod session;
pub mod theme;

pub use blobs::{Blob, BlobRole};
pub use config::FxConfig;
pub use geometry::{Rect, Vec2};
pub use replay::{replay, Report, Scenario, Step};
pub use schedule::DeferredTask;
pub use session::{Command, Layout, PageShape, Session, Target};
pub use theme::{MemoryStore, PreferenceStore, Theme};
