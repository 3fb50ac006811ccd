//! Docking engine
//!
//! A tiling layout of rows, columns and tabbed stacks of panes, with its own
//! serialized configuration format. Callers register a mount callback per
//! component type; the engine invokes it whenever it creates a pane of that
//! type and draws whatever the callback appended into the pane.
//!
//! - [`config`] - user-facing and resolved (saved) configuration
//! - [`container`] - panes and the [`Panel`] trait mounted into them
//! - [`engine`] - the [`DockingEngine`] trait and [`DockLayout`]

pub mod config;
pub mod container;
pub mod engine;
mod item;

pub use config::{Dimensions, ItemConfig, LayoutConfig, ResolvedLayoutConfig, Settings};
pub use container::{ComponentContainer, ContainerElement, Panel, PaneId};
pub use engine::{ComponentFactoryFn, DockCommand, DockEvent, DockLayout, DockTheme, DockingEngine};

#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("layout config is not a resolved config")]
    NotResolved,
    #[error("invalid layout config: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("invalid layout item: {0}")]
    InvalidItem(String),
}
