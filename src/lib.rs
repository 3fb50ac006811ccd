//! # dockboard
//!
//! A terminal dashboard whose widgets live in dockable, resizable panes.
//! Layouts can be saved to JSON files and loaded back, including from a set
//! of bundled presets.
//!
//! ## Modules
//!
//! - [`dock`] - The docking engine: a tiling tree of rows, columns and
//!   tabbed stacks with its own config format
//! - [`layout`] - The layout session that owns the engine, registers widgets
//!   and saves or loads layout documents
//! - [`widgets`] - The panels that can be added to the dashboard
//! - [`files`] - Saving and loading JSON files
//! - [`app`], [`components`], [`tui`] - The terminal application
//! - [`config`] - Keybindings, styles and layout settings

pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod dock;
pub mod files;
pub mod layout;
pub mod mode;
pub mod tui;
pub mod utils;
pub mod widgets;
