//! Layout session
//!
//! Ties the docking engine to the widget catalogue: registration of mount
//! callbacks, adding panes, saving and loading layout documents and the
//! bundled presets.

pub mod document;
pub mod preset;
pub mod registry;
pub mod session;

pub use document::LayoutDocument;
pub use preset::{LayoutPreset, LayoutSource};
pub use registry::{create_component_type, RegisteredSet, WidgetDescriptor};
pub use session::{LayoutSession, SessionSettings};
