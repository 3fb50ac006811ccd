//! Common utilities
//!
//! - Logging configuration
//! - Panic handling
//! - Project directories

pub mod logging;
pub mod panic;
pub mod paths;

pub use logging::initialize_logging;
pub use panic::initialize_panic_handler;
pub use paths::{
    get_config_dir, get_data_dir, get_download_dir, get_presets_dir, version,
};
