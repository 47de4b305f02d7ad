//! UI-only state
//!
//! Everything the map shows lives in the view-state engine; this is what the
//! sidebar itself needs to remember between frames.

use crate::app::settings::Settings;

/// Why no map is shown
#[derive(Clone, Debug, PartialEq)]
pub enum StartupError {
    MissingToken,
    Surface(String),
}

pub struct UiState {
    pub sidebar_open: bool,
    pub show_profiling: bool,
    pub show_hint: bool,
    /// Style requested on the command line, applied once the map is ready
    pub pending_style: Option<String>,
    pub startup_error: Option<StartupError>,
    /// Catalog file that failed to load, with the reason
    pub catalog_error: Option<String>,
}

impl UiState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sidebar_open: true,
            show_profiling: false,
            show_hint: true,
            pending_style: settings.style.clone(),
            startup_error: None,
            catalog_error: None,
        }
    }
}
