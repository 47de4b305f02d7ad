//! Route View Library - View-State Synchronization for Restyleable Map Surfaces
//!
//! This library keeps a small piece of view state (selected route, active map style,
//! 2D/3D flag) consistent with an external, stateful rendering surface that wipes most
//! of its registered layers whenever its style is swapped and reports the swap's
//! completion asynchronously.
//!
//! # Architecture
//!
//! - **[`RouteCatalog`]**: Immutable collection of routes and their checkpoints
//! - **[`StyleDescriptor`]**: The statically enumerated map styles
//! - **[`RenderingSurface`]**: Capability trait for the live map backend
//! - **[`layers`]**: Idempotent "ensure" helpers for route line, terrain, sky and buildings
//! - **[`MarkerPresenter`]**: Numbered checkpoint markers, popups and viewport fitting
//! - **[`ViewStateEngine`]**: Sole writer of the surface; reacts to intents and surface events
//! - **[`StyleSession`]**: Style-scoped sources, layers and loads shared by surface backends
//! - **[`HeadlessSurface`]**: In-memory surface used for tests and headless embedding
//!
//! # Event Model
//!
//! Everything runs on one thread. Waiting on the surface is expressed as a single-use
//! continuation keyed on a [`SurfaceEvent`]; the host feeds events back through
//! [`ViewStateEngine::handle_event`] or [`ViewStateEngine::pump_events`].

mod catalog;
mod engine;
mod headless;
pub mod layers;
mod presenter;
mod session;
mod style;
mod surface;

// Public API exports
pub use catalog::{Category, Checkpoint, LonLat, Route, RouteCatalog};
pub use engine::{
    EnginePhase, PendingRestoration, RestorationTrigger, TILTED_PITCH, ViewState,
    ViewStateEngine,
};
pub use headless::{HeadlessFactory, HeadlessSurface, PlacedMarker};
pub use presenter::{
    FIT_DURATION, FIT_MAX_ZOOM, FLAT_PADDING, MarkerPresenter, PITCH_PADDING_THRESHOLD,
    PITCHED_PADDING, fit_options_for_pitch,
};
pub use session::{BuiltinStyle, SessionLayer, StyleSession};
pub use style::{
    DEFAULT_CAMERA, MAP_STYLES, StyleDescriptor, default_style, find_style, find_style_by_uri,
};
pub use surface::{
    Anchor, Camera, FitBoundsOptions, Filter, LayerSpec, LayerType, Layout, LayoutProperty,
    LineCap, LineJoin, MarkerElement, MarkerId, Padding, Paint, PopupContent, RenderingSurface,
    Rgb, SourceData, SourceSpec, StyleLayer, StyleTicket, SurfaceEvent, SurfaceFactory,
    SurfaceOptions, TerrainSpec, Visibility, ZoomRamp,
};

/// Errors raised while building or loading a route catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate route id: {0}")]
    DuplicateRouteId(String),
}

/// Errors reported by a rendering surface when a command cannot be applied
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("Source already exists: {0}")]
    DuplicateSource(String),

    #[error("Layer already exists: {0}")]
    DuplicateLayer(String),

    #[error("No such source: {0}")]
    MissingSource(String),

    #[error("No such layer: {0}")]
    MissingLayer(String),

    #[error("Style is not done loading")]
    StyleNotLoaded,

    #[error("Surface could not be created: {0}")]
    Construction(String),
}

/// Errors surfaced by the view-state engine to its host
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Map access token is missing")]
    MissingCredential,

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _: fn() -> &'static StyleDescriptor = default_style;
        let _: fn(&str) -> Option<&'static StyleDescriptor> = find_style;
        let _: fn(f64) -> FitBoundsOptions = fit_options_for_pitch;
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::MissingCredential.to_string(),
            "Map access token is missing"
        );
        let err: EngineError = SurfaceError::MissingLayer("sky".to_string()).into();
        assert_eq!(err.to_string(), "Surface error: No such layer: sky");
    }
}
