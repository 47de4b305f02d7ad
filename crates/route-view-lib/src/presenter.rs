//! Marker and popup presentation
//!
//! Every redraw tears down all placed markers and places a fresh set. Routes have
//! a handful of stops, so there is no pooling or diffing.

use crate::catalog::Route;
use crate::layers::ROUTE_SOURCE_ID;
use crate::surface::{
    Anchor, FitBoundsOptions, MarkerElement, MarkerId, Padding, PopupContent, RenderingSurface,
    SourceData,
};
use geo::{Coord, Rect};
use std::time::Duration;

/// Pitch (degrees) above which the tilted padding profile is used
pub const PITCH_PADDING_THRESHOLD: f64 = 20.0;

/// Padding while tilted: extra room at top and bottom for the perspective
pub const PITCHED_PADDING: Padding = Padding {
    top: 100.0,
    bottom: 150.0,
    left: 370.0,
    right: 70.0,
};

pub const FLAT_PADDING: Padding = Padding {
    top: 70.0,
    bottom: 70.0,
    left: 370.0,
    right: 70.0,
};

pub const FIT_MAX_ZOOM: f64 = 15.0;
pub const FIT_DURATION: Duration = Duration::from_millis(500);

const POPUP_OFFSET: f32 = 35.0;

/// Viewport fit options for the given camera pitch
pub fn fit_options_for_pitch(pitch: f64) -> FitBoundsOptions {
    let padding = if pitch > PITCH_PADDING_THRESHOLD {
        PITCHED_PADDING
    } else {
        FLAT_PADDING
    };
    FitBoundsOptions {
        padding,
        max_zoom: FIT_MAX_ZOOM,
        duration: FIT_DURATION,
    }
}

/// Grow `bounds` to include `coord`
fn extend(bounds: Option<Rect<f64>>, coord: Coord<f64>) -> Option<Rect<f64>> {
    Some(match bounds {
        None => Rect::new(coord, coord),
        Some(rect) => Rect::new(
            Coord {
                x: rect.min().x.min(coord.x),
                y: rect.min().y.min(coord.y),
            },
            Coord {
                x: rect.max().x.max(coord.x),
                y: rect.max().y.max(coord.y),
            },
        ),
    })
}

/// Owns the set of markers currently placed on the surface
#[derive(Debug, Default)]
pub struct MarkerPresenter {
    placed: Vec<MarkerId>,
}

impl MarkerPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_count(&self) -> usize {
        self.placed.len()
    }

    pub fn markers(&self) -> &[MarkerId] {
        &self.placed
    }

    /// Remove every marker this presenter placed
    pub fn clear<S: RenderingSurface + ?Sized>(&mut self, surface: &mut S) {
        for marker in self.placed.drain(..) {
            surface.remove_marker(marker);
        }
    }

    /// Redraw the route line and markers for `route`, or clear them for `None`
    pub fn redraw<S: RenderingSurface + ?Sized>(&mut self, surface: &mut S, route: Option<&Route>) {
        profiling::scope!("MarkerPresenter::redraw");

        self.clear(surface);

        let Some(route) = route else {
            tracing::debug!("No route selected, clearing route line");
            if surface.has_source(ROUTE_SOURCE_ID)
                && let Err(e) = surface.set_source_data(ROUTE_SOURCE_ID, SourceData::empty_line())
            {
                tracing::warn!("Failed to clear route line: {e}");
            }
            return;
        };

        if !surface.has_source(ROUTE_SOURCE_ID) {
            tracing::debug!("Route source not registered yet, skipping redraw");
            return;
        }

        tracing::debug!("Redrawing route: {}", route.name);
        if let Err(e) = surface.set_source_data(ROUTE_SOURCE_ID, SourceData::LineString(route.line()))
        {
            tracing::warn!("Failed to update route line: {e}");
        }

        let mut bounds = None;
        for (index, checkpoint) in route.checkpoints.iter().enumerate() {
            let stop = index + 1;
            let element = MarkerElement {
                label: stop.to_string(),
                color: checkpoint.category.marker_color(),
                anchor: Anchor::Center,
            };
            let popup = PopupContent {
                offset: POPUP_OFFSET,
                title: checkpoint.name.clone(),
                stop,
                category: checkpoint.category,
                description: checkpoint.description.clone(),
            };
            self.placed
                .push(surface.place_marker(checkpoint.coordinates, element, popup));
            bounds = extend(bounds, checkpoint.coordinates.into());
        }

        if let Some(bounds) = bounds {
            surface.fit_bounds(bounds, fit_options_for_pitch(surface.pitch()));
        }
    }
}
