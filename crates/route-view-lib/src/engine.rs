//! View-state synchronization engine
//!
//! The engine owns the view state and is the only writer of the rendering surface.
//! User intents update the state immediately; surface work that has to wait for an
//! asynchronous style load is parked as a single-use continuation
//! ([`PendingRestoration`]) that runs against the state as it is when the matching
//! `StyleReady` arrives, not as it was when the request was made.
//!
//! Overlapping requests are resolved by cancel-and-supersede: only the continuation of
//! the most recent style replacement is kept, identified by the ticket the surface
//! returned for it. `StyleReady` events for older tickets are ignored.

use crate::catalog::{Route, RouteCatalog};
use crate::layers;
use crate::presenter::MarkerPresenter;
use crate::style::{DEFAULT_CAMERA, StyleDescriptor, default_style, find_style};
use crate::surface::{RenderingSurface, StyleTicket, SurfaceEvent, SurfaceFactory, SurfaceOptions};
use crate::{EngineError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Camera pitch in 3D mode, degrees
pub const TILTED_PITCH: f64 = 45.0;
const LEVEL_PITCH: f64 = 0.0;
const PITCH_TRANSITION: Duration = Duration::from_millis(500);

/// Observable view state
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub selected_route_id: Option<String>,
    pub active_style_id: String,
    pub is_3d_enabled: bool,
    pub surface_ready: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_route_id: None,
            active_style_id: default_style().id.to_string(),
            is_3d_enabled: false,
            surface_ready: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    AwaitingSurfaceReady,
    Ready,
}

/// What requested a style reload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestorationTrigger {
    StyleChange,
    DimensionToggle,
}

/// Continuation waiting for the `StyleReady` of one particular style request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRestoration {
    pub ticket: StyleTicket,
    pub trigger: RestorationTrigger,
}

/// Reconciles [`ViewState`] with a [`RenderingSurface`]
pub struct ViewStateEngine<S: RenderingSurface> {
    catalog: Arc<RouteCatalog>,
    state: ViewState,
    phase: EnginePhase,
    surface: Option<S>,
    presenter: MarkerPresenter,
    pending: Option<PendingRestoration>,
    last_error: Option<String>,
    completed_restorations: usize,
}

impl<S: RenderingSurface> ViewStateEngine<S> {
    pub fn new(catalog: Arc<RouteCatalog>) -> Self {
        Self {
            catalog,
            state: ViewState::default(),
            phase: EnginePhase::Uninitialized,
            surface: None,
            presenter: MarkerPresenter::new(),
            pending: None,
            last_error: None,
            completed_restorations: 0,
        }
    }

    /// Create the surface and wait for it to become ready
    ///
    /// Fails without creating anything when the access token is missing or blank.
    pub fn initialize<F>(
        &mut self,
        factory: &mut F,
        container: F::Container,
        access_token: Option<&str>,
    ) -> Result<()>
    where
        F: SurfaceFactory<Surface = S>,
    {
        if self.phase != EnginePhase::Uninitialized {
            tracing::debug!("Surface already created, ignoring initialize");
            return Ok(());
        }

        let Some(token) = access_token.map(str::trim).filter(|t| !t.is_empty()) else {
            tracing::error!("Map access token is missing!");
            return Err(EngineError::MissingCredential);
        };

        let style = self.active_style();
        let surface = factory.construct(
            container,
            SurfaceOptions {
                style_uri: style.uri.to_string(),
                camera: DEFAULT_CAMERA,
                access_token: token.to_string(),
            },
        )?;

        tracing::info!("Surface created with style {}, waiting for ready", style.id);
        self.surface = Some(surface);
        self.phase = EnginePhase::AwaitingSurfaceReady;
        Ok(())
    }

    /// Remove the markers, release the surface and reset the view state
    ///
    /// The released surface is handed back to the caller.
    pub fn teardown(&mut self) -> Option<S> {
        let mut surface = self.surface.take();
        if let Some(surface) = surface.as_mut() {
            tracing::info!("Releasing surface");
            self.presenter.clear(surface);
        }
        self.pending = None;
        self.state = ViewState::default();
        self.phase = EnginePhase::Uninitialized;
        surface
    }

    /// Deliver every event the surface has queued
    ///
    /// Returns the number of events handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.surface.as_mut().and_then(|s| s.poll_event()) {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// React to a surface lifecycle event
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Ready => {
                if self.phase == EnginePhase::AwaitingSurfaceReady {
                    self.on_ready();
                } else {
                    tracing::debug!("Ignoring ready event in phase {:?}", self.phase);
                }
            }
            SurfaceEvent::StyleReady(ticket) => match self.pending {
                Some(pending) if pending.ticket == ticket => {
                    self.pending = None;
                    tracing::debug!("Style ready for {:?} ({:?})", ticket, pending.trigger);
                    self.restore();
                }
                Some(pending) => {
                    tracing::debug!(
                        "Ignoring style ready for {:?}, superseded by {:?}",
                        ticket,
                        pending.ticket
                    );
                }
                None => {
                    tracing::debug!("Ignoring style ready for {:?}, nothing pending", ticket);
                }
            },
            SurfaceEvent::Error(message) => {
                tracing::error!("Surface error: {message}");
                self.last_error = Some(message);
            }
        }
    }

    fn on_ready(&mut self) {
        tracing::info!("Surface ready");
        self.phase = EnginePhase::Ready;
        self.state.surface_ready = true;

        let terrain_capable = self.active_style().terrain_capable;
        let is_3d = self.state.is_3d_enabled;
        let route = self.selected_route().cloned();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        layers::ensure_route_layer(surface);
        if terrain_capable {
            tracing::debug!("Initial style supports terrain, enabling");
            layers::enable_terrain(surface);
        }
        layers::ensure_buildings_layer(surface, is_3d);
        if is_3d {
            surface.set_pitch(TILTED_PITCH, None);
        }
        self.presenter.redraw(surface, route.as_ref());
    }

    /// Switch to another style; unknown ids and calls before ready are ignored
    pub fn change_style(&mut self, style_id: &str) {
        if !self.state.surface_ready {
            tracing::debug!("Surface not ready, ignoring style change to {style_id}");
            return;
        }
        let Some(style) = find_style(style_id) else {
            tracing::debug!("Unknown style id {style_id}, ignoring");
            return;
        };

        tracing::info!("Changing style to: {}", style.id);
        self.state.active_style_id = style.id.to_string();
        self.reload_style(style, RestorationTrigger::StyleChange);
    }

    /// Switch between flat and tilted presentation
    ///
    /// Turning 3D on reloads the current style so terrain and buildings start from a
    /// clean baseline; turning it off only adjusts the surface in place.
    pub fn toggle_dimension(&mut self, enabled: bool) {
        self.state.is_3d_enabled = enabled;
        if !self.state.surface_ready {
            tracing::debug!("Surface not ready, 3D = {enabled} applies once ready");
            return;
        }
        let style = self.active_style();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        if enabled {
            tracing::info!("Switching to 3D mode");
            surface.set_pitch(TILTED_PITCH, Some(PITCH_TRANSITION));
            // Buildings come back visible from the restoration after the reload
            self.reload_style(style, RestorationTrigger::DimensionToggle);
        } else {
            tracing::info!("Switching to 2D mode");
            surface.set_pitch(LEVEL_PITCH, Some(PITCH_TRANSITION));
            layers::disable_terrain(surface);
            layers::set_buildings_visibility(surface, false);
        }
    }

    /// Select a route (or clear the selection with `None`) and redraw
    pub fn select_route(&mut self, route_id: Option<&str>) {
        if let Some(id) = route_id
            && !self.catalog.contains(id)
        {
            tracing::debug!("Unknown route id {id}, ignoring");
            return;
        }
        self.state.selected_route_id = route_id.map(str::to_string);

        if !self.state.surface_ready {
            return;
        }
        let route = self.selected_route().cloned();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if !surface.is_style_loaded() {
            tracing::debug!("Style still loading, route will be drawn on style ready");
            return;
        }
        self.presenter.redraw(surface, route.as_ref());
    }

    fn reload_style(&mut self, style: &'static StyleDescriptor, trigger: RestorationTrigger) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let ticket = surface.set_style(style.uri);
        if let Some(previous) = self.pending.replace(PendingRestoration { ticket, trigger }) {
            tracing::debug!("Style request {:?} supersedes {:?}", ticket, previous.ticket);
        }
    }

    /// Bring the surface back to the configuration implied by the current state
    fn restore(&mut self) {
        profiling::scope!("ViewStateEngine::restore");

        let is_3d = self.state.is_3d_enabled;
        let terrain_capable = self.active_style().terrain_capable;
        let route = self.selected_route().cloned();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        layers::ensure_route_layer(surface);
        surface.set_pitch(if is_3d { TILTED_PITCH } else { LEVEL_PITCH }, None);
        if is_3d && terrain_capable {
            layers::enable_terrain(surface);
        } else {
            layers::disable_terrain(surface);
        }
        layers::ensure_buildings_layer(surface, is_3d);
        self.presenter.redraw(surface, route.as_ref());

        self.completed_restorations += 1;
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn selected_route_id(&self) -> Option<&str> {
        self.state.selected_route_id.as_deref()
    }

    pub fn selected_route(&self) -> Option<&Route> {
        self.selected_route_id().and_then(|id| self.catalog.get(id))
    }

    pub fn active_style_id(&self) -> &str {
        &self.state.active_style_id
    }

    pub fn active_style(&self) -> &'static StyleDescriptor {
        find_style(&self.state.active_style_id).unwrap_or_else(default_style)
    }

    pub fn is_3d_enabled(&self) -> bool {
        self.state.is_3d_enabled
    }

    pub fn surface_ready(&self) -> bool {
        self.state.surface_ready
    }

    /// Most recent runtime error reported by the surface
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_last_error(&mut self) {
        self.last_error = None;
    }

    pub fn pending_restoration(&self) -> Option<PendingRestoration> {
        self.pending
    }

    /// Number of restorations run after a style load
    pub fn completed_restorations(&self) -> usize {
        self.completed_restorations
    }

    pub fn catalog(&self) -> &Arc<RouteCatalog> {
        &self.catalog
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable access for the host to render the surface and feed it input
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }
}
