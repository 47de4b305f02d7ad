//! Application module
//!
//! - Full-screen map drawn by the walkers-backed surface
//! - Sidebar with routes, style picker and 3D switch
//! - Blocking notice when no access token is configured
//!
//! Surface events are pumped into the engine at the start of every frame, before
//! any UI can issue new intents.

mod plugin;
pub(crate) mod settings;
mod state;
mod surface;
mod ui_panels;

use crate::app::settings::Settings;
use crate::app::state::{StartupError, UiState};
use crate::app::surface::{WalkersFactory, WalkersSurface};
use eframe::egui;
use route_view_lib::{EngineError, RouteCatalog, Rgb, ViewStateEngine};
use std::sync::Arc;

pub(crate) fn to_color32(rgb: Rgb, opacity: f32) -> egui::Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(rgb.0, rgb.1, rgb.2, alpha)
}

/// Main application structure
pub struct RouteMapViewerApp {
    engine: ViewStateEngine<WalkersSurface>,
    ui_state: UiState,
}

impl RouteMapViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::from_cli();
        let mut ui_state = UiState::new(&settings);

        let catalog = match &settings.catalog {
            Some(path) => match RouteCatalog::load(path) {
                Ok(catalog) => Arc::new(catalog),
                Err(e) => {
                    tracing::error!("Failed to load catalog {}: {e}", path.display());
                    ui_state.catalog_error = Some(format!("{}: {e}", path.display()));
                    RouteCatalog::montreal()
                }
            },
            None => RouteCatalog::montreal(),
        };

        let mut engine = ViewStateEngine::new(catalog);

        // Both are honoured once the surface is ready
        if settings.start_3d {
            engine.toggle_dimension(true);
        }
        if let Some(route) = settings.route.as_deref() {
            if engine.catalog().contains(route) {
                engine.select_route(Some(route));
            } else {
                tracing::warn!("Unknown route id on command line: {route}");
            }
        }

        let token = settings.resolved_access_token();
        match engine.initialize(&mut WalkersFactory, cc.egui_ctx.clone(), token.as_deref()) {
            Ok(()) => {}
            Err(EngineError::MissingCredential) => {
                ui_state.startup_error = Some(StartupError::MissingToken);
            }
            Err(e) => {
                tracing::error!("Failed to create map: {e}");
                ui_state.startup_error = Some(StartupError::Surface(e.to_string()));
            }
        }

        tracing::info!(
            "Initialized with {} routes, style {}",
            engine.catalog().len(),
            engine.active_style_id()
        );

        Self { engine, ui_state }
    }

    fn apply_startup_style(&mut self) {
        if !self.engine.surface_ready() {
            return;
        }
        if let Some(style) = self.ui_state.pending_style.take()
            && style != self.engine.active_style_id()
        {
            self.engine.change_style(&style);
        }
    }
}

#[profiling::all_functions]
impl eframe::App for RouteMapViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let handled = self.engine.pump_events();
        if handled > 0 {
            tracing::trace!("Handled {handled} surface events");
        }
        self.apply_startup_style();

        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) {
                self.ui_state.show_hint = !self.ui_state.show_hint;
            }
        });

        ui_panels::render_sidebar(ctx, &mut self.engine, &mut self.ui_state);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");

                if let Some(error) = &self.ui_state.startup_error {
                    ui_panels::startup_error_notice(ui, error);
                    return;
                }

                let ready = self.engine.surface_ready();
                let Some(surface) = self.engine.surface_mut() else {
                    return;
                };
                let response = surface.show(ui);
                let status = surface.status();

                ui_panels::sidebar_toggle_button(ui, &mut self.ui_state);
                if let Some(delta) = ui_panels::zoom_controls(ui, response.rect) {
                    surface.zoom_by(delta);
                }
                ui_panels::status_chip(ui, response.rect, &status);
                ui_panels::attribution(ui, response.rect);
                if !ready {
                    ui_panels::loading_overlay(ui, response.rect);
                }
            });
    }
}

impl Drop for RouteMapViewerApp {
    fn drop(&mut self) {
        self.engine.teardown();
    }
}
