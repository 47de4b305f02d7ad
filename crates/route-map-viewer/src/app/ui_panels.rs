//! UI panels for the application
//!
//! Sidebar content plus the small overlays drawn on top of the map.

use crate::app::settings::ACCESS_TOKEN_ENV;
use crate::app::state::{StartupError, UiState};
use crate::app::surface::{SurfaceStatus, WalkersSurface, mapbox_attribution};
use crate::app::to_color32;
use egui::{Color32, RichText, Ui};
use route_view_lib::{MAP_STYLES, Route, ViewStateEngine};

const MAP_BUTTON_SIZE: f32 = 40.0;
const MAP_BUTTON_MARGIN: f32 = 10.0;

/// Square button painted over the map
fn map_button(ui: &mut Ui, rect: egui::Rect, label: &str, hover: &str) -> bool {
    let response = ui
        .allocate_rect(rect, egui::Sense::click())
        .on_hover_text(hover);

    let bg_color = if response.hovered() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };
    ui.painter().rect_filled(rect, 5.0, bg_color);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(20.0),
        ui.visuals().text_color(),
    );
    response.clicked()
}

/// Render the sidebar toggle button (overlaid on the top-left of the map)
pub fn sidebar_toggle_button(ui: &mut Ui, state: &mut UiState) {
    let rect = egui::Rect::from_min_size(
        ui.max_rect().left_top() + egui::vec2(MAP_BUTTON_MARGIN, MAP_BUTTON_MARGIN),
        egui::Vec2::splat(MAP_BUTTON_SIZE),
    );
    let (label, hover) = if state.sidebar_open {
        ("✕", "Hide sidebar")
    } else {
        ("☰", "Show sidebar")
    };
    if map_button(ui, rect, label, hover) {
        state.sidebar_open = !state.sidebar_open;
    }
}

/// Zoom in/out buttons stacked in the bottom-right corner of the map
///
/// Returns the requested zoom change in levels.
pub fn zoom_controls(ui: &mut Ui, rect: egui::Rect) -> Option<f64> {
    let size = egui::Vec2::splat(MAP_BUTTON_SIZE);
    // Leave room for the attribution line below
    let bottom_right = rect.right_bottom() - egui::vec2(MAP_BUTTON_MARGIN, MAP_BUTTON_MARGIN + 16.0);
    let zoom_out = egui::Rect::from_min_size(bottom_right - size, size);
    let zoom_in = zoom_out.translate(egui::vec2(0.0, -(MAP_BUTTON_SIZE + 4.0)));

    let mut delta = None;
    if map_button(ui, zoom_in, "+", "Zoom in") {
        delta = Some(1.0);
    }
    if map_button(ui, zoom_out, "−", "Zoom out") {
        delta = Some(-1.0);
    }
    delta
}

pub fn render_sidebar(
    ctx: &egui::Context,
    engine: &mut ViewStateEngine<WalkersSurface>,
    state: &mut UiState,
) {
    if !state.sidebar_open {
        return;
    }

    egui::SidePanel::left("route_sidebar")
        .default_width(340.0)
        .min_width(280.0)
        .max_width(460.0)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| render_sidebar_content(ui, engine, state));
        });
}

fn render_sidebar_content(
    ui: &mut Ui,
    engine: &mut ViewStateEngine<WalkersSurface>,
    state: &mut UiState,
) {
    ui.heading("🗺 Route Explorer");
    ui.add_space(4.0);

    render_map_controls(ui, engine);

    if state.show_hint {
        ui.add_space(4.0);
        ui.label(
            RichText::new("💡 Pick a route, then click a numbered marker to learn about the stop. F1 hides this hint.")
                .small()
                .weak(),
        );
    }

    ui.add_space(8.0);
    ui.separator();
    render_route_list(ui, engine);

    if let Some(route) = engine.selected_route().cloned() {
        ui.add_space(8.0);
        ui.separator();
        render_route_details(ui, &route);
    }

    render_errors(ui, engine, state);

    ui.add_space(12.0);
    ui.separator();
    ui.collapsing("⚙ Diagnostics", |ui| {
        ui.label(
            RichText::new(eframe_entrypoints::short_version_info("Route Map Viewer"))
                .small()
                .weak(),
        );
        ui.checkbox(&mut state.show_profiling, "Show profiling controls");
        if state.show_profiling {
            eframe_entrypoints::profiling_ui(ui);
        }
    });
}

fn render_map_controls(ui: &mut Ui, engine: &mut ViewStateEngine<WalkersSurface>) {
    let ready = engine.surface_ready();
    let active = engine.active_style();

    ui.add_enabled_ui(ready, |ui| {
        ui.horizontal(|ui| {
            ui.label("Map style:");
            let mut selected = active.id;
            egui::ComboBox::from_id_salt("map_style")
                .selected_text(active.display_name)
                .show_ui(ui, |ui| {
                    for style in MAP_STYLES {
                        ui.selectable_value(&mut selected, style.id, style.display_name);
                    }
                });
            if selected != active.id {
                engine.change_style(selected);
            }
        });
    });

    let mut is_3d = engine.is_3d_enabled();
    if ui.checkbox(&mut is_3d, "🏙 3D view").changed() {
        engine.toggle_dimension(is_3d);
    }
    if is_3d && !active.terrain_capable {
        ui.label(
            RichText::new("Terrain is only available on Outdoors and Satellite styles")
                .small()
                .weak(),
        );
    }
}

fn render_route_list(ui: &mut Ui, engine: &mut ViewStateEngine<WalkersSurface>) {
    ui.label(RichText::new("Routes").strong());
    ui.add_space(4.0);

    let catalog = engine.catalog().clone();
    let selected = engine.selected_route_id().map(str::to_string);
    let mut clicked: Option<Option<String>> = None;

    for route in catalog.iter() {
        let is_selected = selected.as_deref() == Some(route.id.as_str());
        let response = ui
            .selectable_label(
                is_selected,
                format!("{} ({} stops)", route.name, route.checkpoints.len()),
            )
            .on_hover_text(&route.description);
        if response.clicked() {
            clicked = Some(if is_selected { None } else { Some(route.id.clone()) });
        }
    }

    if selected.is_some() && ui.small_button("✕ Clear selection").clicked() {
        clicked = Some(None);
    }

    if let Some(route_id) = clicked {
        engine.select_route(route_id.as_deref());
    }
}

fn render_route_details(ui: &mut Ui, route: &Route) {
    ui.label(RichText::new(&route.name).strong().size(16.0));
    if !route.description.is_empty() {
        ui.label(&route.description);
    }
    ui.add_space(6.0);

    for (index, checkpoint) in route.checkpoints.iter().enumerate() {
        let tint = to_color32(checkpoint.category.tint(), 1.0);
        let accent = to_color32(checkpoint.category.marker_color(), 1.0);
        egui::Frame::new()
            .fill(tint)
            .corner_radius(6.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("{}", index + 1)).strong().color(accent));
                    ui.label(RichText::new(&checkpoint.name).strong().color(Color32::BLACK));
                });
                ui.label(
                    RichText::new(checkpoint.category.name())
                        .small()
                        .color(accent),
                );
                if let Some(description) = &checkpoint.description {
                    ui.label(RichText::new(description).color(Color32::DARK_GRAY));
                }
            });
        ui.add_space(4.0);
    }
}

fn render_errors(ui: &mut Ui, engine: &mut ViewStateEngine<WalkersSurface>, state: &mut UiState) {
    let mut dismiss_surface_error = false;
    if let Some(error) = engine.last_error() {
        ui.add_space(8.0);
        ui.separator();
        ui.label(RichText::new("⚠ Map error").strong().color(Color32::RED));
        ui.label(RichText::new(error).small().color(Color32::RED));
        dismiss_surface_error = ui.small_button("Dismiss").clicked();
    }
    if dismiss_surface_error {
        engine.clear_last_error();
    }

    if let Some(error) = &state.catalog_error {
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("⚠ Using built-in routes, catalog failed to load: {error}"))
                .small()
                .color(ui.visuals().warn_fg_color),
        );
    }
}

/// Blocking notice shown instead of the map
pub fn startup_error_notice(ui: &mut Ui, error: &StartupError) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        match error {
            StartupError::MissingToken => {
                ui.heading(RichText::new("⚠ Map access token missing").color(Color32::RED));
                ui.add_space(10.0);
                ui.label(format!(
                    "Pass --access-token <TOKEN> or set the {ACCESS_TOKEN_ENV} environment variable, then restart."
                ));
            }
            StartupError::Surface(message) => {
                ui.heading(RichText::new("⚠ Map could not be created").color(Color32::RED));
                ui.add_space(10.0);
                ui.label(message);
            }
        }
    });
}

/// Dimmed overlay with a spinner until the surface is ready
pub fn loading_overlay(ui: &mut Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, Color32::from_black_alpha(120));
    ui.put(
        egui::Rect::from_center_size(rect.center(), egui::vec2(200.0, 60.0)),
        |ui: &mut Ui| {
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading map…").color(Color32::WHITE));
            })
            .response
        },
    );
}

/// Chip in the top-right corner summarising what the flat renderer cannot show
pub fn status_chip(ui: &mut Ui, rect: egui::Rect, status: &SurfaceStatus) {
    let mut parts = vec![format!("pitch {:.0}°", status.pitch)];
    if status.terrain {
        parts.push("terrain".to_string());
    }
    if status.buildings == Some(true) {
        parts.push("3D buildings".to_string());
    }
    if !status.style_loaded {
        parts.push("loading style…".to_string());
    }

    let text = parts.join(" · ");
    let font = egui::FontId::proportional(12.0);
    let galley = ui
        .painter()
        .layout_no_wrap(text, font, Color32::WHITE);
    let chip = egui::Rect::from_min_size(
        rect.right_top() + egui::vec2(-galley.size().x - 26.0, 10.0),
        galley.size() + egui::vec2(16.0, 8.0),
    );
    ui.painter()
        .rect_filled(chip, 8.0, Color32::from_black_alpha(160));
    ui.painter()
        .galley(chip.min + egui::vec2(8.0, 4.0), galley, Color32::WHITE);
}

pub fn attribution(ui: &mut Ui, rect: egui::Rect) {
    ui.painter().text(
        rect.center_bottom() + egui::vec2(0.0, -5.0),
        egui::Align2::CENTER_BOTTOM,
        mapbox_attribution().text,
        egui::FontId::proportional(10.0),
        Color32::from_black_alpha(180),
    );
}
