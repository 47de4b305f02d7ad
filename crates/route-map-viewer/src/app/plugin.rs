//! Walkers plugin drawing the selected route
//!
//! Draws the dashed route line, the numbered checkpoint markers and the popup of
//! the marker the user clicked. Clicks are reported back through a [`ClickSlot`]
//! since the plugin is consumed by the map widget.

use egui::{Align2, Color32, FontId, Pos2, RichText, Stroke};
use route_view_lib::{MarkerId, PopupContent};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use walkers::{MapMemory, Plugin, Position, Projector};

const MARKER_RADIUS: f32 = 14.0;
/// Extra pick distance around a marker, in pixels
const PICK_TOLERANCE: f32 = 4.0;

const NO_CLICK: u64 = 0;
const CLICK_ON_MAP: u64 = u64::MAX;

/// Click outcome shared between the plugin and its owner
#[derive(Clone, Debug)]
pub struct ClickSlot(Arc<AtomicU64>);

impl Default for ClickSlot {
    fn default() -> Self {
        Self(Arc::new(AtomicU64::new(NO_CLICK)))
    }
}

impl ClickSlot {
    fn set(&self, clicked: Option<MarkerId>) {
        let value = clicked.map_or(CLICK_ON_MAP, |id| id.0);
        self.0.store(value, Ordering::Relaxed);
    }

    /// `None` without a click, `Some(None)` for a click on the bare map
    pub fn take(&self) -> Option<Option<MarkerId>> {
        match self.0.swap(NO_CLICK, Ordering::Relaxed) {
            NO_CLICK => None,
            CLICK_ON_MAP => Some(None),
            id => Some(Some(MarkerId(id))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
    /// Dash pattern in line widths; empty for a solid line
    pub dash: Vec<f32>,
}

#[derive(Clone, Debug)]
pub struct MarkerSprite {
    pub id: MarkerId,
    pub position: Position,
    pub label: String,
    pub color: Color32,
}

pub struct RoutePlugin {
    line: Option<(Vec<Position>, LineStyle)>,
    markers: Vec<MarkerSprite>,
    popup: Option<(Position, PopupContent, Color32)>,
    clicks: ClickSlot,
}

impl RoutePlugin {
    pub fn new(
        line: Option<(Vec<Position>, LineStyle)>,
        markers: Vec<MarkerSprite>,
        popup: Option<(Position, PopupContent, Color32)>,
        clicks: ClickSlot,
    ) -> Self {
        Self {
            line,
            markers,
            popup,
            clicks,
        }
    }

    fn draw_line(&self, painter: &egui::Painter, projector: &Projector) {
        let Some((points, style)) = &self.line else {
            return;
        };
        let screen: Vec<Pos2> = points
            .iter()
            .map(|p| projector.project(*p).to_pos2())
            .collect();
        if screen.len() < 2 {
            return;
        }

        let stroke = Stroke::new(style.width, style.color);
        // Mapbox dash arrays alternate dash and gap lengths; a leading zero dash draws dots
        let dash_length = style.dash.iter().step_by(2).copied().fold(0.0, f32::max);
        let gap_length = style.dash.iter().skip(1).step_by(2).copied().fold(0.0, f32::max);
        if dash_length > 0.0 && gap_length > 0.0 {
            painter.extend(egui::Shape::dashed_line(
                &screen,
                stroke,
                dash_length * style.width,
                gap_length * style.width,
            ));
        } else {
            painter.add(egui::Shape::line(screen, stroke));
        }
    }

    fn draw_popup(&self, ui: &egui::Ui, projector: &Projector) {
        let Some((position, popup, color)) = &self.popup else {
            return;
        };
        let anchor = projector.project(*position).to_pos2() - egui::vec2(0.0, popup.offset);

        egui::Area::new(egui::Id::new("checkpoint_popup"))
            .order(egui::Order::Foreground)
            .pivot(Align2::CENTER_BOTTOM)
            .fixed_pos(anchor)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(240.0);
                    ui.label(RichText::new(&popup.title).strong());
                    ui.label(RichText::new(popup.subtitle()).small().color(*color));
                    if let Some(description) = &popup.description {
                        ui.label(description);
                    }
                });
            });
    }
}

impl Plugin for RoutePlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &MapMemory,
    ) {
        profiling::scope!("RoutePlugin::run");

        let painter = ui.painter().with_clip_rect(response.rect);
        self.draw_line(&painter, projector);

        let click_pos = if response.clicked() {
            response.interact_pointer_pos()
        } else {
            None
        };
        let mut picked: Option<(f32, MarkerId)> = None;

        for marker in &self.markers {
            let center = projector.project(marker.position).to_pos2();
            painter.circle_filled(center, MARKER_RADIUS, marker.color);
            painter.circle_stroke(center, MARKER_RADIUS, Stroke::new(2.0, Color32::WHITE));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                &marker.label,
                FontId::proportional(13.0),
                Color32::WHITE,
            );

            if let Some(pos) = click_pos {
                let distance = center.distance(pos);
                if distance <= MARKER_RADIUS + PICK_TOLERANCE
                    && picked.is_none_or(|(best, _)| distance < best)
                {
                    picked = Some((distance, marker.id));
                }
            }
        }

        if click_pos.is_some() {
            self.clicks.set(picked.map(|(_, id)| id));
        }

        self.draw_popup(ui, projector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_slot() {
        let slot = ClickSlot::default();
        assert_eq!(slot.take(), None);

        slot.clone().set(Some(MarkerId(3)));
        assert_eq!(slot.take(), Some(Some(MarkerId(3))));
        assert_eq!(slot.take(), None);

        slot.set(None);
        assert_eq!(slot.take(), Some(None));
    }
}
