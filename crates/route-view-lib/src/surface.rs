//! Rendering surface contract
//!
//! The surface is the live map backend: a stateful object with an imperative API
//! whose registered sources and layers disappear whenever the style is replaced.
//! Only the shapes the engine needs are modelled here; anything a backend cannot
//! draw it is free to record and ignore.

use crate::SurfaceError;
use crate::catalog::{Category, LonLat};
use geo::{LineString, Rect};
use std::fmt;
use std::time::Duration;

/// 8-bit RGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Camera position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub center: LonLat,
    pub zoom: f64,
    /// Tilt in degrees, 0 is looking straight down
    pub pitch: f64,
    pub bearing: f64,
}

/// Data held by a GeoJSON source
#[derive(Clone, Debug, PartialEq)]
pub enum SourceData {
    LineString(LineString<f64>),
}

impl SourceData {
    pub fn empty_line() -> Self {
        Self::LineString(LineString::new(Vec::new()))
    }
}

/// Data source registration
#[derive(Clone, Debug, PartialEq)]
pub enum SourceSpec {
    GeoJson {
        data: SourceData,
    },
    RasterDem {
        url: String,
        tile_size: u32,
        max_zoom: u8,
    },
    Vector {
        url: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerType {
    Background,
    Fill,
    Line,
    Symbol,
    Raster,
    FillExtrusion,
    Sky,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_flag(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Round,
    Miter,
    Bevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Butt,
    Square,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub visibility: Visibility,
    pub line_join: Option<LineJoin>,
    pub line_cap: Option<LineCap>,
}

/// Linear ramp from 0 at `from_zoom` to the feature attribute's value at `to_zoom`
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomRamp {
    pub from_zoom: f64,
    pub to_zoom: f64,
    pub attribute: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Paint {
    #[default]
    None,
    Line {
        color: Rgb,
        width: f32,
        opacity: f32,
        dash: Vec<f32>,
    },
    Sky {
        sun: [f64; 2],
        sun_intensity: f32,
    },
    FillExtrusion {
        color: Rgb,
        height: ZoomRamp,
        base: ZoomRamp,
        opacity: f32,
    },
}

/// Feature filter: `property == value`
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub property: String,
    pub value: String,
}

/// A layer registration request
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub layer_type: LayerType,
    pub source: Option<String>,
    pub source_layer: Option<String>,
    pub filter: Option<Filter>,
    pub min_zoom: Option<f64>,
    pub layout: Layout,
    pub paint: Paint,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source: None,
            source_layer: None,
            filter: None,
            min_zoom: None,
            layout: Layout::default(),
            paint: Paint::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutProperty {
    Visibility(Visibility),
}

/// A layer as listed by the current style, in drawing order
#[derive(Clone, Debug, PartialEq)]
pub struct StyleLayer {
    pub id: String,
    pub layer_type: LayerType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerrainSpec {
    pub source: String,
    pub exaggeration: f64,
}

/// Screen-space padding in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitBoundsOptions {
    pub padding: Padding,
    pub max_zoom: f64,
    pub duration: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Center,
    Bottom,
}

/// Visual element of a marker
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerElement {
    pub label: String,
    pub color: Rgb,
    pub anchor: Anchor,
}

/// Popup attached to a checkpoint marker
#[derive(Clone, Debug, PartialEq)]
pub struct PopupContent {
    /// Vertical offset from the marker in pixels
    pub offset: f32,
    pub title: String,
    pub stop: usize,
    pub category: Category,
    pub description: Option<String>,
}

impl PopupContent {
    /// Summary line under the title, e.g. `Stop #2 - Café`
    pub fn subtitle(&self) -> String {
        format!("Stop #{} - {}", self.stop, self.category.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Identifies one style replacement request; echoed by the matching [`SurfaceEvent::StyleReady`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleTicket(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// Initial style and resources are loaded
    Ready,
    /// A style replacement finished; emitted once per request
    StyleReady(StyleTicket),
    /// Runtime failure reported by the backend
    Error(String),
}

/// Construction parameters for a surface
#[derive(Clone, Debug)]
pub struct SurfaceOptions {
    pub style_uri: String,
    pub camera: Camera,
    pub access_token: String,
}

/// Creates surfaces bound to a host container
pub trait SurfaceFactory {
    type Container;
    type Surface: RenderingSurface;

    fn construct(
        &mut self,
        container: Self::Container,
        options: SurfaceOptions,
    ) -> Result<Self::Surface, SurfaceError>;
}

/// The live map backend
///
/// All commands apply synchronously to the surface's session state except
/// [`RenderingSurface::set_style`], which completes later and is reported through
/// [`RenderingSurface::poll_event`].
pub trait RenderingSurface {
    fn has_source(&self, id: &str) -> bool;
    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), SurfaceError>;
    /// Replace the data of a GeoJSON source
    fn set_source_data(&mut self, id: &str, data: SourceData) -> Result<(), SurfaceError>;

    fn has_layer(&self, id: &str) -> bool;
    /// Insert a layer below `before_id`, or on top when `None`
    fn add_layer(&mut self, spec: LayerSpec, before_id: Option<&str>) -> Result<(), SurfaceError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), SurfaceError>;
    fn set_layout_property(
        &mut self,
        id: &str,
        property: LayoutProperty,
    ) -> Result<(), SurfaceError>;

    fn set_terrain(&mut self, terrain: Option<TerrainSpec>);
    fn terrain(&self) -> Option<&TerrainSpec>;

    fn pitch(&self) -> f64;
    fn set_pitch(&mut self, pitch: f64, transition: Option<std::time::Duration>);

    /// Begin replacing the style; completion arrives as `StyleReady(ticket)`
    fn set_style(&mut self, uri: &str) -> StyleTicket;
    fn is_style_loaded(&self) -> bool;
    fn style_layers(&self) -> Vec<StyleLayer>;

    fn fit_bounds(&mut self, region: Rect<f64>, options: FitBoundsOptions);

    fn place_marker(
        &mut self,
        at: LonLat,
        element: MarkerElement,
        popup: PopupContent,
    ) -> MarkerId;
    fn remove_marker(&mut self, marker: MarkerId);

    /// Next pending lifecycle event, if any
    fn poll_event(&mut self) -> Option<SurfaceEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb(0x00, 0x66, 0xff).to_string(), "#0066ff");
        assert_eq!(Category::Cafe.marker_color().to_string(), "#d95f02");
    }

    #[test]
    fn test_popup_subtitle() {
        let popup = PopupContent {
            offset: 35.0,
            title: "Place des Arts".to_string(),
            stop: 4,
            category: Category::Landmark,
            description: None,
        };
        assert_eq!(popup.subtitle(), "Stop #4 - Landmark");
    }

    #[test]
    fn test_visibility_flag() {
        assert_eq!(Visibility::from_flag(true), Visibility::Visible);
        assert!(!Visibility::from_flag(false).is_visible());
    }
}
