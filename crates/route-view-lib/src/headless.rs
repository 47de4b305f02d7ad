//! In-memory rendering surface
//!
//! `HeadlessSurface` keeps the same session state a real map would and reproduces
//! the behaviour the engine has to cope with. Style-scoped state (sources, layers,
//! terrain, loads in flight) lives in a [`StyleSession`]; on top of it the surface
//! keeps the camera and markers, which survive style swaps.
//!
//! It also records fit requests and the last pitch transition so tests can assert
//! on them. Layer source references are not validated.

use crate::SurfaceError;
use crate::catalog::LonLat;
use crate::session::{BuiltinStyle, StyleSession};
use crate::style::DEFAULT_CAMERA;
use crate::surface::{
    Camera, FitBoundsOptions, LayerSpec, LayerType, LayoutProperty, MarkerElement, MarkerId,
    PopupContent, RenderingSurface, SourceData, SourceSpec, StyleLayer, StyleTicket,
    SurfaceEvent, SurfaceFactory, SurfaceOptions, TerrainSpec, Visibility,
};
use geo::Rect;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// A marker currently placed on the surface
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMarker {
    pub at: LonLat,
    pub element: MarkerElement,
    pub popup: PopupContent,
}

/// Built-in layers and sources of a style
fn builtin_style(uri: &str) -> BuiltinStyle {
    let layer = |id: &str, layer_type| StyleLayer {
        id: id.to_string(),
        layer_type,
    };
    if uri.ends_with("/satellite-v9") {
        return BuiltinStyle {
            layers: vec![
                layer("background", LayerType::Background),
                layer("satellite", LayerType::Raster),
            ],
            sources: vec![(
                "mapbox".to_string(),
                SourceSpec::Vector {
                    url: "mapbox://mapbox.satellite".to_string(),
                },
            )],
        };
    }

    let mut layers = vec![layer("land", LayerType::Background)];
    if uri.contains("satellite") {
        layers.push(layer("satellite", LayerType::Raster));
    }
    layers.extend([
        layer("water", LayerType::Fill),
        layer("landuse", LayerType::Fill),
        layer("road-primary", LayerType::Line),
        layer("road-secondary", LayerType::Line),
        layer("road-label", LayerType::Symbol),
        layer("poi-label", LayerType::Symbol),
        layer("place-label", LayerType::Symbol),
    ]);
    BuiltinStyle {
        layers,
        sources: vec![(
            "composite".to_string(),
            SourceSpec::Vector {
                url: "mapbox://mapbox.mapbox-streets-v8".to_string(),
            },
        )],
    }
}

/// In-memory implementation of [`RenderingSurface`]
#[derive(Debug)]
pub struct HeadlessSurface {
    session: StyleSession,
    camera: Camera,
    last_pitch_transition: Option<Duration>,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_marker: u64,
    injected: VecDeque<SurfaceEvent>,
    fit_requests: Vec<(Rect<f64>, FitBoundsOptions)>,
}

impl HeadlessSurface {
    /// Create a surface with the default camera; `Ready` is queued
    pub fn new(style_uri: &str) -> Self {
        Self::with_camera(style_uri, DEFAULT_CAMERA)
    }

    pub fn with_camera(style_uri: &str, camera: Camera) -> Self {
        Self {
            session: StyleSession::new(style_uri, builtin_style),
            camera,
            last_pitch_transition: None,
            markers: BTreeMap::new(),
            next_marker: 0,
            injected: VecDeque::new(),
            fit_requests: Vec::new(),
        }
    }

    /// Queue a runtime error event
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.injected.push_back(SurfaceEvent::Error(message.into()));
    }

    /// Complete every pending load and return the resulting events
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::iter::from_fn(|| self.poll_event()).collect()
    }

    pub fn session(&self) -> &StyleSession {
        &self.session
    }

    /// Number of loads (initial or style swaps) still in flight
    pub fn pending_loads(&self) -> usize {
        self.session.pending_loads()
    }

    pub fn style_uri(&self) -> &str {
        self.session.style_uri()
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn last_pitch_transition(&self) -> Option<Duration> {
        self.last_pitch_transition
    }

    /// Ids of all layers in drawing order, bottom first
    pub fn layer_order(&self) -> Vec<String> {
        self.session.layers().iter().map(|l| l.id.clone()).collect()
    }

    pub fn layer_count(&self, id: &str) -> usize {
        self.session.layers().iter().filter(|l| l.id == id).count()
    }

    pub fn layer_visibility(&self, id: &str) -> Option<Visibility> {
        self.session.layer(id).map(|l| l.visibility)
    }

    pub fn layer_spec(&self, id: &str) -> Option<&LayerSpec> {
        self.session.layer(id).and_then(|l| l.spec.as_ref())
    }

    /// How many times `add_layer` succeeded for this id
    pub fn layer_additions(&self, id: &str) -> usize {
        self.session.layer_additions(id)
    }

    /// How many times `add_source` succeeded for this id
    pub fn source_additions(&self, id: &str) -> usize {
        self.session.source_additions(id)
    }

    pub fn source_spec(&self, id: &str) -> Option<&SourceSpec> {
        self.session.source(id)
    }

    /// Current data of a GeoJSON source
    pub fn source_data(&self, id: &str) -> Option<&SourceData> {
        self.session.source_data(id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &PlacedMarker)> {
        self.markers.iter()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn fit_requests(&self) -> &[(Rect<f64>, FitBoundsOptions)] {
        &self.fit_requests
    }
}

impl RenderingSurface for HeadlessSurface {
    fn has_source(&self, id: &str) -> bool {
        self.session.has_source(id)
    }

    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), SurfaceError> {
        self.session.add_source(id, spec)
    }

    fn set_source_data(&mut self, id: &str, data: SourceData) -> Result<(), SurfaceError> {
        self.session.set_source_data(id, data)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.session.has_layer(id)
    }

    fn add_layer(&mut self, spec: LayerSpec, before_id: Option<&str>) -> Result<(), SurfaceError> {
        self.session.add_layer(spec, before_id)
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), SurfaceError> {
        self.session.remove_layer(id)
    }

    fn set_layout_property(
        &mut self,
        id: &str,
        property: LayoutProperty,
    ) -> Result<(), SurfaceError> {
        self.session.set_layout_property(id, property)
    }

    fn set_terrain(&mut self, terrain: Option<TerrainSpec>) {
        self.session.set_terrain(terrain);
    }

    fn terrain(&self) -> Option<&TerrainSpec> {
        self.session.terrain()
    }

    fn pitch(&self) -> f64 {
        self.camera.pitch
    }

    fn set_pitch(&mut self, pitch: f64, transition: Option<Duration>) {
        self.camera.pitch = pitch.clamp(0.0, 85.0);
        self.last_pitch_transition = transition;
    }

    fn set_style(&mut self, uri: &str) -> StyleTicket {
        self.session.request_style(uri)
    }

    fn is_style_loaded(&self) -> bool {
        self.session.is_style_loaded()
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        self.session.style_layers()
    }

    fn fit_bounds(&mut self, region: Rect<f64>, options: FitBoundsOptions) {
        let center = region.center();
        let span = region.width().max(region.height());
        let zoom = if span > 0.0 {
            ((4.0 * 360.0 / span).log2() - 0.5).clamp(1.0, options.max_zoom)
        } else {
            options.max_zoom
        };
        self.camera.center = LonLat::from(center);
        self.camera.zoom = zoom;
        self.fit_requests.push((region, options));
    }

    fn place_marker(
        &mut self,
        at: LonLat,
        element: MarkerElement,
        popup: PopupContent,
    ) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, PlacedMarker { at, element, popup });
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        if let Some(event) = self.injected.pop_front() {
            return Some(event);
        }
        self.session.poll_load()
    }
}

/// Factory producing [`HeadlessSurface`]s; the container is ignored
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    /// Number of surfaces created so far
    pub constructed: usize,
    /// Token passed to the most recent construction
    pub last_access_token: Option<String>,
}

impl SurfaceFactory for HeadlessFactory {
    type Container = ();
    type Surface = HeadlessSurface;

    fn construct(
        &mut self,
        _container: (),
        options: SurfaceOptions,
    ) -> Result<HeadlessSurface, SurfaceError> {
        self.constructed += 1;
        self.last_access_token = Some(options.access_token);
        Ok(HeadlessSurface::with_camera(
            &options.style_uri,
            options.camera,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{ROUTE_LAYER_ID, ROUTE_SOURCE_ID, ensure_route_layer};

    const STREETS: &str = "mapbox://styles/mapbox/streets-v12";
    const DARK: &str = "mapbox://styles/mapbox/dark-v11";

    #[test]
    fn test_ready_is_asynchronous() {
        let mut surface = HeadlessSurface::new(STREETS);
        assert!(!surface.is_style_loaded());
        assert!(surface.style_layers().is_empty());
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::Ready));
        assert!(surface.is_style_loaded());
        assert!(surface.has_source("composite"));
        assert_eq!(surface.poll_event(), None);
    }

    #[test]
    fn test_style_swap_wipes_custom_layers() {
        let mut surface = HeadlessSurface::new(STREETS);
        surface.drain_events();
        ensure_route_layer(&mut surface);
        let marker = surface.place_marker(
            LonLat::new(-73.5, 45.5),
            MarkerElement {
                label: "1".to_string(),
                color: crate::surface::Rgb(0, 0, 0),
                anchor: Default::default(),
            },
            PopupContent {
                offset: 35.0,
                title: "Stop".to_string(),
                stop: 1,
                category: crate::Category::Park,
                description: None,
            },
        );

        let ticket = surface.set_style(DARK);
        assert!(!surface.has_source(ROUTE_SOURCE_ID));
        assert!(!surface.has_layer(ROUTE_LAYER_ID));
        assert_eq!(
            surface.add_layer(LayerSpec::new("x", LayerType::Line), None),
            Err(SurfaceError::StyleNotLoaded)
        );

        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(ticket)));
        assert_eq!(surface.style_uri(), DARK);
        assert!(surface.is_style_loaded());
        assert!(!surface.has_layer(ROUTE_LAYER_ID));
        assert!(surface.markers().any(|(id, _)| *id == marker));
    }

    #[test]
    fn test_each_style_request_completes_once_in_order() {
        let mut surface = HeadlessSurface::new(STREETS);
        surface.drain_events();
        let first = surface.set_style(DARK);
        let second = surface.set_style(STREETS);
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(first)));
        assert!(!surface.is_style_loaded());
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(second)));
        assert!(surface.is_style_loaded());
        assert_eq!(surface.poll_event(), None);
    }

    #[test]
    fn test_duplicate_and_missing_ids() {
        let mut surface = HeadlessSurface::new(STREETS);
        surface.drain_events();
        assert_eq!(
            surface.add_source("composite", SourceSpec::Vector { url: String::new() }),
            Err(SurfaceError::DuplicateSource("composite".to_string()))
        );
        assert_eq!(
            surface.remove_layer("nope"),
            Err(SurfaceError::MissingLayer("nope".to_string()))
        );
        assert_eq!(
            surface.set_source_data("nope", SourceData::empty_line()),
            Err(SurfaceError::MissingSource("nope".to_string()))
        );
    }

    #[test]
    fn test_injected_errors_come_first() {
        let mut surface = HeadlessSurface::new(STREETS);
        surface.push_error("tile 404");
        assert_eq!(
            surface.poll_event(),
            Some(SurfaceEvent::Error("tile 404".to_string()))
        );
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::Ready));
    }

    #[test]
    fn test_factory_passes_options() {
        let mut factory = HeadlessFactory::default();
        let surface = factory
            .construct(
                (),
                SurfaceOptions {
                    style_uri: STREETS.to_string(),
                    camera: DEFAULT_CAMERA,
                    access_token: "pk.test".to_string(),
                },
            )
            .unwrap();
        assert_eq!(factory.constructed, 1);
        assert_eq!(factory.last_access_token.as_deref(), Some("pk.test"));
        assert_eq!(surface.style_uri(), STREETS);
        assert_eq!(surface.pitch(), 0.0);
    }
}
