//! Rendering surface backed by a walkers slippy map
//!
//! Mapbox styles are shown through the Mapbox raster tiles endpoint. Anything walkers
//! cannot draw (terrain, pitch, extruded buildings) is tracked so the status overlay
//! can report it, but it has no visual effect.

use crate::app::plugin::{ClickSlot, LineStyle, MarkerSprite, RoutePlugin};
use egui::Vec2;
use route_view_lib::layers::{BUILDINGS_LAYER_ID, ROUTE_LAYER_ID, ROUTE_SOURCE_ID};
use route_view_lib::{
    BuiltinStyle, FitBoundsOptions, LayerSpec, LayerType, LayoutProperty, LonLat, MarkerElement,
    MarkerId, Paint, PopupContent, RenderingSurface, SourceData, SourceSpec, StyleLayer,
    StyleSession, StyleTicket, SurfaceError, SurfaceEvent, SurfaceFactory, SurfaceOptions,
    TerrainSpec,
};
use std::collections::{BTreeMap, VecDeque};
use std::f64::consts::PI;
use std::time::Duration;
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpTiles, Map, MapMemory, Position, TileId};

const STYLE_URI_PREFIX: &str = "mapbox://styles/";
const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_78;
const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: u8 = 22;
const RASTER_LAYER_ID: &str = "mapbox-raster";

/// Mapbox raster tiles for one style
pub struct MapboxStyleTiles {
    /// `<owner>/<style>`
    style_path: String,
    access_token: String,
}

impl MapboxStyleTiles {
    pub fn new(style_uri: &str, access_token: &str) -> Result<Self, SurfaceError> {
        let style_path = style_uri
            .strip_prefix(STYLE_URI_PREFIX)
            .filter(|path| {
                let parts: Vec<&str> = path.split('/').collect();
                parts.len() == 2 && parts.iter().all(|p| !p.is_empty())
            })
            .ok_or_else(|| {
                SurfaceError::Construction(format!("Unsupported style URI: {style_uri}"))
            })?;
        Ok(Self {
            style_path: style_path.to_string(),
            access_token: access_token.to_string(),
        })
    }
}

impl TileSource for MapboxStyleTiles {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://api.mapbox.com/styles/v1/{}/tiles/256/{}/{}/{}?access_token={}",
            self.style_path, tile_id.zoom, tile_id.x, tile_id.y, self.access_token
        )
    }

    fn attribution(&self) -> Attribution {
        mapbox_attribution()
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }
}

pub fn mapbox_attribution() -> Attribution {
    Attribution {
        text: "© Mapbox © OpenStreetMap",
        url: "https://www.mapbox.com/about/maps/",
        logo_light: None,
        logo_dark: None,
    }
}

fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

fn mercator_to_lon_lat(x: f64, y: f64) -> LonLat {
    LonLat::new(x * 360.0 - 180.0, (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees())
}

/// Center and zoom that fit `region` inside the padded `viewport`
pub fn fit_camera(region: geo::Rect<f64>, options: &FitBoundsOptions, viewport: Vec2) -> (LonLat, f64) {
    let padding = options.padding;
    let avail_w = f64::from((viewport.x - padding.left - padding.right).max(1.0));
    let avail_h = f64::from((viewport.y - padding.top - padding.bottom).max(1.0));

    let (x0, x1) = (mercator_x(region.min().x), mercator_x(region.max().x));
    // North is up, so the max latitude has the smaller y
    let (y0, y1) = (mercator_y(region.max().y), mercator_y(region.min().y));

    let zoom_for = |pixels: f64, fraction: f64| {
        if fraction > 0.0 {
            (pixels / (TILE_SIZE * fraction)).log2()
        } else {
            f64::INFINITY
        }
    };
    let zoom = zoom_for(avail_w, x1 - x0)
        .min(zoom_for(avail_h, y1 - y0))
        .min(options.max_zoom)
        .max(MIN_ZOOM);

    let world = TILE_SIZE * zoom.exp2();
    let cx = (x0 + x1) / 2.0 - f64::from(padding.left - padding.right) / 2.0 / world;
    let cy = (y0 + y1) / 2.0 - f64::from(padding.top - padding.bottom) / 2.0 / world;
    (mercator_to_lon_lat(cx, cy), zoom)
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

#[derive(Clone, Copy, Debug)]
struct CameraAnimation {
    from: (LonLat, f64),
    to: (LonLat, f64),
    started: instant::Instant,
    duration: Duration,
}

impl CameraAnimation {
    /// Interpolated camera and whether the animation is over
    fn sample(&self, now: instant::Instant) -> ((LonLat, f64), bool) {
        let elapsed = now.saturating_duration_since(self.started);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        let k = ease_out_cubic(t);
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        let center = LonLat::new(
            lerp(self.from.0.lon, self.to.0.lon),
            lerp(self.from.0.lat, self.to.0.lat),
        );
        ((center, lerp(self.from.1, self.to.1)), t >= 1.0)
    }
}

struct PlacedMarker {
    at: LonLat,
    element: MarkerElement,
    popup: PopupContent,
}

/// What the status overlay shows
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceStatus {
    pub style_loaded: bool,
    pub pitch: f64,
    pub terrain: bool,
    pub buildings: Option<bool>,
}

pub struct WalkersSurface {
    ctx: egui::Context,
    access_token: String,
    tiles: HttpTiles,
    map_memory: MapMemory,
    home: Position,
    session: StyleSession,
    pitch: f64,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    open_popup: Option<MarkerId>,
    next_marker: u64,
    errors: VecDeque<String>,
    animation: Option<CameraAnimation>,
    viewport: Vec2,
}

/// The raster layer every Mapbox style is drawn with, plus its vector source
fn builtin_style(uri: &str) -> BuiltinStyle {
    let layers = vec![StyleLayer {
        id: RASTER_LAYER_ID.to_string(),
        layer_type: LayerType::Raster,
    }];
    let mut sources = Vec::new();
    if !uri.ends_with("/satellite-v9") {
        sources.push((
            "composite".to_string(),
            SourceSpec::Vector {
                url: "mapbox://mapbox.mapbox-streets-v8".to_string(),
            },
        ));
    }
    BuiltinStyle { layers, sources }
}

impl WalkersSurface {
    fn new(ctx: egui::Context, options: SurfaceOptions) -> Result<Self, SurfaceError> {
        let source = MapboxStyleTiles::new(&options.style_uri, &options.access_token)?;
        let home = walkers::lat_lon(options.camera.center.lat, options.camera.center.lon);
        let mut map_memory = MapMemory::default();
        map_memory.center_at(home);
        if let Err(e) = map_memory.set_zoom(options.camera.zoom) {
            tracing::warn!("Initial zoom {} rejected: {e:?}", options.camera.zoom);
        }
        ctx.request_repaint();

        Ok(Self {
            tiles: HttpTiles::new(source, ctx.clone()),
            ctx,
            access_token: options.access_token,
            map_memory,
            home,
            session: StyleSession::new(&options.style_uri, builtin_style),
            pitch: options.camera.pitch,
            markers: BTreeMap::new(),
            open_popup: None,
            next_marker: 0,
            errors: VecDeque::new(),
            animation: None,
            viewport: Vec2::new(1280.0, 800.0),
        })
    }

    fn center(&self) -> LonLat {
        let position = self.map_memory.detached().unwrap_or(self.home);
        LonLat::new(position.x(), position.y())
    }

    fn move_camera(&mut self, center: LonLat, zoom: f64) {
        self.map_memory
            .center_at(walkers::lat_lon(center.lat, center.lon));
        if let Err(e) = self.map_memory.set_zoom(zoom) {
            tracing::debug!("Zoom {zoom} rejected: {e:?}");
        }
    }

    pub fn zoom(&self) -> f64 {
        self.map_memory.zoom()
    }

    /// Zoom in (positive) or out (negative) by whole levels, stopping any fit animation
    pub fn zoom_by(&mut self, delta: f64) {
        self.animation = None;
        let zoom = (self.map_memory.zoom() + delta).clamp(MIN_ZOOM, f64::from(MAX_ZOOM));
        if let Err(e) = self.map_memory.set_zoom(zoom) {
            tracing::debug!("Zoom {zoom} rejected: {e:?}");
        }
        self.ctx.request_repaint();
    }

    pub fn status(&self) -> SurfaceStatus {
        SurfaceStatus {
            style_loaded: self.session.is_style_loaded(),
            pitch: self.pitch,
            terrain: self.session.terrain().is_some(),
            buildings: self
                .session
                .layer(BUILDINGS_LAYER_ID)
                .map(|l| l.visibility.is_visible()),
        }
    }

    /// Route line as drawn by the route layer, if the layer is visible
    fn route_line(&self) -> Option<(Vec<Position>, LineStyle)> {
        let layer = self.session.layer(ROUTE_LAYER_ID)?;
        if !layer.visibility.is_visible() {
            return None;
        }
        let Some(Paint::Line {
            color,
            width,
            opacity,
            dash,
        }) = layer.spec.as_ref().map(|s| &s.paint)
        else {
            return None;
        };
        let Some(SourceData::LineString(line)) = self.session.source_data(ROUTE_SOURCE_ID) else {
            return None;
        };
        let points = line.coords().map(|c| walkers::lat_lon(c.y, c.x)).collect();
        let style = LineStyle {
            color: crate::app::to_color32(*color, *opacity),
            width: *width,
            dash: dash.clone(),
        };
        Some((points, style))
    }

    /// Draw the map and its overlays into `ui`
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        profiling::scope!("WalkersSurface::show");

        self.viewport = ui.available_size();

        if let Some(animation) = self.animation {
            let ((center, zoom), done) = animation.sample(instant::Instant::now());
            self.move_camera(center, zoom);
            if done {
                self.animation = None;
            } else {
                self.ctx.request_repaint();
            }
        }

        let clicks = ClickSlot::default();
        let markers = self
            .markers
            .iter()
            .map(|(id, marker)| MarkerSprite {
                id: *id,
                position: walkers::lat_lon(marker.at.lat, marker.at.lon),
                label: marker.element.label.clone(),
                color: crate::app::to_color32(marker.element.color, 1.0),
            })
            .collect();
        let popup = self.open_popup.and_then(|id| {
            self.markers.get(&id).map(|m| {
                (
                    walkers::lat_lon(m.at.lat, m.at.lon),
                    m.popup.clone(),
                    crate::app::to_color32(m.element.color, 1.0),
                )
            })
        });
        let plugin = RoutePlugin::new(self.route_line(), markers, popup, clicks.clone());

        let response = ui.add(
            Map::new(Some(&mut self.tiles), &mut self.map_memory, self.home).with_plugin(plugin),
        );

        if response.dragged() && self.animation.take().is_some() {
            tracing::trace!("Camera animation interrupted by drag");
        }
        if let Some(click) = clicks.take() {
            self.open_popup = click.filter(|id| Some(*id) != self.open_popup);
        }
        response
    }
}

impl RenderingSurface for WalkersSurface {
    fn has_source(&self, id: &str) -> bool {
        self.session.has_source(id)
    }

    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), SurfaceError> {
        self.session.add_source(id, spec)
    }

    fn set_source_data(&mut self, id: &str, data: SourceData) -> Result<(), SurfaceError> {
        self.session.set_source_data(id, data)?;
        self.ctx.request_repaint();
        Ok(())
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
        self.session.set_layout_property(id, property)?;
        self.ctx.request_repaint();
        Ok(())
    }

    fn set_terrain(&mut self, terrain: Option<TerrainSpec>) {
        self.session.set_terrain(terrain);
    }

    fn terrain(&self) -> Option<&TerrainSpec> {
        self.session.terrain()
    }

    fn pitch(&self) -> f64 {
        self.pitch
    }

    fn set_pitch(&mut self, pitch: f64, _transition: Option<Duration>) {
        self.pitch = pitch.clamp(0.0, 85.0);
    }

    fn set_style(&mut self, uri: &str) -> StyleTicket {
        match MapboxStyleTiles::new(uri, &self.access_token) {
            Ok(source) => self.tiles = HttpTiles::new(source, self.ctx.clone()),
            Err(e) => self.errors.push_back(e.to_string()),
        }
        self.ctx.request_repaint();
        self.session.request_style(uri)
    }

    fn is_style_loaded(&self) -> bool {
        self.session.is_style_loaded()
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        self.session.style_layers()
    }

    fn fit_bounds(&mut self, region: geo::Rect<f64>, options: FitBoundsOptions) {
        let target = fit_camera(region, &options, self.viewport);
        self.animation = Some(CameraAnimation {
            from: (self.center(), self.map_memory.zoom()),
            to: target,
            started: instant::Instant::now(),
            duration: options.duration,
        });
        self.ctx.request_repaint();
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
        if self.open_popup == Some(marker) {
            self.open_popup = None;
        }
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        if let Some(message) = self.errors.pop_front() {
            return Some(SurfaceEvent::Error(message));
        }
        self.session.poll_load()
    }
}

/// Creates [`WalkersSurface`]s; the container is the egui context that will host them
#[derive(Debug, Default)]
pub struct WalkersFactory;

impl SurfaceFactory for WalkersFactory {
    type Container = egui::Context;
    type Surface = WalkersSurface;

    fn construct(
        &mut self,
        container: egui::Context,
        options: SurfaceOptions,
    ) -> Result<WalkersSurface, SurfaceError> {
        WalkersSurface::new(container, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_view_lib::layers::{ensure_buildings_layer, ensure_route_layer};
    use route_view_lib::{
        Category, DEFAULT_CAMERA, FLAT_PADDING, PITCHED_PADDING, Padding, Rgb, Visibility,
        fit_options_for_pitch,
    };

    fn rect(min: (f64, f64), max: (f64, f64)) -> geo::Rect<f64> {
        geo::Rect::new(
            geo::Coord { x: min.0, y: min.1 },
            geo::Coord { x: max.0, y: max.1 },
        )
    }

    #[test]
    fn test_tile_url() {
        let tiles =
            MapboxStyleTiles::new("mapbox://styles/mapbox/outdoors-v12", "pk.abc").unwrap();
        let url = tiles.tile_url(TileId {
            x: 1,
            y: 2,
            zoom: 3,
        });
        assert_eq!(
            url,
            "https://api.mapbox.com/styles/v1/mapbox/outdoors-v12/tiles/256/3/1/2?access_token=pk.abc"
        );
    }

    #[test]
    fn test_rejects_foreign_uri() {
        assert!(MapboxStyleTiles::new("https://example.com/style.json", "pk").is_err());
        assert!(MapboxStyleTiles::new("mapbox://styles/mapbox", "pk").is_err());
        assert!(MapboxStyleTiles::new("mapbox://styles/a/b/c", "pk").is_err());
    }

    #[test]
    fn test_mercator_roundtrip_point() {
        let p = mercator_to_lon_lat(mercator_x(-73.5673), mercator_y(45.5017));
        assert!((p.lon + 73.5673).abs() < 1e-9);
        assert!((p.lat - 45.5017).abs() < 1e-9);
    }

    #[test]
    fn test_fit_camera_without_padding_is_centered() {
        let options = FitBoundsOptions {
            padding: Padding {
                top: 0.0,
                bottom: 0.0,
                left: 0.0,
                right: 0.0,
            },
            ..fit_options_for_pitch(0.0)
        };
        let region = rect((-73.58, 45.49), (-73.54, 45.52));
        let (center, zoom) = fit_camera(region, &options, Vec2::new(1000.0, 800.0));
        assert!((center.lon + 73.56).abs() < 1e-9);
        assert!(center.lat > 45.49 && center.lat < 45.52);
        assert!(zoom > 10.0 && zoom <= options.max_zoom);
    }

    #[test]
    fn test_fit_camera_padding_shifts_center() {
        let region = rect((-73.58, 45.49), (-73.54, 45.52));
        let viewport = Vec2::new(1400.0, 900.0);
        let (flat, _) = fit_camera(region, &fit_options_for_pitch(0.0), viewport);
        // More room on the left than on the right moves the camera west of the region
        assert!(flat.lon < -73.56);
        assert!(FLAT_PADDING.left > FLAT_PADDING.right);

        let (tilted, _) = fit_camera(region, &fit_options_for_pitch(45.0), viewport);
        // Extra bottom padding moves the camera south
        assert!(PITCHED_PADDING.bottom > PITCHED_PADDING.top);
        let (plain_center, _) = fit_camera(
            region,
            &FitBoundsOptions {
                padding: Padding {
                    top: 0.0,
                    bottom: 0.0,
                    left: 0.0,
                    right: 0.0,
                },
                ..fit_options_for_pitch(0.0)
            },
            viewport,
        );
        assert!(tilted.lat < plain_center.lat);
    }

    #[test]
    fn test_fit_camera_single_point_uses_max_zoom() {
        let region = rect((-73.58, 45.50), (-73.58, 45.50));
        let options = fit_options_for_pitch(0.0);
        let (_, zoom) = fit_camera(region, &options, Vec2::new(1200.0, 800.0));
        assert_eq!(zoom, options.max_zoom);
    }

    #[test]
    fn test_animation_reaches_target() {
        let started = instant::Instant::now();
        let animation = CameraAnimation {
            from: (LonLat::new(0.0, 0.0), 10.0),
            to: (LonLat::new(10.0, 20.0), 14.0),
            started,
            duration: Duration::from_millis(500),
        };
        let ((center, zoom), done) = animation.sample(started);
        assert!(!done);
        assert_eq!(center, LonLat::new(0.0, 0.0));
        assert_eq!(zoom, 10.0);

        let ((center, zoom), done) = animation.sample(started + Duration::from_secs(1));
        assert!(done);
        assert_eq!(center, LonLat::new(10.0, 20.0));
        assert_eq!(zoom, 14.0);
    }

    #[test]
    fn test_builtin_style_sources() {
        let satellite = builtin_style("mapbox://styles/mapbox/satellite-v9");
        assert!(satellite.sources.is_empty());
        let streets = builtin_style("mapbox://styles/mapbox/streets-v12");
        assert!(streets.sources.iter().any(|(id, _)| id == "composite"));
        assert!(streets.layers.iter().all(|l| l.layer_type != LayerType::Symbol));
    }

    const STREETS: &str = "mapbox://styles/mapbox/streets-v12";
    const DARK: &str = "mapbox://styles/mapbox/dark-v11";

    fn loaded_surface() -> WalkersSurface {
        let mut surface = WalkersFactory
            .construct(
                egui::Context::default(),
                SurfaceOptions {
                    style_uri: STREETS.to_string(),
                    camera: DEFAULT_CAMERA,
                    access_token: "pk.test".to_string(),
                },
            )
            .unwrap();
        assert!(!surface.is_style_loaded());
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::Ready));
        surface
    }

    fn place_stop(surface: &mut WalkersSurface) -> MarkerId {
        surface.place_marker(
            LonLat::new(-73.55, 45.50),
            MarkerElement {
                label: "1".to_string(),
                color: Rgb(0x22, 0x8b, 0x22),
                anchor: Default::default(),
            },
            PopupContent {
                offset: 35.0,
                title: "Stop".to_string(),
                stop: 1,
                category: Category::Park,
                description: None,
            },
        )
    }

    #[test]
    fn test_factory_rejects_foreign_style() {
        let result = WalkersFactory.construct(
            egui::Context::default(),
            SurfaceOptions {
                style_uri: "https://example.com/style.json".to_string(),
                camera: DEFAULT_CAMERA,
                access_token: "pk.test".to_string(),
            },
        );
        assert!(matches!(result, Err(SurfaceError::Construction(_))));
    }

    #[test]
    fn test_style_swap_wipes_layers_and_keeps_markers() {
        let mut surface = loaded_surface();
        ensure_route_layer(&mut surface);
        ensure_buildings_layer(&mut surface, true);
        let marker = place_stop(&mut surface);
        assert_eq!(
            surface.status(),
            SurfaceStatus {
                style_loaded: true,
                pitch: 0.0,
                terrain: false,
                buildings: Some(true),
            }
        );
        let order: Vec<String> = surface.style_layers().into_iter().map(|l| l.id).collect();
        assert_eq!(order, [RASTER_LAYER_ID, ROUTE_LAYER_ID, BUILDINGS_LAYER_ID]);

        let ticket = surface.set_style(DARK);
        assert!(!surface.is_style_loaded());
        assert!(!surface.has_source(ROUTE_SOURCE_ID));
        assert!(!surface.has_layer(BUILDINGS_LAYER_ID));
        assert_eq!(surface.status().buildings, None);

        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(ticket)));
        assert_eq!(surface.poll_event(), None);
        assert!(surface.is_style_loaded());
        assert!(surface.has_layer(RASTER_LAYER_ID));
        assert!(!surface.has_layer(ROUTE_LAYER_ID));
        assert!(surface.markers.contains_key(&marker));
    }

    #[test]
    fn test_superseded_swap_stays_unloaded_until_last() {
        let mut surface = loaded_surface();
        let first = surface.set_style(DARK);
        let second = surface.set_style(STREETS);

        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(first)));
        assert!(!surface.is_style_loaded());
        assert_eq!(
            surface.add_layer(LayerSpec::new("x", LayerType::Line), None),
            Err(SurfaceError::StyleNotLoaded)
        );
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(second)));
        assert!(surface.is_style_loaded());
        assert_eq!(surface.poll_event(), None);
    }

    #[test]
    fn test_invalid_style_reports_error_then_completes() {
        let mut surface = loaded_surface();
        let ticket = surface.set_style("https://example.com/style.json");
        assert!(matches!(surface.poll_event(), Some(SurfaceEvent::Error(_))));
        assert_eq!(surface.poll_event(), Some(SurfaceEvent::StyleReady(ticket)));
    }

    #[test]
    fn test_route_line_follows_layer_visibility() {
        let mut surface = loaded_surface();
        assert!(surface.route_line().is_none());

        ensure_route_layer(&mut surface);
        let line = geo::LineString::from(vec![(-73.55, 45.50), (-73.56, 45.51)]);
        surface
            .set_source_data(ROUTE_SOURCE_ID, SourceData::LineString(line))
            .unwrap();
        let (points, style) = surface.route_line().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].y(), 45.51);
        assert!(style.width > 0.0);

        surface
            .set_layout_property(ROUTE_LAYER_ID, LayoutProperty::Visibility(Visibility::Hidden))
            .unwrap();
        assert!(surface.route_line().is_none());
    }

    #[test]
    fn test_zoom_by_clamps_and_stops_animation() {
        let mut surface = loaded_surface();
        let start = surface.zoom();
        surface.fit_bounds(rect((-73.58, 45.49), (-73.54, 45.52)), fit_options_for_pitch(0.0));
        assert!(surface.animation.is_some());

        surface.zoom_by(1.0);
        assert!(surface.animation.is_none());
        assert_eq!(surface.zoom(), start + 1.0);

        surface.zoom_by(-100.0);
        assert_eq!(surface.zoom(), MIN_ZOOM);
    }
}
