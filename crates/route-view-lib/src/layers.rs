//! Layer lifecycle management
//!
//! Idempotent helpers that bring the surface's custom sources and layers to the
//! desired configuration. Each helper checks presence before creating, so it is safe
//! to call them after any style swap, as often as needed.
//!
//! Surface command failures are logged and swallowed: a restoration keeps going with
//! the remaining steps rather than stopping half-way.

use crate::surface::{
    Filter, LayerSpec, LayerType, Layout, LayoutProperty, LineCap, LineJoin, Paint,
    RenderingSurface, Rgb, SourceData, SourceSpec, TerrainSpec, Visibility, ZoomRamp,
};

pub const ROUTE_SOURCE_ID: &str = "route-line-source";
pub const ROUTE_LAYER_ID: &str = "route-line-layer";

pub const TERRAIN_SOURCE_ID: &str = "mapbox-dem";
pub const TERRAIN_SOURCE_URL: &str = "mapbox://mapbox.mapbox-terrain-dem-v1";
pub const TERRAIN_EXAGGERATION: f64 = 1.5;
pub const SKY_LAYER_ID: &str = "sky";

pub const BUILDINGS_LAYER_ID: &str = "3d-buildings";
/// Built-in vector source of the Mapbox styles carrying building footprints
pub const BUILDINGS_SOURCE_ID: &str = "composite";

/// Route line registration spec
pub fn route_line_layer() -> LayerSpec {
    LayerSpec {
        source: Some(ROUTE_SOURCE_ID.to_string()),
        layout: Layout {
            visibility: Visibility::Visible,
            line_join: Some(LineJoin::Round),
            line_cap: Some(LineCap::Round),
        },
        paint: Paint::Line {
            color: Rgb(0x00, 0x66, 0xff),
            width: 5.0,
            opacity: 0.8,
            dash: vec![0.0, 2.0, 4.0],
        },
        ..LayerSpec::new(ROUTE_LAYER_ID, LayerType::Line)
    }
}

fn sky_layer() -> LayerSpec {
    LayerSpec {
        paint: Paint::Sky {
            sun: [0.0, 0.0],
            sun_intensity: 15.0,
        },
        ..LayerSpec::new(SKY_LAYER_ID, LayerType::Sky)
    }
}

/// Extruded buildings, height and base ramped in between zoom 14 and 15
pub fn buildings_layer(visible: bool) -> LayerSpec {
    let ramp = |attribute: &str| ZoomRamp {
        from_zoom: 14.0,
        to_zoom: 15.0,
        attribute: attribute.to_string(),
    };
    LayerSpec {
        source: Some(BUILDINGS_SOURCE_ID.to_string()),
        source_layer: Some("building".to_string()),
        filter: Some(Filter {
            property: "extrude".to_string(),
            value: "true".to_string(),
        }),
        min_zoom: Some(14.0),
        layout: Layout {
            visibility: Visibility::from_flag(visible),
            ..Layout::default()
        },
        paint: Paint::FillExtrusion {
            color: Rgb(0xaa, 0xaa, 0xaa),
            height: ramp("height"),
            base: ramp("min_height"),
            opacity: 0.7,
        },
        ..LayerSpec::new(BUILDINGS_LAYER_ID, LayerType::FillExtrusion)
    }
}

/// Register the route source and line layer if absent
pub fn ensure_route_layer<S: RenderingSurface + ?Sized>(surface: &mut S) {
    profiling::scope!("ensure_route_layer");

    if !surface.has_source(ROUTE_SOURCE_ID) {
        tracing::debug!("Adding route source");
        let spec = SourceSpec::GeoJson {
            data: SourceData::empty_line(),
        };
        if let Err(e) = surface.add_source(ROUTE_SOURCE_ID, spec) {
            tracing::warn!("Failed to add route source: {e}");
        }
    }
    if !surface.has_layer(ROUTE_LAYER_ID) {
        tracing::debug!("Adding route layer");
        if let Err(e) = surface.add_layer(route_line_layer(), None) {
            tracing::warn!("Failed to add route layer: {e}");
        }
    }
}

/// Add the elevation source if needed, turn terrain on and add the sky
pub fn enable_terrain<S: RenderingSurface + ?Sized>(surface: &mut S) {
    profiling::scope!("enable_terrain");

    if !surface.has_source(TERRAIN_SOURCE_ID) {
        tracing::debug!("Adding terrain source");
        let spec = SourceSpec::RasterDem {
            url: TERRAIN_SOURCE_URL.to_string(),
            tile_size: 512,
            max_zoom: 14,
        };
        if let Err(e) = surface.add_source(TERRAIN_SOURCE_ID, spec) {
            tracing::warn!("Failed to add terrain source: {e}");
            return;
        }
    }

    surface.set_terrain(Some(TerrainSpec {
        source: TERRAIN_SOURCE_ID.to_string(),
        exaggeration: TERRAIN_EXAGGERATION,
    }));

    if !surface.has_layer(SKY_LAYER_ID) {
        tracing::debug!("Adding sky layer");
        if let Err(e) = surface.add_layer(sky_layer(), None) {
            tracing::warn!("Failed to add sky layer: {e}");
        }
    }
}

/// Turn terrain off and drop the sky; the elevation source stays registered
pub fn disable_terrain<S: RenderingSurface + ?Sized>(surface: &mut S) {
    profiling::scope!("disable_terrain");

    surface.set_terrain(None);
    if surface.has_layer(SKY_LAYER_ID) {
        tracing::debug!("Removing sky layer");
        if let Err(e) = surface.remove_layer(SKY_LAYER_ID) {
            tracing::warn!("Failed to remove sky layer: {e}");
        }
    }
}

/// Show or hide the buildings layer in place
pub fn set_buildings_visibility<S: RenderingSurface + ?Sized>(surface: &mut S, visible: bool) {
    if !surface.has_layer(BUILDINGS_LAYER_ID) {
        tracing::debug!("Layer {BUILDINGS_LAYER_ID} not found, cannot set visibility");
        return;
    }
    let property = LayoutProperty::Visibility(Visibility::from_flag(visible));
    if let Err(e) = surface.set_layout_property(BUILDINGS_LAYER_ID, property) {
        tracing::warn!("Failed to set buildings visibility: {e}");
    }
}

/// Update the buildings layer's visibility, creating it first if absent
///
/// New layers go directly below the first symbol layer of the current style so
/// labels stay readable, or on top when the style has no symbol layer.
pub fn ensure_buildings_layer<S: RenderingSurface + ?Sized>(surface: &mut S, visible: bool) {
    profiling::scope!("ensure_buildings_layer");

    if surface.has_layer(BUILDINGS_LAYER_ID) {
        set_buildings_visibility(surface, visible);
        return;
    }

    let first_symbol = surface
        .style_layers()
        .into_iter()
        .find(|layer| layer.layer_type == LayerType::Symbol)
        .map(|layer| layer.id);

    tracing::debug!(
        "Adding {BUILDINGS_LAYER_ID} before {} (visible: {visible})",
        first_symbol.as_deref().unwrap_or("top")
    );

    if let Err(e) = surface.add_layer(buildings_layer(visible), first_symbol.as_deref()) {
        tracing::warn!("Failed to add buildings layer: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::style::find_style;

    fn loaded_surface(style: &str) -> HeadlessSurface {
        let mut surface = HeadlessSurface::new(find_style(style).unwrap().uri);
        surface.drain_events();
        surface
    }

    #[test]
    fn test_ensure_route_layer_idempotent() {
        let mut surface = loaded_surface("streets");
        ensure_route_layer(&mut surface);
        ensure_route_layer(&mut surface);
        assert!(surface.has_source(ROUTE_SOURCE_ID));
        assert_eq!(surface.layer_count(ROUTE_LAYER_ID), 1);
        assert_eq!(surface.layer_additions(ROUTE_LAYER_ID), 1);
    }

    #[test]
    fn test_terrain_toggle_keeps_source() {
        let mut surface = loaded_surface("outdoors");
        enable_terrain(&mut surface);
        enable_terrain(&mut surface);
        assert_eq!(
            surface.terrain().map(|t| t.exaggeration),
            Some(TERRAIN_EXAGGERATION)
        );
        assert_eq!(surface.layer_count(SKY_LAYER_ID), 1);

        disable_terrain(&mut surface);
        assert!(surface.terrain().is_none());
        assert!(!surface.has_layer(SKY_LAYER_ID));
        assert!(surface.has_source(TERRAIN_SOURCE_ID));

        disable_terrain(&mut surface);
        enable_terrain(&mut surface);
        assert!(surface.terrain().is_some());
        assert_eq!(surface.source_additions(TERRAIN_SOURCE_ID), 1);
    }

    #[test]
    fn test_buildings_below_first_symbol() {
        let mut surface = loaded_surface("streets");
        ensure_buildings_layer(&mut surface, false);

        let order = surface.layer_order();
        let buildings = order.iter().position(|id| id == BUILDINGS_LAYER_ID).unwrap();
        let first_symbol = surface
            .style_layers()
            .iter()
            .position(|l| l.layer_type == LayerType::Symbol)
            .unwrap();
        assert_eq!(buildings, first_symbol - 1);
        assert_eq!(
            surface.layer_visibility(BUILDINGS_LAYER_ID),
            Some(Visibility::Hidden)
        );
    }

    #[test]
    fn test_buildings_on_top_without_symbols() {
        // The plain satellite style has no label layers
        let mut surface = loaded_surface("satellite");
        assert!(
            surface
                .style_layers()
                .iter()
                .all(|l| l.layer_type != LayerType::Symbol)
        );
        ensure_buildings_layer(&mut surface, true);
        assert_eq!(
            surface.layer_order().last().map(String::as_str),
            Some(BUILDINGS_LAYER_ID)
        );
    }

    #[test]
    fn test_buildings_existing_only_toggles() {
        let mut surface = loaded_surface("streets");
        ensure_buildings_layer(&mut surface, false);
        ensure_buildings_layer(&mut surface, true);
        assert_eq!(surface.layer_additions(BUILDINGS_LAYER_ID), 1);
        assert_eq!(
            surface.layer_visibility(BUILDINGS_LAYER_ID),
            Some(Visibility::Visible)
        );
    }

    #[test]
    fn test_set_visibility_without_layer_is_noop() {
        let mut surface = loaded_surface("streets");
        set_buildings_visibility(&mut surface, true);
        assert!(!surface.has_layer(BUILDINGS_LAYER_ID));
    }
}
