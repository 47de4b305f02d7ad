//! Statically enumerated map styles

use crate::catalog::LonLat;
use crate::surface::Camera;

/// A selectable map style
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub uri: &'static str,
    /// Elevation-based terrain is only switched on for these styles
    pub terrain_capable: bool,
}

/// Available styles; the first entry is the default
pub const MAP_STYLES: &[StyleDescriptor] = &[
    StyleDescriptor {
        id: "streets",
        display_name: "Streets",
        uri: "mapbox://styles/mapbox/streets-v12",
        terrain_capable: false,
    },
    StyleDescriptor {
        id: "satellite",
        display_name: "Satellite",
        uri: "mapbox://styles/mapbox/satellite-v9",
        terrain_capable: true,
    },
    StyleDescriptor {
        id: "satellite-streets",
        display_name: "Satellite Streets",
        uri: "mapbox://styles/mapbox/satellite-streets-v12",
        terrain_capable: true,
    },
    StyleDescriptor {
        id: "outdoors",
        display_name: "Outdoors/Terrain",
        uri: "mapbox://styles/mapbox/outdoors-v12",
        terrain_capable: true,
    },
    StyleDescriptor {
        id: "light",
        display_name: "Light",
        uri: "mapbox://styles/mapbox/light-v11",
        terrain_capable: false,
    },
    StyleDescriptor {
        id: "dark",
        display_name: "Dark",
        uri: "mapbox://styles/mapbox/dark-v11",
        terrain_capable: false,
    },
];

/// Initial camera: central Montreal, level
pub const DEFAULT_CAMERA: Camera = Camera {
    center: LonLat::new(-73.5673, 45.5017),
    zoom: 12.0,
    pitch: 0.0,
    bearing: 0.0,
};

pub fn default_style() -> &'static StyleDescriptor {
    &MAP_STYLES[0]
}

pub fn find_style(id: &str) -> Option<&'static StyleDescriptor> {
    MAP_STYLES.iter().find(|s| s.id == id)
}

/// Look up a style by its URI (used by surfaces that only know the URI)
pub fn find_style_by_uri(uri: &str) -> Option<&'static StyleDescriptor> {
    MAP_STYLES.iter().find(|s| s.uri == uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_ids_unique() {
        for (i, style) in MAP_STYLES.iter().enumerate() {
            assert!(MAP_STYLES[..i].iter().all(|s| s.id != style.id));
        }
    }

    #[test]
    fn test_terrain_capable_subset() {
        let capable: Vec<_> = MAP_STYLES
            .iter()
            .filter(|s| s.terrain_capable)
            .map(|s| s.id)
            .collect();
        assert_eq!(capable, vec!["satellite", "satellite-streets", "outdoors"]);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(default_style().id, "streets");
        assert_eq!(find_style("dark").unwrap().display_name, "Dark");
        assert!(find_style("neon").is_none());
        assert_eq!(
            find_style_by_uri("mapbox://styles/mapbox/outdoors-v12").unwrap().id,
            "outdoors"
        );
    }
}
