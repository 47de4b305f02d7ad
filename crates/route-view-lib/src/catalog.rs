//! Route catalog module
//!
//! Routes are immutable, ordered sequences of checkpoints. The catalog owns every
//! route for the lifetime of the process and is only ever read.

use crate::CatalogError;
use crate::surface::Rgb;
use geo::{Coord, LineString};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Geographic position, serialized as a `[longitude, latitude]` pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(value: LonLat) -> Self {
        [value.lon, value.lat]
    }
}

impl From<LonLat> for Coord<f64> {
    fn from(value: LonLat) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl From<Coord<f64>> for LonLat {
    fn from(value: Coord<f64>) -> Self {
        Self {
            lon: value.x,
            lat: value.y,
        }
    }
}

/// Checkpoint category, used for marker colouring
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Landmark,
    #[serde(rename = "Café")]
    Cafe,
    Restaurant,
    Museum,
    Viewpoint,
    Park,
}

impl Category {
    pub fn all() -> &'static [Self] {
        &[
            Self::Landmark,
            Self::Cafe,
            Self::Restaurant,
            Self::Museum,
            Self::Viewpoint,
            Self::Park,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Landmark => "Landmark",
            Self::Cafe => "Café",
            Self::Restaurant => "Restaurant",
            Self::Museum => "Museum",
            Self::Viewpoint => "Viewpoint",
            Self::Park => "Park",
        }
    }

    /// Fill colour of the numbered marker
    pub fn marker_color(&self) -> Rgb {
        match self {
            Self::Cafe => Rgb(0xd9, 0x5f, 0x02),
            Self::Restaurant => Rgb(0xe4, 0x1a, 0x1c),
            Self::Landmark => Rgb(0x37, 0x7e, 0xb8),
            Self::Viewpoint => Rgb(0x4d, 0xaf, 0x4a),
            Self::Museum => Rgb(0x98, 0x4e, 0xa3),
            Self::Park => Rgb(0x2b, 0x83, 0xba),
        }
    }

    /// Light background tint for list entries
    pub fn tint(&self) -> Rgb {
        match self {
            Self::Cafe => Rgb(0xff, 0xed, 0xd5),
            Self::Restaurant => Rgb(0xfe, 0xe2, 0xe2),
            Self::Landmark => Rgb(0xdb, 0xea, 0xfe),
            Self::Viewpoint => Rgb(0xdc, 0xfc, 0xe7),
            Self::Museum => Rgb(0xf3, 0xe8, 0xff),
            Self::Park => Rgb(0xcc, 0xfb, 0xf1),
        }
    }
}

/// A named, categorized stop within a route
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub coordinates: LonLat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>, category: Category, coordinates: LonLat) -> Self {
        Self {
            name: name.into(),
            category,
            coordinates,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named, ordered sequence of checkpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub checkpoints: Vec<Checkpoint>,
}

impl Route {
    /// Polyline through the checkpoints, in stop order
    pub fn line(&self) -> LineString<f64> {
        self.checkpoints
            .iter()
            .map(|cp| Coord::from(cp.coordinates))
            .collect::<Vec<_>>()
            .into()
    }
}

/// Immutable collection of routes with unique ids
#[derive(Clone, Debug, Default)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Build a catalog, rejecting duplicate route ids
    pub fn new(routes: Vec<Route>) -> Result<Self, CatalogError> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|r| r.id == route.id) {
                return Err(CatalogError::DuplicateRouteId(route.id.clone()));
            }
        }
        Ok(Self { routes })
    }

    /// Parse a JSON array of routes
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let routes: Vec<Route> = serde_json::from_str(json)?;
        Self::new(routes)
    }

    /// Load a JSON catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        let routes: Vec<Route> = serde_json::from_reader(std::io::BufReader::new(file))?;
        let catalog = Self::new(routes)?;
        tracing::info!(
            "Loaded {} routes from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The built-in Montreal walking routes
    pub fn montreal() -> Arc<Self> {
        MONTREAL.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

static MONTREAL: Lazy<Arc<RouteCatalog>> = Lazy::new(|| {
    use Category::*;
    let cp = |name: &str, category, lon, lat, description: &str| {
        Checkpoint::new(name, category, LonLat::new(lon, lat)).with_description(description)
    };
    let routes = vec![
        Route {
            id: "old_montreal".to_string(),
            name: "Old Montreal Charm".to_string(),
            description: "Explore the historic heart of Montreal with its cobblestone streets and stunning architecture.".to_string(),
            checkpoints: vec![
                cp("Notre-Dame Basilica", Landmark, -73.5563, 45.5046, "Iconic Gothic Revival church."),
                cp("Crew Collective & Café", Cafe, -73.5571, 45.5033, "Stunning café in a former bank."),
                cp("Place Jacques-Cartier", Landmark, -73.5539, 45.5074, "Lively public square."),
                cp("Olive + Gourmando", Restaurant, -73.5559, 45.5029, "Popular spot for brunch/lunch."),
                cp("Pointe-à-Callière Museum", Museum, -73.5541, 45.5031, "Montreal Archaeology and History Complex."),
            ],
        },
        Route {
            id: "plateau_mont_royal".to_string(),
            name: "Plateau & Mount Royal Park".to_string(),
            description: "Discover the trendy Plateau neighborhood and enjoy nature in Mount Royal Park.".to_string(),
            checkpoints: vec![
                cp("Parc La Fontaine", Park, -73.5698, 45.5258, "Large urban park with ponds."),
                cp("Schwartz's Deli", Restaurant, -73.5774, 45.5161, "Famous for Montreal smoked meat."),
                cp("Saint-Viateur Bagel", Cafe, -73.6039, 45.5230, "Iconic Montreal bagel shop (Mile End adjacent)."),
                cp("Mount Royal Chalet", Viewpoint, -73.5872, 45.5044, "Offers panoramic city views."),
                cp("Beaver Lake (Lac aux Castors)", Park, -73.5966, 45.5018, "Man-made lake in Mount Royal Park."),
            ],
        },
        Route {
            id: "downtown_discovery".to_string(),
            name: "Downtown Discovery".to_string(),
            description: "Experience the vibrant core of Montreal, from shopping centers to museums.".to_string(),
            checkpoints: vec![
                cp("Montreal Museum of Fine Arts", Museum, -73.5798, 45.4980, "Largest art museum in the city."),
                cp("Mary, Queen of the World Cathedral", Landmark, -73.5687, 45.4987, "Scale model of St. Peter's Basilica."),
                cp("Eaton Centre / RESO", Landmark, -73.5710, 45.5030, "Major shopping mall connected to the Underground City."),
                cp("Place des Arts", Landmark, -73.5673, 45.5083, "Major performing arts complex."),
                cp("Café Parvis", Cafe, -73.5681, 45.5074, "Chic cafe with a lovely terrace."),
            ],
        },
    ];
    Arc::new(RouteCatalog { routes })
});
