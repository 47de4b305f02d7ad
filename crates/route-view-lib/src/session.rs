//! Style-scoped session state shared by surface implementations
//!
//! A [`StyleSession`] tracks what a map style owns: sources, layers in drawing
//! order, terrain and the queue of style loads still in flight. It reproduces the
//! swap behaviour of a real map:
//!
//! - construction and every style request complete asynchronously, one event each,
//!   in request order
//! - a style request discards every source, layer and the terrain at once; the new
//!   style's built-in layers and sources appear when its load completes
//! - the style only counts as loaded once no newer request is pending
//! - registering an existing id, or touching a missing one, is an error
//!
//! Markers and the camera are not part of a style and stay with the surface.

use crate::SurfaceError;
use crate::surface::{
    LayerSpec, LayerType, LayoutProperty, SourceData, SourceSpec, StyleLayer, StyleTicket,
    SurfaceEvent, TerrainSpec, Visibility,
};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Layers and sources a style brings along on its own
#[derive(Clone, Debug, Default)]
pub struct BuiltinStyle {
    pub layers: Vec<StyleLayer>,
    pub sources: Vec<(String, SourceSpec)>,
}

/// A layer currently registered with the style
#[derive(Clone, Debug, PartialEq)]
pub struct SessionLayer {
    pub id: String,
    pub layer_type: LayerType,
    pub visibility: Visibility,
    /// `None` for layers that belong to the style itself
    pub spec: Option<LayerSpec>,
}

#[derive(Clone, Debug)]
enum PendingLoad {
    Initial,
    Style { ticket: StyleTicket, uri: String },
}

#[derive(Debug)]
pub struct StyleSession {
    style_uri: String,
    style_loaded: bool,
    builtin: fn(&str) -> BuiltinStyle,
    sources: BTreeMap<String, SourceSpec>,
    layers: Vec<SessionLayer>,
    terrain: Option<TerrainSpec>,
    next_ticket: u64,
    pending: VecDeque<PendingLoad>,
    layer_additions: HashMap<String, usize>,
    source_additions: HashMap<String, usize>,
    layout_updates: HashMap<String, usize>,
}

impl StyleSession {
    /// Start loading `style_uri`; `builtin` describes what each style ships with
    pub fn new(style_uri: &str, builtin: fn(&str) -> BuiltinStyle) -> Self {
        Self {
            style_uri: style_uri.to_string(),
            style_loaded: false,
            builtin,
            sources: BTreeMap::new(),
            layers: Vec::new(),
            terrain: None,
            next_ticket: 0,
            pending: VecDeque::from([PendingLoad::Initial]),
            layer_additions: HashMap::new(),
            source_additions: HashMap::new(),
            layout_updates: HashMap::new(),
        }
    }

    fn install(&mut self, uri: &str) {
        let BuiltinStyle { layers, sources } = (self.builtin)(uri);
        self.style_uri = uri.to_string();
        self.layers = layers
            .into_iter()
            .map(|l| SessionLayer {
                id: l.id,
                layer_type: l.layer_type,
                visibility: Visibility::Visible,
                spec: None,
            })
            .collect();
        self.sources = sources.into_iter().collect();
        self.terrain = None;
    }

    /// Replace the style; everything the old style held is gone immediately
    pub fn request_style(&mut self, uri: &str) -> StyleTicket {
        self.next_ticket += 1;
        let ticket = StyleTicket(self.next_ticket);
        self.style_loaded = false;
        self.sources.clear();
        self.layers.clear();
        self.terrain = None;
        self.pending.push_back(PendingLoad::Style {
            ticket,
            uri: uri.to_string(),
        });
        ticket
    }

    /// Complete the oldest load in flight
    pub fn poll_load(&mut self) -> Option<SurfaceEvent> {
        match self.pending.pop_front()? {
            PendingLoad::Initial => {
                let uri = self.style_uri.clone();
                self.install(&uri);
                self.style_loaded = true;
                Some(SurfaceEvent::Ready)
            }
            PendingLoad::Style { ticket, uri } => {
                self.install(&uri);
                self.style_loaded = !self
                    .pending
                    .iter()
                    .any(|p| matches!(p, PendingLoad::Style { .. }));
                Some(SurfaceEvent::StyleReady(ticket))
            }
        }
    }

    /// Uri of the most recently installed style
    pub fn style_uri(&self) -> &str {
        &self.style_uri
    }

    pub fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    /// Number of loads (initial or style swaps) still in flight
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    /// Current data of a GeoJSON source
    pub fn source_data(&self, id: &str) -> Option<&SourceData> {
        match self.sources.get(id) {
            Some(SourceSpec::GeoJson { data }) => Some(data),
            _ => None,
        }
    }

    pub fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), SurfaceError> {
        if !self.style_loaded {
            return Err(SurfaceError::StyleNotLoaded);
        }
        if self.sources.contains_key(id) {
            return Err(SurfaceError::DuplicateSource(id.to_string()));
        }
        self.sources.insert(id.to_string(), spec);
        *self.source_additions.entry(id.to_string()).or_default() += 1;
        Ok(())
    }

    pub fn set_source_data(&mut self, id: &str, data: SourceData) -> Result<(), SurfaceError> {
        match self.sources.get_mut(id) {
            Some(SourceSpec::GeoJson { data: current }) => {
                *current = data;
                Ok(())
            }
            _ => Err(SurfaceError::MissingSource(id.to_string())),
        }
    }

    /// Registered layers, bottom first
    pub fn layers(&self) -> &[SessionLayer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&SessionLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layer(id).is_some()
    }

    pub fn add_layer(&mut self, spec: LayerSpec, before_id: Option<&str>) -> Result<(), SurfaceError> {
        if !self.style_loaded {
            return Err(SurfaceError::StyleNotLoaded);
        }
        if self.has_layer(&spec.id) {
            return Err(SurfaceError::DuplicateLayer(spec.id));
        }
        let index = match before_id {
            Some(before) => self
                .layers
                .iter()
                .position(|l| l.id == before)
                .ok_or_else(|| SurfaceError::MissingLayer(before.to_string()))?,
            None => self.layers.len(),
        };
        *self.layer_additions.entry(spec.id.clone()).or_default() += 1;
        self.layers.insert(
            index,
            SessionLayer {
                id: spec.id.clone(),
                layer_type: spec.layer_type,
                visibility: spec.layout.visibility,
                spec: Some(spec),
            },
        );
        Ok(())
    }

    pub fn remove_layer(&mut self, id: &str) -> Result<(), SurfaceError> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| SurfaceError::MissingLayer(id.to_string()))?;
        self.layers.remove(index);
        Ok(())
    }

    pub fn set_layout_property(
        &mut self,
        id: &str,
        property: LayoutProperty,
    ) -> Result<(), SurfaceError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| SurfaceError::MissingLayer(id.to_string()))?;
        match property {
            LayoutProperty::Visibility(visibility) => layer.visibility = visibility,
        }
        *self.layout_updates.entry(id.to_string()).or_default() += 1;
        Ok(())
    }

    pub fn terrain(&self) -> Option<&TerrainSpec> {
        self.terrain.as_ref()
    }

    pub fn set_terrain(&mut self, terrain: Option<TerrainSpec>) {
        self.terrain = terrain;
    }

    pub fn style_layers(&self) -> Vec<StyleLayer> {
        self.layers
            .iter()
            .map(|l| StyleLayer {
                id: l.id.clone(),
                layer_type: l.layer_type,
            })
            .collect()
    }

    /// How many times `add_layer` succeeded for this id
    pub fn layer_additions(&self, id: &str) -> usize {
        self.layer_additions.get(id).copied().unwrap_or(0)
    }

    /// How many times `add_source` succeeded for this id
    pub fn source_additions(&self, id: &str) -> usize {
        self.source_additions.get(id).copied().unwrap_or(0)
    }

    /// How many layout properties were applied to this id
    pub fn layout_updates(&self, id: &str) -> usize {
        self.layout_updates.get(id).copied().unwrap_or(0)
    }
}
