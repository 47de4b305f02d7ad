//! Route Map Viewer - Application Library
//!
//! Wires the route catalog and view-state engine from `route-view-lib` to a
//! walkers map inside an eframe window.

mod app;

pub use app::RouteMapViewerApp;

eframe_entrypoints::eframe_app!("Route Map Viewer", |cc| Box::new(RouteMapViewerApp::new(cc)));
