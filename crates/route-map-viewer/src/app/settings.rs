use clap::Parser;
use eframe_entrypoints::{get_env, parse_args};
use route_view_lib::{MAP_STYLES, find_style};
use std::path::PathBuf;

/// Environment variable consulted when `--access-token` is not given
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

fn parse_style_id(id: &str) -> Result<String, String> {
    find_style(id).map(|s| s.id.to_string()).ok_or_else(|| {
        let known: Vec<&str> = MAP_STYLES.iter().map(|s| s.id).collect();
        format!("unknown style '{id}', expected one of: {}", known.join(", "))
    })
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Route Map Viewer - Explore curated walking routes on a restyleable map
pub struct Settings {
    /// Mapbox access token (falls back to the MAPBOX_ACCESS_TOKEN environment variable)
    #[clap(long, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Map style to switch to once the map is ready
    #[clap(long, value_name = "STYLE", value_parser = parse_style_id)]
    pub style: Option<String>,

    /// Route to select on startup
    #[clap(long, value_name = "ROUTE_ID")]
    pub route: Option<String>,

    /// JSON route catalog to use instead of the built-in Montreal routes
    #[clap(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Start in 3D mode
    #[clap(long, default_value = "false")]
    pub start_3d: bool,
}

impl Settings {
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Token from the command line, else from the environment
    pub fn resolved_access_token(&self) -> Option<String> {
        self.access_token
            .clone()
            .or_else(|| get_env::<String>(ACCESS_TOKEN_ENV))
            .filter(|token| !token.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe_entrypoints::parse_args_from;

    #[test]
    fn test_defaults() {
        let settings: Settings = parse_args_from(["route-map-viewer"]).unwrap();
        assert!(settings.style.is_none());
        assert!(settings.route.is_none());
        assert!(settings.catalog.is_none());
        assert!(!settings.start_3d);
    }

    #[test]
    fn test_all_flags() {
        let settings: Settings = parse_args_from([
            "route-map-viewer",
            "--access-token",
            "pk.test",
            "--style",
            "satellite-streets",
            "--route",
            "old_montreal",
            "--catalog",
            "routes.json",
            "--start-3d",
        ])
        .unwrap();
        assert_eq!(settings.resolved_access_token().as_deref(), Some("pk.test"));
        assert_eq!(settings.style.as_deref(), Some("satellite-streets"));
        assert_eq!(settings.route.as_deref(), Some("old_montreal"));
        assert_eq!(settings.catalog, Some(PathBuf::from("routes.json")));
        assert!(settings.start_3d);
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = parse_args_from::<Settings, _, _>(["route-map-viewer", "--style", "neon"])
            .unwrap_err();
        assert!(err.to_string().contains("unknown style 'neon'"));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let settings: Settings =
            parse_args_from(["route-map-viewer", "--access-token", "  "]).unwrap();
        assert_eq!(settings.access_token.as_deref(), Some("  "));
        assert!(settings.resolved_access_token().is_none());
    }
}
