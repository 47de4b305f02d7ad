use shadow_rs::shadow;

shadow!(build);

/// Log the application version and build details
pub fn log_version_info(app_name: &str) {
    tracing::info!("{}", short_version_info(app_name));
    tracing::info!(
        "Build date: {} ({}, {})",
        build::BUILD_TIME_2822,
        build::RUST_VERSION,
        build::BUILD_RUST_CHANNEL
    );
}

/// One-line version string, e.g. `Route Map Viewer 0.4.0 (main@1a2b3c4+dirty)`
pub fn short_version_info(app_name: &str) -> String {
    let branch = if build::BRANCH.is_empty() {
        "unknown"
    } else {
        build::BRANCH
    };
    format!(
        "{} {} ({}@{}{})",
        app_name,
        build::PKG_VERSION,
        branch,
        build::SHORT_COMMIT,
        if build::GIT_CLEAN { "" } else { "+dirty" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_version_info() {
        let info = short_version_info("Route Map Viewer");
        assert!(info.starts_with("Route Map Viewer "));
        assert!(info.contains(build::PKG_VERSION));
    }
}
