//! Desktop entry points for egui/eframe applications
//!
//! Bundles the boilerplate every binary in this workspace shares: window setup around
//! `eframe::run_native`, tracing setup with optional chrome profiling, CLI parsing
//! helpers and build metadata.
//!
//! # Usage
//!
//! In the application's `lib.rs`:
//!
//! ```ignore
//! eframe_entrypoints::eframe_app!(
//!     "My App Name",
//!     |cc| Box::new(MyApp::new(cc))
//! );
//! ```
//!
//! and in `main.rs`:
//!
//! ```ignore
//! fn main() -> Result<(), eframe_entrypoints::EntrypointError> {
//!     my_app::run_native()
//! }
//! ```

pub mod cli;
pub mod profiling;

pub use cli::{get_env, parse_args, parse_args_from};
pub use profiling::profiling_ui;

mod metadata;
pub use metadata::{log_version_info, short_version_info};

// Re-export eframe types commonly needed for app creation
pub use eframe;
pub use eframe::CreationContext;

/// Failures that stop the application while the window runs
#[derive(Debug, thiserror::Error)]
pub enum EntrypointError {
    #[error("Window error: {0}")]
    Eframe(#[from] eframe::Error),
}

/// Define the native entry point for an eframe application.
///
/// # Arguments
///
/// * `$app_name` - Window title and name used in logs
/// * `$app_creator` - A closure that takes `&CreationContext` and returns `Box<dyn eframe::App>`
///
/// # Generated Code
///
/// ```ignore
/// pub fn run_native() -> Result<(), eframe_entrypoints::EntrypointError> { ... }
/// ```
#[macro_export]
macro_rules! eframe_app {
    ($app_name:expr, $app_creator:expr) => {
        /// Run the application in a desktop window. Call this from `main.rs`.
        pub fn run_native() -> Result<(), $crate::EntrypointError> {
            $crate::native_main_impl($app_name, $app_creator)
        }
    };
}

/// Use the `eframe_app!` macro instead of calling this directly.
#[doc(hidden)]
pub fn native_main_impl<F>(app_name: &str, app_creator: F) -> Result<(), EntrypointError>
where
    F: FnOnce(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>,
{
    // Both the fmt and chrome layers must be registered before the first log line
    profiling::setup_logging_and_profiling();

    log_version_info(app_name);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title(app_name),
        ..Default::default()
    };

    eframe::run_native(
        app_name,
        native_options,
        Box::new(move |cc| Ok(app_creator(cc))),
    )?;
    tracing::info!("{app_name} closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod expanded {
        crate::eframe_app!("Test App", |_cc| -> Box<dyn eframe::App> {
            unreachable!("the window is never opened in tests")
        });
    }

    #[test]
    fn test_entry_point_runs_without_runtime() {
        // Both must be plain functions, not futures needing an executor
        let _run: fn() -> Result<(), EntrypointError> = expanded::run_native;
        type Creator = fn(&eframe::CreationContext<'_>) -> Box<dyn eframe::App>;
        let _main: fn(&str, Creator) -> Result<(), EntrypointError> = native_main_impl::<Creator>;
    }
}
