/*!
Logging and profiling setup.

Two implementations share one API:

- real: compiled with `feature = "profiling"`. A reloadable tracing-chrome layer
  sits next to the fmt layer, so recording can be started and stopped at runtime.
  Each session writes a `trace-<unix time>.json` file that opens in Perfetto or
  `chrome://tracing`.
- stub: logging only, profiling calls are no-ops.

`ENABLE_PROFILING` starts a session at startup; `TRACE_DIR` chooses where trace
files go (default: the working directory).
*/

/// Default filter when `RUST_LOG` is unset
fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,eframe::native=warn,egui::context=warn,walkers=info,hyper_util=info,reqwest::connect=info"
    } else {
        "info,eframe=warn,egui::context=warn,walkers=warn"
    }
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_filter()))
}

#[cfg(feature = "profiling")]
mod inner {
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};

    use tracing_chrome::{ChromeLayer, ChromeLayerBuilder, FlushGuard};
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{Registry, fmt, reload};

    struct ProfilingState {
        reload_handle: reload::Handle<Option<ChromeLayer<Registry>>, Registry>,
        /// Flushes the trace file when dropped
        guard: Option<FlushGuard>,
        /// File being written while recording
        active_trace: Option<PathBuf>,
        /// Most recently completed trace
        last_trace: Option<PathBuf>,
    }

    static PROFILING_STATE: Mutex<Option<ProfilingState>> = Mutex::new(None);

    fn lock_state() -> MutexGuard<'static, Option<ProfilingState>> {
        PROFILING_STATE.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Profiling state mutex poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn next_trace_path() -> PathBuf {
        let dir = crate::cli::get_env::<PathBuf>("TRACE_DIR").unwrap_or_default();
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        dir.join(format!("trace-{secs}.json"))
    }

    pub fn setup_logging_and_profiling() {
        let (reload_layer, reload_handle) = reload::Layer::new(None::<ChromeLayer<Registry>>);
        let registry = tracing_subscriber::registry()
            .with(reload_layer)
            .with(fmt::layer().with_filter(super::env_filter()));

        *lock_state() = Some(ProfilingState {
            reload_handle,
            guard: None,
            active_trace: None,
            last_trace: None,
        });

        if let Err(e) = registry.try_init() {
            eprintln!("Tracing subscriber already set: {e}");
        }
        tracing::info!("Tracing initialized with reloadable chrome profiling layer");

        if std::env::var_os("ENABLE_PROFILING").is_some() {
            tracing::info!("ENABLE_PROFILING set, starting profiling session");
            start_profiling();
        }
    }

    pub fn start_profiling() {
        let mut state = lock_state();
        let Some(state) = state.as_mut() else {
            tracing::error!("Profiling state not initialized");
            return;
        };
        if state.active_trace.is_some() {
            tracing::warn!("Profiling already enabled");
            return;
        }

        let path = next_trace_path();
        let (chrome_layer, guard) = ChromeLayerBuilder::new()
            .file(&path)
            .include_args(true)
            .build();
        if let Err(e) = state.reload_handle.reload(Some(chrome_layer)) {
            tracing::error!("Failed to enable chrome layer: {e}");
            return;
        }

        state.guard = Some(guard);
        state.active_trace = Some(path.clone());
        tracing::info!("Profiling session started, writing {}", path.display());
    }

    pub fn stop_profiling() {
        let mut state = lock_state();
        let Some(state) = state.as_mut() else {
            tracing::error!("Profiling state not initialized");
            return;
        };
        let Some(path) = state.active_trace.take() else {
            tracing::warn!("Profiling not enabled");
            return;
        };

        if let Err(e) = state.reload_handle.reload(None::<ChromeLayer<Registry>>) {
            tracing::error!("Failed to disable chrome layer: {e}");
        }
        // Dropping the guard flushes the file
        state.guard = None;

        match std::fs::metadata(&path) {
            Ok(md) => tracing::info!(
                "Trace written to {} ({} bytes), open it with https://ui.perfetto.dev",
                path.display(),
                md.len()
            ),
            Err(e) => tracing::warn!("Trace file {} not readable: {e}", path.display()),
        }
        state.last_trace = Some(path);
    }

    pub fn is_profiling_enabled() -> bool {
        lock_state()
            .as_ref()
            .is_some_and(|s| s.active_trace.is_some())
    }

    fn last_trace() -> Option<PathBuf> {
        lock_state().as_ref().and_then(|s| s.last_trace.clone())
    }

    pub fn profiling_ui(ui: &mut egui::Ui) {
        egui::warn_if_debug_build(ui);

        let mut enabled = is_profiling_enabled();
        if ui.checkbox(&mut enabled, "Record profile").changed() {
            if enabled {
                start_profiling();
            } else {
                stop_profiling();
            }
        }

        if enabled {
            ui.label("⏺ Recording tracing spans");
        } else if let Some(path) = last_trace() {
            ui.label(format!("Last trace: {}", path.display()));
        }
    }
}

#[cfg(not(feature = "profiling"))]
mod inner {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    pub fn setup_logging_and_profiling() {
        let registry =
            tracing_subscriber::registry().with(fmt::layer().with_filter(super::env_filter()));
        if let Err(e) = registry.try_init() {
            eprintln!("Tracing subscriber already set: {e}");
        }
        tracing::info!("Logging initialized (profiling disabled in this build)");
    }

    pub fn start_profiling() {
        tracing::info!("Profiling is disabled in this build");
    }

    pub fn stop_profiling() {}

    pub fn is_profiling_enabled() -> bool {
        false
    }

    pub fn profiling_ui(ui: &mut egui::Ui) {
        ui.label("Profiling not enabled in this build.");
    }
}

pub use inner::{
    is_profiling_enabled, profiling_ui, setup_logging_and_profiling, start_profiling,
    stop_profiling,
};
