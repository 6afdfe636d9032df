use std::any::Any;

use serde::Deserialize;
use ustr::Ustr;
use wallshell_states::{State, state_assign_impl};

/// Loopback address the wallpaper daemon listens on by default.
pub const DEFAULT_DAEMON_URL: &str = "http://127.0.0.1:8640";
/// Files per upload batch. Bounds daemon memory pressure from one call.
pub const DEFAULT_CHUNK_SIZE: usize = 8;
/// Gallery items fetched per sync before redirecting to the directory view.
pub const DEFAULT_RENDER_CAP: usize = 100;

/// Front-end configuration, registered as a state so commands can snapshot
/// it. The daemon is the only tunable collaborator; batch size and render
/// cap are held as configuration with the shipped defaults.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub daemon_base_url: String,
    pub chunk_size: usize,
    pub render_cap: usize,
}

/// Environment overrides, deserialized from `WALLSHELL_*` variables.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    wallshell_daemon_url: Option<String>,
    wallshell_chunk_size: Option<usize>,
    wallshell_render_cap: Option<usize>,
}

impl ShellConfig {
    pub fn new(daemon_base_url: String) -> Self {
        Self {
            daemon_base_url,
            chunk_size: DEFAULT_CHUNK_SIZE,
            render_cap: DEFAULT_RENDER_CAP,
        }
    }

    /// Configuration from defaults plus `WALLSHELL_*` environment overrides.
    pub fn from_env() -> Self {
        let overrides: EnvOverrides = serde_env::from_env().unwrap_or_else(|err| {
            log::warn!("ignoring malformed WALLSHELL_* environment: {err}");
            EnvOverrides::default()
        });

        Self {
            daemon_base_url: overrides
                .wallshell_daemon_url
                .unwrap_or_else(|| DEFAULT_DAEMON_URL.to_owned()),
            // A zero chunk size would make batching loop forever.
            chunk_size: overrides
                .wallshell_chunk_size
                .unwrap_or(DEFAULT_CHUNK_SIZE)
                .max(1),
            render_cap: overrides.wallshell_render_cap.unwrap_or(DEFAULT_RENDER_CAP),
        }
    }

    pub fn api_url(&self) -> Ustr {
        Ustr::from(&format!(
            "{}/api",
            self.daemon_base_url.trim_end_matches('/')
        ))
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DAEMON_URL.to_owned())
    }
}

impl State for ShellConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
