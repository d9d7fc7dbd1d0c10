use crate::config;

/// Load settings, falling back to defaults.
///
/// Logging is not up yet at this point, so any problem is handed back to be
/// logged once it is.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => (s, None),
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (config::Settings::default(), Some(format!("{e}, using defaults"))),
    }
}
