use tracing::warn;

use super::kv::StoreHandle;

pub const THEME_KEY: &str = "theme";
pub const VOLUME_KEY: &str = "volume";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Theme and volume, persisted next to the play counts.
#[derive(Clone)]
pub struct Preferences {
    store: StoreHandle,
}

impl Preferences {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.lock().ok().and_then(|s| s.get(key))
    }

    fn write(&self, key: &str, value: String) {
        if let Ok(mut s) = self.store.lock() {
            if let Err(e) = s.set(key, value) {
                warn!("preference {key:?} not persisted: {e}");
            }
        }
    }

    /// Stored theme, dark when absent or unrecognised.
    pub fn theme(&self) -> Theme {
        self.read(THEME_KEY)
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.write(THEME_KEY, theme.as_str().to_string());
    }

    /// Stored volume level, if one was saved and is in range.
    pub fn volume(&self) -> Option<f64> {
        self.read(VOLUME_KEY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| (0.0..=1.0).contains(v))
    }

    pub fn set_volume(&self, volume: f64) {
        self.write(VOLUME_KEY, volume.to_string());
    }
}
