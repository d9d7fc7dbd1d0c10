//! Where tryza keeps its files, following the XDG base directory layout.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "tryza";

/// Overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "TRYZA_CONFIG_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDir {
    Config,
    Data,
    State,
}

impl BaseDir {
    fn env_var(self) -> &'static str {
        match self {
            Self::Config => "XDG_CONFIG_HOME",
            Self::Data => "XDG_DATA_HOME",
            Self::State => "XDG_STATE_HOME",
        }
    }

    /// Location under `$HOME` used when the XDG variable is unset.
    fn under_home(self) -> &'static [&'static str] {
        match self {
            Self::Config => &[".config"],
            Self::Data => &[".local", "share"],
            Self::State => &[".local", "state"],
        }
    }

    /// `<base>/tryza`. `None` when neither the XDG variable nor `HOME` is set.
    pub fn app_dir(self) -> Option<PathBuf> {
        let base = match env::var_os(self.env_var()) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let mut home = PathBuf::from(env::var_os("HOME")?);
                home.extend(self.under_home());
                home
            }
        };
        Some(base.join(APP_DIR))
    }
}

/// `$TRYZA_CONFIG_PATH`, else `config.toml` in the config base dir.
pub fn config_file() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(|| BaseDir::Config.app_dir().map(|dir| dir.join("config.toml")))
}
