use ::config::{Config, Environment, File};

use crate::error::SettingsError;

use super::paths::config_file;
use super::schema::Settings;

/// Environment overrides look like `TRYZA__PLAYBACK__VOLUME=0.5`.
const ENV_PREFIX: &str = "TRYZA";
const ENV_SEPARATOR: &str = "__";

impl Settings {
    /// Layer struct defaults, the optional config file and the environment
    /// (highest wins), then validate the result.
    pub fn load() -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = config_file() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let step = self.controls.volume_step;
        let rules = [
            (
                (0.0..=1.0).contains(&self.playback.volume),
                "playback.volume must be within 0..=1",
            ),
            (
                step > 0.0 && step <= 1.0,
                "controls.volume_step must be within (0, 1]",
            ),
            (
                self.controls.scrub_seconds > 0,
                "controls.scrub_seconds must be >= 1",
            ),
            (self.device.tick_ms > 0, "device.tick_ms must be >= 1"),
            (
                !self.library.manifest_name.trim().is_empty(),
                "library.manifest_name must not be empty",
            ),
        ];

        match rules.iter().find(|(ok, _)| !ok) {
            Some((_, rule)) => Err(SettingsError::Invalid(rule.to_string())),
            None => Ok(()),
        }
    }
}
