use crate::config::ConfigOverrides;
use crate::theme::Theme;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    config: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    theme: Option<Theme>,
    room: Option<PathBuf>,
    step: Option<f32>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Flags take the form --name value.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config = Some(PathBuf::from(value)),
                "width" => {
                    overrides.width =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid width '{value}'"))?);
                }
                "height" => {
                    overrides.height =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid height '{value}'"))?);
                }
                "theme" => {
                    overrides.theme = Some(
                        Theme::parse(&value)
                            .ok_or_else(|| anyhow!("Invalid theme '{value}'. Use light or dark."))?,
                    );
                }
                "room" => overrides.room = Some(PathBuf::from(value)),
                "step" => {
                    let step = value.parse::<f32>().with_context(|| format!("Invalid step '{value}'"))?;
                    if !(step.is_finite() && step > 0.0) {
                        bail!("Invalid step '{value}'. Use a positive number of seconds.");
                    }
                    overrides.step = Some(step);
                }
                _ => bail!(
                    "Unknown flag '{flag}'. Supported flags: --config, --width, --height, --theme, --room, --step."
                ),
            }
        }
        Ok(overrides)
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    /// Frame step for the headless walkthrough, in seconds.
    pub fn step(&self) -> Option<f32> {
        self.step
    }

    pub fn into_config_overrides(self) -> ConfigOverrides {
        ConfigOverrides { width: self.width, height: self.height, theme: self.theme, room_model: self.room }
    }
}
