use crate::error::Result;
use crate::media::{FixedProbe, VideoProperties};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_CLASSES: [&str; 6] = ["shot", "pass", "advance", "faceoff", "forwards", "backwards"];

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Dataset root holding `videos_tracked/` and `annotations/`.
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub video: VideoDefaults,
}

/// Properties assumed for every video, since the core does not decode media.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct VideoDefaults {
    pub fps: f64,
    pub width: f64,
    pub height: f64,
    pub frame_count: u64,
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            fps: 30.0,
            width: 1920.0,
            height: 1080.0,
            frame_count: 0,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_dir: None,
            classes: default_classes(),
            video: VideoDefaults::default(),
        }
    }
}

impl AppConfig {
    pub fn probe(&self) -> Result<FixedProbe> {
        let v = self.video;
        Ok(FixedProbe(VideoProperties::new(
            v.fps,
            v.frame_count,
            v.width,
            v.height,
        )?))
    }
}

fn default_classes() -> Vec<String> {
    DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect()
}

/// Read `Annotator.toml` (optional) and `ANNOTATOR_*` environment variables,
/// e.g. `ANNOTATOR_VIDEO__FPS=25` or `ANNOTATOR_CLASSES=shot,pass`.
pub fn load_configuration() -> std::result::Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Annotator").required(false))
        .add_source(environment())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// `_` after the prefix, `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix("ANNOTATOR")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("classes")
        .try_parsing(true)
}
