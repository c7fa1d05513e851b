use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::DrillConfig;

/// Settings remembered between runs. Drill results are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub prep_secs: u32,
    pub hold_secs: f64,
    pub shoot_percent: u32,
    pub arrows: u32,
    pub sound: bool,
    pub speech_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let drill = DrillConfig::default();
        Self {
            prep_secs: drill.prep_secs,
            hold_secs: drill.hold_secs,
            shoot_percent: drill.shoot_percent,
            arrows: drill.arrows,
            sound: true,
            speech_command: None,
        }
    }
}

impl Config {
    pub fn drill(&self) -> DrillConfig {
        DrillConfig {
            prep_secs: self.prep_secs,
            hold_secs: self.hold_secs,
            shoot_percent: self.shoot_percent,
            arrows: self.arrows,
        }
    }

    pub fn set_drill(&mut self, drill: &DrillConfig) {
        self.prep_secs = drill.prep_secs;
        self.hold_secs = drill.hold_secs;
        self.shoot_percent = drill.shoot_percent;
        self.arrows = drill.arrows;
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "archery-mind-trainer") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("archery_mind_trainer_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring unreadable config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

/// Store that keeps settings in memory only; used when nothing should touch disk
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Option<Config>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone().unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        *self.cfg.borrow_mut() = Some(cfg.clone());
        Ok(())
    }
}
