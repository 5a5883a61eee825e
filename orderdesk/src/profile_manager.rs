use std::{
    fs,
    io,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::anyhow;
use dirs::home_dir;
use log::{info, warn};
use marketplace_tools::MarketplaceConfig;
use order_sync_engine::BoardConfig;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Serialize, Deserialize, Default)]
pub struct UserData {
    pub profiles: Vec<Profile>,
}

impl UserData {
    pub fn find(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

/// A named backend to connect to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: String,
    pub base_url: Url,
    /// LINE user id that receives stock withdrawal requests
    pub line_recipient: Option<String>,
    /// Seconds between background refreshes
    pub poll_interval: Option<u64>,
}

/// Everything a command needs to talk to the backend, resolved from a profile or from the environment.
#[derive(Clone, Debug)]
pub struct Settings {
    pub name: String,
    pub marketplace: MarketplaceConfig,
    pub board: BoardConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            name: "environment".to_string(),
            marketplace: MarketplaceConfig::new_from_env_or_default(),
            board: BoardConfig::from_env_or_default(),
        }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        let mut marketplace = MarketplaceConfig::new(profile.base_url.as_str());
        marketplace.line_recipient = profile.line_recipient.clone().filter(|s| !s.trim().is_empty());
        let board = match profile.poll_interval {
            Some(secs) => BoardConfig::new(Duration::from_secs(secs)),
            None => BoardConfig::default(),
        };
        Self { name: profile.name.clone(), marketplace, board }
    }
}

/// Loads the named profile, or falls back to the environment when no name is given.
pub fn load_settings(profile: Option<&str>) -> anyhow::Result<Settings> {
    match profile {
        Some(name) => {
            let user_data = read_config()?;
            let profile = user_data.find(name).ok_or_else(|| anyhow!("No profile named '{name}' exists"))?;
            info!("🪛️ Using profile {name} ({})", profile.base_url);
            Ok(Settings::from_profile(profile))
        },
        None => Ok(Settings::from_env()),
    }
}

pub fn get_config_path() -> io::Result<PathBuf> {
    let home = home_dir().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    let config_dir = home.join(".orderdesk");
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        set_permissions(&config_dir, 0o700)?;
    }
    let config_file = config_dir.join("config.toml");
    if !config_file.exists() {
        info!("Creating default config file");
        write_config_to(&config_file, &UserData::default())?;
        set_permissions(&config_file, 0o600)?;
    }
    Ok(config_file)
}

fn set_permissions(path: &Path, perms: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = fs::metadata(path)?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(perms);
        fs::set_permissions(path, permissions)?;
    }
    #[cfg(not(unix))]
    let _ = (path, perms);
    Ok(())
}

pub fn read_config() -> io::Result<UserData> {
    let config_path = get_config_path()?;
    read_config_from(&config_path)
}

pub fn read_config_from(path: &Path) -> io::Result<UserData> {
    let config_str = fs::read_to_string(path)?;
    let config: UserData =
        toml::from_str(&config_str).map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
    if let Some(p) = config.profiles.iter().find(|p| !matches!(p.base_url.scheme(), "http" | "https")) {
        warn!("🪛️ Profile {} uses {}, which is not an http(s) url", p.name, p.base_url);
    }
    Ok(config)
}

pub fn write_config(config: &UserData) -> anyhow::Result<()> {
    let config_path = get_config_path()?;
    write_config_to(&config_path, config)?;
    Ok(())
}

fn write_config_to(path: &Path, config: &UserData) -> io::Result<()> {
    let config_str = toml::to_string(config).map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
    fs::write(path, config_str)
}
