use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::BrandId;
use crate::error::{Result, StudioError};

/// Storage key the channel list is persisted under.
pub const CHANNELS_KEY: &str = "ziino_channels";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Tiktok,
    Fanpage,
    Instagram,
    Youtube,
}

impl ChannelType {
    pub const ALL: [ChannelType; 4] = [
        ChannelType::Tiktok,
        ChannelType::Fanpage,
        ChannelType::Instagram,
        ChannelType::Youtube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Tiktok => "tiktok",
            ChannelType::Fanpage => "fanpage",
            ChannelType::Instagram => "instagram",
            ChannelType::Youtube => "youtube",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChannelType::Tiktok => "TikTok",
            ChannelType::Fanpage => "Fanpage",
            ChannelType::Instagram => "Instagram",
            ChannelType::Youtube => "YouTube",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChannelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ChannelType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown channel type: {s}"))
    }
}

/// A distribution destination. Belongs to one brand by id reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(rename = "brandId")]
    pub brand: BrandId,
}

pub fn default_channels() -> Vec<Channel> {
    vec![
        Channel {
            id: "1".to_string(),
            name: "Oniiz TikTok Official".to_string(),
            kind: ChannelType::Tiktok,
            brand: BrandId::Oniiz,
        },
        Channel {
            id: "2".to_string(),
            name: "V2Joy Fanpage".to_string(),
            kind: ChannelType::Fanpage,
            brand: BrandId::V2joy,
        },
    ]
}

/// Key/value persistence for durable settings. Core logic only ever talks
/// to this trait.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            values: Mutex::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StudioError::SettingsError("memory store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| StudioError::SettingsError("memory store lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The user's channel list, read once from the store and written back on
/// every change.
pub struct ChannelRegistry<S> {
    store: S,
    channels: Vec<Channel>,
}

impl<S: SettingsStore> ChannelRegistry<S> {
    /// Falls back to the two default channels when nothing is stored or the
    /// stored list cannot be read.
    pub fn open(store: S) -> Self {
        let channels = match store.get(CHANNELS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Channel>>(&raw) {
                Ok(channels) => channels,
                Err(e) => {
                    warn!("Failed to parse stored channels, using defaults: {}", e);
                    default_channels()
                }
            },
            Ok(None) => default_channels(),
            Err(e) => {
                warn!("Failed to read stored channels, using defaults: {}", e);
                default_channels()
            }
        };
        Self { store, channels }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn for_brand(&self, brand: BrandId) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(move |c| c.brand == brand)
    }

    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn add(&mut self, name: &str, kind: ChannelType, brand: BrandId) -> Result<&Channel> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudioError::validation("Vui lòng nhập tên kênh."));
        }

        let mut id = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        if self.get(&id).is_some() {
            id = format!("{}-{}", id, self.channels.len() + 1);
        }

        let mut updated = self.channels.clone();
        updated.push(Channel {
            id,
            name: name.to_string(),
            kind,
            brand,
        });
        self.store
            .set(CHANNELS_KEY, &serde_json::to_string(&updated)?)?;
        self.channels = updated;

        let added = &self.channels[self.channels.len() - 1];
        info!("Added channel '{}' ({}) for {}", added.name, added.kind, added.brand);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_store_yields_defaults() {
        let registry = ChannelRegistry::open(MemoryStore::new());
        assert_eq!(registry.channels(), default_channels().as_slice());
    }

    #[test]
    fn unparseable_store_yields_defaults() {
        let registry = ChannelRegistry::open(MemoryStore::with_value(CHANNELS_KEY, "{not json"));
        assert_eq!(registry.channels().len(), 2);
        assert_eq!(registry.channels()[1].name, "V2Joy Fanpage");
    }

    #[test]
    fn reads_the_stored_wire_format() {
        let raw = r#"[{"id":"9","name":"Oniiz IG","type":"instagram","brandId":"oniiz"}]"#;
        let registry = ChannelRegistry::open(MemoryStore::with_value(CHANNELS_KEY, raw));
        assert_eq!(registry.channels().len(), 1);
        assert_eq!(registry.get("9").unwrap().kind, ChannelType::Instagram);
    }

    #[test]
    fn added_channels_persist_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ChannelRegistry::open(FileStore::new(dir.path()));
        let id = registry
            .add("V2Joy YouTube", ChannelType::Youtube, BrandId::V2joy)
            .unwrap()
            .id
            .clone();

        let reopened = ChannelRegistry::open(FileStore::new(dir.path()));
        assert_eq!(reopened.channels().len(), 3);
        assert_eq!(reopened.get(&id).unwrap().name, "V2Joy YouTube");
        assert_eq!(reopened.for_brand(BrandId::V2joy).count(), 2);
    }

    #[test]
    fn rejects_blank_channel_names() {
        let mut registry = ChannelRegistry::open(MemoryStore::new());
        assert!(registry.add("  ", ChannelType::Tiktok, BrandId::Oniiz).is_err());
        assert_eq!(registry.channels().len(), 2);
    }

    #[test]
    fn poisoned_memory_store_reports_a_settings_error() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.values.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.get(CHANNELS_KEY), Err(StudioError::SettingsError(_))));
        assert!(matches!(
            store.set(CHANNELS_KEY, "[]"),
            Err(StudioError::SettingsError(_))
        ));
    }
}
