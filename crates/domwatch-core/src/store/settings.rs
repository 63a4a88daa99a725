// # Settings Store
//
// Single-record application settings kept in `config.yaml`.
//
// ## File Format
//
// ```yaml
// port: 8080
// alert_recipient: ops@example.com
// mail:
//   host: smtp.example.com
//   port: 587
//   username: alerts
//   password: secret
//   sender: domwatch@example.com
// ```
//
// Every field is optional in the file. Missing fields load as zero values and
// are written back on load, so the operator always sees the full shape.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::document::{self, Document, LoadOutcome};
use crate::Result;
use crate::config::StoreConfig;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Port the operator-facing surface listens on
    pub port: u16,

    /// Address alerts are sent to
    pub alert_recipient: String,

    /// Outgoing mail transport
    pub mail: MailTransport,
}

/// SMTP relay used for alert mail
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailTransport {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Envelope sender
    pub sender: String,
}

impl Debug for MailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"XXXX")
            .field("sender", &self.sender)
            .finish()
    }
}

impl Document for Settings {
    const KIND: &'static str = "settings";

    fn is_blank(&self) -> bool {
        *self == Settings::default()
    }
}

/// File-backed settings record
///
/// Opened once per process and held for its lifetime. The backing path is
/// fixed when the store is opened.
///
/// # Example
///
/// ```rust,no_run
/// use domwatch_core::{SettingsStore, StoreConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SettingsStore::load(&StoreConfig::new("/var/lib/domwatch")).await?;
///
///     store.update(|s| s.alert_recipient = "ops@example.com".into()).await?;
///     assert_eq!(store.settings().await.alert_recipient, "ops@example.com");
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: RwLock<Settings>,
    outcome: LoadOutcome,
}

impl SettingsStore {
    /// Open the settings file named by `config`
    pub async fn load(config: &StoreConfig) -> Result<Self> {
        Self::open(config.settings_path()).await
    }

    /// Open the settings file at an explicit path
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (settings, outcome) = document::load_or_init::<Settings>(&path).await?;

        Ok(Self {
            path,
            settings: RwLock::new(settings),
            outcome,
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file was synthesized by this open
    pub fn load_outcome(&self) -> LoadOutcome {
        self.outcome
    }

    /// Current settings
    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Replace the whole record and flush
    pub async fn replace(&self, settings: Settings) -> Result<()> {
        let mut guard = self.settings.write().await;
        document::write(&self.path, &settings).await?;
        *guard = settings;
        tracing::info!("Updated settings in {}", self.path.display());
        Ok(())
    }

    /// Edit the record in place and flush
    pub async fn update<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.settings.write().await;
        let mut next = guard.clone();
        edit(&mut next);
        document::write(&self.path, &next).await?;
        *guard = next;
        tracing::info!("Updated settings in {}", self.path.display());
        Ok(())
    }

    /// Write the in-memory record to disk
    pub async fn flush(&self) -> Result<()> {
        let guard = self.settings.read().await;
        document::write(&self.path, &*guard).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_first_load_writes_default() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());

        let store = SettingsStore::load(&config).await.unwrap();
        assert_eq!(store.load_outcome(), LoadOutcome::Created);
        assert_eq!(store.settings().await, Settings::default());

        let text = tokio::fs::read_to_string(config.settings_path())
            .await
            .unwrap();
        let on_disk: Settings = serde_yaml::from_str(&text).unwrap();
        assert_eq!(on_disk, Settings::default());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());

        let store = SettingsStore::load(&config).await.unwrap();
        store
            .update(|s| {
                s.port = 8080;
                s.mail.host = "smtp.example.com".to_string();
            })
            .await
            .unwrap();

        let reopened = SettingsStore::load(&config).await.unwrap();
        assert_eq!(reopened.load_outcome(), LoadOutcome::Loaded);
        let settings = reopened.settings().await;
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.mail.host, "smtp.example.com");
    }

    #[tokio::test]
    async fn test_partial_file_gets_missing_fields() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        tokio::fs::write(config.settings_path(), "port: 9000\n")
            .await
            .unwrap();

        let store = SettingsStore::load(&config).await.unwrap();
        assert_eq!(store.settings().await.port, 9000);

        let text = tokio::fs::read_to_string(config.settings_path())
            .await
            .unwrap();
        assert!(text.contains("alert_recipient"));
        assert!(text.contains("mail:"));
    }

    #[tokio::test]
    async fn test_out_of_range_port_is_corrupt() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        tokio::fs::write(config.settings_path(), "port: 70000\n")
            .await
            .unwrap();

        let err = SettingsStore::load(&config).await.unwrap_err();
        assert!(err.is_corrupt(), "unexpected error: {err}");
    }

    #[test]
    fn test_debug_hides_password() {
        let mail = MailTransport {
            password: "hunter2".to_string(),
            ..MailTransport::default()
        };
        let rendered = format!("{mail:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
