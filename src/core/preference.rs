use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, trace};

use super::utils::data_dir;

pub const PREFERENCES_FILE: &str = "preferences.json";

/// Which connector mediates the wallet link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
   Injected,
   WalletConnect,
}

impl ConnectorKind {
   pub fn as_str(&self) -> &'static str {
      match self {
         ConnectorKind::Injected => "injected",
         ConnectorKind::WalletConnect => "walletconnect",
      }
   }

   pub fn parse(value: &str) -> Option<Self> {
      match value {
         "injected" => Some(ConnectorKind::Injected),
         "walletconnect" => Some(ConnectorKind::WalletConnect),
         _ => None,
      }
   }
}

/// The last user initiated intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
   Connect,
   Disconnect,
}

impl OperationKind {
   pub fn as_str(&self) -> &'static str {
      match self {
         OperationKind::Connect => "connect",
         OperationKind::Disconnect => "disconnect",
      }
   }

   pub fn parse(value: &str) -> Option<Self> {
      match value {
         "connect" => Some(OperationKind::Connect),
         "disconnect" => Some(OperationKind::Disconnect),
         _ => None,
      }
   }
}

/// The persisted `(latest_op, latest_connector)` pair
///
/// `last_connector` only means something when `last_operation` is [OperationKind::Connect].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preference {
   pub last_operation: Option<OperationKind>,
   pub last_connector: Option<ConnectorKind>,
}

impl Preference {
   pub fn new(last_operation: OperationKind, last_connector: ConnectorKind) -> Self {
      Self {
         last_operation: Some(last_operation),
         last_connector: Some(last_connector),
      }
   }

   /// The connector to restore on startup, if the last intent was to connect
   pub fn reconnect_target(&self) -> Option<ConnectorKind> {
      match self.last_operation {
         Some(OperationKind::Connect) => self.last_connector,
         _ => None,
      }
   }
}

/// On-disk shape, both values are plain strings and empty means unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredPreference {
   #[serde(default)]
   latest_op: String,
   #[serde(default)]
   latest_connector: String,
}

impl From<&Preference> for StoredPreference {
   fn from(pref: &Preference) -> Self {
      Self {
         latest_op: pref.last_operation.map(|op| op.as_str()).unwrap_or_default().to_string(),
         latest_connector: pref
            .last_connector
            .map(|c| c.as_str())
            .unwrap_or_default()
            .to_string(),
      }
   }
}

impl From<StoredPreference> for Preference {
   fn from(stored: StoredPreference) -> Self {
      Self {
         last_operation: OperationKind::parse(&stored.latest_op),
         last_connector: ConnectorKind::parse(&stored.latest_connector),
      }
   }
}

/// Where the [Preference] lives between runs
pub trait PreferenceStore: Send + Sync {
   fn load(&self) -> Result<Preference, anyhow::Error>;

   fn save(&self, preference: &Preference) -> Result<(), anyhow::Error>;
}

/// JSON file backed [PreferenceStore]
#[derive(Debug, Clone)]
pub struct FileStore {
   path: PathBuf,
}

impl FileStore {
   pub fn new(path: impl Into<PathBuf>) -> Self {
      Self { path: path.into() }
   }

   /// Store at `data/preferences.json`
   pub fn in_data_dir() -> Result<Self, anyhow::Error> {
      let path = data_dir()?.join(PREFERENCES_FILE);
      Ok(Self::new(path))
   }

   pub fn path(&self) -> &PathBuf {
      &self.path
   }
}

impl PreferenceStore for FileStore {
   fn load(&self) -> Result<Preference, anyhow::Error> {
      if !self.path.exists() {
         debug!("No preferences at {}, starting fresh", self.path.display());
         return Ok(Preference::default());
      }

      let data = std::fs::read(&self.path)?;
      let stored: StoredPreference = serde_json::from_slice(&data)?;
      trace!("Loaded preferences {:?}", stored);
      Ok(stored.into())
   }

   fn save(&self, preference: &Preference) -> Result<(), anyhow::Error> {
      let stored = StoredPreference::from(preference);
      let data = serde_json::to_string(&stored)?;
      std::fs::write(&self.path, data)?;
      trace!("Saved preferences {:?}", stored);
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn missing_file_is_empty() {
      let dir = tempfile::tempdir().unwrap();
      let store = FileStore::new(dir.path().join(PREFERENCES_FILE));
      assert_eq!(store.load().unwrap(), Preference::default());
   }

   #[test]
   fn file_round_trip() {
      let dir = tempfile::tempdir().unwrap();
      let store = FileStore::new(dir.path().join(PREFERENCES_FILE));

      let pref = Preference::new(OperationKind::Connect, ConnectorKind::WalletConnect);
      store.save(&pref).unwrap();
      assert_eq!(store.load().unwrap(), pref);

      let raw = std::fs::read_to_string(store.path()).unwrap();
      let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
      assert_eq!(value["latest_op"], "connect");
      assert_eq!(value["latest_connector"], "walletconnect");
   }

   #[test]
   fn empty_values_are_written_as_empty_strings() {
      let dir = tempfile::tempdir().unwrap();
      let store = FileStore::new(dir.path().join(PREFERENCES_FILE));

      let pref = Preference {
         last_operation: Some(OperationKind::Disconnect),
         last_connector: None,
      };
      store.save(&pref).unwrap();

      let raw = std::fs::read_to_string(store.path()).unwrap();
      let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
      assert_eq!(value["latest_op"], "disconnect");
      assert_eq!(value["latest_connector"], "");
   }

   #[test]
   fn unknown_values_read_as_empty() {
      let dir = tempfile::tempdir().unwrap();
      let path = dir.path().join(PREFERENCES_FILE);
      std::fs::write(&path, r#"{"latest_op":"reconnect","latest_connector":"ledger"}"#).unwrap();

      let pref = FileStore::new(path).load().unwrap();
      assert_eq!(pref, Preference::default());
      assert_eq!(pref.reconnect_target(), None);
   }

   #[test]
   fn reconnect_target_needs_connect() {
      let pref = Preference::new(OperationKind::Disconnect, ConnectorKind::Injected);
      assert_eq!(pref.reconnect_target(), None);

      let pref = Preference::new(OperationKind::Connect, ConnectorKind::Injected);
      assert_eq!(pref.reconnect_target(), Some(ConnectorKind::Injected));
   }
}
