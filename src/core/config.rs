use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use web3_types::SUPPORTED_CHAINS;

use super::utils::data_dir;

pub const CONFIG_FILE: &str = "config.json";

/// Infura project id handed to the WalletConnect connector
pub const DEFAULT_INFURA_ID: &str = "517bf3874a6848e58f99fa38ccf9fce4";

pub const DEFAULT_INJECTED_RPC_URL: &str = "http://127.0.0.1:8545";

pub const DEFAULT_RELAY_PORT: u16 = 65533;

pub const DEFAULT_ORIGIN: &str = "web3-starter";

pub const GITHUB_URL: &str = "https://github.com/shivkanthb/web3-starter";

/// Settings read from `data/config.json`, every field is optional on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
   /// EIP-1193 JSON-RPC endpoint of the injected provider
   pub injected_rpc_url: String,

   /// Sent with every request so the provider can show who is asking
   pub origin: String,

   /// Chains the injected connector accepts
   pub supported_chain_ids: Vec<u64>,

   pub infura_id: String,

   /// Port of the local WalletConnect relay endpoint
   pub relay_port: u16,

   pub github_url: String,
}

impl Default for AppConfig {
   fn default() -> Self {
      Self {
         injected_rpc_url: DEFAULT_INJECTED_RPC_URL.to_string(),
         origin: DEFAULT_ORIGIN.to_string(),
         supported_chain_ids: SUPPORTED_CHAINS.to_vec(),
         infura_id: DEFAULT_INFURA_ID.to_string(),
         relay_port: DEFAULT_RELAY_PORT,
         github_url: GITHUB_URL.to_string(),
      }
   }
}

impl AppConfig {
   pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
      let data = std::fs::read(path)?;
      let config = serde_json::from_slice(&data)?;
      Ok(config)
   }

   pub fn save_to(&self, path: &Path) -> Result<(), anyhow::Error> {
      let data = serde_json::to_string_pretty(self)?;
      std::fs::write(path, data)?;
      Ok(())
   }

   /// Load the config from the data directory
   ///
   /// Writes the defaults on first run, falls back to them if the file is unreadable.
   pub fn load() -> Self {
      let path = match data_dir() {
         Ok(dir) => dir.join(CONFIG_FILE),
         Err(e) => {
            warn!("Data directory unavailable, using default config: {:?}", e);
            return Self::default();
         }
      };

      if !path.exists() {
         let config = Self::default();
         match config.save_to(&path) {
            Ok(_) => info!("Wrote default config to {}", path.display()),
            Err(e) => warn!("Failed to write default config: {:?}", e),
         }
         return config;
      }

      match Self::load_from(&path) {
         Ok(config) => config,
         Err(e) => {
            warn!("Failed to read {}, using defaults: {:?}", path.display(), e);
            Self::default()
         }
      }
   }
}
