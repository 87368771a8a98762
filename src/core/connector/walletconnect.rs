use alloy_primitives::hex;
use futures::{FutureExt, future::BoxFuture};
use rand::Rng;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};
use web3_types::ChainId;

use super::rpc::{parse_accounts, parse_chain_id};
use super::{Activation, Connector, ConnectorError};
use crate::core::config::AppConfig;
use crate::core::preference::ConnectorKind;

pub const WC_VERSION: u8 = 1;

/// A pairing offer waiting to be scanned by a mobile wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
   pub topic: String,
   pub key: String,
   pub uri: String,
}

impl Pairing {
   /// Random topic and symmetric key, advertised under `relay_url`
   pub fn new(relay_url: &str) -> Result<Self, ConnectorError> {
      let mut rng = rand::thread_rng();
      let mut topic = [0u8; 16];
      let mut key = [0u8; 32];
      rng.fill(&mut topic[..]);
      rng.fill(&mut key[..]);
      let topic = hex::encode(topic);
      let key = hex::encode(key);

      let mut uri = Url::parse(&format!("wc:{}@{}", topic, WC_VERSION))
         .map_err(|e| ConnectorError::Pairing(e.to_string()))?;
      uri.query_pairs_mut()
         .append_pair("bridge", relay_url)
         .append_pair("key", &key);

      Ok(Self {
         topic,
         key,
         uri: uri.to_string(),
      })
   }
}

/// The wallet's answer to a pairing, posted to the relay
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionApproval {
   /// approved or rejected
   pub status: String,
   #[serde(default)]
   pub accounts: Vec<String>,
   #[serde(rename = "chainId", default)]
   pub chain_id: Value,
}

impl SessionApproval {
   pub fn approved(accounts: Vec<String>, chain_id: u64) -> Self {
      Self {
         status: "approved".to_string(),
         accounts,
         chain_id: Value::from(chain_id),
      }
   }

   pub fn rejected() -> Self {
      Self {
         status: "rejected".to_string(),
         accounts: Vec::new(),
         chain_id: Value::Null,
      }
   }
}

struct PendingPairing {
   topic: String,
   responder: oneshot::Sender<SessionApproval>,
}

/// Connector for mobile wallets that pair by scanning a `wc:` URI
pub struct WalletConnectConnector {
   relay_url: String,
   rpc: HashMap<u64, String>,
   pending: Mutex<Option<PendingPairing>>,
   pairing: watch::Sender<Option<Pairing>>,
}

impl WalletConnectConnector {
   pub fn new(infura_id: impl Into<String>, relay_url: impl Into<String>) -> Self {
      let infura_id = infura_id.into();
      let rpc = ChainId::supported_chains()
         .into_iter()
         .map(|chain| (chain.id(), chain.infura_rpc_url(&infura_id)))
         .collect();
      let (pairing, _) = watch::channel(None);

      Self {
         relay_url: relay_url.into(),
         rpc,
         pending: Mutex::new(None),
         pairing,
      }
   }

   pub fn from_config(config: &AppConfig) -> Self {
      let relay_url = format!("http://127.0.0.1:{}", config.relay_port);
      Self::new(config.infura_id.clone(), relay_url)
   }

   /// Infura endpoint for `chain_id`, if the chain is one we can pair on
   pub fn rpc_url(&self, chain_id: u64) -> Option<&str> {
      self.rpc.get(&chain_id).map(|url| url.as_str())
   }

   /// The pairing currently on offer
   pub fn pairing(&self) -> Option<Pairing> {
      self.pairing.borrow().clone()
   }

   pub fn subscribe_pairing(&self) -> watch::Receiver<Option<Pairing>> {
      self.pairing.subscribe()
   }

   pub fn has_pending(&self) -> bool {
      self.pending.lock().unwrap().is_some()
   }

   /// Deliver the wallet's answer for `topic`
   ///
   /// Returns false if no pairing with that topic is waiting.
   pub fn respond(&self, topic: &str, approval: SessionApproval) -> bool {
      let pending = {
         let mut guard = self.pending.lock().unwrap();
         match guard.as_ref() {
            Some(p) if p.topic == topic => guard.take(),
            _ => None,
         }
      };

      let Some(pending) = pending else {
         debug!("No pending pairing for topic {}", topic);
         return false;
      };

      self.pairing.send_replace(None);
      if pending.responder.send(approval).is_err() {
         debug!("Activation for topic {} is no longer waiting", topic);
      }
      true
   }

   /// Drop the pending pairing, the waiting activation fails with [ConnectorError::PairingCancelled]
   pub fn cancel_pairing(&self) {
      let pending = self.pending.lock().unwrap().take();
      if let Some(pending) = pending {
         info!("Cancelled WalletConnect pairing {}", pending.topic);
      }
      self.pairing.send_replace(None);
   }

   fn resolve_approval(&self, approval: SessionApproval) -> Result<Activation, ConnectorError> {
      match approval.status.as_str() {
         "approved" => {}
         "rejected" => return Err(ConnectorError::UserRejected),
         other => {
            return Err(ConnectorError::InvalidResponse(format!(
               "unknown session status {}",
               other
            )));
         }
      }

      let accounts = parse_accounts(&Value::from(approval.accounts))?;
      let account = accounts.into_iter().next().ok_or(ConnectorError::NoAccounts)?;
      let chain_id = parse_chain_id(&approval.chain_id)?;
      if self.rpc_url(chain_id).is_none() {
         return Err(ConnectorError::UnsupportedChain(chain_id));
      }

      Ok(Activation { account, chain_id })
   }

   /// Put a fresh pairing on offer, replacing any older one
   fn offer(&self) -> Result<oneshot::Receiver<SessionApproval>, ConnectorError> {
      let pairing = Pairing::new(&self.relay_url)?;
      let (responder, answer) = oneshot::channel();

      let superseded = self.pending.lock().unwrap().replace(PendingPairing {
         topic: pairing.topic.clone(),
         responder,
      });
      if let Some(old) = superseded {
         debug!("Pairing {} superseded", old.topic);
      }

      info!("Waiting for a wallet to pair on topic {}", pairing.topic);
      self.pairing.send_replace(Some(pairing));
      Ok(answer)
   }

   async fn await_approval(
      &self,
      answer: oneshot::Receiver<SessionApproval>,
   ) -> Result<Activation, ConnectorError> {
      let approval = answer.await.map_err(|_| ConnectorError::PairingCancelled)?;
      let activation = self.resolve_approval(approval)?;

      info!(
         "WalletConnect session approved for {} on chain {}",
         activation.account, activation.chain_id
      );
      Ok(activation)
   }
}

impl Connector for WalletConnectConnector {
   fn kind(&self) -> ConnectorKind {
      ConnectorKind::WalletConnect
   }

   fn activate(&self) -> BoxFuture<'_, Result<Activation, ConnectorError>> {
      match self.offer() {
         Ok(answer) => self.await_approval(answer).boxed(),
         Err(e) => async move { Err(e) }.boxed(),
      }
   }

   fn deactivate(&self) {
      self.cancel_pairing();
   }
}
