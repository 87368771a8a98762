use futures::{FutureExt, future::BoxFuture};
use tracing::{debug, info};

use super::rpc::{RpcClient, parse_accounts, parse_chain_id};
use super::{Activation, Connector, ConnectorError};
use crate::core::config::AppConfig;
use crate::core::preference::ConnectorKind;

pub const ETH_ACCOUNTS: &str = "eth_accounts";
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_CHAIN_ID: &str = "eth_chainId";

/// Connector for a provider exposed as an EIP-1193 JSON-RPC endpoint
pub struct InjectedConnector {
   client: RpcClient,
   supported_chain_ids: Vec<u64>,
}

impl InjectedConnector {
   pub fn new(
      url: &str,
      origin: impl Into<String>,
      supported_chain_ids: Vec<u64>,
   ) -> Result<Self, anyhow::Error> {
      Ok(Self {
         client: RpcClient::new(url, origin)?,
         supported_chain_ids,
      })
   }

   pub fn from_config(config: &AppConfig) -> Result<Self, anyhow::Error> {
      Self::new(
         &config.injected_rpc_url,
         config.origin.clone(),
         config.supported_chain_ids.clone(),
      )
   }

   pub fn supported_chain_ids(&self) -> &[u64] {
      &self.supported_chain_ids
   }

   /// Fails with [ConnectorError::UnsupportedChain] if `chain_id` is not accepted
   pub fn check_chain(&self, chain_id: u64) -> Result<u64, ConnectorError> {
      if self.supported_chain_ids.contains(&chain_id) {
         Ok(chain_id)
      } else {
         Err(ConnectorError::UnsupportedChain(chain_id))
      }
   }

   async fn accounts(&self, method: &str) -> Result<Vec<String>, ConnectorError> {
      let value = self.client.request_no_params(method).await?;
      parse_accounts(&value)
   }

   async fn chain_id(&self) -> Result<u64, ConnectorError> {
      let value = self.client.request_no_params(ETH_CHAIN_ID).await?;
      parse_chain_id(&value)
   }

   async fn connect(&self) -> Result<Activation, ConnectorError> {
      let accounts = self.accounts(ETH_REQUEST_ACCOUNTS).await?;
      let account = accounts.into_iter().next().ok_or(ConnectorError::NoAccounts)?;
      let chain_id = self.check_chain(self.chain_id().await?)?;

      info!(
         "Injected provider at {} connected {} on chain {}",
         self.client.url(),
         account,
         chain_id
      );
      Ok(Activation { account, chain_id })
   }
}

impl Connector for InjectedConnector {
   fn kind(&self) -> ConnectorKind {
      ConnectorKind::Injected
   }

   fn is_authorized(&self) -> BoxFuture<'_, Result<bool, ConnectorError>> {
      async move {
         let accounts = self.accounts(ETH_ACCOUNTS).await?;
         debug!("Injected provider exposes {} account(s)", accounts.len());
         Ok(!accounts.is_empty())
      }
      .boxed()
   }

   fn activate(&self) -> BoxFuture<'_, Result<Activation, ConnectorError>> {
      self.connect().boxed()
   }

   fn deactivate(&self) {
      // The provider keeps its grant, there is nothing to revoke from this side
      debug!("Injected connector deactivated");
   }
}
