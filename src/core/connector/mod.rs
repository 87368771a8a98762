pub mod injected;
pub mod rpc;
pub mod walletconnect;

pub use injected::InjectedConnector;
pub use walletconnect::{Pairing, SessionApproval, WalletConnectConnector};

use futures::{FutureExt, future::BoxFuture};

use super::preference::ConnectorKind;

/// Outcome of a successful activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
   pub account: String,
   pub chain_id: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
   #[error("User rejected the request")]
   UserRejected,

   #[error("Unsupported chain id {0}")]
   UnsupportedChain(u64),

   #[error("The wallet returned no accounts")]
   NoAccounts,

   #[error("Invalid account {0}")]
   InvalidAccount(String),

   #[error("Invalid response: {0}")]
   InvalidResponse(String),

   #[error("Provider error {code}: {message}")]
   Rpc { code: i64, message: String },

   #[error("The pairing was cancelled")]
   PairingCancelled,

   #[error("Pairing failed: {0}")]
   Pairing(String),

   #[error(transparent)]
   Transport(#[from] reqwest::Error),
}

/// A way of reaching a wallet
///
/// Methods return boxed futures so connectors can live behind `dyn Connector`.
pub trait Connector: Send + Sync {
   fn kind(&self) -> ConnectorKind;

   /// Whether the wallet already granted access, without prompting the user
   fn is_authorized(&self) -> BoxFuture<'_, Result<bool, ConnectorError>> {
      async { Ok(false) }.boxed()
   }

   /// Anything the activation registers, such as a pending pairing, exists once this returns,
   /// so a later [Connector::deactivate] always tears it down.
   fn activate(&self) -> BoxFuture<'_, Result<Activation, ConnectorError>>;

   fn deactivate(&self);
}
