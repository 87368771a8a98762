use futures::{FutureExt, future::BoxFuture};
use std::sync::Mutex;

use crate::core::connector::ConnectorError;
use crate::core::{ConnectorKind, Preference, PreferenceStore, Session, WalletLink};

pub const ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

#[derive(Debug, Clone, Copy)]
pub enum Authorization {
   Granted,
   Denied,
   Fails,
}

/// Records every request instead of talking to a wallet
pub struct StubWallet {
   pub authorization: Authorization,
   pub session: Mutex<Session>,
   pub activations: Mutex<Vec<ConnectorKind>>,
   pub deactivations: Mutex<usize>,
   pub authorization_queries: Mutex<usize>,
}

impl StubWallet {
   pub fn new(authorization: Authorization) -> Self {
      Self {
         authorization,
         session: Mutex::new(Session::default()),
         activations: Mutex::new(Vec::new()),
         deactivations: Mutex::new(0),
         authorization_queries: Mutex::new(0),
      }
   }

   pub fn with_session(self, session: Session) -> Self {
      *self.session.lock().unwrap() = session;
      self
   }

   pub fn activations(&self) -> Vec<ConnectorKind> {
      self.activations.lock().unwrap().clone()
   }

   pub fn deactivations(&self) -> usize {
      *self.deactivations.lock().unwrap()
   }

   pub fn authorization_queries(&self) -> usize {
      *self.authorization_queries.lock().unwrap()
   }

   pub fn connected(chain_id: u64) -> Session {
      Session {
         active: true,
         chain_id: Some(chain_id),
         account: Some(ACCOUNT.to_string()),
         error: None,
         connector: Some(ConnectorKind::Injected),
      }
   }
}

impl WalletLink for StubWallet {
   fn session(&self) -> Session {
      self.session.lock().unwrap().clone()
   }

   fn is_authorized(&self) -> BoxFuture<'_, Result<bool, ConnectorError>> {
      *self.authorization_queries.lock().unwrap() += 1;
      let authorization = self.authorization;
      async move {
         match authorization {
            Authorization::Granted => Ok(true),
            Authorization::Denied => Ok(false),
            Authorization::Fails => Err(ConnectorError::Rpc {
               code: 4900,
               message: "Disconnected".to_string(),
            }),
         }
      }
      .boxed()
   }

   fn activate(&self, kind: ConnectorKind) {
      self.activations.lock().unwrap().push(kind);
   }

   fn deactivate(&self) {
      *self.deactivations.lock().unwrap() += 1;
      *self.session.lock().unwrap() = Session::default();
   }
}

/// In-memory [PreferenceStore] that keeps every save
#[derive(Default)]
pub struct MemoryStore {
   pub saved: Mutex<Vec<Preference>>,
   pub fail: bool,
}

impl MemoryStore {
   pub fn failing() -> Self {
      Self {
         saved: Mutex::new(Vec::new()),
         fail: true,
      }
   }

   pub fn last(&self) -> Option<Preference> {
      self.saved.lock().unwrap().last().copied()
   }
}

impl PreferenceStore for MemoryStore {
   fn load(&self) -> Result<Preference, anyhow::Error> {
      Ok(self.last().unwrap_or_default())
   }

   fn save(&self, preference: &Preference) -> Result<(), anyhow::Error> {
      if self.fail {
         anyhow::bail!("disk full");
      }
      self.saved.lock().unwrap().push(*preference);
      Ok(())
   }
}
