use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};
use web3_types::{network_name, truncate_address};

use super::preference::{ConnectorKind, OperationKind, Preference, PreferenceStore};
use super::session::{Session, WalletLink};

/// What `initialize` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
   /// Nothing to restore
   Idle,
   /// Activation of this connector was requested
   Reconnecting(ConnectorKind),
   /// The injected provider has not authorized us
   NotAuthorized,
   /// The session was already active or errored, left untouched
   SessionBusy,
   /// The authorization query failed
   AuthorizationFailed,
   AlreadyInitialized,
}

/// The two mutually exclusive views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
   ConnectPrompt {
      /// The startup authorization check is still running
      restoring: bool,
   },
   SessionPanel {
      network: String,
      address: Option<String>,
   },
}

/// Decides which connector is active and remembers the user's last choice
pub struct SessionController<W, S> {
   wallet: Arc<W>,
   store: S,
   preference: Mutex<Preference>,
   initialized: AtomicBool,
   loaded: AtomicBool,
   checking: AtomicBool,
}

impl<W, S> SessionController<W, S>
where
   W: WalletLink,
   S: PreferenceStore,
{
   pub fn new(preference: Preference, store: S, wallet: Arc<W>) -> Self {
      Self {
         wallet,
         store,
         preference: Mutex::new(preference),
         initialized: AtomicBool::new(false),
         loaded: AtomicBool::new(false),
         checking: AtomicBool::new(false),
      }
   }

   pub fn preference(&self) -> Preference {
      *self.preference.lock().unwrap()
   }

   pub fn session(&self) -> Session {
      self.wallet.session()
   }

   pub fn wallet(&self) -> &Arc<W> {
      &self.wallet
   }

   /// True once the startup authorization query has answered
   pub fn loaded(&self) -> bool {
      self.loaded.load(Ordering::SeqCst)
   }

   /// True while the startup authorization query is in flight
   pub fn restoring(&self) -> bool {
      self.checking.load(Ordering::SeqCst)
   }

   /// Try to restore the last connection, runs once per process
   pub async fn initialize(&self) -> RestoreOutcome {
      if self.initialized.swap(true, Ordering::SeqCst) {
         debug!("Session controller already initialized");
         return RestoreOutcome::AlreadyInitialized;
      }

      let preference = self.preference();
      match preference.reconnect_target() {
         Some(ConnectorKind::Injected) => self.restore_injected().await,
         Some(ConnectorKind::WalletConnect) => {
            info!("Restoring WalletConnect session");
            self.wallet.activate(ConnectorKind::WalletConnect);
            RestoreOutcome::Reconnecting(ConnectorKind::WalletConnect)
         }
         None => {
            debug!("Nothing to restore from {:?}", preference);
            RestoreOutcome::Idle
         }
      }
   }

   async fn restore_injected(&self) -> RestoreOutcome {
      self.checking.store(true, Ordering::SeqCst);
      let authorized = self.wallet.is_authorized().await;
      self.loaded.store(true, Ordering::SeqCst);
      self.checking.store(false, Ordering::SeqCst);

      let authorized = match authorized {
         Ok(authorized) => authorized,
         Err(e) => {
            debug!("Injected authorization query failed: {}", e);
            return RestoreOutcome::AuthorizationFailed;
         }
      };

      if !authorized {
         debug!("Injected provider has not authorized this app");
         return RestoreOutcome::NotAuthorized;
      }

      let session = self.wallet.session();
      if session.active || session.has_error() {
         return RestoreOutcome::SessionBusy;
      }

      info!("Restoring injected session");
      self.wallet.activate(ConnectorKind::Injected);
      RestoreOutcome::Reconnecting(ConnectorKind::Injected)
   }

   fn save(&self, update: impl FnOnce(&mut Preference)) {
      let preference = {
         let mut guard = self.preference.lock().unwrap();
         update(&mut *guard);
         *guard
      };

      if let Err(e) = self.store.save(&preference) {
         error!("Failed to save preferences: {:?}", e);
      }
   }

   fn connect(&self, kind: ConnectorKind) {
      self.save(|pref| *pref = Preference::new(OperationKind::Connect, kind));
      info!("Connecting with {}", kind.as_str());
      self.wallet.activate(kind);
   }

   pub fn connect_injected(&self) {
      self.connect(ConnectorKind::Injected);
   }

   pub fn connect_walletconnect(&self) {
      self.connect(ConnectorKind::WalletConnect);
   }

   /// Only the operation is overwritten, the connector is kept
   pub fn disconnect(&self) {
      self.save(|pref| pref.last_operation = Some(OperationKind::Disconnect));
      info!("Disconnecting");
      self.wallet.deactivate();
   }

   pub fn view(&self) -> View {
      let session = self.wallet.session();
      if !session.active {
         return View::ConnectPrompt {
            restoring: self.restoring(),
         };
      }

      View::SessionPanel {
         network: session
            .chain_id
            .map(network_name)
            .unwrap_or_else(|| "unknown network".to_string()),
         address: truncate_address(session.account.as_deref()),
      }
   }
}
