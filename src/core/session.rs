use futures::{FutureExt, future::BoxFuture};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::connector::{Activation, Connector, ConnectorError};
use super::preference::ConnectorKind;

/// Snapshot of the wallet link
///
/// `active` implies `account` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
   pub active: bool,
   pub chain_id: Option<u64>,
   pub account: Option<String>,
   pub error: Option<String>,
   /// Connector that produced the session
   pub connector: Option<ConnectorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
   Disconnected,
   Connected,
}

impl Session {
   fn connected(kind: ConnectorKind, activation: Activation) -> Self {
      Self {
         active: true,
         chain_id: Some(activation.chain_id),
         account: Some(activation.account),
         error: None,
         connector: Some(kind),
      }
   }

   fn failed(kind: ConnectorKind, error: &ConnectorError) -> Self {
      Self {
         active: false,
         chain_id: None,
         account: None,
         error: Some(error.to_string()),
         connector: Some(kind),
      }
   }

   pub fn state(&self) -> ConnectionState {
      if self.active {
         ConnectionState::Connected
      } else {
         ConnectionState::Disconnected
      }
   }

   pub fn has_error(&self) -> bool {
      self.error.is_some()
   }
}

/// What the controller needs from the wallet link
///
/// `activate` and `deactivate` only enqueue work, the outcome shows up in [WalletLink::session].
pub trait WalletLink: Send + Sync {
   fn session(&self) -> Session;

   /// Prior authorization of the injected connector
   fn is_authorized(&self) -> BoxFuture<'_, Result<bool, ConnectorError>>;

   fn activate(&self, kind: ConnectorKind);

   fn deactivate(&self);
}

/// Thread-safe handle to the session and the connectors behind it
#[derive(Clone)]
pub struct Web3Session(Arc<SessionInner>);

struct SessionInner {
   injected: Arc<dyn Connector>,
   walletconnect: Arc<dyn Connector>,
   state: watch::Sender<Session>,
   /// Bumped by every request, completions from an older epoch are dropped
   epoch: AtomicU64,
   /// Connector of the latest activation request
   current: Mutex<Option<ConnectorKind>>,
   runtime: Handle,
}

impl Web3Session {
   pub fn new(
      injected: Arc<dyn Connector>,
      walletconnect: Arc<dyn Connector>,
      runtime: Handle,
   ) -> Self {
      let (state, _) = watch::channel(Session::default());
      Self(Arc::new(SessionInner {
         injected,
         walletconnect,
         state,
         epoch: AtomicU64::new(0),
         current: Mutex::new(None),
         runtime,
      }))
   }

   pub fn connector(&self, kind: ConnectorKind) -> Arc<dyn Connector> {
      match kind {
         ConnectorKind::Injected => self.0.injected.clone(),
         ConnectorKind::WalletConnect => self.0.walletconnect.clone(),
      }
   }

   /// Receiver that is notified on every session change
   pub fn subscribe(&self) -> watch::Receiver<Session> {
      self.0.state.subscribe()
   }

   fn bump_epoch(&self) -> u64 {
      self.0.epoch.fetch_add(1, Ordering::SeqCst) + 1
   }

   fn is_current(&self, epoch: u64) -> bool {
      self.0.epoch.load(Ordering::SeqCst) == epoch
   }

   /// Publish `session` unless a newer request was made in the meantime
   fn publish(&self, epoch: u64, session: Session) -> bool {
      let mut published = false;
      self.0.state.send_if_modified(|current| {
         if !self.is_current(epoch) {
            return false;
         }
         published = true;
         if *current == session {
            return false;
         }
         *current = session;
         true
      });
      published
   }

   async fn run_activation(self, kind: ConnectorKind, epoch: u64) {
      let connector = self.connector(kind);

      // Registering under the lock orders this against a newer request's teardown
      let activation = {
         let _current = self.0.current.lock().unwrap();
         if !self.is_current(epoch) {
            debug!(
               "Skipping superseded {} activation (epoch {})",
               kind.as_str(),
               epoch
            );
            return;
         }
         connector.activate()
      };

      let session = match activation.await {
         Ok(activation) => {
            info!("{} connector activated", kind.as_str());
            Session::connected(kind, activation)
         }
         Err(e) => {
            warn!("{} connector failed to activate: {}", kind.as_str(), e);
            Session::failed(kind, &e)
         }
      };

      if !self.publish(epoch, session) {
         debug!(
            "Discarding stale {} activation (epoch {})",
            kind.as_str(),
            epoch
         );
      }
   }
}

impl WalletLink for Web3Session {
   fn session(&self) -> Session {
      self.0.state.borrow().clone()
   }

   fn is_authorized(&self) -> BoxFuture<'_, Result<bool, ConnectorError>> {
      let injected = self.0.injected.clone();
      async move { injected.is_authorized().await }.boxed()
   }

   fn activate(&self, kind: ConnectorKind) {
      let epoch = {
         let mut current = self.0.current.lock().unwrap();
         let epoch = self.bump_epoch();

         // A pairing left open by the other connector must not resolve later
         if let Some(previous) = current.replace(kind).filter(|p| *p != kind) {
            self.connector(previous).deactivate();
         }
         epoch
      };

      debug!("Activating {} connector (epoch {})", kind.as_str(), epoch);
      let session = self.clone();
      self.0.runtime.spawn(session.run_activation(kind, epoch));
   }

   fn deactivate(&self) {
      let epoch = {
         let mut current = self.0.current.lock().unwrap();
         let epoch = self.bump_epoch();
         if let Some(kind) = current.take() {
            self.connector(kind).deactivate();
         }
         epoch
      };

      info!("Session deactivated");
      self.publish(epoch, Session::default());
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::core::connector::WalletConnectConnector;
   use std::time::Duration;
   use tokio::sync::Notify;

   const ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

   /// Connector whose activation waits for a notification before answering
   struct GatedConnector {
      kind: ConnectorKind,
      gate: Notify,
      succeed: bool,
   }

   impl GatedConnector {
      fn new(kind: ConnectorKind, succeed: bool) -> Arc<Self> {
         Arc::new(Self {
            kind,
            gate: Notify::new(),
            succeed,
         })
      }
   }

   impl Connector for GatedConnector {
      fn kind(&self) -> ConnectorKind {
         self.kind
      }

      fn is_authorized(&self) -> BoxFuture<'_, Result<bool, ConnectorError>> {
         async { Ok(true) }.boxed()
      }

      fn activate(&self) -> BoxFuture<'_, Result<Activation, ConnectorError>> {
         async move {
            self.gate.notified().await;
            if self.succeed {
               Ok(Activation {
                  account: ACCOUNT.to_string(),
                  chain_id: 1,
               })
            } else {
               Err(ConnectorError::UserRejected)
            }
         }
         .boxed()
      }

      fn deactivate(&self) {}
   }

   async fn next_change(rx: &mut watch::Receiver<Session>) -> Session {
      tokio::time::timeout(Duration::from_secs(5), rx.changed())
         .await
         .expect("session never changed")
         .unwrap();
      rx.borrow_and_update().clone()
   }

   #[tokio::test]
   async fn successful_activation_connects() {
      let injected = GatedConnector::new(ConnectorKind::Injected, true);
      let wc = GatedConnector::new(ConnectorKind::WalletConnect, true);
      let session = Web3Session::new(injected.clone(), wc, Handle::current());
      let mut rx = session.subscribe();

      assert_eq!(session.session().state(), ConnectionState::Disconnected);
      session.activate(ConnectorKind::Injected);
      injected.gate.notify_one();

      let snapshot = next_change(&mut rx).await;
      assert!(snapshot.active);
      assert_eq!(snapshot.state(), ConnectionState::Connected);
      assert_eq!(snapshot.account.as_deref(), Some(ACCOUNT));
      assert_eq!(snapshot.chain_id, Some(1));
      assert_eq!(snapshot.connector, Some(ConnectorKind::Injected));
      assert!(!snapshot.has_error());
   }

   #[tokio::test]
   async fn failed_activation_sets_error() {
      let injected = GatedConnector::new(ConnectorKind::Injected, false);
      let wc = GatedConnector::new(ConnectorKind::WalletConnect, true);
      let session = Web3Session::new(injected.clone(), wc, Handle::current());
      let mut rx = session.subscribe();

      session.activate(ConnectorKind::Injected);
      injected.gate.notify_one();

      let snapshot = next_change(&mut rx).await;
      assert!(!snapshot.active);
      assert!(snapshot.account.is_none());
      assert_eq!(snapshot.error.as_deref(), Some("User rejected the request"));
   }

   #[tokio::test]
   async fn deactivate_resets_session() {
      let injected = GatedConnector::new(ConnectorKind::Injected, true);
      let wc = GatedConnector::new(ConnectorKind::WalletConnect, true);
      let session = Web3Session::new(injected.clone(), wc, Handle::current());
      let mut rx = session.subscribe();

      session.activate(ConnectorKind::Injected);
      injected.gate.notify_one();
      assert!(next_change(&mut rx).await.active);

      session.deactivate();
      let snapshot = next_change(&mut rx).await;
      assert_eq!(snapshot, Session::default());
   }

   #[tokio::test]
   async fn stale_activation_is_discarded() {
      let injected = GatedConnector::new(ConnectorKind::Injected, true);
      let wc = GatedConnector::new(ConnectorKind::WalletConnect, true);
      let session = Web3Session::new(injected.clone(), wc, Handle::current());

      session.activate(ConnectorKind::Injected);
      session.deactivate();

      // let the activation finish after the deactivate
      injected.gate.notify_one();
      tokio::time::sleep(Duration::from_millis(100)).await;

      assert_eq!(session.session(), Session::default());
   }

   #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
   async fn switching_connectors_closes_pairing() {
      let mut connectors = Vec::new();
      for _ in 0..200 {
         let injected = GatedConnector::new(ConnectorKind::Injected, true);
         let wc = Arc::new(WalletConnectConnector::new("test-id", "http://127.0.0.1:65533"));
         let session = Web3Session::new(injected, wc.clone(), Handle::current());

         session.activate(ConnectorKind::WalletConnect);
         session.activate(ConnectorKind::Injected);
         connectors.push(wc);
      }

      tokio::time::sleep(Duration::from_millis(50)).await;
      for wc in &connectors {
         assert!(!wc.has_pending());
         assert!(wc.pairing().is_none());
      }
   }

   #[tokio::test]
   async fn pairing_is_cancelled_on_switch() {
      let injected = GatedConnector::new(ConnectorKind::Injected, true);
      let wc = Arc::new(WalletConnectConnector::new("test-id", "http://127.0.0.1:65533"));
      let session = Web3Session::new(injected.clone(), wc.clone(), Handle::current());
      let mut rx = session.subscribe();

      session.activate(ConnectorKind::WalletConnect);
      let mut pairing = wc.subscribe_pairing();
      tokio::time::timeout(Duration::from_secs(5), pairing.wait_for(|p| p.is_some()))
         .await
         .expect("pairing was never offered")
         .unwrap();
      assert!(wc.has_pending());

      session.activate(ConnectorKind::Injected);
      assert!(!wc.has_pending());
      assert!(wc.pairing().is_none());

      injected.gate.notify_one();
      let snapshot = next_change(&mut rx).await;
      assert!(snapshot.active);
      assert_eq!(snapshot.connector, Some(ConnectorKind::Injected));
   }

   #[tokio::test]
   async fn authorization_goes_to_injected() {
      let injected = GatedConnector::new(ConnectorKind::Injected, true);
      let wc = GatedConnector::new(ConnectorKind::WalletConnect, true);
      let session = Web3Session::new(injected, wc, Handle::current());
      assert!(session.is_authorized().await.unwrap());
   }
}
