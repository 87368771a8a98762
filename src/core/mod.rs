pub mod config;
pub mod connector;
pub mod controller;
pub mod preference;
pub mod session;
pub mod utils;

pub use config::AppConfig;
pub use controller::{RestoreOutcome, SessionController, View};
pub use preference::{ConnectorKind, FileStore, OperationKind, Preference, PreferenceStore};
pub use session::{ConnectionState, Session, WalletLink, Web3Session};

/// The controller as the app wires it up
pub type AppController = SessionController<Web3Session, FileStore>;
