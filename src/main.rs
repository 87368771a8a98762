#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use std::panic;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod core;
pub mod gui;
pub mod server;

#[cfg(test)]
mod tests;

use crate::core::connector::{InjectedConnector, WalletConnectConnector};
use crate::core::utils::{
   RT,
   trace::{LOG_DIR, setup_tracing},
};
use crate::core::{AppConfig, FileStore, Preference, PreferenceStore, SessionController, Web3Session};
use gui::StarterApp;

fn main() -> eframe::Result {
   panic::set_hook(Box::new(|panic_info| {
      let message = panic_info
         .payload()
         .downcast_ref::<&str>()
         .map_or("Unknown panic", |s| s);
      let location = panic_info
         .location()
         .map_or("Unknown location".to_string(), |loc| {
            format!("{}:{}:{}", loc.file(), loc.line(), loc.column())
         });
      tracing::error!("Panic occurred: '{}' at {}", message, location);
   }));

   let _tracing_guard = setup_tracing(Path::new(LOG_DIR));

   let config = AppConfig::load();
   info!("Injected provider: {}", config.injected_rpc_url);

   let injected = match InjectedConnector::from_config(&config) {
      Ok(connector) => connector,
      Err(e) => {
         warn!(
            "Invalid injected_rpc_url {}, using the default: {:?}",
            config.injected_rpc_url, e
         );
         InjectedConnector::from_config(&AppConfig::default())
            .expect("the default provider url is valid")
      }
   };
   let injected = Arc::new(injected);
   let walletconnect = Arc::new(WalletConnectConnector::from_config(&config));

   let relay = walletconnect.clone();
   let relay_port = config.relay_port;
   RT.spawn(async move {
      if server::run_server(relay, relay_port).await.is_err() {
         warn!("WalletConnect pairing is unavailable without the relay");
      }
   });

   let (store, preference) = match FileStore::in_data_dir() {
      Ok(store) => {
         let preference = store.load().unwrap_or_else(|e| {
            error!("Failed to load preferences: {:?}", e);
            Preference::default()
         });
         (store, preference)
      }
      Err(e) => {
         error!("Data directory unavailable: {:?}", e);
         (FileStore::new(crate::core::preference::PREFERENCES_FILE), Preference::default())
      }
   };
   info!("Last session preference: {:?}", preference);

   let session = Web3Session::new(injected, walletconnect.clone(), RT.handle().clone());
   let controller = Arc::new(SessionController::new(
      preference,
      store,
      Arc::new(session),
   ));

   let options = eframe::NativeOptions {
      viewport: egui::ViewportBuilder::default()
         .with_inner_size([520.0, 640.0])
         .with_min_inner_size([360.0, 520.0]),
      ..Default::default()
   };

   let github_url = config.github_url.clone();

   eframe::run_native(
      "Web3 Starter",
      options,
      Box::new(move |cc| {
         let app = StarterApp::new(cc, controller, walletconnect, github_url);
         Ok(Box::new(app))
      }),
   )
}
