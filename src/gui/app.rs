use eframe::{
   CreationContext,
   egui::{self, Frame, RichText},
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::core::connector::WalletConnectConnector;
use crate::core::utils::RT;
use crate::core::{AppController, View};
use crate::gui::Theme;
use crate::gui::ui::{ConnectWalletCard, PairingWindow, SessionCard, UserAction};

pub struct StarterApp {
   pub controller: Arc<AppController>,
   pub walletconnect: Arc<WalletConnectConnector>,
   pub theme: Theme,
   pub github_url: String,
   connect_card: ConnectWalletCard,
   session_card: SessionCard,
   pairing_window: PairingWindow,
}

/// Repaint whenever `rx` sees a new value, the GUI is otherwise only redrawn on input
fn repaint_on_change<T>(mut rx: watch::Receiver<T>, ctx: egui::Context)
where
   T: Send + Sync + 'static,
{
   RT.spawn(async move {
      while rx.changed().await.is_ok() {
         ctx.request_repaint();
      }
   });
}

impl StarterApp {
   pub fn new(
      cc: &CreationContext,
      controller: Arc<AppController>,
      walletconnect: Arc<WalletConnectConnector>,
      github_url: String,
   ) -> Self {
      let theme = Theme::default();
      cc.egui_ctx.set_style(theme.style());

      repaint_on_change(controller.wallet().subscribe(), cc.egui_ctx.clone());
      repaint_on_change(walletconnect.subscribe_pairing(), cc.egui_ctx.clone());

      // the one restore attempt of this run
      let ctx = cc.egui_ctx.clone();
      let restore = controller.clone();
      RT.spawn(async move {
         let outcome = restore.initialize().await;
         info!("Startup restore finished: {:?}", outcome);
         ctx.request_repaint();
      });

      Self {
         controller,
         walletconnect,
         theme,
         github_url,
         connect_card: ConnectWalletCard::new(),
         session_card: SessionCard::new(),
         pairing_window: PairingWindow::new(),
      }
   }

   fn handle(&self, action: UserAction) {
      match action {
         UserAction::ConnectInjected => self.controller.connect_injected(),
         UserAction::ConnectWalletConnect => self.controller.connect_walletconnect(),
         UserAction::Disconnect => self.controller.disconnect(),
         UserAction::CancelPairing => self.walletconnect.cancel_pairing(),
      }
   }
}

impl eframe::App for StarterApp {
   fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
      let view = self.controller.view();
      let pairing = self.walletconnect.pairing();
      let mut action = None;

      let bg_frame = Frame::new().fill(self.theme.colors.bg_color);

      egui::CentralPanel::default()
         .frame(bg_frame)
         .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
               let card_height = 320.0;
               ui.add_space(((ui.available_height() - card_height) / 2.0).max(20.0));

               let clicked = match &view {
                  View::ConnectPrompt { restoring } => {
                     self.connect_card.show(*restoring, &self.theme, ui)
                  }
                  View::SessionPanel { network, address } => {
                     self.session_card.show(network, address.as_deref(), &self.theme, ui)
                  }
               };
               action = action.or(clicked);

               let clicked = self.pairing_window.show(pairing.as_ref(), &self.theme, ui);
               action = action.or(clicked);

               ui.add_space(30.0);
               ui.hyperlink_to(
                  RichText::new("Github").size(self.theme.text_sizes.normal),
                  &self.github_url,
               );
            });
         });

      if let Some(action) = action {
         self.handle(action);
      }
   }
}
