use eframe::egui::{Align2, Button, Frame, Order, RichText, Ui, Window, vec2};
use tracing::error;

use super::UserAction;
use super::qr::QrMatrix;
use crate::core::connector::Pairing;
use crate::gui::Theme;

/// Shows the pairing QR code while a WalletConnect pairing is pending
pub struct PairingWindow {
   qr: Option<QrMatrix>,
   pub size: (f32, f32),
}

impl PairingWindow {
   pub fn new() -> Self {
      Self {
         qr: None,
         size: (320.0, 420.0),
      }
   }

   /// Keep the cached QR code in step with the pairing on offer
   fn sync(&mut self, pairing: Option<&Pairing>) {
      let Some(pairing) = pairing else {
         self.qr = None;
         return;
      };

      if self.qr.as_ref().is_some_and(|qr| qr.text == pairing.uri) {
         return;
      }

      self.qr = match QrMatrix::encode(&pairing.uri) {
         Ok(qr) => Some(qr),
         Err(e) => {
            error!("Failed to render pairing QR code: {:?}", e);
            None
         }
      };
   }

   pub fn show(
      &mut self,
      pairing: Option<&Pairing>,
      theme: &Theme,
      ui: &mut Ui,
   ) -> Option<UserAction> {
      self.sync(pairing);
      let pairing = pairing?;
      let mut action = None;

      Window::new("pairing_window")
         .title_bar(false)
         .resizable(false)
         .order(Order::Foreground)
         .anchor(Align2::CENTER_CENTER, vec2(0.0, 0.0))
         .collapsible(false)
         .frame(Frame::window(ui.style()))
         .show(ui.ctx(), |ui| {
            ui.set_width(self.size.0);
            ui.vertical_centered(|ui| {
               ui.spacing_mut().item_spacing.y = 15.0;

               ui.label(
                  RichText::new("Scan with your wallet")
                     .size(theme.text_sizes.large)
                     .strong(),
               );

               match &self.qr {
                  Some(qr) => qr.show(self.size.0 - 40.0, ui),
                  None => {
                     ui.label(RichText::new("QR code unavailable").size(theme.text_sizes.normal));
                  }
               }

               ui.label(
                  RichText::new(&pairing.uri)
                     .size(theme.text_sizes.small)
                     .color(theme.colors.title_color),
               );

               if ui
                  .add(Button::new(RichText::new("Copy URI").size(theme.text_sizes.normal)))
                  .clicked()
               {
                  ui.ctx().copy_text(pairing.uri.clone());
               }

               if ui
                  .add(Button::new(RichText::new("Cancel").size(theme.text_sizes.normal)))
                  .clicked()
               {
                  action = Some(UserAction::CancelPairing);
               }
            });
         });

      action
   }
}
