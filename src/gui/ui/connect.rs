use eframe::egui::{Button, RichText, Spinner, Ui, vec2};

use super::{UserAction, card_frame};
use crate::gui::Theme;

/// The "Connect your wallet" prompt
pub struct ConnectWalletCard {
   pub button_size: (f32, f32),
}

impl ConnectWalletCard {
   pub fn new() -> Self {
      Self {
         button_size: (300.0, 60.0),
      }
   }

   pub fn show(&self, restoring: bool, theme: &Theme, ui: &mut Ui) -> Option<UserAction> {
      let mut action = None;

      card_frame(theme, 30).show(ui, |ui| {
         ui.set_width(theme.card_width - 60.0);
         ui.vertical_centered(|ui| {
            ui.spacing_mut().item_spacing.y = 20.0;

            ui.label(
               RichText::new("Connect your wallet")
                  .size(theme.text_sizes.large)
                  .strong(),
            );

            if restoring {
               ui.add(Spinner::new().size(24.0));
               ui.label(RichText::new("Checking wallet authorization...").size(theme.text_sizes.small));
            }

            let size = vec2(self.button_size.0, self.button_size.1);

            let metamask = Button::new(RichText::new("Metamask").size(theme.text_sizes.normal))
               .min_size(size)
               .corner_radius(theme.button_radius)
               .fill(theme.colors.card_color);
            if ui.add(metamask).clicked() {
               action = Some(UserAction::ConnectInjected);
            }

            let walletconnect =
               Button::new(RichText::new("WalletConnect").size(theme.text_sizes.normal))
                  .min_size(size)
                  .corner_radius(theme.button_radius)
                  .fill(theme.colors.card_color);
            if ui.add(walletconnect).clicked() {
               action = Some(UserAction::ConnectWalletConnect);
            }
         });
      });

      action
   }
}
