use eframe::egui::{Button, RichText, Ui};

use super::{UserAction, card_frame};
use crate::gui::Theme;

/// Network, address and the disconnect control
pub struct SessionCard;

impl SessionCard {
   pub fn new() -> Self {
      Self
   }

   fn row(title: &str, value: &str, theme: &Theme, ui: &mut Ui) {
      ui.vertical(|ui| {
         ui.label(
            RichText::new(title)
               .size(theme.text_sizes.normal)
               .color(theme.colors.title_color)
               .strong(),
         );
         ui.label(
            RichText::new(value)
               .size(theme.text_sizes.heading)
               .strong(),
         );
      });
   }

   pub fn show(
      &self,
      network: &str,
      address: Option<&str>,
      theme: &Theme,
      ui: &mut Ui,
   ) -> Option<UserAction> {
      let mut action = None;

      card_frame(theme, 20).show(ui, |ui| {
         ui.set_width(theme.card_width - 40.0);
         ui.spacing_mut().item_spacing.y = 14.0;

         Self::row("Network", network, theme, ui);
         ui.separator();
         Self::row("Address", address.unwrap_or_default(), theme, ui);
         ui.separator();

         ui.vertical_centered(|ui| {
            let text = RichText::new("Disconnect")
               .size(theme.text_sizes.large)
               .color(theme.colors.disconnect_color)
               .strong();
            if ui.add(Button::new(text).frame(false)).clicked() {
               action = Some(UserAction::Disconnect);
            }
         });
      });

      action
   }
}
