pub mod connect;
pub mod pairing;
pub mod qr;
pub mod session_panel;

pub use connect::ConnectWalletCard;
pub use pairing::PairingWindow;
pub use session_panel::SessionCard;

use eframe::egui::{Frame, Margin, Shadow};

use super::Theme;

/// Something the user clicked that the controller has to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
   ConnectInjected,
   ConnectWalletConnect,
   Disconnect,
   CancelPairing,
}

/// White rounded card with a soft shadow
pub fn card_frame(theme: &Theme, margin: i8) -> Frame {
   Frame::new()
      .fill(theme.colors.card_color)
      .corner_radius(theme.card_radius)
      .inner_margin(Margin::same(margin))
      .shadow(Shadow {
         offset: [0, 4],
         blur: 20,
         spread: 0,
         color: theme.colors.shadow_color,
      })
}
