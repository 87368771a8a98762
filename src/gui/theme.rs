use eframe::egui::{Color32, Style, Visuals};

#[derive(Debug, Clone)]
pub struct Colors {
   pub bg_color: Color32,
   pub card_color: Color32,
   pub text_color: Color32,
   pub title_color: Color32,
   pub divider_color: Color32,
   pub disconnect_color: Color32,
   pub shadow_color: Color32,
}

#[derive(Debug, Clone)]
pub struct TextSizes {
   pub small: f32,
   pub normal: f32,
   pub large: f32,
   pub heading: f32,
}

/// Light card-on-grey look
#[derive(Debug, Clone)]
pub struct Theme {
   pub colors: Colors,
   pub text_sizes: TextSizes,
   pub card_width: f32,
   pub card_radius: u8,
   pub button_radius: u8,
}

impl Default for Theme {
   fn default() -> Self {
      Self {
         colors: Colors {
            bg_color: Color32::from_rgb(0xfa, 0xfa, 0xfa),
            card_color: Color32::WHITE,
            text_color: Color32::from_rgb(0x11, 0x11, 0x11),
            title_color: Color32::from_rgb(0xaf, 0xaf, 0xaf),
            divider_color: Color32::from_rgb(0xe5, 0xe5, 0xe5),
            disconnect_color: Color32::from_rgb(0xf9, 0x66, 0x66),
            shadow_color: Color32::from_black_alpha(25),
         },
         text_sizes: TextSizes {
            small: 14.0,
            normal: 16.0,
            large: 20.0,
            heading: 22.0,
         },
         card_width: 400.0,
         card_radius: 30,
         button_radius: 10,
      }
   }
}

impl Theme {
   pub fn style(&self) -> Style {
      let mut style = Style {
         visuals: Visuals::light(),
         ..Default::default()
      };
      style.visuals.panel_fill = self.colors.bg_color;
      style.visuals.override_text_color = Some(self.colors.text_color);
      style
   }
}
