use anyhow::anyhow;
use eframe::egui::{Color32, Rect, Sense, Ui, pos2, vec2};
use qrcodegen_no_heap::{QrCode, QrCodeEcc, Version};

/// Light border around the code, in modules
const QUIET_ZONE: usize = 2;

/// Module matrix of an encoded QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
   pub text: String,
   size: usize,
   modules: Vec<bool>,
}

impl QrMatrix {
   pub fn encode(text: &str) -> Result<Self, anyhow::Error> {
      let mut out_buffer = vec![0u8; Version::MAX.buffer_len()];
      let mut temp_buffer = vec![0u8; Version::MAX.buffer_len()];

      let qr = QrCode::encode_text(
         text,
         &mut temp_buffer,
         &mut out_buffer,
         QrCodeEcc::Medium,
         Version::MIN,
         Version::MAX,
         None,
         true,
      )
      .map_err(|_| anyhow!("{} bytes do not fit in a QR code", text.len()))?;

      let size = qr.size() as usize;
      let mut modules = Vec::with_capacity(size * size);
      for y in 0..size {
         for x in 0..size {
            modules.push(qr.get_module(x as i32, y as i32));
         }
      }

      Ok(Self {
         text: text.to_string(),
         size,
         modules,
      })
   }

   /// Side length in modules, without the quiet zone
   pub fn size(&self) -> usize {
      self.size
   }

   pub fn is_dark(&self, x: usize, y: usize) -> bool {
      x < self.size && y < self.size && self.modules[y * self.size + x]
   }

   /// Paint the code as a `side` x `side` square
   pub fn show(&self, side: f32, ui: &mut Ui) {
      let (rect, _) = ui.allocate_exact_size(vec2(side, side), Sense::hover());
      let painter = ui.painter_at(rect);
      painter.rect_filled(rect, 0.0, Color32::WHITE);

      let total = (self.size + QUIET_ZONE * 2) as f32;
      let module = side / total;

      for y in 0..self.size {
         for x in 0..self.size {
            if !self.is_dark(x, y) {
               continue;
            }
            let min = pos2(
               rect.min.x + (x + QUIET_ZONE) as f32 * module,
               rect.min.y + (y + QUIET_ZONE) as f32 * module,
            );
            painter.rect_filled(
               Rect::from_min_size(min, vec2(module, module)),
               0.0,
               Color32::BLACK,
            );
         }
      }
   }
}
