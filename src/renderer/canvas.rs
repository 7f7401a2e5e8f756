//! Canvas 2D backend
//!
//! Executes a [`DrawList`] on a `CanvasRenderingContext2d`. The canvas backing
//! store is sized to the virtual viewport and CSS scales it to the screen.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::draw::{DrawCommand, DrawList, SheetId, SheetSource, SubRect};
use crate::sim::{Rect, Viewport};

/// Loaded sprite sheets keyed by logical id
pub struct SpriteSheets {
    images: HashMap<SheetId, HtmlImageElement>,
}

impl SpriteSheets {
    /// Start loading every sheet. Sources come from `<img id="asset-KEY">`
    /// elements when the page provides them, otherwise `assets/KEY.png`.
    pub fn load(document: &Document) -> Result<Self, JsValue> {
        let mut images = HashMap::new();
        for sheet in SheetId::all() {
            let key = sheet.key();
            let src = document
                .get_element_by_id(&format!("asset-{key}"))
                .and_then(|el| el.get_attribute("src"))
                .unwrap_or_else(|| format!("assets/{key}.png"));
            let img = HtmlImageElement::new()?;
            img.set_cross_origin(Some("anonymous"));
            img.set_src(&src);
            log::debug!("Loading sheet {key} from {src}");
            images.insert(sheet, img);
        }
        Ok(Self { images })
    }

    fn image(&self, sheet: SheetId) -> Option<&HtmlImageElement> {
        self.images.get(&sheet).filter(|img| is_loaded(img))
    }
}

fn is_loaded(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}

impl SheetSource for SpriteSheets {
    fn is_ready(&self, sheet: SheetId) -> bool {
        self.image(sheet).is_some()
    }
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the virtual viewport
    pub fn resize(&self, viewport: &Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
    }

    /// Clear and draw one frame. A failed command is logged and skipped.
    pub fn render(&self, list: &DrawList, sheets: &SpriteSheets) {
        let w = f64::from(self.canvas.width());
        let h = f64::from(self.canvas.height());
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if list.is_empty() {
            return;
        }

        self.ctx.save();
        if let Err(e) = self
            .ctx
            .translate(f64::from(list.translate.x), f64::from(list.translate.y))
        {
            log::warn!("Canvas translate failed: {e:?}");
        }

        for command in &list.commands {
            if let Err(e) = self.execute(command, sheets) {
                log::warn!("Draw command failed: {e:?}");
            }
        }
        self.ctx.restore();
    }

    fn execute(&self, command: &DrawCommand, sheets: &SpriteSheets) -> Result<(), JsValue> {
        match command {
            DrawCommand::Fill { rect, color } => {
                self.ctx.set_fill_style_str(&color.css());
                self.ctx.fill_rect(
                    f64::from(rect.x),
                    f64::from(rect.y),
                    f64::from(rect.w),
                    f64::from(rect.h),
                );
                Ok(())
            }
            DrawCommand::Sprite {
                sheet,
                src,
                dst,
                alpha,
                flip_x,
            } => {
                // Unready sheets are simply skipped
                let Some(img) = sheets.image(*sheet) else {
                    return Ok(());
                };
                self.blit(img, src, dst, *alpha, *flip_x)
            }
        }
    }

    fn blit(
        &self,
        img: &HtmlImageElement,
        src: &SubRect,
        dst: &Rect,
        alpha: f32,
        flip_x: bool,
    ) -> Result<(), JsValue> {
        let px = src.to_pixels(img.natural_width() as f32, img.natural_height() as f32);

        self.ctx.save();
        self.ctx.set_global_alpha(f64::from(alpha));
        let result = (|| -> Result<(), JsValue> {
            let (dx, dy) = if flip_x {
                self.ctx
                    .translate(f64::from(dst.x + dst.w), f64::from(dst.y))?;
                self.ctx.scale(-1.0, 1.0)?;
                (0.0, 0.0)
            } else {
                (f64::from(dst.x), f64::from(dst.y))
            };
            self.ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img,
                    f64::from(px.x),
                    f64::from(px.y),
                    f64::from(px.w),
                    f64::from(px.h),
                    dx,
                    dy,
                    f64::from(dst.w),
                    f64::from(dst.h),
                )
        })();
        self.ctx.restore();
        result
    }
}
