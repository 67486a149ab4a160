//! Canvas 2D backend (WASM only)

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::DrawCommand;

/// Executes draw lists on a 2D canvas context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`; none if the browser refuses
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    /// Clear the canvas and draw `cmds` in order
    pub fn draw(&self, cmds: &[DrawCommand]) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);

        for cmd in cmds {
            match *cmd {
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                    alpha,
                } => {
                    ctx.set_global_alpha(alpha as f64);
                    ctx.set_fill_style_str(color.css());
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
                        .ok();
                    ctx.fill();
                }
                DrawCommand::Rect {
                    origin,
                    size,
                    color,
                } => {
                    ctx.set_global_alpha(1.0);
                    ctx.set_fill_style_str(color.css());
                    ctx.fill_rect(
                        origin.x as f64,
                        origin.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                }
            }
        }
        ctx.set_global_alpha(1.0);
    }
}
