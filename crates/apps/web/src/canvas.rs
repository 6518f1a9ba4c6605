//! `Canvas2d` over a `<canvas>` element's 2D context.

use effects::canvas::{Canvas2d, CanvasError, ColorStop, Paint};
use foundation::color::Rgba;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

/// A full-window canvas. The backing store follows the window size; it is
/// resized lazily at the start of each frame.
#[derive(Debug, Clone)]
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn from_id(id: &str) -> Result<Self, CanvasError> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| CanvasError::NotFound(id.to_string()))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| CanvasError::ContextUnavailable(id.to_string()))?;
        let web = Self { canvas, ctx };
        web.fit_to_window();
        Ok(web)
    }

    fn window_size() -> Option<(u32, u32)> {
        let window = web_sys::window()?;
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some((w.max(0.0) as u32, h.max(0.0) as u32))
    }

    /// Setting the size clears the canvas, so it is only done on change.
    fn fit_to_window(&self) {
        if let Some((w, h)) = Self::window_size() {
            if self.canvas.width() != w || self.canvas.height() != h {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
            }
        }
    }

    fn set_fill(&self, value: &JsValue) {
        let _ = js_sys::Reflect::set(self.ctx.as_ref(), &JsValue::from_str("fillStyle"), value);
    }

    fn set_stroke(&self, value: &JsValue) {
        let _ = js_sys::Reflect::set(self.ctx.as_ref(), &JsValue::from_str("strokeStyle"), value);
    }

    fn apply_paint(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.set_fill(&JsValue::from_str(&color.css())),
            Paint::Linear { from, to, stops } => {
                let g = self.ctx.create_linear_gradient(from[0], from[1], to[0], to[1]);
                add_stops(&g, stops);
                self.set_fill(g.as_ref());
            }
            Paint::Radial {
                center,
                inner_radius,
                outer_radius,
                stops,
            } => match self.ctx.create_radial_gradient(
                center[0],
                center[1],
                *inner_radius,
                center[0],
                center[1],
                outer_radius.max(0.0),
            ) {
                Ok(g) => {
                    add_stops(&g, stops);
                    self.set_fill(g.as_ref());
                }
                Err(_) => self.set_fill(&JsValue::from_str("transparent")),
            },
        }
    }

    fn arc(&self, center: [f64; 2], radius: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center[0], center[1], radius.max(0.0), 0.0, TAU);
    }
}

fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
    for stop in stops {
        let _ = gradient.add_color_stop(stop.offset as f32, &stop.color);
    }
}

impl Canvas2d for WebCanvas {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        self.fit_to_window();
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: &Paint) {
        self.apply_paint(paint);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, center: [f64; 2], radius: f64, paint: &Paint, alpha: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.apply_paint(paint);
        self.arc(center, radius);
        self.ctx.fill();
        self.ctx.restore();
    }

    fn stroke_circle(&mut self, center: [f64; 2], radius: f64, color: Rgba, width: f64, alpha: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.set_stroke(&JsValue::from_str(&color.css()));
        self.ctx.set_line_width(width);
        self.arc(center, radius);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn stroke_line(&mut self, from: [f64; 2], to: [f64; 2], color: Rgba, width: f64, alpha: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
        self.set_stroke(&JsValue::from_str(&color.css()));
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from[0], from[1]);
        self.ctx.line_to(to[0], to[1]);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn fill_polygon(&mut self, points: &[[f64; 2]], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.set_fill(&JsValue::from_str(&color.css()));
        self.ctx.begin_path();
        self.ctx.move_to(first[0], first[1]);
        for p in rest {
            self.ctx.line_to(p[0], p[1]);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}
