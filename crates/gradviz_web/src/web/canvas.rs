use gradviz::fmt::fmt_fixed;
use gradviz::scene::{Scene, Shape};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#ffffff";
const FONT_FAMILY: &str = "sans-serif";

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

/// Width available to a chart: the canvas parent's client width.
pub(super) fn parent_width(canvas: &HtmlCanvasElement, fallback: f64) -> f64 {
    canvas
        .parent_element()
        .map(|p| p.client_width() as f64)
        .filter(|w| *w > 0.0)
        .unwrap_or(fallback)
}

/// Resize the canvas to the scene and repaint it from scratch.
pub(super) fn paint_scene(canvas: &HtmlCanvasElement, scene: &Scene) -> Result<(), String> {
    canvas.set_width(scene.width.max(0.0).round() as u32);
    canvas.set_height(scene.height.max(0.0).round() as u32);
    let ctx = context_2d(canvas)?;

    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

    for shape in &scene.shapes {
        match shape {
            Shape::Circle { cx, cy, r, fill } => {
                ctx.set_fill_style_str(fill);
                ctx.begin_path();
                ctx.arc(*cx, *cy, *r, 0.0, std::f64::consts::PI * 2.0)
                    .map_err(|_| "canvas: arc threw".to_string())?;
                ctx.fill();
            }
            Shape::Rect { x, y, w, h, fill } => {
                ctx.set_fill_style_str(fill);
                ctx.fill_rect(*x, *y, w.max(0.0), h.max(0.0));
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                width,
            } => {
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*width);
                ctx.begin_path();
                ctx.move_to(*x1, *y1);
                ctx.line_to(*x2, *y2);
                ctx.stroke();
            }
            Shape::Polyline {
                points,
                stroke,
                width,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                ctx.set_stroke_style_str(stroke);
                ctx.set_line_width(*width);
                ctx.begin_path();
                ctx.move_to(first.0, first.1);
                for (x, y) in rest {
                    ctx.line_to(*x, *y);
                }
                ctx.stroke();
            }
            Shape::Text {
                x,
                y,
                text,
                anchor,
                size_px,
                rotate,
                fill,
            } => {
                ctx.save();
                ctx.translate(*x, *y)
                    .map_err(|_| "canvas: translate threw".to_string())?;
                if *rotate != 0.0 {
                    ctx.rotate(rotate.to_radians())
                        .map_err(|_| "canvas: rotate threw".to_string())?;
                }
                ctx.set_font(&format!("{}px {FONT_FAMILY}", fmt_fixed(*size_px, 0)));
                ctx.set_text_align(anchor.canvas());
                ctx.set_fill_style_str(fill);
                ctx.fill_text(text, 0.0, 0.0)
                    .map_err(|_| "canvas: fill_text threw".to_string())?;
                ctx.restore();
            }
        }
    }
    Ok(())
}
