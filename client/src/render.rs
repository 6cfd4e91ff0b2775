use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use sightsketch_shared::color::gray_css;
use sightsketch_shared::sketch::PaintPath;

use crate::state::State;

fn draw_path(ctx: &CanvasRenderingContext2d, path: &PaintPath<'_>) {
    let Some((first, rest)) = path.points.split_first() else {
        return;
    };
    let _ = ctx.set_global_composite_operation("source-over");
    ctx.set_stroke_style_str(&gray_css(path.gray));
    ctx.set_line_width(path.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for point in rest {
        ctx.line_to(point.x, point.y);
    }
    ctx.stroke();
}

pub fn redraw(state: &State) {
    let ctx = &state.ctx;
    let canvas_state = state.pad.state();
    let width = f64::from(state.canvas.width());
    let height = f64::from(state.canvas.height());

    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.clear_rect(0.0, 0.0, width, height);

    let pad = canvas_state.background_padding();
    ctx.set_fill_style_str(&gray_css(canvas_state.background));
    ctx.fill_rect(-pad, -pad, width + 2.0 * pad, height + 2.0 * pad);

    let [a, b, c, d, e, f] = canvas_state.view.to_array();
    let _ = ctx.set_transform(a, b, c, d, e, f);
    for path in state.pad.paint_list() {
        draw_path(ctx, &path);
    }
}

pub fn apply_canvas_filter(canvas: &HtmlCanvasElement, blur: f64) {
    let filter = if blur > 0.0 {
        format!("blur({blur}px)")
    } else {
        "none".to_string()
    };
    let _ = canvas.style().set_property("filter", &filter);
}

pub fn update_underlay(viewport: Option<&HtmlElement>, background: u8) {
    if let Some(viewport) = viewport {
        let _ = viewport
            .style()
            .set_property("background", &gray_css(background));
    }
}
