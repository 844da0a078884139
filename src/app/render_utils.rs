use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use jaring::data::{EntityKind, PriorityLevel};
use jaring::selection::EdgeFlow;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(17, 21, 28));

    let step = (64.0 * zoom.clamp(0.5, 2.0)).max(24.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 68, 82, 60));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Cheap bounding-box rejection for edge segments.
pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

/// Layout coordinates are canvas-based; `origin` is the canvas center, which maps
/// to the middle of the viewport before panning.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, origin: Vec2, world: Vec2) -> Pos2 {
    rect.center() + pan + (world - origin) * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, origin: Vec2, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom + origin
}

pub(super) fn priority_color(priority: PriorityLevel) -> Color32 {
    match priority {
        PriorityLevel::High => Color32::from_rgb(239, 68, 68),
        PriorityLevel::Medium => Color32::from_rgb(249, 115, 22),
        PriorityLevel::Low => Color32::from_rgb(34, 197, 94),
    }
}

pub(super) fn kind_color(kind: EntityKind) -> Color32 {
    match kind {
        EntityKind::BankAccount => Color32::from_rgb(59, 130, 246),
        EntityKind::EWallet => Color32::from_rgb(168, 85, 247),
        EntityKind::CryptoWallet => Color32::from_rgb(234, 179, 8),
        EntityKind::PhoneNumber => Color32::from_rgb(20, 184, 166),
        EntityKind::Qris => Color32::from_rgb(236, 72, 153),
    }
}

pub(super) fn flow_color(flow: EdgeFlow, emphasized: bool) -> Color32 {
    match flow {
        EdgeFlow::Outgoing => Color32::from_rgb(239, 68, 68),
        EdgeFlow::Incoming => Color32::from_rgb(34, 197, 94),
        EdgeFlow::Neutral if emphasized => Color32::from_rgb(245, 206, 93),
        EdgeFlow::Neutral => Color32::from_rgba_unmultiplied(120, 130, 145, 170),
    }
}

pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
