use eframe::egui::Rect;

/// True iff the point lies inside `rect`, edges included.
pub fn point_in_rect(rect: Rect, x: f32, y: f32) -> bool {
    x >= rect.left() && x <= rect.left() + rect.width() && y >= rect.top() && y <= rect.top() + rect.height()
}
