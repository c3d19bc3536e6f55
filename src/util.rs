// Small helpers shared by the components.

/// Milliseconds since the epoch, from the browser clock.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn format_scale(scale: f64) -> String {
    format!("×{:.2}", scale)
}

/// CSS transform placing an overlay relative to the temple anchor.
pub fn overlay_transform(x: f64, y: f64, scale: f64) -> String {
    format!(
        "transform:translate(-50%, -50%) translate({:.1}px, {:.1}px) scale({:.3});",
        x, y, scale
    )
}
