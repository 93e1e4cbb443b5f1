/// Distance from `p` to the closed segment `a`-`b`. A zero-length segment
/// degenerates to the distance from `p` to `a`.
pub fn distance_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        clamp(((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_sq, 0.0, 1.0)
    } else {
        0.0
    };
    let cx = a[0] + t * dx;
    let cy = a[1] + t * dy;
    ((p[0] - cx) * (p[0] - cx) + (p[1] - cy) * (p[1] - cy)).sqrt()
}

/// Even-odd point-in-polygon test. The polygon is implicitly closed.
pub fn point_in_polygon(p: [f32; 2], polygon: &[[f32; 2]]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > p[1]) != (yj > p[1]) && p[0] < (xj - xi) * (p[1] - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Integer bounding box `(min_x, min_y, max_x, max_y)` of a round-capped
/// segment, clipped to a `width` x `height` grid. `None` when nothing of the
/// segment lands on the grid.
pub fn segment_bounds(
    a: [f32; 2],
    b: [f32; 2],
    radius: f32,
    width: u32,
    height: u32,
) -> Option<(u32, u32, u32, u32)> {
    let pad = radius + 1.0;
    let min_x = (a[0].min(b[0]) - pad).floor().max(0.0);
    let min_y = (a[1].min(b[1]) - pad).floor().max(0.0);
    let max_x = (a[0].max(b[0]) + pad).ceil().min(width as f32 - 1.0);
    let max_y = (a[1].max(b[1]) + pad).ceil().min(height as f32 - 1.0);
    if !(min_x <= max_x && min_y <= max_y) {
        return None;
    }
    Some((min_x as u32, min_y as u32, max_x as u32, max_y as u32))
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
