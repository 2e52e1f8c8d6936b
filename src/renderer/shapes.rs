//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in screen pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Append a filled rectangle (two triangles)
pub fn push_rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let (min, max) = (rect.pos, rect.max());
    out.extend_from_slice(&[
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]);
}

/// Append a rectangle outline of the given stroke width, drawn inside `rect`
pub fn push_outline(out: &mut Vec<Vertex>, rect: &Rect, width: f32, color: [f32; 4]) {
    let (pos, size) = (rect.pos, rect.size);
    let w = width.min(size.x / 2.0).min(size.y / 2.0);
    push_rect(out, &Rect::from_pos_size(pos, Vec2::new(size.x, w)), color);
    push_rect(
        out,
        &Rect::from_pos_size(Vec2::new(pos.x, pos.y + size.y - w), Vec2::new(size.x, w)),
        color,
    );
    push_rect(
        out,
        &Rect::from_pos_size(Vec2::new(pos.x, pos.y + w), Vec2::new(w, size.y - 2.0 * w)),
        color,
    );
    push_rect(
        out,
        &Rect::from_pos_size(
            Vec2::new(pos.x + size.x - w, pos.y + w),
            Vec2::new(w, size.y - 2.0 * w),
        ),
        color,
    );
}

/// Append a horizontal bar: the full track, then the filled fraction on top
pub fn push_bar(
    out: &mut Vec<Vertex>,
    rect: &Rect,
    fraction: f32,
    track: [f32; 4],
    fill: [f32; 4],
) {
    push_rect(out, rect, track);
    let filled = rect.size.x * fraction.clamp(0.0, 1.0);
    if filled > 0.0 {
        push_rect(
            out,
            &Rect::from_pos_size(rect.pos, Vec2::new(filled, rect.size.y)),
            fill,
        );
    }
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();

        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));
    }

    vertices
}

/// Rectangle rotated about its centre by `angle` radians
pub fn push_rotated_rect(out: &mut Vec<Vertex>, rect: &Rect, angle: f32, color: [f32; 4]) {
    let center = rect.center();
    let half = rect.size * 0.5;
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| {
        let p = center + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, color)
    };
    let (a, b, c, d) = (
        corner(-half.x, -half.y),
        corner(half.x, -half.y),
        corner(-half.x, half.y),
        corner(half.x, half.y),
    );
    out.extend_from_slice(&[a, b, c, c, b, d]);
}
