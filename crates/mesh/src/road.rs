use cityforge_common::{Rect, RoadSegment};
use glam::{DVec2, DVec3};

use crate::buffers::{MeshBuffers, RoadMeshSet};
use crate::config::MeshConfig;
use crate::heights::HeightSampler;

/// Local frame of one straight segment: heights sampled at both ends and
/// interpolated linearly in between.
struct SegmentFrame {
    start: DVec2,
    dir: DVec2,
    side: DVec2,
    length: f64,
    h0: f64,
    h1: f64,
    normal: DVec3,
}

impl SegmentFrame {
    fn new<H: HeightSampler + ?Sized>(segment: &RoadSegment, heights: &H) -> Self {
        let dir = segment.direction();
        let side = DVec2::new(-dir.y, dir.x);
        let length = segment.length();
        let h0 = heights.height_at(segment.start.x, segment.start.y);
        let h1 = heights.height_at(segment.end.x, segment.end.y);
        let slope = if length > 0.0 { (h1 - h0) / length } else { 0.0 };
        // side x tangent, with the tangent (dir.x, slope, dir.y).
        let normal = DVec3::new(-dir.x * slope, 1.0, -dir.y * slope).normalize();
        Self {
            start: segment.start,
            dir,
            side,
            length,
            h0,
            h1,
            normal,
        }
    }

    fn point(&self, along: f64, lateral: f64, lift: f64) -> DVec3 {
        let p = self.start + self.dir * along + self.side * lateral;
        let t = if self.length > 0.0 { along / self.length } else { 0.0 };
        let y = self.h0 + (self.h1 - self.h0) * t + lift;
        DVec3::new(p.x, y, p.y)
    }

    fn side3(&self) -> DVec3 {
        DVec3::new(self.side.x, 0.0, self.side.y)
    }
}

/// Most quads a single strip is cut into.
pub const MAX_STEPS: usize = 1 << 16;

/// Quads needed to keep each under `max_step` along `length`. Unusable steps
/// collapse to one quad.
fn steps_for(length: f64, max_step: f64) -> usize {
    if !(max_step > 0.0) || !length.is_finite() {
        return 1;
    }
    ((length / max_step).ceil() as usize).clamp(1, MAX_STEPS)
}

/// Flat band between two lateral offsets, cut into `steps` quads along
/// `[from, to]`. `v` advances by one every `v_scale` units of run.
#[allow(clippy::too_many_arguments)]
fn strip(
    buffers: &mut MeshBuffers,
    frame: &SegmentFrame,
    from: f64,
    to: f64,
    steps: usize,
    lateral: (f64, f64),
    lift: f64,
    v_scale: f64,
) {
    let mut previous = None;
    for i in 0..=steps {
        let along = from + (to - from) * (i as f64 / steps as f64);
        let v = along / v_scale;
        let a = buffers.push_vertex(frame.point(along, lateral.0, lift), frame.normal, [0.0, v]);
        let b = buffers.push_vertex(frame.point(along, lateral.1, lift), frame.normal, [1.0, v]);
        if let Some((a0, b0)) = previous {
            buffers.push_quad(a0, b0, a, b);
        }
        previous = Some((a, b));
    }
}

/// Vertical curb face at `lateral`, facing along `+side` when `facing_side`.
fn curb(
    buffers: &mut MeshBuffers,
    frame: &SegmentFrame,
    steps: usize,
    lateral: f64,
    (low, high): (f64, f64),
    facing_side: bool,
) {
    let normal = if facing_side { frame.side3() } else { -frame.side3() };
    // Winding flips with the facing so the face stays front-facing.
    let (first, second) = if facing_side { (high, low) } else { (low, high) };
    let mut previous = None;
    for i in 0..=steps {
        let along = frame.length * (i as f64 / steps as f64);
        let a = buffers.push_vertex(frame.point(along, lateral, first), normal, [along, 0.0]);
        let b = buffers.push_vertex(frame.point(along, lateral, second), normal, [along, 1.0]);
        if let Some((a0, b0)) = previous {
            buffers.push_quad(a0, b0, a, b);
        }
        previous = Some((a, b));
    }
}

/// Surface, sidewalk and marking buffers for one segment.
///
/// Degenerate segments produce degenerate but index-valid geometry; callers
/// should not pass them. An unvalidated config still terminates: strips are
/// capped at [`MAX_STEPS`] quads and a negative dash gap counts as zero.
pub fn build_road_mesh<H: HeightSampler + ?Sized>(
    segment: &RoadSegment,
    heights: &H,
    config: &MeshConfig,
) -> RoadMeshSet {
    let frame = SegmentFrame::new(segment, heights);
    let steps = steps_for(frame.length, config.max_step);
    let half = segment.width * 0.5;
    let surface_lift = config.surface_offset;
    let mut set = RoadMeshSet::default();

    strip(
        &mut set.surface,
        &frame,
        0.0,
        frame.length,
        steps,
        (-half, half),
        surface_lift,
        segment.width,
    );

    let sidewalk = config.sidewalk_width(segment.kind);
    if sidewalk > 0.0 {
        let top = surface_lift + config.curb_height;
        for lateral in [(-half - sidewalk, -half), (half, half + sidewalk)] {
            strip(&mut set.sidewalks, &frame, 0.0, frame.length, steps, lateral, top, sidewalk);
        }
        if config.curb_height > 0.0 {
            curb(&mut set.sidewalks, &frame, steps, -half, (surface_lift, top), true);
            curb(&mut set.sidewalks, &frame, steps, half, (surface_lift, top), false);
        }
    }

    let paint = surface_lift + config.marking_offset;
    let line = config.line_width * 0.5;
    if segment.kind.has_center_dashes() && config.dash_length > 0.0 {
        let period = (config.dash_length + config.dash_gap).max(config.dash_length);
        for i in 0..steps_for(frame.length, period) {
            let start = i as f64 * period;
            if start >= frame.length {
                break;
            }
            let end = (start + config.dash_length).min(frame.length);
            let lateral = (-line, line);
            strip(&mut set.markings, &frame, start, end, 1, lateral, paint, config.dash_length);
        }
    }
    if segment.kind.has_edge_lines() {
        let centre = half - config.edge_line_inset;
        for offset in [-centre, centre] {
            strip(
                &mut set.markings,
                &frame,
                0.0,
                frame.length,
                steps,
                (offset - line, offset + line),
                paint,
                config.dash_length,
            );
        }
    }

    set
}

/// Concatenate many mesh sets into one, offsetting indices by the running
/// vertex count of each buffer. No topology is checked or shared.
pub fn merge_road_geometries(sets: &[RoadMeshSet]) -> RoadMeshSet {
    let mut merged = RoadMeshSet::default();
    for set in sets {
        merged.append(set);
    }
    merged
}

/// The part of a segment's centre line inside `rect`, or `None` when the
/// line misses it or only touches a corner.
pub fn clip_to_rect(segment: &RoadSegment, rect: &Rect) -> Option<RoadSegment> {
    let d = segment.end - segment.start;
    let s = segment.start;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-d.x, s.x - rect.min.x),
        (d.x, rect.max.x - s.x),
        (-d.y, s.y - rect.min.y),
        (d.y, rect.max.y - s.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
    }
    if t1 <= t0 {
        return None;
    }
    Some(RoadSegment {
        start: s + d * t0,
        end: s + d * t1,
        ..segment.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heights::FlatGround;
    use cityforge_common::{RoadId, RoadKind};

    fn road(kind: RoadKind, start: (f64, f64), end: (f64, f64), width: f64) -> RoadSegment {
        RoadSegment {
            id: RoadId(0),
            kind,
            start: DVec2::new(start.0, start.1),
            end: DVec2::new(end.0, end.1),
            width,
        }
    }

    struct Ramp;

    impl HeightSampler for Ramp {
        fn height_at(&self, x: f64, _z: f64) -> f64 {
            x * 0.1
        }
    }

    fn triangle_up(buffers: &MeshBuffers, tri: &[u32]) -> f32 {
        let p = |i: u32| glam::Vec3::from_array(buffers.positions[i as usize]);
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        (b - a).cross(c - a).y
    }

    #[test]
    fn street_surface_spans_its_width() {
        let segment = road(RoadKind::Street, (0.0, 0.0), (40.0, 0.0), 14.0);
        let set = build_road_mesh(&segment, &FlatGround(0.0), &MeshConfig::default());

        // 40 / 8 = 5 steps, two vertices per cross-section.
        assert_eq!(set.surface.vertex_count(), 12);
        assert_eq!(set.surface.triangle_count(), 10);
        for p in &set.surface.positions {
            assert!((p[2].abs() - 7.0).abs() < 1e-5);
            assert!((p[1] - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn surface_faces_up_in_every_direction() {
        let config = MeshConfig::default();
        for (start, end) in [
            ((0.0, 0.0), (30.0, 0.0)),
            ((30.0, 0.0), (0.0, 0.0)),
            ((0.0, 0.0), (0.0, 30.0)),
            ((0.0, 30.0), (0.0, 0.0)),
        ] {
            let segment = road(RoadKind::Boulevard, start, end, 24.0);
            let set = build_road_mesh(&segment, &FlatGround(0.0), &config);
            for buffers in [&set.surface, &set.markings] {
                for tri in buffers.indices.chunks(3) {
                    assert!(triangle_up(buffers, tri) > 0.0);
                }
            }
        }
    }

    #[test]
    fn heights_interpolate_between_endpoints() {
        let segment = road(RoadKind::Alley, (0.0, 0.0), (100.0, 0.0), 6.0);
        let config = MeshConfig {
            surface_offset: 0.0,
            ..MeshConfig::default()
        };
        let set = build_road_mesh(&segment, &Ramp, &config);
        for p in &set.surface.positions {
            assert!((p[1] - p[0] * 0.1).abs() < 1e-4);
        }
        let n = set.surface.normals[0];
        assert!(n[1] > 0.0 && n[0] < 0.0);
    }

    #[test]
    fn street_dashes_follow_dash_and_gap() {
        let segment = road(RoadKind::Street, (0.0, 0.0), (60.0, 0.0), 14.0);
        let set = build_road_mesh(&segment, &FlatGround(0.0), &MeshConfig::default());
        // Dashes start every 6 units: 0, 6, ..., 54.
        assert_eq!(set.markings.vertex_count(), 10 * 4);
        assert_eq!(set.markings.triangle_count(), 10 * 2);
    }

    #[test]
    fn unvalidated_config_still_terminates() {
        let segment = road(RoadKind::Street, (0.0, 0.0), (60.0, 0.0), 14.0);
        let zero_step = MeshConfig {
            max_step: 0.0,
            ..MeshConfig::default()
        };
        let set = build_road_mesh(&segment, &FlatGround(0.0), &zero_step);
        // One quad along the whole run.
        assert_eq!(set.surface.vertex_count(), 4);

        let overlapping = MeshConfig {
            dash_gap: -10.0,
            ..MeshConfig::default()
        };
        let set = build_road_mesh(&segment, &FlatGround(0.0), &overlapping);
        // Dashes of 3 back to back: 0, 3, ..., 57.
        assert_eq!(set.markings.vertex_count(), 20 * 4);

        let fine = MeshConfig {
            max_step: 1e-9,
            dash_length: 1e-9,
            ..MeshConfig::default()
        };
        let set = build_road_mesh(&segment, &FlatGround(0.0), &fine);
        assert_eq!(set.surface.vertex_count(), 2 * (MAX_STEPS + 1));
        assert!(set.markings.vertex_count() <= MAX_STEPS * 4);
    }

    #[test]
    fn alleys_have_no_markings_or_sidewalks() {
        let segment = road(RoadKind::Alley, (0.0, 0.0), (50.0, 0.0), 6.0);
        let set = build_road_mesh(&segment, &FlatGround(0.0), &MeshConfig::default());
        assert!(set.markings.is_empty());
        assert!(set.sidewalks.is_empty());
        assert!(!set.surface.is_empty());
    }

    #[test]
    fn boulevards_add_edge_lines() {
        let config = MeshConfig::default();
        let ground = FlatGround(0.0);
        let boulevard = road(RoadKind::Boulevard, (0.0, 0.0), (60.0, 0.0), 24.0);
        let boulevard = build_road_mesh(&boulevard, &ground, &config);
        let street = road(RoadKind::Street, (0.0, 0.0), (60.0, 0.0), 24.0);
        let street = build_road_mesh(&street, &ground, &config);
        // Two continuous lines of 60 / 8 -> 8 steps each.
        let edge_vertices = 2 * 2 * 9;
        assert_eq!(
            boulevard.markings.vertex_count(),
            street.markings.vertex_count() + edge_vertices
        );
        let max_z = boulevard.markings.positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
        assert!((max_z - (12.0 - 0.5 + 0.075)).abs() < 1e-5);
    }

    #[test]
    fn sidewalks_sit_on_curbs_beside_the_road() {
        let config = MeshConfig::default();
        let segment = road(RoadKind::Street, (0.0, 0.0), (16.0, 0.0), 14.0);
        let set = build_road_mesh(&segment, &FlatGround(0.0), &config);
        // Two bands and two curb faces, each 2 x (2 steps + 1) vertices.
        assert_eq!(set.sidewalks.vertex_count(), 4 * 6);
        let top = (config.surface_offset + config.curb_height) as f32;
        for p in &set.sidewalks.positions {
            assert!(p[2].abs() >= 7.0 - 1e-5 && p[2].abs() <= 10.0 + 1e-5);
            assert!(p[1] <= top + 1e-6);
        }
    }

    #[test]
    fn merge_keeps_indices_in_range() {
        let config = MeshConfig::default();
        let sets: Vec<RoadMeshSet> = (0..3)
            .map(|i| {
                let z = i as f64 * 50.0;
                let segment = road(RoadKind::Boulevard, (0.0, z), (40.0, z), 24.0);
                build_road_mesh(&segment, &FlatGround(0.0), &config)
            })
            .collect();
        let merged = merge_road_geometries(&sets);

        assert_eq!(merged.vertex_count(), sets.iter().map(|s| s.vertex_count()).sum::<usize>());
        for buffers in [&merged.surface, &merged.sidewalks, &merged.markings] {
            let count = buffers.vertex_count() as u32;
            assert!(buffers.indices.iter().all(|&i| i < count));
        }
        let first = sets[0].surface.vertex_count() as u32;
        assert_eq!(merged.surface.indices[sets[0].surface.indices.len()], first);
    }

    #[test]
    fn clipping_keeps_inside_portion() {
        let segment = road(RoadKind::Street, (-100.0, 10.0), (100.0, 10.0), 14.0);
        let rect = Rect::new(DVec2::new(0.0, 0.0), DVec2::new(64.0, 64.0));
        let clipped = clip_to_rect(&segment, &rect).expect("crosses the rect");
        assert!(clipped.start.distance(DVec2::new(0.0, 10.0)) < 1e-9);
        assert!(clipped.end.distance(DVec2::new(64.0, 10.0)) < 1e-9);
        assert_eq!(clipped.id, segment.id);

        let outside = road(RoadKind::Street, (-100.0, 80.0), (100.0, 80.0), 14.0);
        assert!(clip_to_rect(&outside, &rect).is_none());
    }
}
