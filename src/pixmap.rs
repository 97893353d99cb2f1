// MIT/Apache2 License

use crate::{
    color::Color,
    error::Error,
    region::{rect_contains, EdgeType, Polygon, Region},
    surface::{Surface, SurfaceFeatures, TextAlign},
    util::approx_eq,
};
use euclid::default::{Box2D, Point2D, Transform2D};
use log::warn;
use lyon_geom::LineSegment;
use lyon_path::{FillRule, Path};

/// Tolerance used when flattening curved clip paths into polygons.
const FLATTEN_TOLERANCE: f32 = 0.1;
/// Label glyph cells advance this fraction of the text size.
const GLYPH_ADVANCE: f32 = 0.6;
/// Fraction of the text size that sits above the baseline.
const GLYPH_ASCENT: f32 = 0.75;
/// Fraction of a glyph cell left empty on each side.
const GLYPH_GAP: f32 = 0.1;

#[derive(Debug, Clone)]
struct State {
    transform: Transform2D<f32>,
    clip: Region,
}

/// A CPU pixel buffer that implements [`Surface`].
///
/// Every drawing operation samples pixel centers: a center is first tested
/// against the device-space clip region, then pulled back through the inverse
/// of the current transform and tested against the shape being drawn. That
/// keeps clipping exact for rectangles and within flattening tolerance for
/// paths, with no antialiasing.
///
/// There is no glyph rasterizer; labels are drawn as one filled cell per
/// character, so the alignment, baseline placement, and transform of text
/// stay observable even though the letterforms are not. Hosts with a real
/// text stack provide their own `Surface` and ignore this one.
#[derive(Debug)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    state: State,
    saved: Vec<State>,
    stroke: Color,
    fill: Color,
    line_width: f32,
    text_size: f32,
    text_align: TextAlign,
}

#[inline]
fn transformed_bbox(transform: &Transform2D<f32>, rect: &Box2D<f32>) -> Box2D<f32> {
    let corners = [
        transform.transform_point(rect.min),
        transform.transform_point(Point2D::new(rect.max.x, rect.min.y)),
        transform.transform_point(rect.max),
        transform.transform_point(Point2D::new(rect.min.x, rect.max.y)),
    ];
    let mut bounds = Box2D::new(corners[0], corners[0]);
    for &corner in corners.iter().skip(1) {
        bounds.min.x = bounds.min.x.min(corner.x);
        bounds.min.y = bounds.min.y.min(corner.y);
        bounds.max.x = bounds.max.x.max(corner.x);
        bounds.max.y = bounds.max.y.max(corner.y);
    }
    bounds
}

/// A transform that keeps rectangles rectangular.
#[inline]
fn is_axis_aligned(transform: &Transform2D<f32>) -> bool {
    approx_eq(transform.m12, 0.0) && approx_eq(transform.m21, 0.0)
}

fn quad_polygon(transform: &Transform2D<f32>, rect: &Box2D<f32>) -> Polygon {
    Polygon::from_points(
        vec![
            transform.transform_point(rect.min),
            transform.transform_point(Point2D::new(rect.max.x, rect.min.y)),
            transform.transform_point(rect.max),
            transform.transform_point(Point2D::new(rect.min.x, rect.max.y)),
        ],
        FillRule::NonZero,
    )
}

impl Pixmap {
    /// Create a pixmap of the given size, fully transparent, with an
    /// identity transform and a full-surface clip.
    pub fn new(width: u32, height: u32) -> Self {
        let device = Box2D::new(
            Point2D::zero(),
            Point2D::new(width as f32, height as f32),
        );
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; (width * height) as usize],
            state: State {
                transform: Transform2D::identity(),
                clip: Region::new(device),
            },
            saved: Vec::new(),
            stroke: Color::BLACK,
            fill: Color::BLACK,
            line_width: 1.0,
            text_size: 16.0,
            text_align: TextAlign::Left,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// One pixel, in RGBA order, or `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// The current clip region, in device space.
    #[inline]
    pub fn clip_region(&self) -> &Region {
        &self.state.clip
    }

    /// Hand out the pixel buffer as flat RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in self.pixels {
            bytes.extend_from_slice(&pixel);
        }
        bytes
    }

    /// Fill every clipped pixel center inside `device_bbox` that passes
    /// `test` with a color.
    fn paint_device<F: Fn(Point2D<f32>) -> bool>(
        &mut self,
        device_bbox: Box2D<f32>,
        color: Color,
        test: F,
    ) {
        let Pixmap {
            width,
            height,
            pixels,
            state,
            ..
        } = self;

        let clip_bounds = state.clip.bounds();
        let x0 = device_bbox.min.x.max(clip_bounds.min.x).max(0.0).floor() as i64;
        let y0 = device_bbox.min.y.max(clip_bounds.min.y).max(0.0).floor() as i64;
        let x1 = device_bbox
            .max
            .x
            .min(clip_bounds.max.x)
            .min(*width as f32)
            .ceil() as i64;
        let y1 = device_bbox
            .max
            .y
            .min(clip_bounds.max.y)
            .min(*height as f32)
            .ceil() as i64;

        let rgba = color.to_rgba8();
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point2D::new(x as f32 + 0.5, y as f32 + 0.5);
                if state.clip.contains(center) && test(center) {
                    pixels[(y as u32 * *width + x as u32) as usize] = rgba;
                }
            }
        }
    }

    /// Like `paint_device`, but for a shape described in the current local
    /// space: the bounding box rides the transform forward, the sample
    /// points ride its inverse back.
    fn paint_local<F: Fn(Point2D<f32>) -> bool>(
        &mut self,
        local_bounds: Box2D<f32>,
        color: Color,
        test: F,
    ) {
        let transform = self.state.transform;
        let inverse = match transform.inverse() {
            Some(inverse) => inverse,
            None => {
                warn!("current transform is singular; nothing drawn");
                return;
            }
        };
        let device_bbox = transformed_bbox(&transform, &local_bounds);
        self.paint_device(device_bbox, color, move |p| {
            test(inverse.transform_point(p))
        });
    }
}

impl Surface for Pixmap {
    fn features(&self) -> SurfaceFeatures {
        SurfaceFeatures {
            text: true,
            antialiasing: false,
        }
    }

    fn set_stroke(&mut self, color: Color) -> crate::Result {
        self.stroke = color;
        Ok(())
    }

    fn set_fill(&mut self, color: Color) -> crate::Result {
        self.fill = color;
        Ok(())
    }

    fn set_line_width(&mut self, width: f32) -> crate::Result {
        self.line_width = width;
        Ok(())
    }

    fn set_text_size(&mut self, size: f32) -> crate::Result {
        self.text_size = size;
        Ok(())
    }

    fn set_text_align(&mut self, align: TextAlign) -> crate::Result {
        self.text_align = align;
        Ok(())
    }

    fn draw_color(&mut self, color: Color) -> crate::Result {
        let bounds = self.state.clip.bounds();
        self.paint_device(bounds, color, |_| true);
        Ok(())
    }

    fn save(&mut self) -> crate::Result {
        self.saved.push(self.state.clone());
        Ok(())
    }

    fn restore(&mut self) -> crate::Result {
        self.state = self.saved.pop().ok_or(Error::UnbalancedRestore)?;
        Ok(())
    }

    fn translate(&mut self, tx: f32, ty: f32) -> crate::Result {
        self.state.transform = Transform2D::translation(tx, ty).then(&self.state.transform);
        Ok(())
    }

    fn skew(&mut self, sx: f32, sy: f32) -> crate::Result {
        let shear = Transform2D::new(1.0, sy, sx, 1.0, 0.0, 0.0);
        self.state.transform = shear.then(&self.state.transform);
        Ok(())
    }

    fn clip_rect(&mut self, rect: &Box2D<f32>) -> crate::Result {
        let transform = self.state.transform;
        if is_axis_aligned(&transform) {
            let a = transform.transform_point(rect.min);
            let b = transform.transform_point(rect.max);
            self.state.clip.intersect_rect(Box2D::new(
                Point2D::new(a.x.min(b.x), a.y.min(b.y)),
                Point2D::new(a.x.max(b.x), a.y.max(b.y)),
            ));
        } else {
            // the rectangle is a parallelogram in device space
            self.state
                .clip
                .intersect_polygon(quad_polygon(&transform, rect));
        }
        Ok(())
    }

    fn clip_out_rect(&mut self, rect: &Box2D<f32>) -> crate::Result {
        let transform = self.state.transform;
        if is_axis_aligned(&transform) {
            let a = transform.transform_point(rect.min);
            let b = transform.transform_point(rect.max);
            self.state.clip.subtract_rect(Box2D::new(
                Point2D::new(a.x.min(b.x), a.y.min(b.y)),
                Point2D::new(a.x.max(b.x), a.y.max(b.y)),
            ));
        } else {
            self.state
                .clip
                .subtract_polygon(quad_polygon(&transform, rect));
        }
        Ok(())
    }

    fn clip_path(&mut self, path: &Path, rule: FillRule) -> crate::Result {
        let poly =
            Polygon::from_path(path, rule, FLATTEN_TOLERANCE).transformed(&self.state.transform);
        self.state.clip.intersect_polygon(poly);
        Ok(())
    }

    fn clip_out_path(&mut self, path: &Path, rule: FillRule) -> crate::Result {
        let poly =
            Polygon::from_path(path, rule, FLATTEN_TOLERANCE).transformed(&self.state.transform);
        self.state.clip.subtract_polygon(poly);
        Ok(())
    }

    fn draw_line(&mut self, line: LineSegment<f32>) -> crate::Result {
        let half_width = self.line_width / 2.0;
        let stroke = self.stroke;
        let bounds = Box2D::new(
            Point2D::new(
                line.from.x.min(line.to.x) - half_width,
                line.from.y.min(line.to.y) - half_width,
            ),
            Point2D::new(
                line.from.x.max(line.to.x) + half_width,
                line.from.y.max(line.to.y) + half_width,
            ),
        );
        let degenerate = approx_eq(line.to_vector().square_length(), 0.0);
        self.paint_local(bounds, stroke, move |p| {
            let distance = if degenerate {
                (p - line.from).length()
            } else {
                line.distance_to_point(p)
            };
            distance <= half_width
        });
        Ok(())
    }

    fn fill_rectangle(&mut self, rect: &Box2D<f32>) -> crate::Result {
        let rect = *rect;
        let fill = self.fill;
        self.paint_local(rect, fill, move |p| rect_contains(&rect, p));
        Ok(())
    }

    fn fill_circle(&mut self, center: Point2D<f32>, radius: f32) -> crate::Result {
        let fill = self.fill;
        let bounds = Box2D::new(
            Point2D::new(center.x - radius, center.y - radius),
            Point2D::new(center.x + radius, center.y + radius),
        );
        self.paint_local(bounds, fill, move |p| {
            (p - center).square_length() <= radius * radius
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, origin: Point2D<f32>) -> crate::Result {
        let advance = GLYPH_ADVANCE * self.text_size;
        let count = text.chars().count();
        let total = advance * count as f32;
        let start_x = match self.text_align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - total / 2.0,
            TextAlign::Right => origin.x - total,
        };
        let top = origin.y - GLYPH_ASCENT * self.text_size;
        let fill = self.fill;

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let cell = Box2D::new(
                Point2D::new(start_x + (i as f32 + GLYPH_GAP) * advance, top),
                Point2D::new(start_x + (i as f32 + 1.0 - GLYPH_GAP) * advance, origin.y),
            );
            self.paint_local(cell, fill, move |p| rect_contains(&cell, p));
        }
        Ok(())
    }

    fn quick_reject(&self, rect: &Box2D<f32>, edge: EdgeType) -> crate::Result<bool> {
        let device_bbox = transformed_bbox(&self.state.transform, rect);
        Ok(self.state.clip.quick_reject(&device_bbox, edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipOp, ClipSpec, ScratchPath};
    use crate::layout::LayoutConstants;
    use crate::scene::apply_clip_spec;
    use std::iter::FromIterator;

    fn panel_box(l: f32, t: f32, r: f32, b: f32) -> Box2D<f32> {
        Box2D::new(Point2D::new(l, t), Point2D::new(r, b))
    }

    /// Sample the clip region over a coarse grid of pixel centers.
    fn sample(region: &Region) -> Vec<bool> {
        let mut samples = Vec::new();
        for y in 0..30 {
            for x in 0..30 {
                samples.push(region.contains(Point2D::new(
                    x as f32 * 3.0 + 0.5,
                    y as f32 * 3.0 + 0.5,
                )));
            }
        }
        samples
    }

    #[test]
    fn saves_and_restores_round_trip() {
        let mut pm = Pixmap::new(90, 90);
        let full = pm.clip_region().bounds();

        pm.save().unwrap();
        pm.clip_rect(&panel_box(10.0, 10.0, 20.0, 20.0)).unwrap();
        assert_ne!(pm.clip_region().bounds(), full);
        pm.restore().unwrap();
        assert_eq!(pm.clip_region().bounds(), full);

        // one more restore has nothing left to pop
        match pm.restore() {
            Err(Error::UnbalancedRestore) => {}
            other => panic!("expected UnbalancedRestore, got {:?}", other),
        }
    }

    #[test]
    fn translation_moves_drawing() {
        let mut pm = Pixmap::new(40, 40);
        pm.translate(10.0, 10.0).unwrap();
        pm.set_fill(Color::RED).unwrap();
        pm.fill_rectangle(&panel_box(0.0, 0.0, 5.0, 5.0)).unwrap();

        assert_eq!(pm.pixel(12, 12).unwrap(), Color::RED.to_rgba8());
        assert_eq!(pm.pixel(2, 2).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn drawing_outside_the_clip_is_silently_dropped() {
        let mut pm = Pixmap::new(40, 40);
        pm.clip_rect(&panel_box(0.0, 0.0, 10.0, 10.0)).unwrap();
        pm.set_fill(Color::GREEN).unwrap();
        // far larger than the clip; no error, just fewer pixels
        pm.fill_rectangle(&panel_box(0.0, 0.0, 40.0, 40.0)).unwrap();

        assert_eq!(pm.pixel(5, 5).unwrap(), Color::GREEN.to_rgba8());
        assert_eq!(pm.pixel(15, 5).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn sheared_rect_clips_become_polygons() {
        let mut pm = Pixmap::new(100, 100);
        pm.skew(0.5, 0.0).unwrap();
        pm.clip_rect(&panel_box(0.0, 0.0, 20.0, 20.0)).unwrap();

        // (25, 15) lies inside the sheared parallelogram: 25 - 0.5*15 = 17.5
        assert!(pm.clip_region().contains(Point2D::new(25.0, 15.0)));
        // (25, 5) does not: 25 - 0.5*5 = 22.5
        assert!(!pm.clip_region().contains(Point2D::new(25.0, 5.0)));
    }

    #[test]
    fn clip_specs_are_idempotent() {
        let c = LayoutConstants::default();
        let specs = vec![
            ClipSpec::plain(&c),
            ClipSpec::frame(&c),
            ClipSpec::cutout(&c),
            ClipSpec::shrunk(&c),
            ClipSpec::combined(&c),
            ClipSpec::rounded(&c),
            ClipSpec::double_inset(&c),
        ];
        let mut scratch = ScratchPath::default();

        for spec in specs {
            let mut pm = Pixmap::new(90, 90);
            apply_clip_spec(&mut pm, &spec, &mut scratch).unwrap();
            let once = sample(pm.clip_region());
            apply_clip_spec(&mut pm, &spec, &mut scratch).unwrap();
            let twice = sample(pm.clip_region());
            assert_eq!(once, twice, "reapplying {:?} changed the region", spec);
        }
    }

    #[test]
    fn frame_spec_excludes_the_center() {
        let c = LayoutConstants::default();
        let mut pm = Pixmap::new(90, 90);
        let mut scratch = ScratchPath::default();
        apply_clip_spec(&mut pm, &ClipSpec::frame(&c), &mut scratch).unwrap();

        let region = pm.clip_region();
        assert!(!region.contains(Point2D::new(45.0, 45.0)));
        assert!(region.contains(Point2D::new(24.0, 24.0)));
        assert!(region.contains(Point2D::new(24.0, 66.0)));
    }

    #[test]
    fn shrunk_spec_spares_the_top_left() {
        let c = LayoutConstants::default();
        let mut pm = Pixmap::new(90, 90);
        let mut scratch = ScratchPath::default();
        apply_clip_spec(&mut pm, &ClipSpec::shrunk(&c), &mut scratch).unwrap();

        let region = pm.clip_region();
        // the shrunken margin near the bottom-right corner
        assert!(!region.contains(Point2D::new(70.0, 70.0)));
        assert!(region.contains(Point2D::new(45.0, 45.0)));
        // the top-left corner is untouched by the shrink
        assert!(region.contains(Point2D::new(2.0, 2.0)));
    }

    #[test]
    fn legacy_and_modern_intersections_agree() {
        let c = LayoutConstants::default();
        let shrunk = Box2D::new(
            Point2D::zero(),
            Point2D::new(
                c.panel_width - c.small_rect_offset,
                c.panel_height - c.small_rect_offset,
            ),
        );
        // an explicit base rect followed by an intersection...
        let two_step = ClipSpec::from_iter(vec![
            ClipOp::SetRect(c.panel_bounds()),
            ClipOp::IntersectRect(shrunk),
        ]);
        // ...and the single-clip expression of the same region
        let one_step = ClipSpec::from_iter(vec![ClipOp::SetRect(shrunk)]);

        let mut scratch = ScratchPath::default();
        let mut a = Pixmap::new(90, 90);
        apply_clip_spec(&mut a, &two_step, &mut scratch).unwrap();
        let mut b = Pixmap::new(90, 90);
        apply_clip_spec(&mut b, &one_step, &mut scratch).unwrap();

        assert_eq!(sample(a.clip_region()), sample(b.clip_region()));
    }

    #[test]
    fn combined_spec_is_the_union_of_its_shapes() {
        let c = LayoutConstants::default();
        let mut pm = Pixmap::new(90, 90);
        let mut scratch = ScratchPath::default();
        apply_clip_spec(&mut pm, &ClipSpec::combined(&c), &mut scratch).unwrap();

        let region = pm.clip_region();
        // inside the disc only
        assert!(region.contains(Point2D::new(25.0, 25.0)));
        // inside the bar only
        assert!(region.contains(Point2D::new(45.0, 75.0)));
        // outside both shapes
        assert!(!region.contains(Point2D::new(80.0, 20.0)));
        assert!(!region.contains(Point2D::new(5.0, 85.0)));
    }

    #[test]
    fn cutout_spec_removes_the_disc() {
        let c = LayoutConstants::default();
        let mut pm = Pixmap::new(90, 90);
        let mut scratch = ScratchPath::default();
        apply_clip_spec(&mut pm, &ClipSpec::cutout(&c), &mut scratch).unwrap();

        let region = pm.clip_region();
        assert!(!region.contains(Point2D::new(30.0, 60.0)));
        assert!(region.contains(Point2D::new(80.0, 20.0)));
    }

    #[test]
    fn quick_reject_sees_through_the_transform() {
        let mut pm = Pixmap::new(90, 90);
        pm.clip_rect(&panel_box(0.0, 0.0, 90.0, 90.0)).unwrap();

        let outside = panel_box(91.0, 91.0, 180.0, 180.0);
        assert!(pm.quick_reject(&outside, EdgeType::Aliased).unwrap());

        // translating the candidate back over the clip un-rejects it
        pm.translate(-50.0, -50.0).unwrap();
        assert!(!pm.quick_reject(&outside, EdgeType::Aliased).unwrap());
    }

    fn render_default_scene() -> Pixmap {
        let mut scene = crate::scene::ClipScene::new(LayoutConstants::default()).unwrap();
        let size = scene.device_size();
        let mut pm = Pixmap::new(size.width.ceil() as u32, size.height.ceil() as u32);
        scene.render(&mut pm).unwrap();
        pm
    }

    /// Scan a pixel window for at least one pixel of the given color.
    fn window_has_color(pm: &Pixmap, x0: u32, y0: u32, x1: u32, y1: u32, color: Color) -> bool {
        let rgba = color.to_rgba8();
        for y in y0..y1 {
            for x in x0..x1 {
                if pm.pixel(x, y) == Some(rgba) {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn full_scene_spot_checks() {
        let pm = render_default_scene();
        let white = Color::WHITE.to_rgba8();
        let gray = Color::GRAY.to_rgba8();
        let red = Color::RED.to_rgba8();

        // the gutters take the background flood
        assert_eq!(pm.pixel(200, 2).unwrap(), white);
        assert_eq!(pm.pixel(102, 50).unwrap(), white);

        // plain panel at (8, 8): diagonal, gray flood, circle, label; the
        // diagonal is probed past the circle, which is drawn over it
        assert_eq!(pm.pixel(78, 78).unwrap(), red);
        assert_eq!(pm.pixel(78, 48).unwrap(), gray);
        assert_eq!(pm.pixel(38, 68).unwrap(), Color::GREEN.to_rgba8());
        assert_eq!(pm.pixel(89, 19).unwrap(), Color::BLUE.to_rgba8());

        // frame panel at (106, 8): carved-out middle, visible ring
        assert_eq!(pm.pixel(151, 53).unwrap(), white);
        assert_eq!(pm.pixel(176, 53).unwrap(), gray);

        // cutout panel at (8, 106): the disc is gone, the rest is not
        assert_eq!(pm.pixel(38, 166).unwrap(), white);
        assert_eq!(pm.pixel(88, 146).unwrap(), gray);

        // shrunk panel at (106, 106): bottom-right margin gone, the
        // upper stretch of the diagonal kept
        assert_eq!(pm.pixel(176, 176).unwrap(), white);
        assert_eq!(pm.pixel(126, 126).unwrap(), red);

        // combined panel at (8, 204): disc interior kept, far corner dropped
        assert_eq!(pm.pixel(63, 229).unwrap(), gray);
        assert_eq!(pm.pixel(88, 224).unwrap(), white);

        // rounded panel at (106, 204): square corner clipped off
        assert_eq!(pm.pixel(116, 214).unwrap(), white);
        assert_eq!(pm.pixel(166, 249).unwrap(), gray);

        // double-inset panel at (8, 302)
        assert_eq!(pm.pixel(18, 312).unwrap(), white);
        assert_eq!(pm.pixel(53, 332).unwrap(), gray);

        // the translated label sits above the text row in the second column
        assert!(window_has_color(&pm, 106, 380, 204, 400, Color::RED));
        // the skewed label shears up and to the left of the same origin
        assert!(window_has_color(&pm, 0, 350, 106, 400, Color::DARK_GRAY));

        // the probe panel at (8, 490): straddling candidate, so black flood
        // plus the candidate itself
        assert_eq!(pm.pixel(20, 500).unwrap(), Color::BLACK.to_rgba8());
        assert_eq!(pm.pixel(58, 540).unwrap(), red);
    }

    #[test]
    fn passes_are_deterministic() {
        // the scratch path carries no geometry between passes, so a second
        // render of the same scene is pixel-identical to the first
        let mut scene = crate::scene::ClipScene::new(LayoutConstants::default()).unwrap();
        let size = scene.device_size();
        let (w, h) = (size.width.ceil() as u32, size.height.ceil() as u32);

        let mut first = Pixmap::new(w, h);
        scene.render(&mut first).unwrap();
        let mut second = Pixmap::new(w, h);
        scene.render(&mut second).unwrap();

        assert_eq!(first.into_rgba(), second.into_rgba());
    }
}
