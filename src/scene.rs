// MIT/Apache2 License

use crate::{
    clip::{ClipOp, ClipSpec, ScratchPath},
    color::Color,
    layout::{GridOrigin, LayoutConstants},
    region::EdgeType,
    surface::{Surface, TextAlign},
};
use euclid::default::{Box2D, Point2D, Size2D};
use log::{debug, trace};
use lyon_geom::LineSegment;
use lyon_path::FillRule;

/// The shear applied to the skewed label: x gains 0.2 per unit of y, y gains
/// 0.3 per unit of x.
const TEXT_SKEW: (f32, f32) = (0.2, 0.3);

/// What a panel draws once its transform and clip are in place.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// The shared demonstration content: gray flood, red diagonal, green
    /// corner circle, right-aligned blue label.
    Clipped,
    /// A left-aligned red label at the panel origin, with no clip change.
    TranslatedText,
    /// A right-aligned dark-gray label drawn through an extra shear.
    SkewedText,
    /// The quick-reject demonstration: probe a candidate rectangle against
    /// the panel clip and flood white or black accordingly.
    QuickReject,
}

/// One panel: where it goes, how it clips, and what it draws.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Translation origin for the panel.
    pub origin: GridOrigin,
    /// Clip operations applied after the translation.
    pub clip: ClipSpec,
    /// The content drawn inside the clip.
    pub content: PanelContent,
}

/// The label strings drawn by the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub clipped: String,
    pub translated: String,
    pub skewed: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            clipped: "Clipping".into(),
            translated: "Translated text".into(),
            skewed: "Skewed and translated text".into(),
        }
    }
}

/// The composition driver: a two-column grid of clipping example panels,
/// rendered onto any [`Surface`].
///
/// The scene owns nothing mutable between passes except one [`ScratchPath`],
/// which is rewound before every use. Each pass floods the surface white and
/// then walks the panel list; every panel runs inside its own
/// [`with_state`](Surface::with_state) scope, so the surface's transform and
/// clip return to their pre-pass values no matter how the pass ends.
#[derive(Debug)]
pub struct ClipScene {
    constants: LayoutConstants,
    labels: Labels,
    scratch: ScratchPath,
}

impl ClipScene {
    /// Create a scene over validated layout constants.
    pub fn new(constants: LayoutConstants) -> crate::Result<Self> {
        constants.validate()?;
        Ok(Self {
            constants,
            labels: Labels::default(),
            scratch: ScratchPath::default(),
        })
    }

    /// Replace the default labels.
    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// The layout constants this scene was built with.
    #[inline]
    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    /// The device size needed to show every panel with a full gutter on all
    /// sides.
    #[must_use]
    pub fn device_size(&self) -> Size2D<f32> {
        let c = &self.constants;
        Size2D::new(
            c.origin(2, 0).x,
            self.reject_origin().y + c.panel_height + c.rect_inset,
        )
    }

    // the probe panel sits one full panel height below the text row, not on
    // a grid row of its own
    fn reject_origin(&self) -> GridOrigin {
        let mut origin = self.constants.origin(0, 4);
        origin.y += self.constants.panel_height;
        origin
    }

    /// The panel list for one pass, rebuilt from the constants every time.
    pub fn panels(&self) -> Vec<Panel> {
        let c = &self.constants;
        vec![
            Panel {
                origin: c.origin(0, 0),
                clip: ClipSpec::plain(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(1, 0),
                clip: ClipSpec::frame(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(0, 1),
                clip: ClipSpec::cutout(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(1, 1),
                clip: ClipSpec::shrunk(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(0, 2),
                clip: ClipSpec::combined(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(1, 2),
                clip: ClipSpec::rounded(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(0, 3),
                clip: ClipSpec::double_inset(c),
                content: PanelContent::Clipped,
            },
            Panel {
                origin: c.origin(1, 4),
                clip: ClipSpec::default(),
                content: PanelContent::TranslatedText,
            },
            Panel {
                origin: c.origin(1, 4),
                clip: ClipSpec::default(),
                content: PanelContent::SkewedText,
            },
            Panel {
                origin: self.reject_origin(),
                clip: ClipSpec::default(),
                content: PanelContent::QuickReject,
            },
        ]
    }

    /// Render one full pass onto a surface.
    pub fn render<S: Surface>(&mut self, surface: &mut S) -> crate::Result {
        let panels = self.panels();
        debug!("rendering {} panels", panels.len());

        surface.draw_color(Color::WHITE)?;
        for panel in panels.iter() {
            self.draw_panel(surface, panel)?;
        }
        Ok(())
    }

    fn draw_panel<S: Surface>(&mut self, surface: &mut S, panel: &Panel) -> crate::Result {
        trace!(
            "panel {:?} at ({}, {})",
            panel.content,
            panel.origin.x,
            panel.origin.y
        );
        let ClipScene {
            constants,
            labels,
            scratch,
        } = self;
        let constants: &LayoutConstants = constants;

        surface.with_state(|s| {
            s.translate(panel.origin.x, panel.origin.y)?;
            if let PanelContent::SkewedText = panel.content {
                s.skew(TEXT_SKEW.0, TEXT_SKEW.1)?;
            }
            apply_clip_spec(s, &panel.clip, scratch)?;

            match panel.content {
                PanelContent::Clipped => draw_clipped_rectangle(s, constants, &labels.clipped),
                PanelContent::TranslatedText => {
                    s.set_fill(Color::RED)?;
                    s.set_text_size(constants.text_size)?;
                    s.set_text_align(TextAlign::Left)?;
                    draw_label(s, &labels.translated, Point2D::zero())
                }
                PanelContent::SkewedText => {
                    s.set_fill(Color::DARK_GRAY)?;
                    s.set_text_size(constants.text_size)?;
                    s.set_text_align(TextAlign::Right)?;
                    draw_label(s, &labels.skewed, Point2D::zero())
                }
                PanelContent::QuickReject => {
                    draw_reject_probe(s, constants, &reject_candidate(constants))
                }
            }
        })
    }
}

/// Apply every operation of a clip spec to a surface, in order.
///
/// Compound paths are built through the scratch builder, which is rewound
/// before each use.
pub fn apply_clip_spec<S: Surface>(
    surface: &mut S,
    spec: &ClipSpec,
    scratch: &mut ScratchPath,
) -> crate::Result {
    for op in spec.ops() {
        match op {
            ClipOp::SetRect(rect) | ClipOp::IntersectRect(rect) => surface.clip_rect(rect)?,
            ClipOp::SubtractRect(rect) => surface.clip_out_rect(rect)?,
            ClipOp::SubtractPath(shapes) => {
                scratch.rewind();
                for shape in shapes.iter() {
                    scratch.stage_shape(shape);
                }
                surface.clip_out_path(&scratch.build(), FillRule::NonZero)?;
            }
            ClipOp::UnionPath(shapes) => {
                scratch.rewind();
                for shape in shapes.iter() {
                    scratch.stage_shape(shape);
                }
                surface.clip_path(&scratch.build(), FillRule::NonZero)?;
            }
            ClipOp::RoundRect {
                rect,
                radius_x,
                radius_y,
            } => {
                scratch.rewind();
                scratch.stage_rounded(rect, *radius_x, *radius_y);
                surface.clip_path(&scratch.build(), FillRule::NonZero)?;
            }
        }
    }
    Ok(())
}

/// Draw the shared demonstration content into the active transform and clip.
///
/// In order: clip to the panel bounds, flood the clip gray, a red diagonal
/// from corner to corner, a green circle resting on the bottom-left, and the
/// label right-aligned against the panel's right edge. Everything lands only
/// where the active clip allows.
pub fn draw_clipped_rectangle<S: Surface>(
    surface: &mut S,
    c: &LayoutConstants,
    label: &str,
) -> crate::Result {
    let bounds = c.panel_bounds();
    surface.clip_rect(&bounds)?;
    surface.draw_color(Color::GRAY)?;

    surface.set_stroke(Color::RED)?;
    surface.set_line_width(c.stroke_width)?;
    surface.draw_line(LineSegment {
        from: bounds.min,
        to: bounds.max,
    })?;

    surface.set_fill(Color::GREEN)?;
    surface.fill_circle(
        Point2D::new(c.circle_radius, bounds.max.y - c.circle_radius),
        c.circle_radius,
    )?;

    surface.set_fill(Color::BLUE)?;
    surface.set_text_size(c.text_size)?;
    surface.set_text_align(TextAlign::Right)?;
    draw_label(surface, label, Point2D::new(bounds.max.x, c.text_offset))
}

/// Draw a label if the surface supports text; otherwise skip it quietly.
fn draw_label<S: Surface>(surface: &mut S, text: &str, origin: Point2D<f32>) -> crate::Result {
    if surface.features().text {
        surface.draw_text(text, origin)
    } else {
        debug!("surface has no text support; skipping label {:?}", text);
        Ok(())
    }
}

/// The candidate rectangle the probe panel tests: from the middle of the
/// panel bounds out to double the bounds, straddling the clip's bottom-right
/// corner.
fn reject_candidate(c: &LayoutConstants) -> Box2D<f32> {
    let bounds = c.panel_bounds();
    Box2D::new(
        Point2D::new(bounds.max.x / 2.0, bounds.max.y / 2.0),
        Point2D::new(bounds.max.x * 2.0, bounds.max.y * 2.0),
    )
}

/// Clip to the panel bounds, probe the candidate, and flood white when the
/// candidate is certainly invisible or black (plus the candidate itself)
/// when it may be visible.
fn draw_reject_probe<S: Surface>(
    surface: &mut S,
    c: &LayoutConstants,
    candidate: &Box2D<f32>,
) -> crate::Result {
    surface.clip_rect(&c.panel_bounds())?;
    let edge = if surface.features().antialiasing {
        EdgeType::AntiAliased
    } else {
        EdgeType::Aliased
    };
    if surface.quick_reject(candidate, edge)? {
        surface.draw_color(Color::WHITE)
    } else {
        surface.draw_color(Color::BLACK)?;
        surface.set_fill(Color::RED)?;
        surface.fill_rectangle(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::surface::SurfaceFeatures;
    use lyon_path::Path;

    /// A surface that draws nothing and only tracks state discipline.
    #[derive(Debug, Default)]
    struct CountingSurface {
        depth: i32,
        saves: usize,
        underflowed: bool,
        floods: Vec<Color>,
        filled_rects: usize,
        text_draws: usize,
        reject_answer: bool,
    }

    impl Surface for CountingSurface {
        fn features(&self) -> SurfaceFeatures {
            SurfaceFeatures {
                text: false,
                antialiasing: false,
            }
        }
        fn set_stroke(&mut self, _: Color) -> crate::Result {
            Ok(())
        }
        fn set_fill(&mut self, _: Color) -> crate::Result {
            Ok(())
        }
        fn set_line_width(&mut self, _: f32) -> crate::Result {
            Ok(())
        }
        fn draw_color(&mut self, color: Color) -> crate::Result {
            self.floods.push(color);
            Ok(())
        }
        fn save(&mut self) -> crate::Result {
            self.depth += 1;
            self.saves += 1;
            Ok(())
        }
        fn restore(&mut self) -> crate::Result {
            self.depth -= 1;
            if self.depth < 0 {
                self.underflowed = true;
            }
            Ok(())
        }
        fn translate(&mut self, _: f32, _: f32) -> crate::Result {
            Ok(())
        }
        fn skew(&mut self, _: f32, _: f32) -> crate::Result {
            Ok(())
        }
        fn clip_rect(&mut self, _: &Box2D<f32>) -> crate::Result {
            Ok(())
        }
        fn clip_out_rect(&mut self, _: &Box2D<f32>) -> crate::Result {
            Ok(())
        }
        fn clip_path(&mut self, _: &Path, _: FillRule) -> crate::Result {
            Ok(())
        }
        fn clip_out_path(&mut self, _: &Path, _: FillRule) -> crate::Result {
            Ok(())
        }
        fn draw_line(&mut self, _: LineSegment<f32>) -> crate::Result {
            Ok(())
        }
        fn fill_rectangle(&mut self, _: &Box2D<f32>) -> crate::Result {
            self.filled_rects += 1;
            Ok(())
        }
        fn fill_circle(&mut self, _: Point2D<f32>, _: f32) -> crate::Result {
            Ok(())
        }
        fn draw_text(&mut self, _: &str, _: Point2D<f32>) -> crate::Result {
            self.text_draws += 1;
            Ok(())
        }
        fn quick_reject(&self, _: &Box2D<f32>, _: EdgeType) -> crate::Result<bool> {
            Ok(self.reject_answer)
        }
    }

    #[test]
    fn passes_balance_their_saves() {
        let mut scene = ClipScene::new(LayoutConstants::default()).unwrap();
        let mut surface = CountingSurface::default();
        scene.render(&mut surface).unwrap();

        assert_eq!(surface.saves, scene.panels().len());
        assert_eq!(surface.depth, 0);
        assert!(!surface.underflowed);
    }

    #[test]
    fn with_state_restores_on_the_error_path() {
        let mut surface = CountingSurface::default();
        let result: crate::Result<()> =
            surface.with_state(|_| Err(Error::StaticMsg("panel went sideways")));
        assert!(result.is_err());
        assert_eq!(surface.depth, 0);
        assert_eq!(surface.saves, 1);
    }

    #[test]
    fn text_free_surfaces_still_render() {
        let mut scene = ClipScene::new(LayoutConstants::default()).unwrap();
        let mut surface = CountingSurface::default();
        scene.render(&mut surface).unwrap();
        assert_eq!(surface.text_draws, 0);
    }

    #[test]
    fn probe_panel_follows_the_probe_answer() {
        let c = LayoutConstants::default();
        let candidate = reject_candidate(&c);

        let mut maybe_visible = CountingSurface::default();
        maybe_visible.reject_answer = false;
        draw_reject_probe(&mut maybe_visible, &c, &candidate).unwrap();
        assert_eq!(maybe_visible.floods, vec![Color::BLACK]);
        assert_eq!(maybe_visible.filled_rects, 1);

        let mut invisible = CountingSurface::default();
        invisible.reject_answer = true;
        draw_reject_probe(&mut invisible, &c, &candidate).unwrap();
        assert_eq!(invisible.floods, vec![Color::WHITE]);
        assert_eq!(invisible.filled_rects, 0);
    }

    #[test]
    fn the_grid_places_ten_panels() {
        let scene = ClipScene::new(LayoutConstants::default()).unwrap();
        let c = *scene.constants();
        let panels = scene.panels();
        assert_eq!(panels.len(), 10);

        // both label panels share the second column of the text row
        assert_eq!(panels[7].origin, c.origin(1, 4));
        assert_eq!(panels[8].origin, c.origin(1, 4));
        assert!(panels[7].clip.is_empty());

        // the probe panel hangs one panel height below the text row
        assert_eq!(
            panels[9].origin.y,
            c.origin(0, 3).y + c.rect_inset + 2.0 * c.panel_height
        );

        // every panel fits the advertised device size
        let size = scene.device_size();
        for panel in panels.iter() {
            assert!(panel.origin.x + c.panel_width <= size.width);
            assert!(panel.origin.y + c.panel_height <= size.height);
        }
    }
}
