use crate::captions::entry::CaptionSet;
use crate::foundation::error::{VideoBookError, VideoBookResult};
use crate::layout::text::{GlyphMetrics, wrapped_rows};
use crate::layout::{EntryRect, LayoutSnapshot, Viewport};
use taffy::prelude::{AvailableSpace, NodeId, Rect, Size};
use taffy::style::{
    Dimension, Display, FlexDirection, JustifyContent, LengthPercentage, LengthPercentageAuto,
    Style,
};

/// Typography and spacing of the caption column.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StackStyle {
    pub font_size: f64,
    /// Line height as a multiple of `font_size`.
    pub line_height: f64,
    /// Space below every caption block.
    pub entry_gap: f64,
    /// Space between the stacked sub-lines of one caption.
    pub line_gap: f64,
    /// Horizontal container padding (each side).
    pub padding_x: f64,
    pub glyph_advance_em: f64,
    pub wide_glyph_advance_em: f64,
}

impl Default for StackStyle {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            line_height: 1.7,
            entry_gap: 20.0,
            line_gap: 8.0,
            padding_x: 24.0,
            glyph_advance_em: 0.55,
            wide_glyph_advance_em: 1.0,
        }
    }
}

impl StackStyle {
    pub fn metrics(&self) -> GlyphMetrics {
        GlyphMetrics {
            font_size: self.font_size,
            advance_em: self.glyph_advance_em,
            wide_advance_em: self.wide_glyph_advance_em,
        }
    }

    pub fn row_height(&self) -> f64 {
        self.font_size * self.line_height
    }

    pub fn validate(&self) -> VideoBookResult<()> {
        let non_negative = [
            ("font_size", self.font_size),
            ("line_height", self.line_height),
            ("entry_gap", self.entry_gap),
            ("line_gap", self.line_gap),
            ("padding_x", self.padding_x),
            ("glyph_advance_em", self.glyph_advance_em),
            ("wide_glyph_advance_em", self.wide_glyph_advance_em),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(VideoBookError::validation(format!(
                    "stack style {name} must be a finite value >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct LineCtx {
    height: f32,
}

fn margin_bottom(px: f64) -> Rect<LengthPercentageAuto> {
    Rect {
        left: LengthPercentageAuto::length(0.0),
        right: LengthPercentageAuto::length(0.0),
        top: LengthPercentageAuto::length(0.0),
        bottom: LengthPercentageAuto::length(px.max(0.0) as f32),
    }
}

/// Lay out the caption column the way the page renders it.
///
/// The container is a vertically centered flex column; each caption is a block of stacked
/// sub-lines. Tops are relative to the container origin and go negative when the content is
/// taller than the container.
pub fn measure_stack(
    captions: &CaptionSet,
    viewport: Viewport,
    style: &StackStyle,
) -> VideoBookResult<LayoutSnapshot> {
    style.validate()?;
    if !viewport.width.is_finite() || !viewport.height.is_finite() {
        return Err(VideoBookError::layout("viewport size must be finite"));
    }

    let width = viewport.width.max(0.0);
    let height = viewport.height.max(0.0);
    let content_width = (width - 2.0 * style.padding_x).max(0.0);
    let metrics = style.metrics();
    let row_height = style.row_height();

    let mut tree = taffy::TaffyTree::<LineCtx>::new();
    let tf = |e: taffy::TaffyError| VideoBookError::layout(e.to_string());

    let mut entry_nodes: Vec<NodeId> = Vec::with_capacity(captions.len());
    for entry in captions {
        let lines = entry.lines();
        let mut line_nodes = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let rows = wrapped_rows(line, content_width, &metrics);
            let gap = if i + 1 < lines.len() {
                style.line_gap
            } else {
                0.0
            };
            let leaf = tree
                .new_leaf_with_context(
                    Style {
                        flex_shrink: 0.0,
                        margin: margin_bottom(gap),
                        ..Style::default()
                    },
                    LineCtx {
                        height: (rows as f64 * row_height) as f32,
                    },
                )
                .map_err(tf)?;
            line_nodes.push(leaf);
        }

        let node = tree
            .new_with_children(
                Style {
                    display: Display::Flex,
                    flex_direction: FlexDirection::Column,
                    flex_shrink: 0.0,
                    margin: margin_bottom(style.entry_gap),
                    ..Style::default()
                },
                &line_nodes,
            )
            .map_err(tf)?;
        entry_nodes.push(node);
    }

    let pad_x = style.padding_x as f32;
    let root = tree
        .new_with_children(
            Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                justify_content: Some(JustifyContent::Center),
                size: Size {
                    width: Dimension::length(width as f32),
                    height: Dimension::length(height as f32),
                },
                padding: Rect {
                    left: LengthPercentage::length(pad_x),
                    right: LengthPercentage::length(pad_x),
                    top: LengthPercentage::length(0.0),
                    bottom: LengthPercentage::length(0.0),
                },
                ..Style::default()
            },
            &entry_nodes,
        )
        .map_err(tf)?;

    let content_width_f32 = content_width as f32;
    tree.compute_layout_with_measure(
        root,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::Definite(height as f32),
        },
        |known_dimensions, _available_space, _node_id, node_context, _style| {
            let intrinsic = node_context
                .as_ref()
                .map(|c| Size {
                    width: content_width_f32,
                    height: c.height,
                })
                .unwrap_or(Size::ZERO);
            known_dimensions.unwrap_or(intrinsic)
        },
    )
    .map_err(tf)?;

    let mut entries = Vec::with_capacity(entry_nodes.len());
    for node in entry_nodes {
        let l = tree.layout(node).map_err(tf)?;
        entries.push(EntryRect {
            top: f64::from(l.location.y),
            height: f64::from(l.size.height),
        });
    }

    Ok(LayoutSnapshot {
        container_height: height,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::entry::CaptionEntry;

    fn set(texts: &[&str]) -> CaptionSet {
        CaptionSet::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| CaptionEntry {
                    start: i as f64,
                    end: i as f64 + 1.0,
                    text: (*t).to_string(),
                })
                .collect(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn single_entry_is_centered_by_the_column() {
        let viewport = Viewport {
            width: 393.0,
            height: 352.0,
        };
        let snap = measure_stack(&set(&["hello"]), viewport, &StackStyle::default()).unwrap();
        assert_eq!(snap.entries.len(), 1);
        let r = snap.entries[0];
        assert!(approx(r.height, 34.0), "{r:?}");
        // Block plus its 20px bottom margin is centered.
        assert!(approx(r.top, (352.0 - 54.0) / 2.0), "{r:?}");
        let t = snap.target_offsets(1)[0].unwrap();
        assert!(approx(t, 10.0), "{t}");
    }

    #[test]
    fn multi_line_entries_stack_with_line_gap() {
        let viewport = Viewport {
            width: 393.0,
            height: 400.0,
        };
        let snap =
            measure_stack(&set(&["one\ntwo", "three"]), viewport, &StackStyle::default()).unwrap();
        let (a, b) = (snap.entries[0], snap.entries[1]);
        assert!(approx(a.height, 34.0 * 2.0 + 8.0), "{a:?}");
        assert!(approx(b.top, a.top + a.height + 20.0), "{a:?} {b:?}");
    }

    #[test]
    fn long_lines_wrap_to_more_rows() {
        let viewport = Viewport {
            width: 100.0,
            height: 400.0,
        };
        let snap = measure_stack(
            &set(&["a fairly long caption line"]),
            viewport,
            &StackStyle::default(),
        )
        .unwrap();
        assert!(snap.entries[0].height > 34.0 * 2.0);
    }

    #[test]
    fn overflowing_content_gets_negative_tops() {
        let viewport = Viewport {
            width: 393.0,
            height: 100.0,
        };
        let many: Vec<&str> = std::iter::repeat_n("line", 10).collect();
        let snap = measure_stack(&set(&many), viewport, &StackStyle::default()).unwrap();
        assert!(snap.entries[0].top < 0.0);
        assert!(snap.entries.windows(2).all(|w| w[0].top < w[1].top));
    }

    #[test]
    fn empty_set_yields_empty_snapshot() {
        let viewport = Viewport {
            width: 393.0,
            height: 352.0,
        };
        let snap = measure_stack(&CaptionSet::default(), viewport, &StackStyle::default()).unwrap();
        assert!(snap.entries.is_empty());
        assert_eq!(snap.container_height, 352.0);
    }

    #[test]
    fn invalid_style_is_rejected() {
        let style = StackStyle {
            font_size: -1.0,
            ..StackStyle::default()
        };
        let viewport = Viewport {
            width: 10.0,
            height: 10.0,
        };
        assert!(measure_stack(&set(&["x"]), viewport, &style).is_err());
    }
}
