//! Property-based tests for the measure/paint protocol and the sizing
//! algorithms.
//!
//! These tests use proptest to generate random geometry and verify the
//! invariants layout depends on.

use folio::element::{Fit, PaintContext};
use folio::image::DecodedImage;
use folio::measure::inline::{partition, InlineItem};
use folio::measure::size_bounds;
use folio::measure::table::{column_bounds, distribute_widths, CellBounds};
use folio::pdf::{ImageXObject, Resources};
use folio::*;
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

/// A fixed-size box that paints nothing of its own.
#[derive(Debug)]
struct Fixed {
    style: StyleBox,
    width: f64,
    height: f64,
}

impl Fixed {
    fn new(width: f64, height: f64) -> Self {
        Self {
            style: StyleBox::default(),
            width,
            height,
        }
    }
}

impl LayoutElement for Fixed {
    fn style(&self) -> &StyleBox {
        &self.style
    }

    fn kind(&self) -> &'static str {
        "Fixed"
    }

    fn measure_content(&self, available: &Rect) -> Result<Fit> {
        Ok(Fit::check(available, self.width, self.height))
    }

    fn paint_content(&self, _ctx: &mut PaintContext<'_>, content_box: &Rect) -> Result<Rect> {
        Ok(Rect::from_top(
            content_box.x,
            content_box.top(),
            self.width,
            self.height,
        ))
    }
}

fn edges() -> impl Strategy<Value = Edges> {
    (0.0..20.0f64, 0.0..20.0f64, 0.0..20.0f64, 0.0..20.0f64)
        .prop_map(|(t, r, b, l)| Edges::new(t, r, b, l))
}

fn h_align() -> impl Strategy<Value = HAlign> {
    prop_oneof![Just(HAlign::Left), Just(HAlign::Center), Just(HAlign::Right)]
}

fn v_align() -> impl Strategy<Value = VAlign> {
    prop_oneof![Just(VAlign::Top), Just(VAlign::Middle), Just(VAlign::Bottom)]
}

fn one_page_doc() -> Document {
    let mut doc = Document::default();
    doc.new_page();
    doc
}

// ============================================================================
// Box Protocol Properties
// ============================================================================

/// Property: the measured box is the content plus padding and border, and
/// shrinking it by the insets gives the content back.
proptest! {
    #[test]
    fn prop_padding_round_trip(
        w in 1.0..200.0f64,
        h in 1.0..200.0f64,
        padding in edges(),
        border in 0.0..4.0f64,
    ) {
        let mut el = Fixed::new(w, h);
        el.style.set_padding(padding).unwrap();
        el.style.set_border(border, Color::BLACK).unwrap();

        let available = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let measured = el.measure(&available).unwrap().rect().unwrap();
        let insets = el.style.insets();
        prop_assert!((measured.width - (w + insets.horizontal())).abs() < TOLERANCE);
        prop_assert!((measured.height - (h + insets.vertical())).abs() < TOLERANCE);

        let content = measured.shrink_edges(&insets);
        prop_assert!((content.width - w).abs() < TOLERANCE);
        prop_assert!((content.height - h).abs() < TOLERANCE);
    }
}

/// Property: a painted box always lies inside the rectangle it was given.
proptest! {
    #[test]
    fn prop_painted_within_available(
        w in 1.0..150.0f64,
        h in 1.0..150.0f64,
        padding in edges(),
        ax in 0.0..100.0f64,
        ay in 0.0..100.0f64,
        aw in 1.0..300.0f64,
        ah in 1.0..300.0f64,
        halign in h_align(),
        valign in v_align(),
    ) {
        let mut el = Fixed::new(w, h);
        el.style.set_padding(padding).unwrap();
        el.style.h_align = halign;
        el.style.v_align = valign;

        let available = Rect::new(ax, ay, aw, ah);
        let mut doc = one_page_doc();
        let fits = el.measure(&available).unwrap().fits();
        let mut ctx = PaintContext::new(&mut doc, 0).unwrap();
        let painted = el.paint(&mut ctx, &available);
        if fits {
            let painted = painted.unwrap();
            prop_assert!(available.contains(&painted), "{} not in {}", painted, available);
        } else {
            prop_assert!(painted.unwrap_err().is_overflow());
        }
    }
}

/// Property: the border is stroked after the background fill, and both
/// come after nothing else the element painted.
proptest! {
    #[test]
    fn prop_border_after_background(
        w in 1.0..100.0f64,
        h in 1.0..100.0f64,
        border in 0.1..5.0f64,
        radius in 0.0..20.0f64,
    ) {
        let mut el = Fixed::new(w, h);
        el.style.set_border(border, Color::BLACK).unwrap();
        el.style.set_border_radius(Corners::uniform(radius)).unwrap();
        el.style.background = Some(Color::rgb8(200, 200, 200));

        let mut doc = one_page_doc();
        let mut ctx = PaintContext::new(&mut doc, 0).unwrap();
        el.paint(&mut ctx, &Rect::new(0.0, 0.0, 300.0, 300.0)).unwrap();

        let content = String::from_utf8(doc.page(0).unwrap().content.decoded().to_vec()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        let fill = lines.iter().position(|l| *l == "f").unwrap();
        let stroke = lines.iter().rposition(|l| *l == "S").unwrap();
        prop_assert!(fill < stroke);
        prop_assert_eq!(lines.last().copied(), Some("Q"));
    }
}

// ============================================================================
// Inline Partition Properties
// ============================================================================

/// Property: lines cover every item in order, respect the available width
/// unless they hold a single oversized item, and are as tall as their
/// tallest item.
proptest! {
    #[test]
    fn prop_inline_lines(
        sizes in prop::collection::vec((1.0..120.0f64, 1.0..40.0f64), 1..40),
        gap in 0.0..10.0f64,
        available in 50.0..400.0f64,
    ) {
        let items: Vec<InlineItem> = sizes.iter().map(|&(w, h)| InlineItem::new(w, h)).collect();
        let lines = partition(&items, gap, available);

        let mut next = 0;
        for line in &lines {
            prop_assert_eq!(line.start, next);
            prop_assert!(!line.is_empty());
            next = line.end;

            let slice = &items[line.start..line.end];
            let width: f64 = slice.iter().map(|i| i.width).sum::<f64>()
                + gap * (slice.len() - 1) as f64;
            prop_assert!((line.width - width).abs() < TOLERANCE);
            prop_assert!(line.width <= available + TOLERANCE || line.len() == 1);

            let height = slice.iter().map(|i| i.height).fold(0.0, f64::max);
            prop_assert_eq!(line.height, height);
        }
        prop_assert_eq!(next, items.len());
    }
}

// ============================================================================
// Table Sizing Properties
// ============================================================================

/// Property: without fill, every column lies between its bounds, the total
/// never exceeds the available width, and the total reaches the available
/// width whenever the maximums allow it.
proptest! {
    #[test]
    fn prop_table_widths_within_bounds(
        cells in prop::collection::vec((0.0..60.0f64, 0.0..120.0f64), 1..6),
        available in 0.0..600.0f64,
    ) {
        let cell_bounds: Vec<CellBounds> = cells
            .iter()
            .enumerate()
            .map(|(col, &(min, extra))| CellBounds {
                col,
                col_span: 1,
                min_width: min,
                max_width: min + extra,
            })
            .collect();
        let bounds = column_bounds(cells.len(), &cell_bounds);

        match distribute_widths(&bounds, available, false) {
            None => prop_assert!(bounds.total_min() > available),
            Some(widths) => {
                let total: f64 = widths.iter().sum();
                prop_assert!(total <= available + TOLERANCE);
                for (i, w) in widths.iter().enumerate() {
                    prop_assert!(*w + TOLERANCE >= bounds.min[i]);
                    prop_assert!(*w <= bounds.max[i] + TOLERANCE);
                }
                let target = bounds.total_max().min(available);
                prop_assert!((total - target).abs() < 1e-3, "{} vs {}", total, target);
            }
        }
    }
}

/// Property: a filling table spends exactly the available width and never
/// squeezes a column below its minimum.
proptest! {
    #[test]
    fn prop_filled_table_spends_available_width(
        (cols, cells) in (1usize..5, 1usize..3).prop_flat_map(|(cols, rows)| {
            (Just(cols), prop::collection::vec((1.0..80.0f64, 1.0..30.0f64), cols * rows))
        }),
        available in 0.0..600.0f64,
    ) {
        let mut table = Table::new(cells.len() / cols, cols).unwrap();
        prop_assert!(table.fill_width);
        for &(w, h) in &cells {
            table.add(Fixed::new(w, h)).unwrap();
        }

        let mut col_min = vec![0.0f64; cols];
        for (cell, area) in table.cells() {
            let min = size_bounds(cell).unwrap().min_width;
            col_min[area.col] = col_min[area.col].max(min);
        }
        let total_min: f64 = col_min.iter().sum();

        match table.layout(available).unwrap() {
            None => prop_assert!(total_min > available),
            Some(layout) => {
                let total: f64 = layout.column_widths.iter().sum();
                prop_assert!((total - available).abs() < 1e-3, "{} vs {}", total, available);
                for (w, min) in layout.column_widths.iter().zip(&col_min) {
                    prop_assert!(*w + TOLERANCE >= *min, "{} below {}", w, min);
                }
            }
        }
    }
}

/// Property: a spanning cell's bounds are covered by the columns it spans.
proptest! {
    #[test]
    fn prop_spanning_cell_is_covered(
        singles in prop::collection::vec(0.0..50.0f64, 3),
        span_min in 0.0..200.0f64,
        span_extra in 0.0..100.0f64,
    ) {
        let mut cells: Vec<CellBounds> = singles
            .iter()
            .enumerate()
            .map(|(col, &w)| CellBounds { col, col_span: 1, min_width: w, max_width: w })
            .collect();
        cells.push(CellBounds {
            col: 0,
            col_span: 3,
            min_width: span_min,
            max_width: span_min + span_extra,
        });
        let bounds = column_bounds(3, &cells);
        prop_assert!(bounds.total_min() + TOLERANCE >= span_min);
        prop_assert!(bounds.total_max() + TOLERANCE >= span_min + span_extra);
        for i in 0..3 {
            prop_assert!(bounds.min[i] <= bounds.max[i]);
        }
    }
}

// ============================================================================
// Resource and Content Stream Properties
// ============================================================================

/// Property: registering equal images any number of times yields one name.
proptest! {
    #[test]
    fn prop_image_dedup(
        w in 1u32..8,
        h in 1u32..8,
        shade in any::<u8>(),
        repeats in 1usize..6,
    ) {
        let rgb = vec![shade; (w * h * 3) as usize];
        let mut resources = Resources::new();
        let mut names = Vec::new();
        for _ in 0..repeats {
            let source = DecodedImage::from_rgb(w, h, rgb.clone(), None).unwrap();
            names.push(resources.register_image(ImageXObject::from_source(&source).unwrap()));
        }
        prop_assert!(names.iter().all(|n| n == "Im1"));
        prop_assert_eq!(resources.xobjects().len(), 1);
    }
}

/// Property: placing elements only ever appends to a page's content.
proptest! {
    #[test]
    fn prop_content_grows_by_appending(
        sizes in prop::collection::vec((10.0..200.0f64, 5.0..80.0f64), 1..12),
    ) {
        let mut doc = Document::default();
        let mut layout = ColumnLayout::single(&doc);
        let mut previous: Vec<u8> = Vec::new();
        for (w, h) in sizes {
            let mut el = Fixed::new(w, h);
            el.style.set_border(1.0, Color::BLACK).unwrap();
            layout.add(&mut doc, Box::new(el)).unwrap();

            let page = layout.placements().last().unwrap().page_index;
            let current = doc.page(page).unwrap().content.decoded().to_vec();
            if page == 0 {
                prop_assert!(current.starts_with(&previous));
                prop_assert!(current.len() > previous.len());
                previous = current;
            }
        }
    }
}
