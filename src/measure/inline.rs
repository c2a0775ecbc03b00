//! Greedy line partitioning for inline content.

use crate::geometry::EPSILON;

/// Measured size of one inline child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineItem {
    pub width: f64,
    pub height: f64,
    /// The line ends right after this item.
    pub forces_break: bool,
}

impl InlineItem {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            forces_break: false,
        }
    }
}

/// One line of inline children, `start..end` into the item list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineLine {
    pub start: usize,
    pub end: usize,
    /// Sum of item widths plus the gaps between them.
    pub width: f64,
    /// Tallest item on the line.
    pub height: f64,
}

impl InlineLine {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Break `items` into lines no wider than `available_width`.
///
/// A line is sealed when the next item would overflow it, or right after an
/// item that forces a break. An item wider than the whole line still gets a
/// line of its own; callers detect that case by comparing widths.
pub fn partition(items: &[InlineItem], gap: f64, available_width: f64) -> Vec<InlineLine> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;
    let mut line_height: f64 = 0.0;

    for (i, item) in items.iter().enumerate() {
        let needed = if i == line_start {
            item.width
        } else {
            gap + item.width
        };
        if i > line_start && line_width + needed > available_width + EPSILON {
            lines.push(InlineLine {
                start: line_start,
                end: i,
                width: line_width,
                height: line_height,
            });
            line_start = i;
            line_width = item.width;
            line_height = item.height;
        } else {
            line_width += needed;
            line_height = line_height.max(item.height);
        }

        if item.forces_break {
            lines.push(InlineLine {
                start: line_start,
                end: i + 1,
                width: line_width,
                height: line_height,
            });
            line_start = i + 1;
            line_width = 0.0;
            line_height = 0.0;
        }
    }

    if line_start < items.len() {
        lines.push(InlineLine {
            start: line_start,
            end: items.len(),
            width: line_width,
            height: line_height,
        });
    }

    lines
}

/// Total height of a sequence of lines.
pub fn total_height(lines: &[InlineLine]) -> f64 {
    lines.iter().map(|l| l.height).sum()
}

/// Widest line.
pub fn max_width(lines: &[InlineLine]) -> f64 {
    lines.iter().map(|l| l.width).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_chunks_in_500pt() {
        let items = vec![InlineItem::new(60.0, 14.0); 10];
        let lines = partition(&items, 0.0, 500.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 8);
        assert_eq!(lines[1].len(), 2);
        assert_eq!(lines[0].width, 480.0);
        assert_eq!(total_height(&lines), 28.0);
    }

    #[test]
    fn line_height_is_tallest_item() {
        let items = [
            InlineItem::new(10.0, 5.0),
            InlineItem::new(10.0, 20.0),
            InlineItem::new(10.0, 8.0),
        ];
        let lines = partition(&items, 0.0, 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].height, 20.0);
    }

    #[test]
    fn forced_breaks_end_the_line() {
        let mut brk = InlineItem::new(0.0, 0.0);
        brk.forces_break = true;
        let items = [InlineItem::new(10.0, 5.0), brk, InlineItem::new(10.0, 5.0)];
        let lines = partition(&items, 0.0, 100.0);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start, lines[0].end), (0, 2));
        assert_eq!((lines[1].start, lines[1].end), (2, 3));
    }

    #[test]
    fn gaps_count_between_items() {
        let items = vec![InlineItem::new(30.0, 10.0); 3];
        let lines = partition(&items, 10.0, 80.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].width, 70.0);
    }

    #[test]
    fn oversized_item_gets_its_own_line() {
        let items = [InlineItem::new(10.0, 5.0), InlineItem::new(200.0, 5.0)];
        let lines = partition(&items, 0.0, 100.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(max_width(&lines), 200.0);
    }

    #[test]
    fn empty_input() {
        assert!(partition(&[], 0.0, 100.0).is_empty());
    }
}
