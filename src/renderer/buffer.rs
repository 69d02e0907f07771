//! Cell buffer - a width x height grid of characters.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

use crate::layout::{grapheme_width, Bounds};

/// Placeholder for the second cell of a wide character.
const CONTINUATION: char = '\0';

#[derive(Clone, PartialEq, Eq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl CellBuffer {
    /// Blank buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Full-buffer rectangle.
    pub fn area(&self) -> Bounds {
        Bounds {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Whether the cell is the trailing half of a wide character.
    pub fn is_continuation(&self, x: u16, y: u16) -> bool {
        self.get(x, y) == Some(CONTINUATION)
    }

    pub fn set(&mut self, x: u16, y: u16, c: char) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = c;
        }
    }

    /// Write `text` from (x, y) rightwards, clipped to `clip`.
    ///
    /// Text is laid out per grapheme cluster; a cell keeps the cluster's
    /// leading character. Returns the number of cells advanced. A wide
    /// cluster that would straddle the clip edge is dropped.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, clip: &Bounds) -> u16 {
        if y < clip.y || y >= clip.bottom() {
            return 0;
        }
        let mut cursor = x;
        for grapheme in text.graphemes(true) {
            let w = grapheme_width(grapheme);
            let Some(c) = grapheme.chars().next().filter(|_| w > 0) else {
                continue;
            };
            if cursor.saturating_add(w) > clip.right() {
                break;
            }
            if cursor >= clip.x {
                self.set(cursor, y, c);
                if w == 2 {
                    self.set(cursor + 1, y, CONTINUATION);
                }
            }
            cursor = cursor.saturating_add(w);
        }
        cursor - x
    }

    /// Fill a rectangle, clipped to `clip`.
    pub fn fill(&mut self, rect: &Bounds, c: char, clip: &Bounds) {
        for y in rect.y.max(clip.y)..rect.bottom().min(clip.bottom()) {
            for x in rect.x.max(clip.x)..rect.right().min(clip.right()) {
                self.set(x, y, c);
            }
        }
    }

    /// One row as text, trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        let row: String = (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|&c| c != CONTINUATION)
            .collect();
        row.trim_end().to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }
}

impl fmt::Display for CellBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, line) in self.lines().iter().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CellBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips_to_rect() {
        let mut buffer = CellBuffer::new(10, 2);
        let clip = Bounds {
            x: 2,
            y: 0,
            width: 4,
            height: 1,
        };

        let advanced = buffer.put_str(0, 0, "abcdefgh", &clip);
        assert_eq!(advanced, 6);
        assert_eq!(buffer.row_text(0), "  cdef");

        assert_eq!(buffer.put_str(0, 1, "zz", &clip), 0);
        assert_eq!(buffer.row_text(1), "");
    }

    #[test]
    fn test_wide_chars_take_two_cells() {
        let mut buffer = CellBuffer::new(6, 1);
        let area = buffer.area();
        assert_eq!(buffer.put_str(0, 0, "日本", &area), 4);
        assert!(buffer.is_continuation(1, 0));
        assert_eq!(buffer.row_text(0), "日本");

        // No room for the second half: dropped.
        let mut narrow = CellBuffer::new(3, 1);
        let area = narrow.area();
        narrow.put_str(0, 0, "日本", &area);
        assert_eq!(narrow.row_text(0), "日");
    }

    #[test]
    fn test_clusters_advance_by_display_width() {
        let mut buffer = CellBuffer::new(8, 1);
        let area = buffer.area();
        assert_eq!(buffer.put_str(0, 0, "e\u{301}x", &area), 2);
        assert_eq!(buffer.row_text(0), "ex");

        let mut buffer = CellBuffer::new(8, 1);
        assert_eq!(buffer.put_str(0, 0, "👨\u{200D}👩!", &area), 3);
        assert!(buffer.is_continuation(1, 0));
        assert_eq!(buffer.get(2, 0), Some('!'));
    }

    #[test]
    fn test_fill_and_display() {
        let mut buffer = CellBuffer::new(4, 3);
        let area = buffer.area();
        buffer.fill(
            &Bounds {
                x: 1,
                y: 1,
                width: 9,
                height: 1,
            },
            '─',
            &area,
        );
        assert_eq!(buffer.to_string(), "\n ───\n");
        assert_eq!(buffer.get(4, 0), None);
    }
}
