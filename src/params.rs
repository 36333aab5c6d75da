// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Fixed, Font};

/// A text direction.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// Checks that the direction flows towards the origin, i.e. right-to-left.
    #[inline]
    pub fn is_rtl(self) -> bool {
        self == Direction::RightToLeft
    }
}

/// Language and primary text direction.
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Locale {
    /// A BCP 47 language tag, like `en-US`.
    ///
    /// An empty string means an unknown language.
    pub language: String,
    /// The primary direction of the text.
    pub direction: Direction,
}

/// Positioning of text within the line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Alignment {
    /// Aligns to the start edge of the line, which is the right edge for
    /// right-to-left lines.
    #[default]
    Start,
    /// Aligns to the end edge of the line.
    End,
    /// Centers the line.
    Middle,
}

impl Alignment {
    /// Returns the offset of a line of `width` within `max_width` pixels.
    ///
    /// Start and End are mirrored for right-to-left lines.
    pub fn align(self, direction: Direction, width: Fixed, max_width: i32) -> Fixed {
        let mw = Fixed::from_i32_saturating(max_width);
        let alignment = match (direction, self) {
            (Direction::RightToLeft, Alignment::Start) => Alignment::End,
            (Direction::RightToLeft, Alignment::End) => Alignment::Start,
            (_, a) => a,
        };

        match alignment {
            Alignment::Middle => Fixed::from_i32(((mw - width) / 2).floor()),
            Alignment::End => Fixed::from_i32((mw - width).floor()),
            Alignment::Start => Fixed::ZERO,
        }
    }
}

/// Layout parameters.
///
/// Everything except `alignment` affects shaping and is part of the layout cache key.
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct Parameters {
    /// The preferred font.
    pub font: Font,
    /// Positioning of text within the line.
    pub alignment: Alignment,
    /// Pixels per em to shape the text with.
    pub px_per_em: Fixed,
    /// Limits the number of shaped lines. Zero means no limit.
    pub max_lines: usize,
    /// Text to insert where the shaped text was truncated.
    ///
    /// Only used when `max_lines` is not zero. An empty string means the shaper default.
    pub truncator: String,
    /// Minimal width of the aligned text.
    pub min_width: i32,
    /// Maximal width of a line.
    pub max_width: i32,
    /// Language and primary direction.
    pub locale: Locale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_ltr() {
        let w = Fixed::from_i32(50);
        assert_eq!(Alignment::Start.align(Direction::LeftToRight, w, 200), Fixed::ZERO);
        assert_eq!(Alignment::Middle.align(Direction::LeftToRight, w, 200), Fixed::from_i32(75));
        assert_eq!(Alignment::End.align(Direction::LeftToRight, w, 200), Fixed::from_i32(150));
    }

    #[test]
    fn align_rtl_mirrors() {
        let w = Fixed::from_i32(50);
        assert_eq!(Alignment::Start.align(Direction::RightToLeft, w, 200), Fixed::from_i32(150));
        assert_eq!(Alignment::Middle.align(Direction::RightToLeft, w, 200), Fixed::from_i32(75));
        assert_eq!(Alignment::End.align(Direction::RightToLeft, w, 200), Fixed::ZERO);
    }

    #[test]
    fn align_floors_fraction() {
        let w = Fixed(50 * 64 + 10);
        assert_eq!(Alignment::Middle.align(Direction::LeftToRight, w, 101), Fixed::from_i32(25));
        assert_eq!(Alignment::End.align(Direction::LeftToRight, w, 101), Fixed::from_i32(50));
    }

    #[test]
    fn align_huge_width() {
        let w = Fixed::from_i32(50);
        let mw = i32::MAX >> 6;
        assert_eq!(Alignment::Start.align(Direction::LeftToRight, w, i32::MAX), Fixed::ZERO);
        assert_eq!(
            Alignment::End.align(Direction::LeftToRight, w, i32::MAX),
            Fixed::from_i32(mw - 50)
        );
        assert_eq!(
            Alignment::Middle.align(Direction::LeftToRight, w, i32::MAX),
            Fixed::from_i32((mw - 50) / 2)
        );
    }
}
