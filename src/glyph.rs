// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Fixed, FixedPoint, FixedRect};

const FACE_BITS: u32 = 16;
const SIZE_BITS: u32 = 16;
const GID_BITS: u32 = 64 - FACE_BITS - SIZE_BITS;

/// A unique, per-shaper identifier for the shape of a glyph.
///
/// Packs a face index (16 bits), a pixels-per-em size (16 bits, 26.6)
/// and a font-native glyph id (32 bits).
/// Glyphs from the same shaper share an id when they come from the same face
/// and represent the same glyph at the same size.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct GlyphId(pub u64);

impl GlyphId {
    /// Packs a glyph id.
    ///
    /// # Panics
    ///
    /// When any component does not fit into its bit range.
    /// This always indicates a caller bug.
    pub fn new(ppem: Fixed, face_index: usize, gid: u32) -> Self {
        let gid = u64::from(gid);
        if gid >> GID_BITS != 0 {
            panic!("glyph id {} is out of range", gid);
        }
        if ppem.0 < 0 || (ppem.0 as u64) >> SIZE_BITS != 0 {
            panic!("ppem {:?} is out of range", ppem);
        }
        if (face_index as u64) >> FACE_BITS != 0 {
            panic!("face index {} is out of range", face_index);
        }

        GlyphId((face_index as u64) << (GID_BITS + SIZE_BITS) | (ppem.0 as u64) << GID_BITS | gid)
    }

    /// Unpacks the id into `(ppem, face index, glyph id)`.
    pub fn split(self) -> (Fixed, usize, u32) {
        let gid = self.0 & ((1 << GID_BITS) - 1);
        let ppem = (self.0 >> GID_BITS) & ((1 << SIZE_BITS) - 1);
        let face = self.0 >> (GID_BITS + SIZE_BITS);
        (Fixed(ppem as i32), face as usize, gid as u32)
    }
}

bitflags::bitflags! {
    /// Special properties of a [`Glyph`].
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
    pub struct Flags: u16 {
        /// Set for glyphs in runs that flow towards the origin (RTL).
        const TOWARD_ORIGIN = 1 << 0;
        /// Set for the last glyph in a line.
        const LINE_BREAK = 1 << 1;
        /// Set for the last glyph in a run.
        ///
        /// A run is a sequence of glyphs sharing face, size and direction.
        const RUN_BREAK = 1 << 2;
        /// Set for the last glyph in a glyph cluster.
        const CLUSTER_BREAK = 1 << 3;
        /// The glyph does not represent a font glyph but a paragraph separator
        /// inserted by the shaper.
        ///
        /// It is always followed by a glyph with [`Flags::PARAGRAPH_START`].
        const PARAGRAPH_BREAK = 1 << 4;
        /// The glyph starts a new paragraph.
        const PARAGRAPH_START = 1 << 5;
        /// The glyph is part of the truncator run that stands in for the text
        /// removed by truncation.
        ///
        /// A truncator glyph with [`Flags::CLUSTER_BREAK`] accounts for all
        /// truncated runes.
        const TRUNCATOR = 1 << 6;
    }
}

impl std::fmt::Display for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let table = [
            (Flags::PARAGRAPH_START, 'S'),
            (Flags::PARAGRAPH_BREAK, 'P'),
            (Flags::TOWARD_ORIGIN, 'T'),
            (Flags::LINE_BREAK, 'L'),
            (Flags::RUN_BREAK, 'R'),
            (Flags::CLUSTER_BREAK, 'C'),
            (Flags::TRUNCATOR, '…'),
        ];

        for (flag, c) in table {
            let c = if self.contains(flag) { c } else { '_' };
            write!(f, "{}", c)?;
        }

        Ok(())
    }
}

/// A shaped glyph.
///
/// Most fields are relative to the "dot", a point on the baseline of the line
/// containing the glyph. Displaying each glyph at its dot in document
/// coordinates (origin in the upper-left corner) visualizes the text.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Glyph {
    /// Shape identifier.
    pub id: GlyphId,
    /// X coordinate of the dot in document coordinates.
    pub x: Fixed,
    /// Y coordinate of the dot in document coordinates.
    pub y: i32,
    /// The logical width of the glyph.
    pub advance: Fixed,
    /// The distance from the dot to the logical top of the line.
    pub ascent: Fixed,
    /// The distance from the dot to the logical bottom of the line,
    /// including the line gap.
    pub descent: Fixed,
    /// Origin of the glyph drawing space relative to the dot.
    pub offset: FixedPoint,
    /// Visual dimensions of the glyph relative to the dot.
    pub bounds: FixedRect,
    /// The number of runes represented by the glyph cluster.
    ///
    /// Zero unless `flags` contains [`Flags::CLUSTER_BREAK`].
    pub runes: usize,
    /// Special properties.
    pub flags: Flags,
}
