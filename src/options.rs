// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::FontFace;

/// Shaper options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Faces to register, in fallback priority order.
    ///
    /// The font of the first face becomes the default font.
    ///
    /// Default: empty
    pub collection: Vec<FontFace>,

    /// Also registers fonts installed in the system, after `collection`.
    ///
    /// Requires the `system-fonts` feature.
    ///
    /// Default: false
    pub system_fonts: bool,

    /// The number of shaped paragraphs to keep.
    ///
    /// Default: 1000
    pub layout_cache_capacity: usize,

    /// The number of glyph paths to keep.
    ///
    /// Also used for bitmap placements and decoded bitmap glyphs.
    ///
    /// Default: 1000
    pub path_cache_capacity: usize,

    /// A truncator used when `Parameters::truncator` is empty.
    ///
    /// Default: `…`
    pub default_truncator: String,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            collection: Vec::new(),
            system_fonts: false,
            layout_cache_capacity: crate::cache::DEFAULT_CAPACITY,
            path_cache_capacity: crate::cache::DEFAULT_CAPACITY,
            default_truncator: "…".to_string(),
        }
    }
}
