// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::rc::Rc;

use crate::{family, Face, Font, Style};

/// Maps fonts to faces and orders faces into fallback chains.
#[derive(Default, Debug)]
pub(crate) struct FaceOrderer {
    default: Option<Font>,
    /// Every registered font in insertion order.
    fonts: Vec<Font>,
    /// Faces parallel to `fonts`.
    faces: Vec<Rc<dyn Face>>,
    /// The latest insertion index for a font.
    by_font: HashMap<Font, usize>,
}

impl FaceOrderer {
    pub fn insert(&mut self, font: Font, face: Rc<dyn Face>) {
        if self.default.is_none() {
            self.default = Some(font.clone());
        }

        self.by_font.insert(font.clone(), self.faces.len());
        self.fonts.push(font);
        self.faces.push(face);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Returns a face by its index.
    ///
    /// # Panics
    ///
    /// When the index was not produced by this orderer.
    pub fn face(&self, index: usize) -> &Rc<dyn Face> {
        match self.faces.get(index) {
            Some(face) => face,
            None => panic!("face index {} is out of range", index),
        }
    }

    /// Returns face indices with the closest match for `font` first
    /// and the rest in insertion order.
    pub fn sorted_faces_for_style(&self, font: &Font) -> Vec<usize> {
        let primary = self.font_for_style(font).and_then(|f| self.by_font.get(&f).copied());

        let mut order = Vec::with_capacity(self.faces.len());
        order.extend(primary);
        order.extend((0..self.faces.len()).filter(|idx| Some(*idx) != primary));
        order
    }

    /// Resolves the registered font that best matches `font`.
    fn font_for_style(&self, font: &Font) -> Option<Font> {
        let families = match family::parse_family_list(&font.typeface) {
            Ok(list) => list,
            Err(_) => vec![font.typeface.clone()],
        };

        for typeface in families {
            let mut candidate = font.clone();
            candidate.typeface = typeface;
            if let Some(found) = self.closest_for_style(&candidate) {
                return Some(found);
            }
        }

        let default = self.default.as_ref()?;
        let mut candidate = font.clone();
        candidate.typeface = default.typeface.clone();
        if let Some(found) = self.closest_for_style(&candidate) {
            return Some(found);
        }

        Some(default.clone())
    }

    fn closest_for_style(&self, font: &Font) -> Option<Font> {
        if let Some(found) = closest_font(font, &self.fonts) {
            return Some(found.clone());
        }

        if font.style != Style::Regular {
            let mut regular = font.clone();
            regular.style = Style::Regular;
            return closest_font(&regular, &self.fonts).cloned();
        }

        None
    }
}

/// Returns the font closest to `lookup` by weight.
///
/// Only fonts with the same typeface, variant and style are considered.
/// On equal distance, the lighter weight wins.
pub(crate) fn closest_font<'a>(lookup: &Font, available: &'a [Font]) -> Option<&'a Font> {
    let mut best: Option<&Font> = None;
    for font in available {
        if font == lookup {
            return Some(font);
        }

        if font.typeface != lookup.typeface
            || font.variant != lookup.variant
            || font.style != lookup.style
        {
            continue;
        }

        best = match best {
            None => Some(font),
            Some(current) => {
                let d = lookup.weight.distance(font.weight);
                let cd = lookup.weight.distance(current.weight);
                if d < cd || (d == cd && font.weight < current.weight) {
                    Some(font)
                } else {
                    Some(current)
                }
            }
        };
    }

    best
}
