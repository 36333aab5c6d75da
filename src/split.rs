// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use unicode_bidi::{BidiInfo, Level};
use unicode_script::{Script, UnicodeScript};

use crate::orderer::FaceOrderer;
use crate::Direction;

/// A run of paragraph text to be shaped with a single face, direction and script.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Input {
    /// First rune of the run within the paragraph.
    pub start: usize,
    /// One past the last rune of the run.
    pub end: usize,
    pub direction: Direction,
    /// A face index within the `FaceOrderer`.
    pub face: usize,
    pub script: Script,
}

impl Input {
    pub fn new(len: usize, direction: Direction) -> Self {
        Input {
            start: 0,
            end: len,
            direction,
            face: 0,
            script: Script::Common,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits an input into runs of uniform bidi embedding level.
///
/// The paragraph level is forced to the input direction.
/// When the text cannot be resolved as a single bidi paragraph,
/// the input is kept as is.
pub(crate) fn split_bidi(text: &[char], input: Input, out: &mut Vec<Input>) {
    if input.is_empty() {
        out.push(input);
        return;
    }

    let s: String = text[input.start..input.end].iter().collect();
    let level = if input.direction.is_rtl() { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(&s, Some(level));
    if info.paragraphs.len() != 1 {
        log::warn!("Text has {} bidi paragraphs. Bidi reordering is disabled.", info.paragraphs.len());
        out.push(input);
        return;
    }

    let mut run = input;
    let mut run_level = None;
    for (rune, (byte_idx, _)) in (input.start..).zip(s.char_indices()) {
        let level = info.levels[byte_idx];
        match run_level {
            Some(prev) if prev != level => {
                run.end = rune;
                out.push(run);
                run.start = rune;
            }
            _ => {}
        }

        run_level = Some(level);
        run.direction = if level.is_rtl() { Direction::RightToLeft } else { Direction::LeftToRight };
    }

    run.end = input.end;
    out.push(run);
}

/// Splits inputs wherever the first face, in fallback order, that covers a rune changes.
///
/// Whitespace, controls, marks and default ignorables stay with the current face.
/// Runes covered by no face stay with the current face as well.
pub(crate) fn split_by_faces(
    text: &[char],
    inputs: &[Input],
    faces: &[usize],
    orderer: &FaceOrderer,
    out: &mut Vec<Input>,
) {
    let fallback = match faces.first() {
        Some(idx) => *idx,
        None => {
            out.extend_from_slice(inputs);
            return;
        }
    };

    for input in inputs {
        let mut run = *input;
        let mut current: Option<usize> = None;
        for (i, &c) in text.iter().enumerate().take(input.end).skip(input.start) {
            if is_coverage_neutral(c) {
                continue;
            }

            if let Some(face) = current {
                if orderer.face(face).has_char(c) {
                    continue;
                }
            }

            let best = match faces.iter().copied().find(|idx| orderer.face(*idx).has_char(c)) {
                Some(idx) => idx,
                None => {
                    log::warn!("No font covers the U+{:04X} character.", c as u32);
                    current.unwrap_or(fallback)
                }
            };

            match current {
                Some(face) if face != best => {
                    run.end = i;
                    run.face = face;
                    out.push(run);
                    run.start = i;
                }
                _ => {}
            }

            current = Some(best);
        }

        run.end = input.end;
        run.face = current.unwrap_or(fallback);
        out.push(run);
    }
}

fn is_coverage_neutral(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || c.script() == Script::Inherited
        || matches!(c,
            '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{2060}'..='\u{2064}'
            | '\u{FE00}'..='\u{FE0F}' | '\u{FEFF}')
}

/// Splits inputs at script boundaries.
///
/// Common and Inherited runes never start a new run. A run takes the script
/// of its first other rune. A run made only of Common runes keeps a single
/// run with the script of its first rune.
pub(crate) fn split_by_script(text: &[char], inputs: &[Input], out: &mut Vec<Input>) {
    for input in inputs {
        if input.is_empty() {
            out.push(*input);
            continue;
        }

        let runes = &text[input.start..input.end];
        let first = runes
            .iter()
            .position(|c| !is_script_neutral(c.script()))
            .unwrap_or(0);

        let mut run = *input;
        run.script = runes[first].script();
        for (i, c) in runes.iter().enumerate().skip(first + 1) {
            let script = c.script();
            if is_script_neutral(script) || script == run.script {
                continue;
            }

            run.end = input.start + i;
            out.push(run);
            run.start = input.start + i;
            run.script = script;
        }

        run.end = input.end;
        out.push(run);
    }
}

#[inline]
fn is_script_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited)
}
