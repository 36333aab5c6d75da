// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Font data could not be parsed by the shaping engine.
    MalformedFont,

    /// The shaping engine failed to shape a run of text.
    ShapingFailed(String),

    /// A typeface family list is malformed.
    ///
    /// Contains a char position of the error.
    InvalidFamilyList(usize),

    /// Failed to read a text stream or a font file.
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::MalformedFont => {
                write!(f, "provided font data is malformed")
            }
            Error::ShapingFailed(ref reason) => {
                write!(f, "text shaping failed cause {}", reason)
            }
            Error::InvalidFamilyList(pos) => {
                write!(f, "invalid font family list at position {}", pos)
            }
            Error::Io(ref e) => {
                write!(f, "reading failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}
