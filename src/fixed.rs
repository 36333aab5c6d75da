// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::{Add, AddAssign, Div, Neg, Sub, SubAssign};

/// A signed 26.6 fixed-point number.
///
/// The low 6 bits hold the fractional part, so `Fixed(64)` is one pixel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Fixed(pub i32);

impl Fixed {
    /// Zero.
    pub const ZERO: Fixed = Fixed(0);

    /// Creates a value from whole pixels.
    #[inline]
    pub const fn from_i32(n: i32) -> Self {
        Fixed(n << 6)
    }

    /// Creates a value from whole pixels, clamping to the representable range.
    #[inline]
    pub const fn from_i32_saturating(n: i32) -> Self {
        let n = if n > i32::MAX >> 6 {
            i32::MAX >> 6
        } else if n < i32::MIN >> 6 {
            i32::MIN >> 6
        } else {
            n
        };
        Fixed(n << 6)
    }

    /// Creates a value from a float, rounding to the nearest 1/64.
    #[inline]
    pub fn from_f32(n: f32) -> Self {
        Fixed((n * 64.0).round() as i32)
    }

    /// Returns the value as a float.
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 64.0
    }

    /// Returns the greatest integer less than or equal to the value.
    #[inline]
    pub const fn floor(self) -> i32 {
        self.0 >> 6
    }

    /// Returns the least integer greater than or equal to the value.
    #[inline]
    pub const fn ceil(self) -> i32 {
        (self.0 + 63) >> 6
    }

    /// Returns the nearest integer, rounding half up.
    #[inline]
    pub const fn round(self) -> i32 {
        (self.0 + 32) >> 6
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl Div<i32> for Fixed {
    type Output = Fixed;

    #[inline]
    fn div(self, rhs: i32) -> Fixed {
        Fixed(self.0 / rhs)
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}:{:02}", sign, abs >> 6, abs & 0x3f)
    }
}

/// A point in 26.6 fixed-point coordinates.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct FixedPoint {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedPoint {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        FixedPoint { x, y }
    }
}

impl Add for FixedPoint {
    type Output = FixedPoint;

    #[inline]
    fn add(self, rhs: FixedPoint) -> FixedPoint {
        FixedPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A rectangle in 26.6 fixed-point coordinates.
///
/// `min` is inclusive and `max` is exclusive. Y grows downwards.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct FixedRect {
    pub min: FixedPoint,
    pub max: FixedPoint,
}

impl FixedRect {
    /// Returns the rectangle width.
    #[inline]
    pub fn width(&self) -> Fixed {
        self.max.x - self.min.x
    }

    /// Returns the rectangle height.
    #[inline]
    pub fn height(&self) -> Fixed {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        let v = Fixed(64 + 32);
        assert_eq!(v.floor(), 1);
        assert_eq!(v.ceil(), 2);
        assert_eq!(v.round(), 2);

        let v = Fixed(-(64 + 16));
        assert_eq!(v.floor(), -2);
        assert_eq!(v.ceil(), -1);
        assert_eq!(v.round(), -1);

        assert_eq!(Fixed::from_i32(3).ceil(), 3);
        assert_eq!(Fixed::from_i32(-3).floor(), -3);
    }

    #[test]
    fn conversions() {
        assert_eq!(Fixed::from_f32(1.5), Fixed(96));
        assert_eq!(Fixed(96).to_f32(), 1.5);
        assert_eq!(Fixed::from_i32(10) / 2, Fixed::from_i32(5));
        assert_eq!(Fixed(96).to_string(), "1:32");
        assert_eq!(Fixed(-96).to_string(), "-1:32");
    }

    #[test]
    fn saturating_pixels() {
        assert_eq!(Fixed::from_i32_saturating(200), Fixed::from_i32(200));
        assert_eq!(Fixed::from_i32_saturating(-200), Fixed::from_i32(-200));
        assert_eq!(Fixed::from_i32_saturating(i32::MAX).floor(), i32::MAX >> 6);
        assert_eq!(Fixed::from_i32_saturating(i32::MIN).floor(), i32::MIN >> 6);
        assert!(Fixed::from_i32_saturating(1 << 26) > Fixed::ZERO);
    }
}
