// Copyright 2026 the Clocktree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact fixed-point divider values.
//!
//! Sub-PLL dividers are real numbers with up to eight decimal places
//! (`7.32421875`). Storing them as `f64` and re-deriving the decimal text
//! later invites drift, so [`Divider`] stores an integer count of
//! 10<sup>-8</sup> units instead. Conversion to `f64` happens only at the
//! point where a frequency is computed.

use core::fmt;

/// Number of decimal places a [`Divider`] can represent.
pub const DIVIDER_DECIMALS: u32 = 8;

/// Units per whole divider step (10<sup>8</sup>).
pub const DIVIDER_SCALE: u64 = 100_000_000;

/// Largest distance, in units, an `f64` may sit from a representable value
/// and still be accepted. Far below one unit, far above `f64` rounding noise
/// for dividers in the accepted ranges.
const SNAP_TOLERANCE: f64 = 1e-3;

/// A positive divider with eight decimal places of exact precision.
///
/// Two dividers compare equal exactly when their decimal representations
/// match; [`Display`](fmt::Display) prints the shortest decimal form, so a
/// divider built from `7.32421875` prints back as `7.32421875`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Divider(u64);

impl Divider {
    /// The divider of a node that does not divide (top-level PLLs).
    pub const ONE: Self = Self(DIVIDER_SCALE);

    /// Creates a divider from a raw count of 10<sup>-8</sup> units.
    #[inline]
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Creates a whole-number divider.
    ///
    /// Returns `None` if the value overflows the unit representation.
    #[inline]
    #[must_use]
    pub const fn from_integer(value: u64) -> Option<Self> {
        match value.checked_mul(DIVIDER_SCALE) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Snaps an `f64` to the nearest representable divider.
    ///
    /// Returns `None` for negative, non-finite, or out-of-range input, and for
    /// values that need more than [`DIVIDER_DECIMALS`] decimal places.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = value * DIVIDER_SCALE as f64;
        if scaled >= u64::MAX as f64 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "scaled is finite, non-negative and below u64::MAX"
        )]
        let units = (scaled + 0.5) as u64;
        let distance = scaled - units as f64;
        if !(-SNAP_TOLERANCE..=SNAP_TOLERANCE).contains(&distance) {
            return None;
        }
        Some(Self(units))
    }

    /// Parses decimal text such as `"36"` or `"7.32421875"`.
    ///
    /// Leading and trailing ASCII whitespace is ignored. Signs, exponents,
    /// and more than [`DIVIDER_DECIMALS`] fractional digits are rejected.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (text, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > DIVIDER_DECIMALS as usize {
            return None;
        }
        let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !digits(whole) || !digits(frac) {
            return None;
        }

        let mut units: u64 = 0;
        for b in whole.bytes() {
            units = units.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        }
        units = units.checked_mul(DIVIDER_SCALE)?;

        let mut frac_units: u64 = 0;
        for b in frac.bytes() {
            frac_units = frac_units * 10 + u64::from(b - b'0');
        }
        // Pad to the full eight places: "25" means 0.25000000.
        #[expect(
            clippy::cast_possible_truncation,
            reason = "frac.len() is at most DIVIDER_DECIMALS"
        )]
        let pad = DIVIDER_DECIMALS - frac.len() as u32;
        frac_units *= 10_u64.pow(pad);

        Some(Self(units.checked_add(frac_units)?))
    }

    /// Returns the raw count of 10<sup>-8</sup> units.
    #[inline]
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Returns the divider as an `f64`.
    ///
    /// This is a single correctly-rounded division, so it yields the same
    /// `f64` as parsing the divider's decimal text.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / DIVIDER_SCALE as f64
    }

    /// Returns `true` if the divider has no fractional part.
    #[inline]
    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.0 % DIVIDER_SCALE == 0
    }

    /// Returns `true` for a zero divider.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Divider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Divider({self})")
    }
}

impl fmt::Display for Divider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / DIVIDER_SCALE;
        let mut frac = self.0 % DIVIDER_SCALE;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let mut width = DIVIDER_DECIMALS as usize;
        while frac % 10 == 0 {
            frac /= 10;
            width -= 1;
        }
        write!(f, "{whole}.{frac:0width$}")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn sub_pll_divider_round_trips_exactly() {
        let d = Divider::from_f64(7.324_218_75).unwrap();
        assert_eq!(d.units(), 732_421_875);
        assert_eq!(d.to_f64(), 7.324_218_75);
        assert_eq!(d.to_string(), "7.32421875");
        assert_eq!(Divider::parse("7.32421875"), Some(d));
    }

    #[test]
    fn integer_dividers_print_without_fraction() {
        let d = Divider::from_integer(36).unwrap();
        assert!(d.is_integer());
        assert_eq!(d.to_string(), "36");
        assert_eq!(d.to_f64(), 36.0);
        assert_eq!(Divider::from_f64(36.0), Some(d));
    }

    #[test]
    fn leading_zeros_in_fraction_are_kept() {
        let d = Divider::parse("1.05").unwrap();
        assert_eq!(d.units(), 105_000_000);
        assert_eq!(d.to_string(), "1.05");

        let small = Divider::from_units(1);
        assert_eq!(small.to_string(), "0.00000001");
    }

    #[test]
    fn decimal_text_like_one_tenth_is_accepted() {
        // 0.1 is not exact in binary but is exactly eight-place decimal.
        let d = Divider::from_f64(0.1).unwrap();
        assert_eq!(d.units(), 10_000_000);
        assert_eq!(d.to_f64(), 0.1);
    }

    #[test]
    fn too_many_decimal_places_is_rejected() {
        assert_eq!(Divider::from_f64(1.123_456_789), None);
        assert_eq!(Divider::parse("1.123456789"), None);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert_eq!(Divider::from_f64(-1.0), None);
        assert_eq!(Divider::from_f64(f64::NAN), None);
        assert_eq!(Divider::from_f64(f64::INFINITY), None);
        assert_eq!(Divider::parse(""), None);
        assert_eq!(Divider::parse("."), None);
        assert_eq!(Divider::parse("-3"), None);
        assert_eq!(Divider::parse("1e3"), None);
        assert_eq!(Divider::parse("1.2.3"), None);
    }

    #[test]
    fn zero_is_representable_but_flagged() {
        let d = Divider::from_f64(0.0).unwrap();
        assert!(d.is_zero());
        assert_eq!(d.to_string(), "0");
    }

    #[test]
    fn parse_accepts_surrounding_whitespace_and_bare_fraction() {
        assert_eq!(Divider::parse(" 2 "), Divider::from_integer(2));
        assert_eq!(Divider::parse(".5").map(Divider::units), Some(50_000_000));
        assert_eq!(Divider::parse("3.").map(Divider::units), Some(300_000_000));
    }
}
