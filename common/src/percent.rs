//! [`Percent`]-related definitions.

use derive_more::Display;
use rust_decimal::Decimal;

/// Floating-point percentage in `0..=100` range.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided values is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Calculates which [`Percent`] the `part` is of the `whole`, rounded to
    /// two decimal places.
    ///
    /// Empty `whole` gives [`Percent::ZERO`], and `part` exceeding `whole` is
    /// capped at `100`.
    #[must_use]
    pub fn ratio(part: u64, whole: u64) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let ratio = Decimal::from(part.min(whole)) * Decimal::ONE_HUNDRED
            / Decimal::from(whole);
        Self(ratio.round_dp(2).normalize())
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }
}
