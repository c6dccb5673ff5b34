//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers. They are converted to [`Decimal`]
//! once and every discount or subtotal calculation stays in decimal, so a cart
//! of `3 × $9.99` is `$29.97` rather than whatever the nearest binary float is.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a US dollar price. The catalog only quotes USD.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// A zero USD price.
    #[must_use]
    pub const fn zero() -> Self {
        Self::usd(Decimal::ZERO)
    }

    /// Apply a percentage discount: `amount × (1 − pct / 100)`.
    ///
    /// The result is not rounded; rounding happens only for display.
    #[must_use]
    pub fn discounted(self, discount: DiscountPercentage) -> Self {
        let factor = Decimal::ONE - discount.as_decimal() / Decimal::ONE_HUNDRED;
        Self::new(self.amount * factor, self.currency_code)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Amount rounded to cents, half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.rounded())
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// A discount expressed as a percentage of the list price.
///
/// Values outside `0..=100` are clamped so a bad catalog record can never
/// produce a negative or inflated price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountPercentage(Decimal);

impl DiscountPercentage {
    /// Create a discount, clamped to `0..=100`.
    #[must_use]
    pub fn new(percent: Decimal) -> Self {
        Self(percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// The raw percentage.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether any discount applies.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Whole-number percentage for badges ("13% OFF").
    #[must_use]
    pub fn whole_percent(&self) -> u32 {
        self.0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .try_into()
            .unwrap_or(0)
    }
}

/// ISO 4217 currency codes the catalog quotes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_currency_code_serializes_as_iso_code() {
        assert_eq!(serde_json::to_string(&CurrencyCode::USD).unwrap(), r#""USD""#);
        assert_eq!(CurrencyCode::default().symbol(), "$");
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::usd(dec("10")).display(), "$10.00");
        assert_eq!(Price::usd(dec("9.9")).display(), "$9.90");
        assert_eq!(Price::zero().display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::usd(dec("1.005")).display(), "$1.01");
        assert_eq!(Price::usd(dec("1.004")).display(), "$1.00");
    }

    #[test]
    fn test_discounted_price() {
        let price = Price::usd(dec("100"));
        let discounted = price.discounted(DiscountPercentage::new(dec("10")));
        assert_eq!(discounted.amount, dec("90"));

        let price = Price::usd(dec("9.99"));
        let discounted = price.discounted(DiscountPercentage::new(dec("7.17")));
        assert_eq!(discounted.display(), "$9.27");
    }

    #[test]
    fn test_line_total_rounds_once() {
        let unit = Price::usd(dec("9.99")).discounted(DiscountPercentage::new(dec("7.17")));
        // 9.273717 × 3 = 27.821151, not 3 × 9.27
        assert_eq!(unit.times(3).display(), "$27.82");
    }

    #[test]
    fn test_no_discount_keeps_price() {
        let price = Price::usd(dec("5.49"));
        assert_eq!(price.discounted(DiscountPercentage::default()), price);
    }

    #[test]
    fn test_sum() {
        let total: Price = [dec("1.10"), dec("2.20"), dec("3.30")]
            .into_iter()
            .map(Price::usd)
            .sum();
        assert_eq!(total.amount, dec("6.60"));

        let empty: Price = std::iter::empty().sum();
        assert_eq!(empty, Price::zero());
    }

    #[test]
    fn test_discount_is_clamped() {
        assert_eq!(
            DiscountPercentage::new(dec("150")).as_decimal(),
            Decimal::ONE_HUNDRED
        );
        assert_eq!(DiscountPercentage::new(dec("-5")).as_decimal(), Decimal::ZERO);
        assert!(!DiscountPercentage::new(dec("-5")).is_discounted());
    }

    #[test]
    fn test_whole_percent() {
        assert_eq!(DiscountPercentage::new(dec("12.5")).whole_percent(), 13);
        assert_eq!(DiscountPercentage::new(dec("12.49")).whole_percent(), 12);
        assert_eq!(DiscountPercentage::new(dec("0.4")).whole_percent(), 0);
    }
}
