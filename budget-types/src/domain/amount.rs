//! Exact monetary amounts and display currencies.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AmountError;

/// Currencies the application can display amounts in.
///
/// The currency is a display preference only; stored amounts carry no currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    #[default]
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
}

impl Currency {
    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
        }
    }

    /// Returns the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF ",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "CHF" => Ok(Currency::CHF),
            other => Err(format!("Unknown currency: {other}")),
        }
    }
}

/// How fraction digits beyond the second are treated while parsing.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Fraction {
    /// Round half away from zero to two digits.
    RoundHalfUp,
    /// Reject anything beyond two digits.
    Strict,
}

/// A monetary amount with exactly two fraction digits.
///
/// Backed by a [`Decimal`] whose scale is always 2, so `"12.5"` and `"12.50"`
/// both print as `12.50`. Never built from binary floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::from_parts(0, 0, 0, false, 2));

    /// Creates an amount from a number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parses user input, rounding half up to two fraction digits.
    ///
    /// `"123.456"` becomes `123.46`, `"123"` becomes `123.00` and `"0.005"`
    /// becomes `0.01`. Accepts an optional sign, `"123."` and `".12"`; rejects
    /// empty input, whitespace, exponents, `NaN` and `Infinity`.
    pub fn parse_input(input: &str) -> Result<Self, AmountError> {
        parse(input, Fraction::RoundHalfUp)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        // Scale is pinned to 2 and every constructor starts from an i64.
        self.0.mantissa() as i64
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checked addition, `None` on overflow of the cent range.
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.cents().checked_add(other.cents()).map(Amount::from_cents)
    }

    /// Formats the amount with the currency symbol, e.g. `€10.50` or `-$3.00`.
    pub fn display_in(&self, currency: Currency) -> String {
        if self.is_negative() {
            format!("-{}{}", currency.symbol(), self.0.abs())
        } else {
            format!("{}{}", currency.symbol(), self.0)
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strict form used for stored amounts: at most two fraction digits.
impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, Fraction::Strict)
    }
}

fn parse(input: &str, fraction: Fraction) -> Result<Amount, AmountError> {
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    let out_of_range = || AmountError::OutOfRange(input.to_string());

    // Sign, digits and one point only: no exponents, separators, NaN or Infinity.
    let unsigned = input.strip_prefix(['-', '+']).unwrap_or(input);
    let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(AmountError::Invalid(input.to_string()));
    }

    let sign = if input.starts_with('-') { "-" } else { "" };
    let whole = if whole.is_empty() { "0" } else { whole };
    let canonical = if frac.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{frac}")
    };

    let value = match fraction {
        Fraction::Strict => {
            let value = Decimal::from_str_exact(&canonical).map_err(|_| out_of_range())?;
            if value.scale() > 2 {
                return Err(AmountError::TooManyDecimals {
                    value: input.to_string(),
                    digits: value.scale() as usize,
                });
            }
            value
        }
        Fraction::RoundHalfUp => Decimal::from_str(&canonical)
            .map_err(|_| out_of_range())?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    };

    let mut cents = value;
    cents.rescale(2);
    let cents = i64::try_from(cents.mantissa()).map_err(|_| out_of_range())?;
    Ok(Amount::from_cents(cents))
}
