//! International bank account numbers (ISO 13616).

use std::fmt;
use std::str::FromStr;

use crate::error::IbanError;

/// A structurally valid IBAN, kept in compact uppercase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban(String);

impl Iban {
    /// Validates and normalizes an IBAN. Spaces are ignored and letters uppercased.
    pub fn parse(input: &str) -> Result<Self, IbanError> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if let Some(bad) = compact.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(IbanError::InvalidCharacter(bad));
        }
        if !(15..=34).contains(&compact.len()) {
            return Err(IbanError::InvalidLength(compact.len()));
        }

        let country = &compact[..2];
        if !country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(IbanError::InvalidCountryCode(country.to_string()));
        }
        let check = &compact[2..4];
        if !check.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IbanError::InvalidCheckDigits(check.to_string()));
        }

        if mod97(&compact) != 1 {
            return Err(IbanError::ChecksumMismatch);
        }
        Ok(Self(compact))
    }

    /// Two-letter ISO 3166 country code.
    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    pub fn check_digits(&self) -> &str {
        &self.0[2..4]
    }

    /// Basic bank account number, the country-specific remainder.
    pub fn bban(&self) -> &str {
        &self.0[4..]
    }

    /// Compact form without spaces, as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Remainder of the rearranged IBAN (BBAN first, letters as 10..=35) modulo 97.
fn mod97(compact: &str) -> u32 {
    let (head, bban) = compact.split_at(4);
    bban.chars().chain(head.chars()).fold(0, |rem, c| match c.to_digit(36) {
        Some(v) if v < 10 => (rem * 10 + v) % 97,
        Some(v) => (rem * 100 + v) % 97,
        None => rem,
    })
}

/// Printed in groups of four: `DE89 3704 0044 0532 0130 00`.
impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.0.as_bytes().chunks(4).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            // Only ASCII alphanumerics survive `parse`.
            f.write_str(std::str::from_utf8(chunk).map_err(|_| fmt::Error)?)?;
        }
        Ok(())
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iban::parse(s)
    }
}
