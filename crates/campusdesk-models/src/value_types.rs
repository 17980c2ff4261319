//! Validated domain primitives.
//!
//! ```ignore
//! use campusdesk_models::value_types::{Phone, Price};
//!
//! let phone: Phone = "+998901234567".parse().unwrap();
//! let price: Price = "1500.5".parse().unwrap();
//! assert_eq!(price.to_string(), "1500.50");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{Database, Decode, Encode, Sqlite, Type, sqlite::SqliteTypeInfo};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    InvalidPhone(String),
    InvalidPrice(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhone(msg) => write!(f, "Invalid phone number: {}", msg),
            Self::InvalidPrice(msg) => write!(f, "Invalid price: {}", msg),
        }
    }
}

// ============================================================================
// Phone
// ============================================================================

/// A phone number in the `+998901234567` style: an optional `+`, an optional
/// leading `1`, then 9 to 14 digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Phone(String);

impl Phone {
    pub const MAX_LEN: usize = 17;
    const MIN_DIGITS: usize = 9;
    const MAX_DIGITS: usize = 14;

    pub fn new(phone: impl Into<String>) -> Result<Self, ValueTypeError> {
        let phone = phone.into();
        Self::validate(&phone)?;
        Ok(Self(phone))
    }

    /// For values read back from storage, which were validated on the way in.
    #[inline]
    pub fn new_unchecked(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(phone: &str) -> Result<(), ValueTypeError> {
        if phone.is_empty() {
            return Err(ValueTypeError::InvalidPhone(
                "phone number cannot be empty".into(),
            ));
        }
        if phone.len() > Self::MAX_LEN {
            return Err(ValueTypeError::InvalidPhone(format!(
                "phone number must be at most {} characters",
                Self::MAX_LEN
            )));
        }

        let digits = phone.strip_prefix('+').unwrap_or(phone);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValueTypeError::InvalidPhone(format!(
                "'{}' must contain only digits after an optional '+'",
                phone
            )));
        }

        // The optional country prefix `1` may absorb one extra digit.
        let count = digits.len();
        let fits = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&count)
            || (digits.starts_with('1') && count == Self::MAX_DIGITS + 1);
        if !fits {
            return Err(ValueTypeError::InvalidPhone(format!(
                "phone number must have {} to {} digits, got {}",
                Self::MIN_DIGITS,
                Self::MAX_DIGITS,
                count
            )));
        }

        Ok(())
    }
}

/// `validator` hook for DTO fields that carry a phone number as a plain string.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    Phone::validate(phone).map_err(|e| {
        let mut err = ValidationError::new("phone");
        err.message = Some(Cow::Owned(e.to_string()));
        err
    })
}

impl fmt::Debug for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phone({})", self.0)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Phone {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Phone {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Phone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

impl Type<Sqlite> for Phone {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Phone {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Self::new_unchecked(s))
    }
}

// ============================================================================
// Price
// ============================================================================

/// A money amount with two fixed decimal places, held as cents.
///
/// Accepts JSON strings (`"1500"`, `"1500.5"`, `"1500.50"`) and numbers.
/// At most 2 fractional digits and 10 digits in total; always serialized as
/// a string with exactly two decimals.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    pub const MAX_DIGITS: usize = 10;
    pub const DECIMAL_PLACES: usize = 2;

    pub fn from_cents(cents: i64) -> Result<Self, ValueTypeError> {
        let limit = 10_i64.pow(Self::MAX_DIGITS as u32);
        if cents < 0 {
            return Err(ValueTypeError::InvalidPrice("must not be negative".into()));
        }
        if cents >= limit {
            return Err(ValueTypeError::InvalidPrice(format!(
                "must have at most {} digits",
                Self::MAX_DIGITS
            )));
        }
        Ok(Self(cents))
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    fn parse(raw: &str) -> Result<Self, ValueTypeError> {
        let raw = raw.trim();
        let invalid = || ValueTypeError::InvalidPrice(format!("'{}' is not a decimal number", raw));

        let (whole, frac) = match raw.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (raw, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if frac.len() > Self::DECIMAL_PLACES {
            return Err(ValueTypeError::InvalidPrice(format!(
                "must have at most {} decimal places",
                Self::DECIMAL_PLACES
            )));
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > Self::MAX_DIGITS - Self::DECIMAL_PLACES {
            return Err(ValueTypeError::InvalidPrice(format!(
                "must have at most {} digits",
                Self::MAX_DIGITS
            )));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut frac_cents: i64 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| invalid())?
        };
        if frac.len() == 1 {
            frac_cents *= 10;
        }

        Self::from_cents(whole * 100 + frac_cents)
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount with at most two decimal places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        Price::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        v.checked_mul(100)
            .ok_or_else(|| E::custom("price is too large"))
            .and_then(|cents| Price::from_cents(cents).map_err(E::custom))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("price is too large"))?;
        self.visit_i64(v)
    }

    // JSON numbers with a fraction arrive as f64; their shortest decimal
    // rendering is checked like a string so `10.005` is still rejected.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        if !v.is_finite() {
            return Err(E::custom("price must be a finite number"));
        }
        Price::parse(&v.to_string()).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

impl Type<Sqlite> for Price {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Price {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Self(cents))
    }
}
