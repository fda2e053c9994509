//! Menu items and their localised copy.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Database identifier of a pizza.
pub type PizzaId = i32;

/// Validation errors raised by pizza value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PizzaValidationError {
    InvalidSlug,
    InvalidPrice { value: String },
    NegativePrice,
    PriceOutOfRange,
    NoTranslations,
    EmptyLocale { index: usize },
    EmptyName { locale: String },
    DuplicateLocale { locale: String },
    PriceRangeInverted,
}

impl PizzaValidationError {
    /// Name of the request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidSlug => "slug",
            Self::InvalidPrice { .. } | Self::NegativePrice | Self::PriceOutOfRange => "price",
            Self::NoTranslations
            | Self::EmptyLocale { .. }
            | Self::EmptyName { .. }
            | Self::DuplicateLocale { .. } => "translations",
            Self::PriceRangeInverted => "minPrice",
        }
    }
}

impl fmt::Display for PizzaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlug => write!(
                f,
                "slug must contain only lowercase letters, digits, or hyphens"
            ),
            Self::InvalidPrice { value } => write!(f, "price '{value}' is not a valid amount"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::PriceOutOfRange => write!(f, "price is too large"),
            Self::NoTranslations => write!(f, "at least one translation is required"),
            Self::EmptyLocale { index } => {
                write!(f, "translation {index} must have a non-empty locale")
            }
            Self::EmptyName { locale } => {
                write!(f, "translation '{locale}' must have a non-empty name")
            }
            Self::DuplicateLocale { locale } => {
                write!(f, "locale '{locale}' appears more than once")
            }
            Self::PriceRangeInverted => write!(f, "minPrice must not exceed maxPrice"),
        }
    }
}

impl std::error::Error for PizzaValidationError {}

/// URL-safe unique identifier of a pizza (for example `quattro-formaggi`).
///
/// Input is trimmed, then must be non-empty and contain only lowercase ASCII
/// letters, digits, and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "quattro-formaggi")]
pub struct PizzaSlug(String);

impl PizzaSlug {
    /// Validate and construct a slug.
    pub fn new(slug: impl AsRef<str>) -> Result<Self, PizzaValidationError> {
        let slug = slug.as_ref().trim();
        let valid = !slug.is_empty()
            && slug
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        if !valid {
            return Err(PizzaValidationError::InvalidSlug);
        }
        Ok(Self(slug.to_owned()))
    }
}

impl AsRef<str> for PizzaSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PizzaSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PizzaSlug {
    type Error = PizzaValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PizzaSlug> for String {
    fn from(value: PizzaSlug) -> Self {
        value.0
    }
}

/// Non-negative monetary amount held as integer cents.
///
/// Deserialises from a JSON number (`12.5`) or a decimal string (`"12.50"`)
/// and serialises as a two-decimal string so amounts never pass through
/// binary floating point on the way out.
///
/// # Examples
/// ```
/// use pizzeria::domain::Price;
///
/// let price: Price = "12.5".parse().expect("valid price");
/// assert_eq!(price.cents(), 1250);
/// assert_eq!(price.to_string(), "12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = String, example = "12.50")]
pub struct Price(i64);

impl Price {
    /// Build a price from cents.
    pub fn from_cents(cents: i64) -> Result<Self, PizzaValidationError> {
        if cents < 0 {
            return Err(PizzaValidationError::NegativePrice);
        }
        Ok(Self(cents))
    }

    /// Amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, failing on overflow.
    pub fn times(&self, quantity: i32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    fn from_f64(value: f64) -> Result<Self, PizzaValidationError> {
        if !value.is_finite() {
            return Err(PizzaValidationError::InvalidPrice {
                value: value.to_string(),
            });
        }
        if value < 0.0 {
            return Err(PizzaValidationError::NegativePrice);
        }
        let cents = (value * 100.0).round();
        if (cents - value * 100.0).abs() > 1e-6 {
            return Err(PizzaValidationError::InvalidPrice {
                value: value.to_string(),
            });
        }
        if cents > i64::MAX as f64 / 2.0 {
            return Err(PizzaValidationError::PriceOutOfRange);
        }
        Ok(Self(cents as i64))
    }
}

impl std::str::FromStr for Price {
    type Err = PizzaValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || PizzaValidationError::InvalidPrice {
            value: s.to_owned(),
        };
        if trimmed.starts_with('-') {
            return Err(PizzaValidationError::NegativePrice);
        }
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let digits_only = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) || fraction.len() > 2
        {
            return Err(invalid());
        }
        let whole: i64 = whole
            .parse()
            .map_err(|_| PizzaValidationError::PriceOutOfRange)?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .map(Self)
            .ok_or(PizzaValidationError::PriceOutOfRange)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative number or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|whole| whole.checked_mul(100))
                    .map(Price)
                    .ok_or_else(|| E::custom(PizzaValidationError::PriceOutOfRange))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                if v < 0 {
                    return Err(E::custom(PizzaValidationError::NegativePrice));
                }
                v.checked_mul(100)
                    .map(Price)
                    .ok_or_else(|| E::custom(PizzaValidationError::PriceOutOfRange))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Price::from_f64(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Localised name and description of a pizza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PizzaTranslation {
    #[schema(example = "pt-BR")]
    pub locale: String,
    #[schema(example = "Quatro Queijos")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Check that a translation set is usable: at least one entry, non-empty
/// locale and name, and no locale repeated.
pub fn validate_translations(
    translations: &[PizzaTranslation],
) -> Result<(), PizzaValidationError> {
    if translations.is_empty() {
        return Err(PizzaValidationError::NoTranslations);
    }
    let mut seen = HashSet::new();
    for (index, translation) in translations.iter().enumerate() {
        let locale = translation.locale.trim();
        if locale.is_empty() {
            return Err(PizzaValidationError::EmptyLocale { index });
        }
        if translation.name.trim().is_empty() {
            return Err(PizzaValidationError::EmptyName {
                locale: locale.to_owned(),
            });
        }
        if !seen.insert(locale) {
            return Err(PizzaValidationError::DuplicateLocale {
                locale: locale.to_owned(),
            });
        }
    }
    Ok(())
}

/// Persisted pizza with all translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    pub id: PizzaId,
    pub slug: PizzaSlug,
    pub price: Price,
    pub image_url: Option<String>,
    pub available: bool,
    pub translations: Vec<PizzaTranslation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pizza {
    /// Resolve display copy for `locale`, falling back to the first
    /// translation when the locale is absent or unknown.
    pub fn localize(self, locale: Option<&str>) -> LocalizedPizza {
        let chosen = locale
            .and_then(|wanted| self.translations.iter().find(|t| t.locale == wanted))
            .or_else(|| self.translations.first())
            .cloned();
        LocalizedPizza {
            name: chosen.as_ref().map(|t| t.name.clone()),
            description: chosen.and_then(|t| t.description),
            pizza: self,
        }
    }
}

/// Pizza with `name` and `description` resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedPizza {
    #[serde(flatten)]
    pub pizza: Pizza,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<Pizza> for LocalizedPizza {
    fn from(pizza: Pizza) -> Self {
        Self {
            pizza,
            name: None,
            description: None,
        }
    }
}

/// Fields required to create a pizza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PizzaDraft {
    pub slug: PizzaSlug,
    pub price: Price,
    pub image_url: Option<String>,
    pub available: bool,
    pub translations: Vec<PizzaTranslation>,
}

/// Partial update of a pizza. Present translations replace the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PizzaPatch {
    pub slug: Option<PizzaSlug>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub translations: Option<Vec<PizzaTranslation>>,
}

/// Menu listing filter. Price bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PizzaFilter {
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub locale: Option<String>,
}

impl PizzaFilter {
    /// Reject inverted price ranges.
    pub fn validate(&self) -> Result<(), PizzaValidationError> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) if min > max => Err(PizzaValidationError::PriceRangeInverted),
            _ => Ok(()),
        }
    }
}
