//! Show records as published by the venue's listing endpoint.
//!
//! ## Observed upstream shape
//!
//! The listing wraps records as `{"returnShow": {"show": [...]}}`. Each record
//! carries `showId`, `showName`, `showDate`, `showTime` and `showPrice`.
//! `showId` and `showPrice` arrive as either JSON numbers or strings depending
//! on the record, so both are accepted. No field is guaranteed to be present;
//! completeness is checked where it matters (the report formatter).
//!
//! A value of the wrong kind (a price like `"חינם"`, a boolean id) reads as
//! absent with a warning instead of failing the whole listing.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// One performance from the venue listing, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRecord {
    #[serde(
        rename = "showId",
        alias = "id",
        default,
        deserialize_with = "de_opt_id"
    )]
    pub id: Option<String>,

    #[serde(rename = "showName", default)]
    pub display_name: Option<String>,

    #[serde(rename = "showDate", default)]
    pub date: Option<String>,

    #[serde(rename = "showTime", default)]
    pub time: Option<String>,

    #[serde(rename = "showPrice", default, deserialize_with = "de_opt_price")]
    pub price: Option<Decimal>,
}

impl ShowRecord {
    /// Display name, or `""` when the listing omitted it.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a show id as string or integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_owned()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() {
                tracing::warn!(value = v, "ignoring non-finite show id");
                return Ok(None);
            }
            // `12.0` is the same show as `12`.
            if v.fract().abs() < f64::EPSILON {
                return Ok(Some(format!("{v:.0}")));
            }
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            tracing::warn!(value = v, "ignoring boolean show id");
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

fn de_opt_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PriceVisitor;

    impl Visitor<'_> for PriceVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a price as number or numeric string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match Decimal::from_str(trimmed) {
                Ok(d) => Ok(Some(d.normalize())),
                Err(e) => {
                    tracing::warn!(value = v, error = %e, "ignoring non-numeric show price");
                    Ok(None)
                }
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            match Decimal::try_from(v) {
                Ok(d) => Ok(Some(d.normalize())),
                Err(e) => {
                    tracing::warn!(value = v, error = %e, "ignoring unrepresentable show price");
                    Ok(None)
                }
            }
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            tracing::warn!(value = v, "ignoring boolean show price");
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(PriceVisitor)
}
