//! The product record and its validation rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::amount::{from_json_number, to_json_number};
use common::{Currency, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::ValidationError;

/// Price in minor currency units (paise for INR, cents for USD).
///
/// The amount may carry a fractional part and is written to JSON as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    #[serde(with = "common::amount::json_number")]
    pub amount: Decimal,
    pub currency: Currency,
}

impl Price {
    pub fn new(amount: impl Into<Decimal>, currency: Currency) -> Self {
        Self {
            amount: amount.into(),
            currency,
        }
    }

    /// Human readable price, e.g. `₹500.00`.
    pub fn display(&self) -> String {
        self.currency.format_minor(self.amount)
    }
}

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub image: String,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Price as submitted by a client. Both fields are optional on the wire so
/// that a missing value is reported by name instead of as a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPrice {
    pub amount: Option<Number>,
    pub currency: Option<String>,
}

/// Unvalidated product payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub image: Option<String>,
    pub title: Option<String>,
    pub price: Option<NewPrice>,
    pub description: Option<String>,
}

/// A product payload that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProduct {
    pub image: String,
    pub title: String,
    pub price: Price,
    pub description: String,
}

impl NewProduct {
    /// Builds a fully populated payload.
    pub fn new(
        image: impl Into<String>,
        title: impl Into<String>,
        amount: impl Into<Decimal>,
        currency: Currency,
        description: impl Into<String>,
    ) -> Self {
        Self {
            image: Some(image.into()),
            title: Some(title.into()),
            price: Some(NewPrice {
                amount: to_json_number(&amount.into()),
                currency: Some(currency.code().to_string()),
            }),
            description: Some(description.into()),
        }
    }

    /// Checks required fields, the currency set and the non-negative amount.
    ///
    /// Fields are checked in document order and the first violation wins.
    pub fn validate(self) -> Result<ValidatedProduct, ValidationError> {
        let image = required_text("image", self.image)?;
        let title = required_text("title", self.title)?;
        let price = self.price.ok_or_else(|| ValidationError::required("price"))?;
        let amount = price
            .amount
            .ok_or_else(|| ValidationError::required("price.amount"))
            .and_then(|n| parse_amount(&n))?;
        let currency = match price.currency {
            None => Currency::default(),
            Some(code) => Currency::from_str(&code)
                .map_err(|e| ValidationError::new("price.currency", e.to_string()))?,
        };
        let description = required_text("description", self.description)?;

        Ok(ValidatedProduct {
            image,
            title,
            price: Price::new(amount, currency),
            description,
        })
    }
}

impl ValidatedProduct {
    /// Attaches the store-assigned identity.
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            image: self.image,
            title: self.title,
            price: self.price,
            description: self.description,
            created_at,
        }
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

fn parse_amount(n: &Number) -> Result<Decimal, ValidationError> {
    let amount = from_json_number(n)
        .ok_or_else(|| ValidationError::new("price.amount", "Price is out of range"))?;
    if amount < Decimal::ZERO {
        return Err(ValidationError::new("price.amount", "Price cannot be negative"));
    }
    Ok(amount)
}
