use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<u64>().map(Self)
    }
}

/// A catalog entry exactly as it is stored in the catalog file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    #[serde(with = "price_number")]
    pub price: Decimal,
    pub thumbnail: String,
    pub code: String,
    pub stock: u64,
}

/// Creation input. Every field is optional so that absent values reach
/// validation and are reported together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub thumbnail: Option<String>,
    pub code: Option<String>,
    pub stock: Option<u64>,
}

impl NewProduct {
    /// Fields that are absent or falsy. Zero counts as missing for `price`
    /// and `stock`, and the empty string counts as missing for text.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !has_text(&self.title) {
            missing.push("title");
        }
        if !has_text(&self.description) {
            missing.push("description");
        }
        if self.price.map_or(true, |price| price.is_zero()) {
            missing.push("price");
        }
        if !has_text(&self.thumbnail) {
            missing.push("thumbnail");
        }
        if !has_text(&self.code) {
            missing.push("code");
        }
        if self.stock.map_or(true, |stock| stock == 0) {
            missing.push("stock");
        }
        missing
    }

    pub fn into_product(self, id: ProductId) -> Result<Product, DomainError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::MissingRequiredFields {
                fields: missing.into_iter().map(str::to_owned).collect(),
            });
        }

        match (self.title, self.description, self.price, self.thumbnail, self.code, self.stock) {
            (
                Some(title),
                Some(description),
                Some(price),
                Some(thumbnail),
                Some(code),
                Some(stock),
            ) => Ok(Product { id, title, description, price, thumbnail, code, stock }),
            _ => Err(DomainError::InvariantViolation(
                "validated product input lost a required field".to_owned(),
            )),
        }
    }
}

/// Partial update. `None` keeps the current value of the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub thumbnail: Option<String>,
    pub code: Option<String>,
    pub stock: Option<u64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, current: &Product) -> Result<Product, DomainError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("thumbnail", &self.thumbnail),
            ("code", &self.code),
        ] {
            if matches!(value, Some(text) if text.is_empty()) {
                return Err(DomainError::EmptyField { field: field.to_owned() });
            }
        }

        Ok(Product {
            id: current.id,
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            description: self.description.clone().unwrap_or_else(|| current.description.clone()),
            price: self.price.unwrap_or(current.price),
            thumbnail: self.thumbnail.clone().unwrap_or_else(|| current.thumbnail.clone()),
            code: self.code.clone().unwrap_or_else(|| current.code.clone()),
            stock: self.stock.unwrap_or(current.stock),
        })
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|text| !text.is_empty())
}

/// Prices are written as plain JSON numbers: integral values without a
/// fractional part, everything else as a float.
mod price_number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract().is_zero() {
            if let Some(whole) = value.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        match value.to_f64() {
            Some(float) => serializer.serialize_f64(float),
            None => Err(serde::ser::Error::custom(format!("price `{value}` is not representable"))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}
