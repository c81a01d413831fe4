//! Apply-price payload validation.
//!
//! The body is validated from raw JSON instead of a typed extractor so that
//! every missing field is reported in one response and presence rules
//! (null and blank strings count as missing) stay explicit.

use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::gateway::error::GatewayError;

/// Catalog entry identifier, kept in the JSON shape the client sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductId {
    Text(String),
    Number(Number),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Validated body of an apply-price action.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyPricePayload {
    pub product_id: ProductId,
    pub new_price: Number,
}

/// Body forwarded to the upstream apply endpoint.
#[derive(Debug, Serialize)]
pub struct UpstreamApplyBody<'a> {
    pub product_id: &'a ProductId,
    pub new_price: &'a Number,
    pub apply_to_shopify: bool,
}

enum Field<T> {
    Missing,
    Invalid(&'static str),
    Present(T),
}

impl ApplyPricePayload {
    /// Validate a decoded request body.
    pub fn from_json(body: &Value) -> Result<Self, GatewayError> {
        let product_id = product_id_field(body.get("product_id"));
        let new_price = new_price_field(body.get("new_price"));

        let mut missing = Vec::new();
        if matches!(product_id, Field::Missing) {
            missing.push("product_id");
        }
        if matches!(new_price, Field::Missing) {
            missing.push("new_price");
        }
        if !missing.is_empty() {
            return Err(GatewayError::MissingFields(missing));
        }

        match (product_id, new_price) {
            (Field::Present(product_id), Field::Present(new_price)) => Ok(Self {
                product_id,
                new_price,
            }),
            (Field::Invalid(reason), _) => Err(GatewayError::InvalidField {
                field: "product_id",
                reason,
            }),
            (_, Field::Invalid(reason)) => Err(GatewayError::InvalidField {
                field: "new_price",
                reason,
            }),
            _ => Err(GatewayError::Internal("unreachable payload state".into())),
        }
    }

    /// Upstream body with the permanent-apply flag set.
    pub fn upstream_body(&self) -> UpstreamApplyBody<'_> {
        UpstreamApplyBody {
            product_id: &self.product_id,
            new_price: &self.new_price,
            apply_to_shopify: true,
        }
    }
}

fn product_id_field(value: Option<&Value>) -> Field<ProductId> {
    match value {
        None | Some(Value::Null) => Field::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => Field::Missing,
        Some(Value::String(s)) => Field::Present(ProductId::Text(s.clone())),
        Some(Value::Number(n)) => Field::Present(ProductId::Number(n.clone())),
        Some(_) => Field::Invalid("must be a string or number"),
    }
}

fn new_price_field(value: Option<&Value>) -> Field<Number> {
    match value {
        None | Some(Value::Null) => Field::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => Field::Missing,
        Some(Value::Number(n)) => Field::Present(n.clone()),
        Some(_) => Field::Invalid("must be a number"),
    }
}
