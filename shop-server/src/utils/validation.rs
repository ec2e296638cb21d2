//! Input validation
//!
//! Field-level preconditions run before any mutation is attempted, so a
//! rejected payload never leaves partial state. Validation is an ordered
//! list of named rules evaluated in sequence; the first violated rule
//! produces the error.

use crate::utils::AppError;
use shared::models::{CategoryCreate, CategoryUpdate, ProductCreate, ProductUpdate, ReviewCreate};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and review comments
pub const MAX_TEXT_LEN: usize = 2000;

// ── Ordered rule evaluation ─────────────────────────────────────────

/// Ordered rule sequence; remembers only the first violation
#[derive(Default)]
pub struct Rules {
    first_violation: Option<(&'static str, String)>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. `ok = false` marks the rule violated; later rules
    /// cannot override an earlier violation.
    pub fn rule(mut self, name: &'static str, ok: bool, message: impl Into<String>) -> Self {
        if self.first_violation.is_none() && !ok {
            self.first_violation = Some((name, message.into()));
        }
        self
    }

    pub fn finish(self) -> Result<(), AppError> {
        match self.first_violation {
            None => Ok(()),
            Some((name, message)) => Err(AppError::validation(message).with_detail("rule", name)),
        }
    }
}

fn name_rules(rules: Rules, name: &str) -> Rules {
    rules
        .rule("name-not-blank", !name.trim().is_empty(), "name must not be blank")
        .rule(
            "name-length",
            name.len() <= MAX_NAME_LEN,
            format!("name is too long ({} chars, max {MAX_NAME_LEN})", name.len()),
        )
}

fn optional_text_rules(rules: Rules, field: &'static str, value: &Option<String>) -> Rules {
    let len = value.as_deref().map(str::len).unwrap_or(0);
    rules.rule(
        "text-length",
        len <= MAX_TEXT_LEN,
        format!("{field} is too long ({len} chars, max {MAX_TEXT_LEN})"),
    )
}

// ── Entity validators ───────────────────────────────────────────────

pub fn validate_product_create(data: &ProductCreate) -> Result<(), AppError> {
    let rules = name_rules(Rules::new(), &data.name);
    let rules = optional_text_rules(rules, "description", &data.description);
    rules
        .rule(
            "price-non-negative",
            data.price.is_finite() && data.price >= 0.0,
            "price must be a non-negative number",
        )
        .rule(
            "stock-non-negative",
            data.units_in_stock.unwrap_or(0) >= 0,
            "units_in_stock must be non-negative",
        )
        .rule(
            "discount-range",
            data.discount_percentage
                .map(|d| d.is_finite() && (0.0..=100.0).contains(&d))
                .unwrap_or(true),
            "discount_percentage must be between 0 and 100",
        )
        .finish()
}

pub fn validate_product_update(data: &ProductUpdate) -> Result<(), AppError> {
    let rules = match &data.name {
        Some(name) => name_rules(Rules::new(), name),
        None => Rules::new(),
    };
    let rules = optional_text_rules(rules, "description", &data.description);
    rules
        .rule(
            "price-non-negative",
            data.price.map(|p| p.is_finite() && p >= 0.0).unwrap_or(true),
            "price must be a non-negative number",
        )
        .rule(
            "stock-non-negative",
            data.units_in_stock.unwrap_or(0) >= 0,
            "units_in_stock must be non-negative",
        )
        .rule(
            "discount-range",
            data.discount_percentage
                .map(|d| d.is_finite() && (0.0..=100.0).contains(&d))
                .unwrap_or(true),
            "discount_percentage must be between 0 and 100",
        )
        .finish()
}

pub fn validate_category_create(data: &CategoryCreate) -> Result<(), AppError> {
    let rules = name_rules(Rules::new(), &data.name);
    optional_text_rules(rules, "description", &data.description).finish()
}

pub fn validate_category_update(data: &CategoryUpdate) -> Result<(), AppError> {
    let rules = match &data.name {
        Some(name) => name_rules(Rules::new(), name),
        None => Rules::new(),
    };
    optional_text_rules(rules, "description", &data.description).finish()
}

pub fn validate_review(data: &ReviewCreate) -> Result<(), AppError> {
    let rules = Rules::new().rule(
        "rating-range",
        (1..=5).contains(&data.rating),
        "rating must be between 1 and 5",
    );
    optional_text_rules(rules, "comment", &data.comment).finish()
}

/// Basket quantities must be at least 1
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    Rules::new()
        .rule(
            "quantity-at-least-one",
            quantity >= 1,
            "quantity must be at least 1",
        )
        .finish()
}
