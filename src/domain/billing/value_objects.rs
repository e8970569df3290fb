use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid customer name: {0}")]
  InvalidCustomerName(String),
  #[error("Invalid item name: {0}")]
  InvalidItemName(String),
  #[error("Invalid price: {0}")]
  InvalidPrice(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
}

const MAX_NAME_LEN: usize = 255;

fn validated_name(value: &str, what: &str) -> Result<String, String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(format!("{} cannot be empty", what));
  }
  if trimmed.chars().count() > MAX_NAME_LEN {
    return Err(format!("{} cannot exceed {} characters", what, MAX_NAME_LEN));
  }
  Ok(trimmed.to_string())
}

/// Turns blank form input into `None` and trims the rest.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

// Customer Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerName(String);

impl CustomerName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    validated_name(&value, "Customer name")
      .map(Self)
      .map_err(ValueObjectError::InvalidCustomerName)
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for CustomerName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Item Name - catalog description printed on invoices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemName(String);

impl ItemName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    validated_name(&value, "Item name")
      .map(Self)
      .map_err(ValueObjectError::InvalidItemName)
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// Price - non-negative unit price, kept at full precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value.is_sign_negative() && !value.is_zero() {
      return Err(ValueObjectError::InvalidPrice(
        "Price cannot be negative".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn zero() -> Self {
    Self(Decimal::ZERO)
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

// Quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(Decimal);

impl Quantity {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be positive".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn one() -> Self {
    Self(Decimal::ONE)
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

/// Invoice number of the form `YYYY-NNNN`, sequential within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber {
  year: i32,
  sequence: u32,
}

impl InvoiceNumber {
  pub fn new(year: i32, sequence: u32) -> Result<Self, ValueObjectError> {
    if !(1000..=9999).contains(&year) {
      return Err(ValueObjectError::InvalidInvoiceNumber(format!(
        "Year must have four digits, got {}",
        year
      )));
    }
    if sequence == 0 {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Sequence starts at 1".to_string(),
      ));
    }
    Ok(Self { year, sequence })
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn sequence(&self) -> u32 {
    self.sequence
  }
}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{:04}", self.year, self.sequence)
  }
}

impl FromStr for InvoiceNumber {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ValueObjectError::InvalidInvoiceNumber(format!("Malformed number: {}", s));

    let (year, sequence) = s.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || sequence.len() < 4 {
      return Err(invalid());
    }
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let sequence = sequence.parse::<u32>().map_err(|_| invalid())?;
    Self::new(year, sequence)
  }
}

impl TryFrom<String> for InvoiceNumber {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<InvoiceNumber> for String {
  fn from(number: InvoiceNumber) -> Self {
    number.to_string()
  }
}

// Customer Details - optional fiscal and contact data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
  pub tax_id: Option<String>,
  pub address: Option<String>,
  pub city: Option<String>,
  pub postal_code: Option<String>,
  pub province: Option<String>,
  pub phone: Option<String>,
}

impl CustomerDetails {
  pub fn new(
    tax_id: Option<String>,
    address: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    province: Option<String>,
    phone: Option<String>,
  ) -> Self {
    Self {
      tax_id: normalize_optional(tax_id),
      address: normalize_optional(address),
      city: normalize_optional(city),
      postal_code: normalize_optional(postal_code),
      province: normalize_optional(province),
      phone: normalize_optional(phone),
    }
  }

  /// Postal code and city, followed by the province in parentheses.
  pub fn locality(&self) -> Option<String> {
    let place = [&self.postal_code, &self.city]
      .into_iter()
      .flatten()
      .cloned()
      .collect::<Vec<_>>()
      .join(" ");

    match (&self.province, place.is_empty()) {
      (None, true) => None,
      (None, false) => Some(place),
      (Some(province), true) => Some(format!("({})", province)),
      (Some(province), false) => Some(format!("{} ({})", place, province)),
    }
  }
}

/// Rounds to cents for display. Stored amounts keep full precision.
pub fn format_amount(amount: Decimal) -> String {
  let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("{:.2}", rounded)
}
