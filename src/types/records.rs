//! Typed waypoint records stored in the journey context.

use serde::{Deserialize, Serialize};

/// `post-code` record: the postcode last searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCodeRecord {
  pub postcode: String,
}

/// A single chosen or confirmed address (`post-code-results`, `address-confirmation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
  pub address: String,
}

impl AddressRecord {
  pub fn new(address: impl Into<String>) -> Self {
    Self {
      address: address.into(),
    }
  }

  /// True when the address carries a non-blank value.
  pub fn is_present(&self) -> bool {
    !self.address.trim().is_empty()
  }
}

/// `found-addresses-data`: verbatim result of the last lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoundAddresses {
  pub addresses: Vec<String>,
}

/// `edit` flag entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFlag {
  pub edit: bool,
}

/// `address-manual` record: the fields a user typed on the manual-entry page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAddressRecord {
  #[serde(default)]
  pub address_line1: String,
  #[serde(default)]
  pub address_line2: String,
  #[serde(default)]
  pub town: String,
  #[serde(default)]
  pub county: String,
  #[serde(default)]
  pub post_code: String,
}

/// One selectable option on the results page; `value` and `text` are the raw address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressOption {
  pub value: String,
  pub text: String,
}

impl AddressOption {
  pub fn from_address(address: &str) -> Self {
    Self {
      value: address.to_string(),
      text: address.to_string(),
    }
  }
}
