//! View model rendered by GET routes.

use serde::Serialize;
use serde_json::Value;

use super::{AddressOption, Route};

/// A field-level message shown next to a form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

/// What a page is rendered with: its name, pre-filled form data and any options or errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
  pub page: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub form_data: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address_options: Option<Vec<AddressOption>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub back_link: Option<String>,
  pub errors: Vec<FieldError>,
}

impl PageView {
  pub fn new(route: Route) -> Self {
    Self {
      page: route.name(),
      form_data: None,
      address_options: None,
      back_link: None,
      errors: vec![],
    }
  }

  pub fn with_form_data(mut self, form_data: Option<Value>) -> Self {
    self.form_data = form_data;
    self
  }

  pub fn with_address_options(mut self, options: Vec<AddressOption>) -> Self {
    self.address_options = Some(options);
    self
  }

  pub fn with_back_link(mut self, back_link: Option<String>) -> Self {
    self.back_link = back_link;
    self
  }

  pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
    self.errors.push(FieldError {
      field: field.into(),
      message: message.into(),
    });
    self
  }
}
