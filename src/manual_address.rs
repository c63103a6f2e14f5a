//! Builds the address string staged by the manual-entry page.

use crate::types::ManualAddressRecord;

/// Produces `"<addressLine1> - <postCode>"`.
///
/// `address_line2`, `town` and `county` are captured on the form but are not
/// part of the stored value, pending product sign-off.
pub fn compose_address(input: &ManualAddressRecord) -> String {
  format!("{} - {}", input.address_line1, input.post_code)
}
