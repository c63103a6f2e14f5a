//! Tests for `Route`.

use super::Route;

#[test]
fn path_roundtrips_for_every_route() {
  for r in Route::ALL {
    assert_eq!(Route::from_path(r.path()), Some(r));
    assert_eq!(r.path(), format!("/{}", r.name()));
  }
}

#[test]
fn unknown_path_is_none() {
  assert_eq!(Route::from_path("/nowhere"), None);
  assert_eq!(Route::from_path("post-code"), None);
}

#[test]
fn display_is_path() {
  assert_eq!(Route::CheckYourAnswers.to_string(), "/check-your-answers");
}

#[test]
fn serializes_kebab_case() {
  let v = serde_json::to_value(Route::PostCodeResults).unwrap();
  assert_eq!(v, "post-code-results");
}
