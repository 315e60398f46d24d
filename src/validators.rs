// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Field Validators
//!
//! Total predicates over front-matter values. Each takes the value as it was
//! (or was not) found in the metadata block, so an absent field is simply
//! `None`.

use crate::frontmatter::FieldValue;
use crate::schema::FieldKind;

/// True iff the value is textual and has non-whitespace content.
pub fn is_non_empty_string(value: Option<&FieldValue>) -> bool {
    matches!(value, Some(FieldValue::Text(s)) if !s.trim().is_empty())
}

/// True iff the value is a finite number, or a string that trims to one.
///
/// ```
/// use labcontent::frontmatter::FieldValue;
/// use labcontent::validators::is_number_like;
///
/// assert!(is_number_like(Some(&FieldValue::Number(42.0))));
/// assert!(is_number_like(Some(&FieldValue::Text("3.14".into()))));
/// assert!(!is_number_like(Some(&FieldValue::Text("abc".into()))));
/// assert!(!is_number_like(None));
/// ```
pub fn is_number_like(value: Option<&FieldValue>) -> bool {
    value.and_then(FieldValue::as_number).is_some()
}

/// True iff the value is a non-empty list whose every element is a non-empty
/// string.
pub fn is_string_list(value: Option<&FieldValue>) -> bool {
    match value {
        Some(FieldValue::List(items)) => {
            !items.is_empty()
                && items.iter().all(|item| is_non_empty_string(Some(item)))
        }
        _ => false,
    }
}

/// Runs the validator that matches `kind`.
pub fn validate_field(kind: FieldKind, value: Option<&FieldValue>) -> bool {
    match kind {
        FieldKind::String => is_non_empty_string(value),
        FieldKind::Number => is_number_like(value),
        FieldKind::StringArray => is_string_list(value),
    }
}
