use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

/// Raw per-field validation codes as the backend sends them.
pub type ValidationCodes = HashMap<String, u32>;

/// Per-field validation messages ready for display.
pub type ValidationMessages = HashMap<String, String>;

static CATALOG: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "Required field"),
        (2, "Invalid keystore JSON"),
        (3, "Password too short"),
        (4, "Incorrect password"),
        (5, "Invalid address"),
        (6, "Account name already in use"),
        (7, "Insufficient balance"),
        (8, "Invalid amount"),
        (9, "Invalid gas price"),
        (10, "Invalid gas limit"),
    ])
});

/// Translate raw codes through the catalog. A code with no catalog entry
/// produces no entry for its field; the backend accepted the request, so a
/// missing display string must not fail the call.
pub fn translate(codes: &ValidationCodes) -> ValidationMessages {
    codes
        .iter()
        .filter_map(|(field, code)| match CATALOG.get(code) {
            Some(message) => Some((field.clone(), (*message).to_string())),
            None => {
                warn!(
                    field = field.as_str(),
                    code = *code,
                    "no catalog entry for validation code"
                );
                None
            }
        })
        .collect()
}
