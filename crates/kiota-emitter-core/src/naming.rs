//! Option key normalization.
//!
//! Hosts accept emitter options in both kebab-case (`client-class-name`) and
//! camelCase (`clientClassName`). Everything downstream of the option layer
//! only sees the camelCase form.
//!
//! | Input | Output |
//! |-------|--------|
//! | `output-path` | `outputPath` |
//! | `exclude-backward-compatible` | `excludeBackwardCompatible` |
//! | `outputPath` | `outputPath` |

use serde_json::{Map, Value};

/// Convert a kebab-case key to camelCase.
///
/// Only a hyphen followed by a lowercase ASCII letter is folded; any other
/// hyphen is kept as is, so the function is idempotent.
///
/// # Examples
///
/// ```
/// use kiota_emitter_core::kebab_to_camel;
///
/// assert_eq!(kebab_to_camel("client-class-name"), "clientClassName");
/// assert_eq!(kebab_to_camel("clientClassName"), "clientClassName");
/// ```
pub fn kebab_to_camel(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    result.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }

    result
}

/// Convert every key of an option map to camelCase.
///
/// When both spellings of the same option are present, the value given
/// under the camelCase spelling wins regardless of key order.
pub fn convert_kebab_to_camel(options: Map<String, Value>) -> Map<String, Value> {
    let mut result = Map::with_capacity(options.len());
    let mut compact = Vec::new();

    for (key, value) in options {
        let camel = kebab_to_camel(&key);
        if camel == key {
            compact.push((key, value));
        } else {
            result.insert(camel, value);
        }
    }

    for (key, value) in compact {
        result.insert(key, value);
    }

    result
}
