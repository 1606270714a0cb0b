// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Label Normalizer
//!
//! Canonicalizes free-text attribute values into stable entity identifiers,
//! so `"Chicken Soup"`, `"chicken-soup"` and `"  CHICKEN_SOUP "` all land on
//! the same graph node `chicken_soup`.

/// Source-table marker for "value unknown"
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Normalized form of [`UNKNOWN_PLACEHOLDER`]
pub const UNKNOWN_ENTITY: &str = "unknown";

/// Token substituted for the less-than character (`"<30 mins"` → `less_than_30_mins`)
const LESS_THAN_TOKEN: &str = "less_than_";

/// Normalize a raw label into an entity identifier.
///
/// Spaces and hyphens fold to `_`, `>` is dropped, `<` becomes `less_than_`,
/// surrounding whitespace is trimmed and the result is lowercased. Trimming
/// runs before the replacements (so padding never turns into underscores) and
/// again after them (dropping `>` can expose whitespace at the edges), which
/// keeps `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .replace([' ', '-'], "_")
        .replace('>', "")
        .replace('<', LESS_THAN_TOKEN)
        .trim()
        .to_lowercase()
}

/// True for values that must never become graph nodes or edges
pub fn is_placeholder(normalized: &str) -> bool {
    normalized.is_empty() || normalized == UNKNOWN_ENTITY
}

/// Render an identifier for display: underscores back to spaces, title case.
pub fn display_label(identifier: &str) -> String {
    title_case(&identifier.replace('_', " "))
}

/// Title-case every alphabetic run: the first letter after any non-letter is
/// uppercased, the rest lowercased (`"low_fat"` → `"Low_Fat"`, `"o'neil"` →
/// `"O'Neil"`).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_alpha = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_case_and_separators() {
        assert_eq!(normalize("Chicken Soup"), "chicken_soup");
        assert_eq!(normalize("chicken-soup"), "chicken_soup");
        assert_eq!(normalize("  CHICKEN_SOUP "), "chicken_soup");
    }

    #[test]
    fn test_normalize_comparison_characters() {
        assert_eq!(normalize("<30 mins"), "less_than_30_mins");
        assert_eq!(normalize(">60 mins"), "60_mins");
        assert_eq!(normalize("Unknown"), UNKNOWN_ENTITY);
    }

    #[test]
    fn test_normalize_is_idempotent_on_edge_cases() {
        for raw in ["", " ", ">\t a", "<", "a<b>c", "Mixed-Case Value ", "\u{00a0}x\u{00a0}"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder(&normalize("UNKNOWN")));
        assert!(!is_placeholder("breakfast"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("low fat"), "Low Fat");
        assert_eq!(title_case("HIGH protein"), "High Protein");
        assert_eq!(title_case("less than 30 mins"), "Less Than 30 Mins");
        assert_eq!(display_label("middle_eastern"), "Middle Eastern");
    }
}
