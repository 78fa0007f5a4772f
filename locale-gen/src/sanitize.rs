//! Identifier sanitization.
//!
//! Maps arbitrary human-authored strings (table names, entry keys, the class
//! prefix) onto C# identifiers. A single algorithm is driven by a small
//! [`SanitizePolicy`]; the named presets cover every call site in the crate.

/// Controls how [`sanitize`] treats hyphens and the first output character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SanitizePolicy {
    /// Emit `-` literally instead of dropping it.
    ///
    /// A hyphen marks a word boundary either way; this flag only decides
    /// whether the hyphen itself survives. A hyphen is never emitted as the
    /// first output character.
    pub keep_hyphens: bool,

    /// Upper-case the first output character when it is a letter.
    pub capitalize_first: bool,
}

impl SanitizePolicy {
    /// Class-name policy: hyphens kept, first letter capitalized.
    ///
    /// `"main-menu"` becomes `"Main-Menu"`.
    pub const CLASS_NAME: Self = Self {
        keep_hyphens: true,
        capitalize_first: true,
    };

    /// Member-name policy: hyphens become camel-case boundaries, the first
    /// letter is left as written.
    ///
    /// `"hello-world"` becomes `"helloWorld"`.
    pub const MEMBER_NAME: Self = Self {
        keep_hyphens: false,
        capitalize_first: false,
    };

    /// Property-name policy: hyphens become camel-case boundaries and the
    /// first letter is capitalized.
    ///
    /// This is what generated classes and accessors use, so every emitted
    /// name is a plain C# identifier. `"ok"` becomes `"Ok"`.
    pub const PROPERTY_NAME: Self = Self {
        keep_hyphens: false,
        capitalize_first: true,
    };

    /// Create a policy from its two flags.
    pub const fn new(keep_hyphens: bool, capitalize_first: bool) -> Self {
        Self {
            keep_hyphens,
            capitalize_first,
        }
    }
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        Self::MEMBER_NAME
    }
}

/// Sanitize `raw` into an identifier under `policy`.
///
/// Returns `None` when nothing usable is left, which callers treat as
/// "skip this table or entry". Only ASCII letters, ASCII digits and `_`
/// (plus `-` under [`SanitizePolicy::keep_hyphens`]) survive; everything
/// else is dropped. A result starting with a digit is prefixed with `_`.
///
/// # Example
///
/// ```rust
/// use locale_gen::sanitize::{sanitize, SanitizePolicy};
///
/// assert_eq!(sanitize("hello-world", SanitizePolicy::MEMBER_NAME).as_deref(), Some("helloWorld"));
/// assert_eq!(sanitize("main-menu", SanitizePolicy::CLASS_NAME).as_deref(), Some("Main-Menu"));
/// assert_eq!(sanitize("3rd_place", SanitizePolicy::MEMBER_NAME).as_deref(), Some("_3rd_place"));
/// assert_eq!(sanitize("  ", SanitizePolicy::MEMBER_NAME), None);
/// ```
pub fn sanitize(raw: &str, policy: SanitizePolicy) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let mut result = String::with_capacity(raw.len() + 1);
    let mut capitalize_next = policy.capitalize_first;

    for c in raw.chars() {
        if c == '-' {
            if policy.keep_hyphens && !result.is_empty() {
                result.push('-');
            }
            capitalize_next = true;
            continue;
        }

        if !c.is_ascii_alphanumeric() && c != '_' {
            continue;
        }

        if capitalize_next && c.is_ascii_alphabetic() {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        capitalize_next = false;
    }

    if result.is_empty() {
        return None;
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    Some(result)
}

/// Check whether `name` is already a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(raw: &str) -> Option<String> {
        sanitize(raw, SanitizePolicy::MEMBER_NAME)
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(member(""), None);
        assert_eq!(sanitize("", SanitizePolicy::CLASS_NAME), None);
    }

    #[test]
    fn test_only_dropped_characters_is_rejected() {
        assert_eq!(member("   "), None);
        assert_eq!(member("!@#$%^&*()"), None);
        assert_eq!(member("\u{00a0}\u{2003}"), None);
        assert_eq!(member("---"), None);
        assert_eq!(sanitize("---", SanitizePolicy::CLASS_NAME), None);
    }

    #[test]
    fn test_member_policy_camel_cases_hyphens() {
        assert_eq!(member("hello-world").as_deref(), Some("helloWorld"));
        assert_eq!(member("a-b-c").as_deref(), Some("aBC"));
        assert_eq!(member("Hello").as_deref(), Some("Hello"));
    }

    #[test]
    fn test_class_policy_keeps_hyphens_and_capitalizes() {
        assert_eq!(
            sanitize("main-menu", SanitizePolicy::CLASS_NAME).as_deref(),
            Some("Main-Menu")
        );
        assert_eq!(
            sanitize("-leading", SanitizePolicy::CLASS_NAME).as_deref(),
            Some("Leading")
        );
    }

    #[test]
    fn test_property_policy_capitalizes_first_letter() {
        let property = |raw| sanitize(raw, SanitizePolicy::PROPERTY_NAME);
        assert_eq!(property("ok").as_deref(), Some("Ok"));
        assert_eq!(property("UI Texts").as_deref(), Some("UITexts"));
        assert_eq!(property("menu-title").as_deref(), Some("MenuTitle"));
    }

    #[test]
    fn test_leading_digit_gets_underscore() {
        assert_eq!(member("3rd_place").as_deref(), Some("_3rd_place"));
        assert_eq!(member("42").as_deref(), Some("_42"));
        assert_eq!(
            sanitize("3rd_place", SanitizePolicy::PROPERTY_NAME).as_deref(),
            Some("_3rd_place")
        );
    }

    #[test]
    fn test_dropped_characters_do_not_consume_capitalization() {
        assert_eq!(member("foo- bar").as_deref(), Some("fooBar"));
        assert_eq!(
            sanitize(" ok", SanitizePolicy::PROPERTY_NAME).as_deref(),
            Some("Ok")
        );
    }

    #[test]
    fn test_non_ascii_letters_are_dropped() {
        assert_eq!(member("café").as_deref(), Some("caf"));
        assert_eq!(member("日本").as_deref(), None);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Ok"));
        assert!(is_identifier("_3rd"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("3rd"));
        assert!(!is_identifier("Main-Menu"));
    }
}
