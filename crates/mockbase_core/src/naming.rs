//! Relation naming convention.
//!
//! # Responsibility
//! - Derive foreign-key field names from collection names.
//! - Map between singular and plural collection names for embedding.
//!
//! # Invariants
//! - `foreign_key(name)` is `singularize(name) + "Id"` for the default rules.
//! - Implementations must be pure: same input, same output.

/// Pluggable naming rules used to discover implicit relations.
pub trait NamingConvention {
    /// Returns the singular form of a collection name.
    fn singularize(&self, name: &str) -> String;

    /// Returns the plural form of a singular resource name.
    fn pluralize(&self, name: &str) -> String;

    /// Returns the field a child record uses to reference a parent in `collection`.
    fn foreign_key(&self, collection: &str) -> String {
        format!("{}Id", self.singularize(collection))
    }
}

/// Irregular nouns that show up in typical mock datasets.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("movie", "movies"),
    ("cookie", "cookies"),
];

/// Words whose singular and plural forms are identical.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "information",
    "media",
    "news",
    "series",
    "species",
    "sheep",
    "fish",
];

/// Default English inflection rules (suffix based, ASCII lowercase aware).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNaming;

impl NamingConvention for EnglishNaming {
    fn singularize(&self, name: &str) -> String {
        let lower = name.to_ascii_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return name.to_string();
        }
        if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
            return match_case(name, singular);
        }
        if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
            return name.to_string();
        }

        if let Some(stem) = strip_suffix_ci(name, "ies") {
            if stem.len() > 1 {
                return format!("{stem}y");
            }
        }
        for suffix in ["sses", "shes", "ches", "xes", "zes"] {
            if let Some(stem) = strip_suffix_ci(name, suffix) {
                return format!("{stem}{}", &suffix[..suffix.len() - 2]);
            }
        }
        if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
            return name.to_string();
        }
        if let Some(stem) = strip_suffix_ci(name, "s") {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
        name.to_string()
    }

    fn pluralize(&self, name: &str) -> String {
        let lower = name.to_ascii_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return name.to_string();
        }
        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
            return match_case(name, plural);
        }
        if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
            return name.to_string();
        }

        let bytes = lower.as_bytes();
        if lower.ends_with('y') && bytes.len() > 1 && !is_vowel(bytes[bytes.len() - 2]) {
            return format!("{}ies", &name[..name.len() - 1]);
        }
        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            return format!("{name}es");
        }
        format!("{name}s")
    }
}

fn strip_suffix_ci<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.len() < suffix.len() || !name.is_char_boundary(name.len() - suffix.len()) {
        return None;
    }
    let (stem, tail) = name.split_at(name.len() - suffix.len());
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

fn is_vowel(byte: u8) -> bool {
    matches!(byte, b'a' | b'e' | b'i' | b'o' | b'u')
}
