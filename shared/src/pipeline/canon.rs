use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical investor-category keys, in chart/legend order, with the
/// human-readable label shown to users. Column matching is by substring
/// containment against the canonical header key, so "Inst. Financeira"
/// and "Inst Financeira" both land on `instfinanceira`.
pub const CATEGORIES: [(&str, &str); 5] = [
    ("estrangeiro", "Estrangeiro"),
    ("institucional", "Institucional"),
    ("pessoafisica", "Pessoa Física"),
    ("instfinanceira", "Inst. Financeira"),
    ("outros", "Outros"),
];

/// Column key of the date column after canonicalization.
pub const DATE_KEY: &str = "data";

/// Reduces a header to a stable lookup key: canonical decomposition,
/// combining marks dropped, lowercased, spaces and periods removed.
/// Every later column lookup is an exact match on this key.
pub fn canonical_key(header: &str) -> String {
    header
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| *c != ' ' && *c != '.')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_punctuation_stripped() {
        assert_eq!(canonical_key("Pessoa Física"), "pessoafisica");
        assert_eq!(canonical_key("Pessoa Fisica"), "pessoafisica");
        assert_eq!(canonical_key("Inst. Financeira"), "instfinanceira");
        assert_eq!(canonical_key("ESTRANGEIRO"), "estrangeiro");
    }

    #[test]
    fn test_idempotent() {
        for header in ["Pessoa Física", "Inst. Financeira", "Data", "outros", "ação õ Ç"] {
            let once = canonical_key(header);
            assert_eq!(canonical_key(&once), once);
        }
    }

    #[test]
    fn test_plain_ascii_is_a_fixed_point() {
        assert_eq!(canonical_key("institucional"), "institucional");
    }
}
