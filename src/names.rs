//! Airline display-name normalization.

/// Rewrites any name containing `needle` to `canonical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRule {
    pub needle: &'static str,
    pub canonical: &'static str,
}

/// Rules are tried in order; the first match wins. A rule's canonical name
/// must not itself contain any needle, which keeps normalization idempotent.
pub static NAME_RULES: &[NameRule] = &[NameRule {
    needle: "ExpressJet Airlines LLC d/b/a aha!",
    canonical: "ExpressJet Airlines LLC",
}];

/// Strips marketing suffixes from carrier names using [`NAME_RULES`].
pub fn normalize_airline_name(name: &str) -> &str {
    normalize_with(NAME_RULES, name)
}

/// Same as [`normalize_airline_name`] with a caller-supplied rule table.
pub fn normalize_with<'a>(rules: &'static [NameRule], name: &'a str) -> &'a str {
    rules
        .iter()
        .find(|rule| name.contains(rule.needle))
        .map_or(name, |rule| rule.canonical)
}
