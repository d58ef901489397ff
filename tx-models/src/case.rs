//! Field-name mapping between model (snake_case) and wire (PascalCase) forms
//!
//! The rule is plain capitalization per underscore segment, with an exception
//! table for acronym segments that upper-case as a unit (`uri` -> `URI`,
//! `id` -> `ID`). The mapping is bidirectional and lossless: round-tripping
//! a name through both directions is the identity, which is what makes the
//! dictionary interchange format a hard compatibility surface.

/// Acronym segments that do not follow plain capitalization.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("uri", "URI"),
    ("url", "URL"),
    ("mptoken", "MPToken"),
];

/// Convert a snake_case model name to its PascalCase wire name.
pub fn to_wire_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for segment in name.split('_') {
        if segment.is_empty() {
            continue;
        }
        if let Some((_, wire)) = ABBREVIATIONS.iter().find(|(s, _)| *s == segment) {
            out.push_str(wire);
        } else {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Convert a PascalCase wire name back to its snake_case model name.
///
/// Abbreviation segments are matched greedily (longest first) and only when
/// the match ends at a segment boundary, so `MPTokenIssuanceID` splits as
/// `mptoken` / `issuance` / `id` rather than letter-by-letter.
pub fn to_model_name(name: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut rest = name;

    'outer: while !rest.is_empty() {
        let mut abbrevs: Vec<&(&str, &str)> = ABBREVIATIONS.iter().collect();
        abbrevs.sort_by_key(|(_, wire)| std::cmp::Reverse(wire.len()));
        for (snake, wire) in abbrevs {
            if let Some(after) = rest.strip_prefix(wire) {
                let boundary = after
                    .chars()
                    .next()
                    .map_or(true, |c| c.is_ascii_uppercase());
                if boundary {
                    segments.push((*snake).to_string());
                    rest = after;
                    continue 'outer;
                }
            }
        }
        // Plain segment: one leading character plus following lowercase/digits
        let mut len = rest.chars().next().map_or(0, char::len_utf8);
        for c in rest[len..].chars() {
            if c.is_ascii_uppercase() {
                break;
            }
            len += c.len_utf8();
        }
        segments.push(rest[..len].to_ascii_lowercase());
        rest = &rest[len..];
    }
    segments.join("_")
}
