use heck::ToPascalCase;

use crate::parse::operation::HttpMethod;

/// Canonicalize a definition name. Some documents use dotted model names;
/// each `.` followed by a word character is dropped and that character is
/// upper-cased, then the first character is upper-cased.
///
/// `abc.def.ghi` → `AbcDefGhi`
pub fn normalize_definition_name(name: &str) -> String {
    let mut joined = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '.'
            && let Some(&next) = chars.peek()
            && is_word_char(next)
        {
            joined.extend(next.to_uppercase());
            chars.next();
            continue;
        }
        joined.push(ch);
    }

    upper_first(&joined)
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive a function name from HTTP method + url.
///
/// Examples:
/// - `GET /pets` → `getPets`
/// - `DELETE /pets/{id}` → `deletePetsId`
/// - `POST /store/order-items` → `postStoreOrderItems`
pub fn function_name(method: HttpMethod, url: &str) -> String {
    let segments: String = url
        .split('/')
        .map(|seg| seg.trim_start_matches('{').trim_end_matches('}'))
        .filter(|seg| !seg.is_empty())
        .map(|seg| seg.to_pascal_case())
        .collect();

    format!("{}{segments}", method.as_str())
}

/// Whether `name` can be used as a bare JavaScript identifier or property key.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Render an object key, quoting it when it is not an identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// A double-quoted JS string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
