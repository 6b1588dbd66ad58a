//! Identifier case conversion.

/// Convert an identifier to `snake_case`.
///
/// An underscore is inserted before every upper-case character except a
/// leading one, then the whole string is lower-cased. Runs of capitals are not
/// merged: `HTTPRequest` becomes `h_t_t_p_request`.
pub fn to_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}
