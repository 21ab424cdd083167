//! JavaScript reserved words (for identifier escaping in emitted code).

/// Reserved words, future reserved words and literals that cannot be used as plain identifiers.
pub const JS_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "eval", "export", "extends", "false", "finally", "for", "function", "if", "implements",
    "import", "in", "instanceof", "interface", "let", "new", "null", "package", "private", "protected", "public",
    "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void",
    "while", "with", "yield",
];

/// Suffix appended to identifiers that collide with a reserved word.
pub const ESCAPE_SUFFIX: char = '$';

/// Check whether an identifier is reserved in JavaScript.
pub fn is_reserved(name: &str) -> bool {
    JS_RESERVED.contains(&name)
}

/// Escape an identifier so it is usable in emitted JavaScript (`default` → `default$`).
pub fn escape_identifier(name: &str) -> String {
    if is_reserved(name) {
        format!("{}{}", name, ESCAPE_SUFFIX)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_words_only() {
        assert_eq!(escape_identifier("default"), "default$");
        assert_eq!(escape_identifier("value"), "value");
    }
}
