// protoc-gen-lbclient/src/names.rs

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn",
];

pub fn sanitize_ident(name: &str) -> String {
    if RUST_KEYWORDS.contains(&name) {
        // Use rust r# syntax for keywords
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Normalize a descriptor name to PascalCase.
///
/// Splits on underscores and uppercases the first letter of each segment, so
/// `order_service` becomes `OrderService` and an already-normalized name maps
/// to itself. Names that would start with a digit (or normalize to nothing)
/// get an `X` prefix to stay valid identifiers.
pub fn camel_case(name: &str) -> String {
    let mut out: String = name
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect();

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'X');
    }
    out
}

/// Convert a PascalCase name to snake_case, the convention the underlying
/// transport client uses for its module and method names.
pub fn snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
