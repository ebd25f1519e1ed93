//! Minimal JSON path resolution for response assertions.
//!
//! Supported syntax: `user.name`, `[0].email`, `users[1].id`, `items.len()`.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Field(String),
    Index(usize),
    Len,
}

/// Split a path into tokens. Panics on malformed brackets, since a bad path
/// is always a bug in the test itself.
pub fn tokenize_path(path: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        if segment == "len()" || segment == "size()" {
            tokens.push(PathToken::Len);
            continue;
        }
        let (field, mut rest) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };
        if !field.is_empty() {
            tokens.push(PathToken::Field(field.to_string()));
        }
        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped
                .find(']')
                .unwrap_or_else(|| panic!("unclosed bracket in JSON path \"{path}\""));
            let index = stripped[..end]
                .parse()
                .unwrap_or_else(|_| panic!("non-numeric index in JSON path \"{path}\""));
            tokens.push(PathToken::Index(index));
            rest = &stripped[end + 1..];
        }
        assert!(rest.is_empty(), "unexpected trailing text in JSON path \"{path}\"");
    }
    tokens
}

/// Resolve `path` against `root`. Missing fields and indices resolve to `null`.
pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root;
    let null = Value::Null;
    let tokens = tokenize_path(path);
    for (i, token) in tokens.iter().enumerate() {
        match token {
            PathToken::Field(name) => current = current.get(name).unwrap_or(&null),
            PathToken::Index(idx) => current = current.get(*idx).unwrap_or(&null),
            PathToken::Len => {
                let len = match current {
                    Value::Array(a) => a.len(),
                    Value::Object(o) => o.len(),
                    Value::String(s) => s.chars().count(),
                    other => panic!(
                        "len() applied to non-collection at segment {i} of \"{path}\": {other}"
                    ),
                };
                return Value::from(len);
            }
        }
    }
    current.clone()
}
