//! Recovery of a JSON object from free-form reasoning-service output
//!
//! The service is instructed to return bare JSON but routinely wraps it in
//! prose or markdown fences. This scans for the first well-balanced object
//! literal, respecting string literals and escapes.

/// First balanced `{...}` region of `text`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;

        if let Some(end) = balanced_end(&text[start..]) {
            return Some(&text[start..start + end]);
        }

        // This opening brace never balances; try the next one.
        search_from = start + 1;
    }

    None
}

/// Byte length of the balanced object starting at the first character of
/// `text` (which must be `{`), or `None` if it never closes.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
