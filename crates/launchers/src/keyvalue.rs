//! Line-oriented reader for text key-value files (`"key"  "value"`).
//!
//! Used for `libraryfolders.vdf` and `appmanifest_*.acf`. Nesting braces are
//! ignored: every line is read as a flat list of quoted tokens, which is all
//! the library scan needs. Lines with an unterminated quote keep only the
//! tokens closed before the break.

/// Splits a line into its quoted tokens, resolving `\\` and `\"` escapes.
pub fn quoted_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }

        let mut token = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    closed = true;
                    break;
                }
                '\\' => match chars.next() {
                    Some(escaped @ ('\\' | '"')) => token.push(escaped),
                    Some(other) => {
                        token.push('\\');
                        token.push(other);
                    }
                    None => token.push('\\'),
                },
                _ => token.push(c),
            }
        }

        if !closed {
            break;
        }
        tokens.push(token);
    }

    tokens
}

/// Returns the `n`-th quoted token of the first line whose leading token is
/// `key` (case-insensitive). Token `0` is the key itself.
pub fn nth_token_after_key(content: &str, key: &str, n: usize) -> Option<String> {
    content.lines().find_map(|line| {
        let mut tokens = quoted_tokens(line);
        match tokens.first() {
            Some(first) if first.eq_ignore_ascii_case(key) && n < tokens.len() => {
                Some(tokens.swap_remove(n))
            }
            _ => None,
        }
    })
}

/// Returns the value of the first `"key" "value"` line for `key`.
pub fn value_of(content: &str, key: &str) -> Option<String> {
    nth_token_after_key(content, key, 1)
}

/// Returns every value of `"key" "value"` lines for `key`, in file order.
pub fn values_of(content: &str, key: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let mut tokens = quoted_tokens(line);
            if tokens.len() >= 2 && tokens[0].eq_ignore_ascii_case(key) {
                Some(tokens.swap_remove(1))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_from_tab_separated_pair() {
        assert_eq!(quoted_tokens("\t\t\"appid\"\t\t\"271590\""), vec!["appid", "271590"]);
    }

    #[test]
    fn tokens_resolve_escapes() {
        assert_eq!(
            quoted_tokens(r#""path"  "D:\\SteamLibrary""#),
            vec!["path", r"D:\SteamLibrary"]
        );
        assert_eq!(quoted_tokens(r#""name" "Say \"hi\"""#), vec!["name", r#"Say "hi""#]);
    }

    #[test]
    fn unterminated_quote_drops_tail() {
        assert_eq!(quoted_tokens(r#""path" "D:\Steam"#), vec!["path"]);
        assert!(quoted_tokens("{").is_empty());
    }

    #[test]
    fn value_of_is_case_insensitive_and_first_wins() {
        let content = "\"AppState\"\n{\n\t\"AppID\"\t\"10\"\n\t\"appid\"\t\"20\"\n}\n";
        assert_eq!(value_of(content, "appid").as_deref(), Some("10"));
        assert_eq!(value_of(content, "name"), None);
    }

    #[test]
    fn nth_token_beyond_line_is_none() {
        let content = "\"key\" \"a\" \"b\"\n";
        assert_eq!(nth_token_after_key(content, "key", 2).as_deref(), Some("b"));
        assert_eq!(nth_token_after_key(content, "key", 3), None);
    }

    #[test]
    fn key_without_value_is_skipped() {
        let content = "\"name\"\n\"name\" \"Second\"\n";
        assert_eq!(value_of(content, "name").as_deref(), Some("Second"));
    }

    #[test]
    fn values_of_collects_in_order() {
        let content = "\"path\" \"/a\"\n\"label\" \"\"\n\"path\" \"/b\"\n\"path\"\n";
        assert_eq!(values_of(content, "path"), vec!["/a", "/b"]);
    }
}
