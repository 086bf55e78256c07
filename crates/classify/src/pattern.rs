use regex::Regex;

use crate::ClassifyError;

/// Case-insensitive file name wildcard (`*` any run, `?` any one character).
#[derive(Debug, Clone)]
pub struct Wildcard {
    source: String,
    regex: Regex,
}

impl Wildcard {
    pub fn new(pattern: &str) -> Result<Self, ClassifyError> {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push_str("(?i)^");
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                _ => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|source| ClassifyError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns `true` if the whole `name` matches.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_case_insensitive_and_anchored() {
        let w = Wildcard::new("GTA5.exe").unwrap();
        assert!(w.matches("gta5.EXE"));
        assert!(!w.matches("GTA5.exe.bak"));
        assert!(!w.matches("xGTA5.exe"));
    }

    #[test]
    fn dot_is_literal() {
        let w = Wildcard::new("a.rpf").unwrap();
        assert!(!w.matches("abrpf"));
    }

    #[test]
    fn star_and_question_mark() {
        let w = Wildcard::new("x64?.rpf").unwrap();
        assert!(w.matches("x64a.rpf"));
        assert!(!w.matches("x64.rpf"));

        let w = Wildcard::new("*.bsa").unwrap();
        assert!(w.matches("Skyrim - Textures0.bsa"));
        assert!(!w.matches("Skyrim.esm"));
        assert_eq!(w.as_str(), "*.bsa");
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let w = Wildcard::new("Spider-Man (1)+.exe").unwrap();
        assert!(w.matches("spider-man (1)+.exe"));
    }
}
