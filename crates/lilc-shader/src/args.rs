//! Directive argument extraction.
//!
//! Container and overlay lines carry their arguments as `"quoted"` strings:
//! `lilSubShader "Default" BRP` or `Replace "!Outline" "from" "to"`.
//! Subshader tags are the exception and use braces: `lilSubShaderTags {"Queue" = "Geometry"}`.

use crate::consts::COMMENT;

/// Quoted arguments of a directive line, in order of appearance.
///
/// Quotes are paired left to right; a trailing unmatched quote is ignored.
/// No escape sequences are recognized inside quotes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QuotedArgs<'a> {
    values: Vec<&'a str>,
}

impl<'a> QuotedArgs<'a> {
    /// Extract all quoted arguments from `line`.
    ///
    /// # Example
    ///
    /// ```
    /// use lilc_shader::QuotedArgs;
    ///
    /// let args = QuotedArgs::parse(r#"Replace "Outline" "a" "b""#);
    /// assert_eq!(args.len(), 3);
    /// assert_eq!(args.get(1), Some("a"));
    /// ```
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let mut values = Vec::new();
        let mut remaining = line;

        while let Some(open) = remaining.find('"') {
            let after = &remaining[open + 1..];
            let Some(close) = after.find('"') else {
                break;
            };
            values.push(&after[..close]);
            remaining = &after[close + 1..];
        }

        Self { values }
    }

    /// Argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).copied()
    }

    /// First argument.
    #[must_use]
    pub fn first(&self) -> Option<&'a str> {
        self.get(0)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the line had no complete quoted argument.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// First quoted argument of `line`.
pub(crate) fn first_quoted(line: &str) -> Option<&str> {
    QuotedArgs::parse(line).first()
}

/// Text between the first `{` and the following `}`.
pub(crate) fn braced(line: &str) -> Option<&str> {
    let open = line.find('{')?;
    let after = &line[open + 1..];
    let close = after.find('}')?;
    Some(&after[..close])
}

/// Check if a comment marker precedes the first `delimiter` of `line`.
///
/// The delimiter itself is included in the inspected prefix. Without a
/// delimiter the whole line is inspected.
pub(crate) fn commented_before(line: &str, delimiter: char) -> bool {
    let end = line.find(delimiter).map_or(line.len(), |pos| pos + 1);
    line[..end].contains(COMMENT)
}

/// Check if a comment marker precedes the first quote of `line`.
pub(crate) fn commented_before_quote(line: &str) -> bool {
    commented_before(line, '"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_quotes() {
        let args = QuotedArgs::parse("lilSubShader BRP");
        assert!(args.is_empty());
        assert_eq!(args.first(), None);
    }

    #[test]
    fn test_parse_single() {
        let args = QuotedArgs::parse(r#"    lilSubShader "Default" BRP"#);
        assert_eq!(args.len(), 1);
        assert_eq!(args.first(), Some("Default"));
    }

    #[test]
    fn test_parse_three() {
        let args = QuotedArgs::parse(r#"Replace "!Outline" "_Color" "_MainColor""#);
        assert_eq!(args.get(0), Some("!Outline"));
        assert_eq!(args.get(1), Some("_Color"));
        assert_eq!(args.get(2), Some("_MainColor"));
        assert_eq!(args.get(3), None);
    }

    #[test]
    fn test_parse_empty_value() {
        let args = QuotedArgs::parse(r#"Replace "from" """#);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(1), Some(""));
    }

    #[test]
    fn test_parse_unterminated_quote_ignored() {
        let args = QuotedArgs::parse(r#"ShaderName "abc" "def"#);
        assert_eq!(args.len(), 1);
        assert_eq!(args.first(), Some("abc"));
    }

    #[test]
    fn test_braced() {
        assert_eq!(
            braced(r#"lilSubShaderTags {"Queue" = "Geometry"}"#),
            Some(r#""Queue" = "Geometry""#)
        );
        assert_eq!(braced("lilSubShaderTags"), None);
        assert_eq!(braced("lilSubShaderTags {open"), None);
    }

    #[test]
    fn test_commented_before_quote() {
        assert!(commented_before_quote(r#"//lilSubShader "Default""#));
        assert!(commented_before_quote(r#"    // lilProperties "Default""#));
        assert!(!commented_before_quote(r#"lilProperties "Default" // note"#));
        assert!(commented_before_quote("// lilSubShader BRP"));
        assert!(!commented_before_quote("lilSubShader BRP"));
    }

    #[test]
    fn test_commented_before_brace() {
        assert!(commented_before(r#"//lilSubShaderTags {"A" = "B"}"#, '{'));
        assert!(!commented_before(r#"lilSubShaderTags {"A" = "B"} // x"#, '{'));
    }

    #[test]
    fn test_first_quoted() {
        assert_eq!(first_quoted(r#"Shader "Hidden/lilToonX""#), Some("Hidden/lilToonX"));
        assert_eq!(first_quoted("Shader Hidden"), None);
    }
}
