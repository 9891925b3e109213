//! Positional scanning over the catalog text: finding the array literal and
//! the span of every record inside it.

use super::ParseError;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Byte range of the content between the brackets of the array bound to `name`.
/// A text that is itself a bare array literal is accepted too.
pub fn locate_array(text: &str, name: &str) -> Result<Range<usize>, ParseError> {
    let open = find_array_open(text, name).ok_or_else(|| ParseError::ArrayNotFound(name.to_string()))?;

    let bytes = text.as_bytes();
    let close = find_matching(bytes, open, bytes.len()).ok_or_else(|| ParseError::Unterminated {
        name: name.to_string(),
        offset: open,
    })?;

    Ok(open + 1..close)
}

fn find_array_open(text: &str, name: &str) -> Option<usize> {
    let pattern = format!(r"\b(?:const|let|var)\s+{}\b", regex::escape(name));
    let declaration = Regex::new(&pattern).ok()?;

    if let Some(found) = declaration.find(text) {
        let equals = found.end() + text[found.end()..].find('=')?;
        let rest = &text[equals + 1..];
        let open = equals + 1 + (rest.len() - rest.trim_start().len());
        return (text.as_bytes().get(open) == Some(&b'[')).then_some(open);
    }

    let trimmed = text.trim_start();
    trimmed
        .starts_with('[')
        .then(|| text.len() - trimmed.len())
}

/// Spans of every record in the array content, relative to `content`.
///
/// Each `id` key outside string literals and comments anchors a record: the
/// nearest unmatched `{` before it opens the record and balanced brace
/// counting finds the close. A record whose close cannot be found before the
/// next record opens is cut there, so one damaged record never swallows its
/// neighbours.
#[must_use]
pub fn record_spans(content: &str) -> Vec<Range<usize>> {
    static ID_KEY: OnceLock<Regex> = OnceLock::new();
    let id_key = ID_KEY.get_or_init(|| {
        Regex::new(r#"(?m)(?:^|[{,])\s*(?P<key>id|'id'|"id")\s*:"#).expect("Invalid regex pattern defined in code")
    });

    let bytes = content.as_bytes();
    let literal = literal_mask(bytes);
    let mut opens: Vec<usize> = id_key
        .captures_iter(content)
        .filter(|caps| caps.get(0).is_some_and(|whole| !literal[whole.start()]))
        .filter_map(|caps| caps.name("key"))
        .filter_map(|key| enclosing_open_brace(bytes, &literal, key.start()))
        .collect();
    opens.sort_unstable();
    opens.dedup();

    opens
        .iter()
        .enumerate()
        .map(|(i, &open)| {
            let limit = opens.get(i + 1).copied().unwrap_or(bytes.len());
            find_matching(bytes, open, limit).map_or(open..limit, |close| open..close + 1)
        })
        .collect()
}

/// Walks backward from `before` to the nearest `{` not closed in between,
/// ignoring braces inside literals.
fn enclosing_open_brace(bytes: &[u8], literal: &[bool], before: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..before).rev() {
        if literal[i] {
            continue;
        }
        match bytes[i] {
            b'}' => depth += 1,
            b'{' if depth == 0 => return Some(i),
            b'{' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Index of the bracket closing the one at `open`, searching below `limit`.
/// Quoted strings and comments are skipped. A `'` or `"` string cannot span
/// lines, so an unbalanced quote only costs the rest of its line.
pub(crate) fn find_matching(bytes: &[u8], open: usize, limit: usize) -> Option<usize> {
    let (open_byte, close_byte) = match bytes.get(open)? {
        b'[' => (b'[', b']'),
        b'{' => (b'{', b'}'),
        _ => return None,
    };

    let limit = limit.min(bytes.len());
    let mut depth = 0usize;
    let mut i = open;

    while i < limit {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, quote, limit);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..limit]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(limit, |p| i + p);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = bytes
                    .get(i + 2..limit)
                    .and_then(|rest| rest.windows(2).position(|w| w == b"*/"))
                    .map_or(limit, |p| i + 2 + p + 2);
                continue;
            }
            b if b == open_byte => depth += 1,
            b if b == close_byte => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Flags every byte inside a string literal (after its opening quote) or a
/// comment, with the same quoting rules as `find_matching`.
pub(crate) fn literal_mask(bytes: &[u8]) -> Vec<bool> {
    let len = bytes.len();
    let mut mask = vec![false; len];
    let mut i = 0;

    while i < len {
        let (from, end) = match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => (i + 1, skip_string(bytes, i, quote, len)),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(len, |p| i + p);
                (i, end)
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = bytes[i + 2..]
                    .windows(2)
                    .position(|w| w == b"*/")
                    .map_or(len, |p| i + 2 + p + 2);
                (i, end)
            }
            _ => {
                i += 1;
                continue;
            }
        };

        mask[from.min(end)..end].fill(true);
        i = end.max(i + 1);
    }

    mask
}

/// Index just past the string that opens at `start`.
fn skip_string(bytes: &[u8], start: usize, quote: u8, limit: usize) -> usize {
    let mut i = start + 1;
    while i < limit {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_array_after_type_annotation() {
        let text = "export const scenarios: Scenario[] = [\n  { id: 'a' },\n];\n";
        let range = locate_array(text, "scenarios").unwrap();
        assert_eq!(text[range].trim(), "{ id: 'a' },");
    }

    #[test]
    fn test_locate_array_ignores_brackets_in_strings() {
        let text = "const scenarios = [{ id: 'a', title: 'Why ] matters' }];";
        let range = locate_array(text, "scenarios").unwrap();
        assert_eq!(&text[range], "{ id: 'a', title: 'Why ] matters' }");
    }

    #[test]
    fn test_locate_array_does_not_match_longer_names() {
        let text = "export const featuredScenarios = [];";
        assert_eq!(
            locate_array(text, "scenarios"),
            Err(ParseError::ArrayNotFound("scenarios".to_string()))
        );
    }

    #[test]
    fn test_locate_bare_array() {
        let text = "  [ { id: 'a' } ]";
        let range = locate_array(text, "scenarios").unwrap();
        assert_eq!(text[range].trim(), "{ id: 'a' }");
    }

    #[test]
    fn test_locate_array_unterminated() {
        let text = "export const scenarios = [ { id: 'a' },";
        assert_eq!(
            locate_array(text, "scenarios"),
            Err(ParseError::Unterminated {
                name: "scenarios".to_string(),
                offset: 25
            })
        );
    }

    #[test]
    fn test_record_spans() {
        let content = "\n  { id: 'a', title: '{braces}' },\n  {\n    id: 'b',\n  },\n";
        let spans = record_spans(content);
        assert_eq!(spans.len(), 2);
        assert_eq!(&content[spans[0].clone()], "{ id: 'a', title: '{braces}' }");
        assert!(content[spans[1].clone()].contains("id: 'b'"));
    }

    #[test]
    fn test_record_spans_ignore_keys_ending_in_id() {
        let content = "{ videoId: 'x', id: 'a' }";
        assert_eq!(record_spans(content), vec![0..content.len()]);
    }

    #[test]
    fn test_record_spans_ignore_id_inside_strings() {
        let content = "\n  {\n    id: 'a',\n    keyInsight: 'Pin it like {name, id: 42} everywhere.',\n    featured: true,\n  },\n";
        let spans = record_spans(content);
        assert_eq!(spans.len(), 1);
        assert!(content[spans[0].clone()].ends_with("featured: true,\n  }"));
    }

    #[test]
    fn test_record_spans_ignore_commented_records() {
        let content = "// { id: 'old' },\n/* { id: 'older' } */\n{ id: 'a' }";
        let spans = record_spans(content);
        assert_eq!(spans.len(), 1);
        assert_eq!(&content[spans[0].clone()], "{ id: 'a' }");
    }

    #[test]
    fn test_literal_mask() {
        let text = "{ a: 'x}', // c\n b }";
        let mask = literal_mask(text.as_bytes());
        let flagged: String = text
            .char_indices()
            .filter(|&(i, _)| mask[i])
            .map(|(_, c)| c)
            .collect();
        assert_eq!(flagged, "x}'// c");
    }

    #[test]
    fn test_damaged_record_does_not_swallow_next() {
        let content = "{ id: 'a', title: 'broken {\n },\n{ id: 'b' }";
        let spans = record_spans(content);
        assert_eq!(spans.len(), 2);
        assert_eq!(&content[spans[1].clone()], "{ id: 'b' }");
    }
}
