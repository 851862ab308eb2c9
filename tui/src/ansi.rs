//! ANSI-escape-to-styled-span translation.
//!
//! The table renderer emits plain text with embedded SGR color escapes;
//! the widget layer wants discrete styled spans. This module bridges the
//! two: it scans for escape introducers, extracts each SGR code body (the
//! text between the two-byte introducer and the terminating `m`, e.g.
//! `1`, `31`, `31;42`), and emits the text between introducers tagged
//! with whichever style was active when it was written.
//!
//! A code body of `0` resets the active style; any other body becomes the
//! new active style. Chunks that are empty or whitespace-only are emitted
//! untagged regardless of the active style. The trailing substring after
//! the final introducer is always emitted.
//!
//! Style tags are opaque: the translator knows span boundaries only, and
//! the renderer resolves tags to concrete colors via the style registry.
//! Concatenating the spans' text reproduces the input with well-formed
//! escape sequences removed.
//!
//! Pure per call; no state is shared across invocations.

const INTRODUCER: char = '\x1b';
const TERMINATOR: char = 'm';
const RESET: &str = "0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnsiSpan {
    /// SGR code body active for this span, or `None` for bare text.
    pub style: Option<String>,
    pub text: String,
}

impl AnsiSpan {
    fn bare(text: &str) -> Self {
        Self {
            style: None,
            text: text.to_string(),
        }
    }

    fn tagged(active: Option<&str>, text: &str) -> Self {
        match active {
            Some(style) if !text.trim().is_empty() => Self {
                style: Some(style.to_string()),
                text: text.to_string(),
            },
            _ => Self::bare(text),
        }
    }
}

/// Decompose `text` into ordered style spans.
pub fn translate(text: &str) -> Vec<AnsiSpan> {
    let mut spans = Vec::new();
    let mut active: Option<String> = None;
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(INTRODUCER) {
        let esc = cursor + rel;
        spans.push(AnsiSpan::tagged(active.as_deref(), &text[cursor..esc]));

        let Some(m_rel) = text[esc..].find(TERMINATOR) else {
            // Unterminated sequence: surface the remainder verbatim.
            cursor = esc;
            break;
        };
        let m = esc + m_rel;

        // Body sits past the two-byte `ESC [` introducer. `get` rather
        // than slicing keeps arbitrary (non-SGR) input panic-free.
        let body = text.get((esc + 2).min(m)..m).unwrap_or("");
        active = if body == RESET {
            None
        } else {
            Some(body.to_string())
        };
        cursor = m + 1;
    }

    spans.push(AnsiSpan::tagged(active.as_deref(), &text[cursor..]));
    spans
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn styled(style: &str, text: &str) -> AnsiSpan {
        AnsiSpan {
            style: Some(style.to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn splits_on_style_boundaries() {
        let spans = translate("A\x1b[31mB\x1b[0mC");
        assert_eq!(
            spans,
            vec![AnsiSpan::bare("A"), styled("31", "B"), AnsiSpan::bare("C")]
        );
    }

    #[test]
    fn plain_text_is_one_bare_span() {
        assert_eq!(translate("no escapes here"), vec![AnsiSpan::bare("no escapes here")]);
    }

    #[test]
    fn compound_bodies_are_kept_verbatim() {
        let spans = translate("\x1b[31;42mX\x1b[0m");
        assert_eq!(spans[1], styled("31;42", "X"));
    }

    #[test]
    fn style_persists_until_reset() {
        let spans = translate("\x1b[1mheader\x1b[31mbody");
        assert_eq!(spans[1], styled("1", "header"));
        assert_eq!(spans[2], styled("31", "body"));
    }

    #[test]
    fn whitespace_only_chunks_stay_untagged() {
        let spans = translate("\x1b[31m   \x1b[0mX");
        assert_eq!(spans[1], AnsiSpan::bare("   "));
    }

    #[test]
    fn trailing_substring_keeps_the_active_style() {
        let spans = translate("\x1b[32mstill green");
        assert_eq!(spans.last().unwrap(), &styled("32", "still green"));
    }

    #[test]
    fn unterminated_introducer_does_not_panic_or_drop_text() {
        let spans = translate("ok\x1b[31");
        let joined: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert!(joined.starts_with("ok"));
        assert!(joined.contains("\x1b[31"));
    }

    #[test]
    fn multibyte_text_between_escapes_survives() {
        let spans = translate("\x1b[31m海能达\x1b[0m 17.55");
        assert_eq!(spans[1], styled("31", "海能达"));
    }

    #[derive(Clone, Debug)]
    enum Chunk {
        Text(String),
        Code(String),
    }

    fn chunk() -> impl Strategy<Value = Chunk> {
        prop_oneof![
            "[a-zA-Z0-9 .,%+m-]{0,12}".prop_map(Chunk::Text),
            "[0-9]{1,2}(;[0-9]{1,2})?".prop_map(Chunk::Code),
        ]
    }

    proptest! {
        // Concatenating the spans reproduces the input minus well-formed
        // escape sequences, for any mix of text and SGR chunks.
        #[test]
        fn concatenation_reproduces_escape_free_input(
            chunks in prop::collection::vec(chunk(), 0..12),
        ) {
            let mut input = String::new();
            let mut plain = String::new();
            for c in &chunks {
                match c {
                    Chunk::Text(t) => {
                        input.push_str(t);
                        plain.push_str(t);
                    }
                    Chunk::Code(body) => {
                        input.push_str("\x1b[");
                        input.push_str(body);
                        input.push('m');
                    }
                }
            }

            let joined: String = translate(&input).iter().map(|s| s.text.as_str()).collect();
            prop_assert_eq!(joined, plain);
        }
    }
}
