use crate::tree::{Inline, Remark, RemarkStatus};

const REMARK_OPEN: &str = "[[";
const REMARK_CLOSE: &str = "]]";

/// Split a span of text into plain text and `[[...]]` remarks, in source order.
///
/// Remarks are matched with balanced brackets, so a remark may contain further
/// remarks. An opening `[[` without a matching `]]` stays plain text. Empty
/// text fragments are never emitted.
pub fn split_remarks(text: &str) -> Vec<Inline> {
    let spans = remark_spans(text);
    let mut next = 0;
    collect_inlines(text, 0, text.len(), &spans, &mut next)
}

fn remark_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut opens = Vec::new();
    let mut spans = Vec::new();
    let mut index = 0;

    while index + 1 < bytes.len() {
        match (bytes[index], bytes[index + 1]) {
            (b'[', b'[') => {
                opens.push(index);
                index += 2;
            }
            (b']', b']') if !opens.is_empty() => {
                if let Some(open) = opens.pop() {
                    spans.push((open, index));
                }
                index += 2;
            }
            _ => index += 1,
        }
    }

    spans.sort_unstable();
    spans
}

fn collect_inlines(
    text: &str,
    start: usize,
    end: usize,
    spans: &[(usize, usize)],
    next: &mut usize,
) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut plain_start = start;

    while let Some(&(open, close)) = spans.get(*next) {
        if open >= end {
            break;
        }
        *next += 1;

        push_text(&mut inlines, &text[plain_start..open]);
        inlines.push(Inline::Remark(Remark {
            status: RemarkStatus::Editorial,
            content: collect_inlines(text, open + REMARK_OPEN.len(), close, spans, next),
        }));
        plain_start = close + REMARK_CLOSE.len();
    }

    push_text(&mut inlines, &text[plain_start..end]);
    inlines
}

fn push_text(inlines: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        inlines.push(Inline::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::inline_text;

    fn remark(text: &str) -> Inline {
        Inline::Remark(Remark {
            status: RemarkStatus::Editorial,
            content: vec![Inline::Text(text.to_string())],
        })
    }

    #[test]
    fn plain_text_is_a_single_fragment() {
        assert_eq!(
            split_remarks("simple text"),
            vec![Inline::Text("simple text".to_string())]
        );
    }

    #[test]
    fn adjacent_remarks_leave_no_empty_fragment() {
        assert_eq!(
            split_remarks("simple [[remark]][[another]] text"),
            vec![
                Inline::Text("simple ".to_string()),
                remark("remark"),
                remark("another"),
                Inline::Text(" text".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_inside_remarks_is_kept() {
        assert_eq!(split_remarks("[[ another remark]]"), vec![remark(" another remark")]);
    }

    #[test]
    fn unterminated_remark_stays_text() {
        assert_eq!(
            split_remarks("see [[note without end"),
            vec![Inline::Text("see [[note without end".to_string())]
        );
    }

    #[test]
    fn inner_remark_matches_when_outer_is_unterminated() {
        assert_eq!(
            split_remarks("[[a [[b]]"),
            vec![Inline::Text("[[a ".to_string()), remark("b")]
        );
    }

    #[test]
    fn remarks_nest() {
        let inlines = split_remarks("x [[amended [[twice]] here]] y");
        assert_eq!(inlines.len(), 3);
        let Inline::Remark(outer) = &inlines[1] else {
            panic!("expected a remark, got {:?}", inlines[1]);
        };
        assert_eq!(
            outer.content,
            vec![
                Inline::Text("amended ".to_string()),
                remark("twice"),
                Inline::Text(" here".to_string()),
            ]
        );
    }

    #[test]
    fn split_is_lossless() {
        for text in [
            "a [[b]] c",
            "[[[a]]]",
            "[[x]]]] trailing",
            "nested [[one [[two]] ]] done",
            "[[",
            "]]",
        ] {
            assert_eq!(inline_text(&split_remarks(text)), text);
        }
    }

    #[test]
    fn unterminated_openings_are_scanned_once() {
        let text = "[[".repeat(40_000);
        let started = std::time::Instant::now();

        assert_eq!(split_remarks(&text), vec![Inline::Text(text.clone())]);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
