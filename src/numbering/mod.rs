use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::RenderError;
use crate::tree::{Blocklist, Inline, Item};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    Letter(u32),
    Roman(u32),
    LetterOrRoman { letter: u32, roman: u32 },
    Dotted(Vec<u32>),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Letter,
    Roman,
    Dotted(usize),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordinal {
    Index(u32),
    Path(Vec<u32>),
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub style: Style,
    pub last: Ordinal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Sibling,
    Nest(Style),
    Close(usize),
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    pub num: String,
    pub content: Option<Vec<Inline>>,
}

impl Level {
    pub fn open(style: Style, kind: &MarkerKind) -> Self {
        let last = ordinal_in(kind, &style).unwrap_or(Ordinal::Unordered);
        Self { style, last }
    }

    pub fn accepts_next(&self, kind: &MarkerKind) -> bool {
        match (&self.last, ordinal_in(kind, &self.style)) {
            (Ordinal::Unordered, Some(Ordinal::Unordered)) => true,
            (Ordinal::Index(last), Some(Ordinal::Index(value))) => value == last + 1,
            (Ordinal::Path(last), Some(Ordinal::Path(value))) => {
                same_parent(last, &value)
                    && matches!((last.last(), value.last()), (Some(tail), Some(next)) if *next == tail + 1)
            }
            _ => false,
        }
    }

    pub fn accepts_later(&self, kind: &MarkerKind) -> bool {
        match (&self.last, ordinal_in(kind, &self.style)) {
            (Ordinal::Index(last), Some(Ordinal::Index(value))) => value > *last,
            (Ordinal::Path(last), Some(Ordinal::Path(value))) => {
                same_parent(last, &value) && value.last() > last.last()
            }
            _ => false,
        }
    }

    fn advance(&mut self, kind: &MarkerKind) {
        if let Some(ordinal) = ordinal_in(kind, &self.style) {
            self.last = ordinal;
        }
    }
}

fn same_parent(left: &[u32], right: &[u32]) -> bool {
    let depth = left.len().saturating_sub(1);
    left.len() == right.len() && left[..depth] == right[..depth]
}

pub fn ordinal_in(kind: &MarkerKind, style: &Style) -> Option<Ordinal> {
    match (style, kind) {
        (Style::Letter, MarkerKind::Letter(value) | MarkerKind::LetterOrRoman { letter: value, .. }) => {
            Some(Ordinal::Index(*value))
        }
        (Style::Roman, MarkerKind::Roman(value) | MarkerKind::LetterOrRoman { roman: value, .. }) => {
            Some(Ordinal::Index(*value))
        }
        (Style::Dotted(depth), MarkerKind::Dotted(parts)) if parts.len() == *depth => {
            Some(Ordinal::Path(parts.clone()))
        }
        (Style::Other, MarkerKind::Other) => Some(Ordinal::Unordered),
        _ => None,
    }
}

pub fn natural_style(kind: &MarkerKind) -> Style {
    match kind {
        MarkerKind::Letter(_) => Style::Letter,
        MarkerKind::Roman(_) | MarkerKind::LetterOrRoman { roman: 1, .. } => Style::Roman,
        MarkerKind::LetterOrRoman { letter, .. } if *letter > 26 => Style::Roman,
        MarkerKind::LetterOrRoman { .. } => Style::Letter,
        MarkerKind::Dotted(parts) => Style::Dotted(parts.len()),
        MarkerKind::Other => Style::Other,
    }
}

pub fn sequence_start(kind: &MarkerKind, parent: &Level) -> Option<Style> {
    let style = match kind {
        MarkerKind::Letter(1) => Style::Letter,
        MarkerKind::Roman(1) | MarkerKind::LetterOrRoman { roman: 1, .. } => Style::Roman,
        MarkerKind::Dotted(parts) if parts.last() == Some(&1) => {
            if let Ordinal::Path(parent_path) = &parent.last
                && !parts.starts_with(parent_path)
            {
                return None;
            }
            Style::Dotted(parts.len())
        }
        _ => return None,
    };

    (style != parent.style).then_some(style)
}

pub fn effective_kind(kind: &MarkerKind, next: Option<&MarkerKind>) -> MarkerKind {
    let MarkerKind::LetterOrRoman { roman, .. } = kind else {
        return kind.clone();
    };

    let next_roman = match next {
        Some(MarkerKind::Roman(value) | MarkerKind::LetterOrRoman { roman: value, .. }) => *value,
        _ => return kind.clone(),
    };

    if next_roman == roman + 1 {
        MarkerKind::Roman(*roman)
    } else {
        kind.clone()
    }
}

/// Decide where a marker goes given the open levels, innermost last.
///
/// Ties go to the deeper level: an empty item followed by the start of a new
/// style opens a sublist even when the marker could also be read on the
/// current level.
pub fn place_marker(levels: &[Level], kind: &MarkerKind, previous_empty: bool) -> Placement {
    let Some(current) = levels.last() else {
        return Placement::Nest(natural_style(kind));
    };

    if previous_empty && let Some(style) = sequence_start(kind, current) {
        return Placement::Nest(style);
    }

    if current.accepts_next(kind) {
        return Placement::Sibling;
    }

    let ancestors = &levels[..levels.len() - 1];
    if let Some(depth) = ancestors.iter().rposition(|level| level.accepts_next(kind)) {
        return Placement::Close(depth);
    }

    if current.accepts_later(kind) {
        return Placement::Sibling;
    }

    if let Some(style) = sequence_start(kind, current) {
        return Placement::Nest(style);
    }

    Placement::Ambiguous
}

pub fn nest_items(items: Vec<FlatItem>) -> Blocklist {
    let kinds = items
        .iter()
        .map(|item| classify_marker(&item.num))
        .collect::<Vec<MarkerKind>>();

    let mut levels = Vec::<Level>::new();
    let mut lists = Vec::<Vec<Item>>::new();
    let mut previous_empty = false;

    for (index, flat) in items.into_iter().enumerate() {
        let kind = effective_kind(&kinds[index], kinds.get(index + 1));

        match place_marker(&levels, &kind, previous_empty) {
            Placement::Nest(style) => {
                levels.push(Level::open(style, &kind));
                lists.push(Vec::new());
            }
            Placement::Close(depth) => {
                close_levels(&mut levels, &mut lists, depth + 1);
                if let Some(level) = levels.last_mut() {
                    level.advance(&kind);
                }
            }
            Placement::Sibling => {
                if let Some(level) = levels.last_mut() {
                    level.advance(&kind);
                }
            }
            Placement::Ambiguous => {
                debug!(
                    marker = %flat.num,
                    depth = levels.len(),
                    "marker continues no open level; keeping it on the current level"
                );
            }
        }

        previous_empty = flat.content.is_none();
        if let Some(list) = lists.last_mut() {
            list.push(Item {
                num: flat.num,
                content: flat.content,
                sublist: None,
            });
        }
    }

    close_levels(&mut levels, &mut lists, 1);

    Blocklist {
        items: lists.pop().unwrap_or_default(),
    }
}

fn close_levels(levels: &mut Vec<Level>, lists: &mut Vec<Vec<Item>>, keep: usize) {
    while lists.len() > keep {
        let Some(items) = lists.pop() else {
            break;
        };
        levels.pop();

        if let Some(parent) = lists.last_mut().and_then(|list| list.last_mut()) {
            parent.sublist = Some(Blocklist { items });
        }
    }
}

pub fn classify_marker(num: &str) -> MarkerKind {
    let label = marker_fragment(num);
    if label.is_empty() {
        return MarkerKind::Other;
    }

    if label.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return label
            .split('.')
            .map(|part| part.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()
            .map(MarkerKind::Dotted)
            .unwrap_or(MarkerKind::Other);
    }

    if !label.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return MarkerKind::Other;
    }

    let lower = label.to_ascii_lowercase();
    let letter = letter_index(&lower);
    let roman = roman_value(&lower);

    match (letter, roman) {
        (Some(letter), Some(roman)) if lower.len() <= 2 => {
            MarkerKind::LetterOrRoman { letter, roman }
        }
        (_, Some(roman)) => MarkerKind::Roman(roman),
        (Some(letter), None) => MarkerKind::Letter(letter),
        (None, None) => MarkerKind::Other,
    }
}

fn letter_index(lower: &str) -> Option<u32> {
    let first = lower.chars().next()?;
    if !lower.chars().all(|ch| ch == first) {
        return None;
    }

    let repeats = lower.chars().count() as u32;
    Some((repeats - 1) * 26 + (first as u32 - 'a' as u32 + 1))
}

fn roman_value(lower: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut previous = 0u32;

    for ch in lower.chars().rev() {
        let value = match ch {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            _ => return None,
        };
        if value < previous {
            total = total.checked_sub(value)?;
        } else {
            total += value;
            previous = value;
        }
    }

    (total > 0 && to_roman(total) == lower).then_some(total)
}

fn to_roman(mut value: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut out = String::new();
    for (step, numeral) in NUMERALS {
        while value >= step {
            out.push_str(numeral);
            value -= step;
        }
    }
    out
}

pub fn marker_fragment(num: &str) -> String {
    num.trim()
        .trim_start_matches('(')
        .trim_end_matches('.')
        .trim_end_matches(')')
        .trim()
        .to_string()
}

pub fn join_id(prefix: &str, fragment: &str) -> String {
    if prefix.is_empty() {
        fragment.to_string()
    } else {
        format!("{}.{}", prefix, fragment)
    }
}

#[derive(Debug, Default)]
pub struct IdScope {
    used: HashSet<String>,
}

impl IdScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, preferred: String, qualified: Option<String>) -> String {
        if self.used.insert(preferred.clone()) {
            return preferred;
        }

        let base = match qualified {
            Some(qualified) if self.used.insert(qualified.clone()) => return qualified,
            Some(qualified) => qualified,
            None => preferred.clone(),
        };

        let mut counter = 2usize;
        loop {
            let candidate = format!("{}-{}", base, counter);
            if self.used.insert(candidate.clone()) {
                warn!(preferred = %preferred, id = %candidate, "duplicate identifier disambiguated");
                return candidate;
            }
            counter += 1;
        }
    }

    pub fn reserve(&mut self, id: &str) -> Result<(), RenderError> {
        if self.used.insert(id.to_string()) {
            Ok(())
        } else {
            Err(RenderError::DuplicateIdentifier { id: id.to_string() })
        }
    }
}
