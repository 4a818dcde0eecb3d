use std::cmp::Ordering;
use std::collections::BTreeSet;

use clap::ValueEnum;
use regex::Captures;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, SyntaxFailure};
use crate::model::GrammarOptions;
use crate::tree::ParseTree;

mod document;
mod schedule;
mod section;
#[cfg(test)]
mod tests;
mod tokens;

use tokens::{Token, Tokens};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRule {
    Document,
    Chapter,
    Part,
    Section,
    Subsection,
    NumberedStatement,
    Clauses,
    Schedule,
    Schedules,
    Table,
}

impl EntryRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Chapter => "chapter",
            Self::Part => "part",
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::NumberedStatement => "numbered_statement",
            Self::Clauses => "clauses",
            Self::Schedule => "schedule",
            Self::Schedules => "schedules",
            Self::Table => "table",
        }
    }
}

/// Compiled grammar for one set of options.
#[derive(Debug)]
pub struct Grammar {
    tokens: Tokens,
    options: GrammarOptions,
}

impl Grammar {
    pub fn new(options: GrammarOptions) -> Result<Self, Error> {
        Ok(Self {
            tokens: Tokens::new()?,
            options,
        })
    }

    /// Parse the whole of `text` as `rule`. Trailing blank lines are ignored;
    /// anything else left over is a failure.
    ///
    /// Offsets in a [`SyntaxFailure`] refer to the text after line endings
    /// have been normalized to `\n`.
    pub fn parse(&self, text: &str, rule: EntryRule) -> Result<ParseTree, SyntaxFailure> {
        let text = normalize(text);
        let mut parser = Parser::new(&text, &self.tokens, self.options);

        parser.skip_blank_lines();
        let tree = parser.entry(rule);
        parser.skip_blank_lines();

        match tree {
            Some(tree) if parser.at_end() => {
                debug!(rule = rule.as_str(), bytes = text.len(), "parsed text");
                Ok(tree)
            }
            Some(_) => {
                parser.fail("end of input");
                Err(parser.failure())
            }
            None => Err(parser.failure()),
        }
    }
}

pub fn normalize(text: &str) -> String {
    let mut normalized = text.replace("\r\n", "\n");
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

#[derive(Debug, Default)]
struct Furthest {
    offset: usize,
    rule_stack: Vec<&'static str>,
    expected: BTreeSet<&'static str>,
}

struct Parser<'t> {
    text: &'t str,
    pos: usize,
    tokens: &'t Tokens,
    options: GrammarOptions,
    stack: Vec<&'static str>,
    quiet: usize,
    furthest: Furthest,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str, tokens: &'t Tokens, options: GrammarOptions) -> Self {
        Self {
            text,
            pos: 0,
            tokens,
            options,
            stack: Vec::new(),
            quiet: 0,
            furthest: Furthest::default(),
        }
    }

    fn entry(&mut self, rule: EntryRule) -> Option<ParseTree> {
        match rule {
            EntryRule::Document => self.document().map(ParseTree::Document),
            EntryRule::Chapter => self.chapter().map(ParseTree::Chapter),
            EntryRule::Part => self.part().map(ParseTree::Part),
            EntryRule::Section => self.section().map(ParseTree::Section),
            EntryRule::Subsection => self.subsection().map(ParseTree::Subsection),
            EntryRule::NumberedStatement => {
                self.numbered_statement().map(ParseTree::NumberedStatement)
            }
            EntryRule::Clauses => self.clauses().map(ParseTree::Clauses),
            EntryRule::Schedule => self.schedule().map(ParseTree::Schedule),
            EntryRule::Schedules => self.schedules().map(ParseTree::Schedules),
            EntryRule::Table => self.table().map(ParseTree::Table),
        }
    }

    fn attempt<T>(
        &mut self,
        name: &'static str,
        rule: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        let start = self.pos;
        self.stack.push(name);
        let result = rule(self);
        self.stack.pop();

        if result.is_none() {
            self.pos = start;
        }
        result
    }

    fn peek<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> bool {
        let start = self.pos;
        self.quiet += 1;
        let found = rule(self).is_some();
        self.quiet -= 1;
        self.pos = start;
        found
    }

    fn fail(&mut self, expected: &'static str) {
        if self.quiet > 0 {
            return;
        }

        match self.pos.cmp(&self.furthest.offset) {
            Ordering::Greater => {
                self.furthest = Furthest {
                    offset: self.pos,
                    rule_stack: self.stack.clone(),
                    expected: BTreeSet::from([expected]),
                };
            }
            Ordering::Equal => {
                if self.furthest.expected.is_empty() {
                    self.furthest.rule_stack = self.stack.clone();
                }
                self.furthest.expected.insert(expected);
            }
            Ordering::Less => {}
        }
    }

    fn failure(&self) -> SyntaxFailure {
        let offset = self.furthest.offset.min(self.text.len());
        let before = &self.text[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count())
            + 1;

        SyntaxFailure {
            offset,
            line,
            column,
            rule_stack: self
                .furthest
                .rule_stack
                .iter()
                .map(|rule| rule.to_string())
                .collect(),
            expected: self
                .furthest
                .expected
                .iter()
                .map(|token| token.to_string())
                .collect(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn line_end(&self) -> usize {
        self.text[self.pos..]
            .find('\n')
            .map_or(self.text.len(), |index| self.pos + index)
    }

    fn rest_of_line(&self) -> &'t str {
        &self.text[self.pos..self.line_end()]
    }

    fn at_blank_line(&self) -> bool {
        self.rest_of_line().trim().is_empty()
    }

    fn end_line(&mut self) {
        self.pos = (self.line_end() + 1).min(self.text.len());
    }

    fn skip_blank_lines(&mut self) {
        while !self.at_end() && self.at_blank_line() {
            self.end_line();
        }
    }

    fn next_line(&mut self) {
        self.end_line();
        self.skip_blank_lines();
    }

    fn token(&mut self, token: Token) -> Option<Captures<'t>> {
        let captures = self.tokens.get(token).captures(self.rest_of_line());
        if captures.is_none() {
            self.fail(token.describe());
        }
        captures
    }

    fn sees(&self, token: Token) -> bool {
        self.tokens.get(token).is_match(self.rest_of_line())
    }

    fn advance_within_line(&mut self, offset: usize) {
        self.pos += offset;
    }

    fn at_header(&mut self) -> bool {
        self.sees(Token::ChapterHeading)
            || self.sees(Token::PartHeading)
            || self.sees(Token::ScheduleHeading)
            || self.peek(|parser| parser.section_title())
    }

    fn at_body_start(&mut self) -> bool {
        self.sees(Token::PreambleKeyword) || self.at_header()
    }

    fn line_is_structural(&self) -> bool {
        [
            Token::ChapterHeading,
            Token::PartHeading,
            Token::ScheduleHeading,
            Token::SectionPrefix,
            Token::SubsectionPrefix,
            Token::BlocklistPrefix,
            Token::TableOpen,
            Token::PrefaceKeyword,
            Token::PreambleKeyword,
        ]
        .into_iter()
        .any(|token| self.sees(token))
    }

    fn rest_starts_marker(&self) -> bool {
        self.sees(Token::SubsectionPrefix) || self.sees(Token::BlocklistPrefix)
    }
}
