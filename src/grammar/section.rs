use super::Parser;
use super::tokens::Token;
use crate::numbering::{FlatItem, nest_items};
use crate::remarks::split_remarks;
use crate::tree::{Blocklist, Inline, Section, Statement, StatementContent, Subsection};

impl Parser<'_> {
    pub(super) fn section(&mut self) -> Option<Section> {
        self.attempt("section", |parser| {
            let (num, title) = parser.section_title()?;
            let mut subsections = Vec::new();
            while let Some(subsection) = parser.subsection() {
                subsections.push(subsection);
            }

            Some(Section {
                num,
                title,
                subsections,
            })
        })
    }

    pub(super) fn section_title(&mut self) -> Option<(String, String)> {
        if self.options.section_number_after_title
            && let Some(title) = self.attempt("section_title", |parser| parser.title_then_number())
        {
            return Some(title);
        }

        self.attempt("section_title", |parser| parser.number_then_title())
    }

    fn number_then_title(&mut self) -> Option<(String, String)> {
        let captures = self.token(Token::SectionPrefix)?;
        let num = captures.name("num")?.as_str().to_string();
        let rest = captures.name("rest")?;

        self.advance_within_line(rest.start());
        if !rest.as_str().is_empty() && self.rest_starts_marker() {
            return Some((num, String::new()));
        }

        let title = rest.as_str().trim().to_string();
        self.next_line();
        Some((num, title))
    }

    fn title_then_number(&mut self) -> Option<(String, String)> {
        if self.at_end() || self.at_blank_line() || self.line_is_structural() {
            self.fail("section title");
            return None;
        }

        let title = self.rest_of_line().trim().to_string();
        self.end_line();

        let captures = self.token(Token::SectionNumberLine)?;
        let num = captures.name("num")?.as_str().to_string();
        self.advance_within_line(captures.get(0)?.end());
        if self.at_blank_line() {
            self.next_line();
        }

        Some((num, title))
    }

    pub(super) fn subsection(&mut self) -> Option<Subsection> {
        self.attempt("subsection", |parser| {
            if parser.at_end() || parser.at_header() {
                return None;
            }

            let statement = parser.statement();
            let blocklist = parser.blocklist();
            if statement.is_none() && blocklist.is_none() {
                return None;
            }

            Some(Subsection {
                statement,
                blocklist,
            })
        })
    }

    fn statement(&mut self) -> Option<Statement> {
        if let Some(statement) = self.numbered_statement() {
            return Some(statement);
        }
        self.naked_statement()
    }

    pub(super) fn numbered_statement(&mut self) -> Option<Statement> {
        self.attempt("numbered_statement", |parser| {
            let captures = parser.token(Token::SubsectionPrefix)?;
            let num = captures.name("num")?.as_str().to_string();
            parser.advance_within_line(captures.get(0)?.end());

            let content = if parser.at_blank_line() {
                parser.next_line();
                parser.table_here().map(StatementContent::Table)
            } else if parser.sees(Token::BlocklistPrefix) {
                None
            } else {
                Some(StatementContent::Clauses(parser.clauses()?))
            };

            Some(Statement {
                num: Some(num),
                content,
            })
        })
    }

    fn naked_statement(&mut self) -> Option<Statement> {
        self.attempt("naked_statement", |parser| {
            if parser.at_blank_line() || parser.rest_starts_marker() {
                parser.fail("statement text");
                return None;
            }

            let content = match parser.table_here() {
                Some(table) => StatementContent::Table(table),
                None => StatementContent::Clauses(parser.clauses()?),
            };

            Some(Statement {
                num: None,
                content: Some(content),
            })
        })
    }

    pub(super) fn clauses(&mut self) -> Option<Vec<Inline>> {
        self.attempt("clauses", |parser| {
            let text = parser.rest_of_line().trim();
            if text.is_empty() {
                parser.fail("text");
                return None;
            }

            parser.next_line();
            Some(split_remarks(text))
        })
    }

    fn blocklist(&mut self) -> Option<Blocklist> {
        self.attempt("blocklist", |parser| {
            let mut items = Vec::new();
            while let Some(item) = parser.blocklist_item() {
                items.push(item);
            }

            if items.is_empty() {
                return None;
            }
            Some(nest_items(items))
        })
    }

    fn blocklist_item(&mut self) -> Option<FlatItem> {
        self.attempt("blocklist_item", |parser| {
            let captures = parser.token(Token::BlocklistPrefix)?;
            let num = captures.name("num")?.as_str().to_string();
            parser.advance_within_line(captures.get(0)?.end());

            let content = if parser.at_blank_line() {
                parser.next_line();
                None
            } else if parser.sees(Token::BlocklistPrefix) {
                None
            } else {
                Some(parser.clauses()?)
            };

            Some(FlatItem { num, content })
        })
    }
}
