use super::Parser;
use super::tokens::Token;
use crate::remarks::split_remarks;
use crate::tree::{Body, Chapter, Document, Heading, Paragraph, Part, Preamble, Preface};

impl Parser<'_> {
    pub(super) fn document(&mut self) -> Option<Document> {
        self.attempt("document", |parser| {
            let preface = parser.preface();
            let preamble = parser.preamble();
            let body = parser.body();
            let schedules = parser.schedules().unwrap_or_default();

            Some(Document {
                preface,
                preamble,
                body,
                schedules,
            })
        })
    }

    fn preface(&mut self) -> Option<Preface> {
        self.stack.push("preface");
        if self.sees(Token::PrefaceKeyword) {
            self.next_line();
        }

        let mut paragraphs = Vec::new();
        while !self.at_end() && !self.at_body_start() {
            paragraphs.push(self.paragraph_line());
        }
        self.stack.pop();

        (!paragraphs.is_empty()).then_some(Preface { paragraphs })
    }

    fn preamble(&mut self) -> Option<Preamble> {
        if !self.sees(Token::PreambleKeyword) {
            return None;
        }

        self.stack.push("preamble");
        self.next_line();

        let mut paragraphs = Vec::new();
        while !self.at_end() && !self.at_header() {
            paragraphs.push(self.paragraph_line());
        }
        self.stack.pop();

        (!paragraphs.is_empty()).then_some(Preamble { paragraphs })
    }

    pub(super) fn paragraph_line(&mut self) -> Paragraph {
        let line = self.rest_of_line().trim();
        self.next_line();
        Paragraph {
            inlines: split_remarks(line),
        }
    }

    fn body(&mut self) -> Body {
        self.stack.push("body");
        let mut chapters = Vec::new();
        while let Some(chapter) = self.chapter() {
            chapters.push(chapter);
        }
        self.stack.pop();

        Body { chapters }
    }

    pub(super) fn chapter(&mut self) -> Option<Chapter> {
        self.attempt("chapter", |parser| {
            let heading = parser.heading(Token::ChapterHeading);
            let mut parts = Vec::new();
            while let Some(part) = parser.part() {
                parts.push(part);
            }

            if heading.is_none() && parts.is_empty() {
                return None;
            }
            Some(Chapter { heading, parts })
        })
    }

    pub(super) fn part(&mut self) -> Option<Part> {
        self.attempt("part", |parser| {
            let heading = parser.heading(Token::PartHeading);
            let mut sections = Vec::new();
            while let Some(section) = parser.section() {
                sections.push(section);
            }

            if heading.is_none() && sections.is_empty() {
                return None;
            }
            Some(Part { heading, sections })
        })
    }

    fn heading(&mut self, token: Token) -> Option<Heading> {
        let captures = self.token(token)?;
        let num = captures.name("num").map_or("", |num| num.as_str());
        let title = captures.name("title").map_or("", |title| title.as_str().trim());

        self.end_line();
        let title = if !title.is_empty() {
            Some(title.to_string())
        } else if !self.at_end() && !self.at_blank_line() && !self.line_is_structural() {
            let next = self.rest_of_line().trim().to_string();
            self.end_line();
            Some(next)
        } else {
            None
        };
        self.skip_blank_lines();

        Some(Heading {
            num: num.to_string(),
            title,
        })
    }
}
