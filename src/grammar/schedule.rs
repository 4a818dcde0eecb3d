use super::Parser;
use super::tokens::Token;
use crate::remarks::split_remarks;
use crate::tree::{Block, Cell, Paragraph, Row, Schedule, Table};

const TITLE_TERMINATORS: [char; 4] = ['.', ':', ';', ','];

impl Parser<'_> {
    pub(super) fn schedules(&mut self) -> Option<Vec<Schedule>> {
        self.attempt("schedules", |parser| {
            let mut schedules = Vec::new();
            while let Some(schedule) = parser.schedule() {
                schedules.push(schedule);
            }

            (!schedules.is_empty()).then_some(schedules)
        })
    }

    pub(super) fn schedule(&mut self) -> Option<Schedule> {
        self.attempt("schedule", |parser| {
            let captures = parser.token(Token::ScheduleHeading)?;
            let num = captures
                .name("num")
                .map(|num| num.as_str().to_string())
                .filter(|num| !num.is_empty());
            let mut title = captures
                .name("title")
                .map(|title| title.as_str().trim().to_string())
                .filter(|title| !title.is_empty());

            parser.end_line();
            if title.is_none() && parser.at_schedule_title() {
                title = Some(parser.rest_of_line().trim().to_string());
                parser.end_line();
            }
            parser.skip_blank_lines();

            let mut blocks = Vec::new();
            while !parser.at_end() && !parser.sees(Token::ScheduleHeading) {
                match parser.table_here() {
                    Some(table) => blocks.push(Block::Table(table)),
                    None => blocks.push(Block::Paragraph(parser.paragraph_line())),
                }
            }

            Some(Schedule { num, title, blocks })
        })
    }

    fn at_schedule_title(&self) -> bool {
        if self.at_end() || self.at_blank_line() || self.line_is_structural() {
            return false;
        }

        let line = self.rest_of_line().trim();
        !line.starts_with("[[") && !line.ends_with(TITLE_TERMINATORS)
    }

    pub(super) fn table_here(&mut self) -> Option<Table> {
        if self.sees(Token::TableOpen) {
            self.table()
        } else {
            None
        }
    }

    pub(super) fn table(&mut self) -> Option<Table> {
        self.attempt("table", |parser| {
            parser.token(Token::TableOpen)?;
            parser.next_line();

            let mut rows = Vec::new();
            let mut cells = Vec::new();
            loop {
                if parser.at_end() {
                    parser.fail(Token::TableClose.describe());
                    return None;
                }

                if parser.token(Token::TableClose).is_some() {
                    parser.next_line();
                    break;
                }

                if parser.token(Token::TableRow).is_some() {
                    if !cells.is_empty() {
                        rows.push(Row {
                            cells: std::mem::take(&mut cells),
                        });
                    }
                    parser.next_line();
                    continue;
                }

                let captures = parser.token(Token::TableCell)?;
                let text = captures.name("text").map_or("", |text| text.as_str());
                cells.push(Cell {
                    paragraph: Paragraph {
                        inlines: split_remarks(text),
                    },
                });
                parser.next_line();
            }

            if !cells.is_empty() {
                rows.push(Row { cells });
            }
            Some(Table { rows })
        })
    }
}
