use crate::model::GrammarOptions;
use crate::tree::{
    Block, Blocklist, Chapter, Document, Heading, Paragraph, ParseTree, Part, Schedule, Section,
    Statement, StatementContent, Subsection, Table, inline_text,
};


/// Canonical text for `tree`. It parses back to the same tree under `options`.
pub fn to_text(tree: &ParseTree, options: &GrammarOptions) -> String {
    let mut out = Text {
        lines: Vec::new(),
        options: *options,
    };

    match tree {
        ParseTree::Document(document) => out.document(document),
        ParseTree::Chapter(chapter) => out.chapter(chapter),
        ParseTree::Part(part) => out.part(part),
        ParseTree::Section(section) => out.section(section),
        ParseTree::Subsection(subsection) => out.subsection(subsection),
        ParseTree::NumberedStatement(statement) => out.statement(statement),
        ParseTree::Clauses(inlines) => out.lines.push(inline_text(inlines)),
        ParseTree::Schedule(schedule) => out.schedule(schedule),
        ParseTree::Schedules(schedules) => {
            for schedule in schedules {
                out.schedule(schedule);
            }
        }
        ParseTree::Table(table) => out.table(table),
    }

    let mut text = out.lines.join("\n");
    text.push('\n');
    text
}

struct Text {
    lines: Vec<String>,
    options: GrammarOptions,
}

impl Text {
    fn document(&mut self, document: &Document) {
        if let Some(preface) = &document.preface {
            self.paragraphs(&preface.paragraphs);
        }
        if let Some(preamble) = &document.preamble {
            self.lines.push("PREAMBLE".to_string());
            self.paragraphs(&preamble.paragraphs);
        }
        for chapter in &document.body.chapters {
            self.chapter(chapter);
        }
        for schedule in &document.schedules {
            self.schedule(schedule);
        }
    }

    fn paragraphs(&mut self, paragraphs: &[Paragraph]) {
        self.lines
            .extend(paragraphs.iter().map(|paragraph| inline_text(&paragraph.inlines)));
    }

    fn chapter(&mut self, chapter: &Chapter) {
        if let Some(heading) = &chapter.heading {
            self.heading("Chapter", heading);
        }
        for part in &chapter.parts {
            self.part(part);
        }
    }

    fn part(&mut self, part: &Part) {
        if let Some(heading) = &part.heading {
            self.heading("Part", heading);
        }
        for section in &part.sections {
            self.section(section);
        }
    }

    fn heading(&mut self, keyword: &str, heading: &Heading) {
        self.lines.push(match &heading.title {
            Some(title) => format!("{keyword} {} - {title}", heading.num),
            None => format!("{keyword} {}", heading.num),
        });
    }

    fn section(&mut self, section: &Section) {
        if section.title.is_empty() {
            self.lines.push(format!("{}.", section.num));
        } else if self.options.section_number_after_title {
            self.lines.push(section.title.clone());
            self.lines.push(format!("{}.", section.num));
        } else {
            self.lines.push(format!("{}. {}", section.num, section.title));
        }

        for subsection in &section.subsections {
            self.subsection(subsection);
        }
    }

    fn subsection(&mut self, subsection: &Subsection) {
        if let Some(statement) = &subsection.statement {
            self.statement(statement);
        }
        if let Some(blocklist) = &subsection.blocklist {
            self.blocklist(blocklist);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match (&statement.num, &statement.content) {
            (Some(num), Some(StatementContent::Clauses(inlines))) => {
                self.lines.push(format!("{num} {}", inline_text(inlines)));
            }
            (Some(num), Some(StatementContent::Table(table))) => {
                self.lines.push(num.clone());
                self.table(table);
            }
            (Some(num), None) => self.lines.push(num.clone()),
            (None, Some(StatementContent::Clauses(inlines))) => {
                self.lines.push(inline_text(inlines));
            }
            (None, Some(StatementContent::Table(table))) => self.table(table),
            (None, None) => {}
        }
    }

    fn blocklist(&mut self, blocklist: &Blocklist) {
        for item in &blocklist.items {
            self.lines.push(match &item.content {
                Some(inlines) => format!("{} {}", item.num, inline_text(inlines)),
                None => item.num.clone(),
            });
            if let Some(sublist) = &item.sublist {
                self.blocklist(sublist);
            }
        }
    }

    fn table(&mut self, table: &Table) {
        self.lines.push("{|".to_string());
        for (index, row) in table.rows.iter().enumerate() {
            if index > 0 {
                self.lines.push("|-".to_string());
            }
            for cell in &row.cells {
                let text = inline_text(&cell.paragraph.inlines);
                self.lines.push(if text.is_empty() {
                    "|".to_string()
                } else {
                    format!("| {text}")
                });
            }
        }
        self.lines.push("|}".to_string());
    }

    fn schedule(&mut self, schedule: &Schedule) {
        let mut heading = "Schedule".to_string();
        if let Some(num) = &schedule.num {
            heading.push(' ');
            heading.push_str(num);
        }
        match &schedule.title {
            Some(title) => {
                heading.push_str(" - ");
                heading.push_str(title);
                self.lines.push(heading);
            }
            None => {
                self.lines.push(heading);
                self.lines.push(String::new());
            }
        }

        for block in &schedule.blocks {
            match block {
                Block::Paragraph(paragraph) => self.lines.push(inline_text(&paragraph.inlines)),
                Block::Table(table) => self.table(table),
            }
        }
    }
}
