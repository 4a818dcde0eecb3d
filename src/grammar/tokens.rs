use regex::Regex;

use crate::error::Error;

const HEADING_NUM: &str = r"\d+[a-z]*|[ivxlcdm]+|[a-z]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    ChapterHeading,
    PartHeading,
    ScheduleHeading,
    SectionPrefix,
    SectionNumberLine,
    SubsectionPrefix,
    BlocklistPrefix,
    TableOpen,
    TableClose,
    TableRow,
    TableCell,
    PrefaceKeyword,
    PreambleKeyword,
}

impl Token {
    pub fn describe(self) -> &'static str {
        match self {
            Self::ChapterHeading => "chapter heading",
            Self::PartHeading => "part heading",
            Self::ScheduleHeading => "schedule heading",
            Self::SectionPrefix => "section number",
            Self::SectionNumberLine => "section number line",
            Self::SubsectionPrefix => "subsection number",
            Self::BlocklistPrefix => "list item marker",
            Self::TableOpen => "table start",
            Self::TableClose => "table end",
            Self::TableRow => "table row separator",
            Self::TableCell => "table cell",
            Self::PrefaceKeyword => "PREFACE",
            Self::PreambleKeyword => "PREAMBLE",
        }
    }
}

#[derive(Debug)]
pub struct Tokens {
    chapter_heading: Regex,
    part_heading: Regex,
    schedule_heading: Regex,
    section_prefix: Regex,
    section_number_line: Regex,
    subsection_prefix: Regex,
    blocklist_prefix: Regex,
    table_open: Regex,
    table_close: Regex,
    table_row: Regex,
    table_cell: Regex,
    preface_keyword: Regex,
    preamble_keyword: Regex,
}

impl Tokens {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            chapter_heading: compile(Token::ChapterHeading, &heading_pattern("chapter"))?,
            part_heading: compile(Token::PartHeading, &heading_pattern("part"))?,
            schedule_heading: compile(
                Token::ScheduleHeading,
                r#"(?i)^[ \t]*schedule\b(?:[ \t]+"?(?P<num>[0-9a-z]+)"?)?[ \t]*(?:[-–:.][ \t]*)?(?P<title>.*?)[ \t]*$"#,
            )?,
            section_prefix: compile(
                Token::SectionPrefix,
                r"^[ \t]*(?P<num>\d+[A-Za-z]*)(?:\.(?:[ \t]+|$)|[ \t]+)(?P<rest>.*?)[ \t]*$",
            )?,
            section_number_line: compile(
                Token::SectionNumberLine,
                r"^[ \t]*(?P<num>\d+[A-Za-z]*)\.?(?:[ \t]+|$)",
            )?,
            subsection_prefix: compile(
                Token::SubsectionPrefix,
                r"^[ \t]*(?P<num>\(\d+[A-Za-z]*\)|\d+\.\d+)\.?(?:[ \t]+|$)",
            )?,
            blocklist_prefix: compile(
                Token::BlocklistPrefix,
                r"^[ \t]*(?P<num>\([A-Za-z]{1,2}\)|\([ivxlcdmIVXLCDM]+\)|\d+(?:\.\d+){2,})\.?(?:[ \t]+|$)",
            )?,
            table_open: compile(Token::TableOpen, r"^[ \t]*\{\|[ \t]*$")?,
            table_close: compile(Token::TableClose, r"^[ \t]*\|\}[ \t]*$")?,
            table_row: compile(Token::TableRow, r"^[ \t]*\|-[ \t]*$")?,
            table_cell: compile(Token::TableCell, r"^[ \t]*\|[ \t]*(?P<text>.*?)[ \t]*$")?,
            preface_keyword: compile(Token::PrefaceKeyword, r"(?i)^[ \t]*preface[ \t]*$")?,
            preamble_keyword: compile(Token::PreambleKeyword, r"(?i)^[ \t]*preamble[ \t]*$")?,
        })
    }

    pub fn get(&self, token: Token) -> &Regex {
        match token {
            Token::ChapterHeading => &self.chapter_heading,
            Token::PartHeading => &self.part_heading,
            Token::ScheduleHeading => &self.schedule_heading,
            Token::SectionPrefix => &self.section_prefix,
            Token::SectionNumberLine => &self.section_number_line,
            Token::SubsectionPrefix => &self.subsection_prefix,
            Token::BlocklistPrefix => &self.blocklist_prefix,
            Token::TableOpen => &self.table_open,
            Token::TableClose => &self.table_close,
            Token::TableRow => &self.table_row,
            Token::TableCell => &self.table_cell,
            Token::PrefaceKeyword => &self.preface_keyword,
            Token::PreambleKeyword => &self.preamble_keyword,
        }
    }
}

fn heading_pattern(keyword: &str) -> String {
    format!(
        r"(?i)^[ \t]*{keyword}[ \t]+(?P<num>{HEADING_NUM})\b[ \t]*(?:[-–:.][ \t]*)?(?P<title>.*?)[ \t]*$"
    )
}

fn compile(token: Token, pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|source| Error::Pattern {
        name: token.describe(),
        source,
    })
}
