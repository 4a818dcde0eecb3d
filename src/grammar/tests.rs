use pretty_assertions::assert_eq;

use super::*;
use crate::tree::{
    Block, Blocklist, Cell, Chapter, Document, Heading, Inline, Item, Paragraph, Part, Remark,
    RemarkStatus, Row, Schedule, Section, Statement, StatementContent, Subsection, Table,
};

fn parse_with(options: GrammarOptions, rule: EntryRule, text: &str) -> ParseTree {
    Grammar::new(options)
        .expect("grammar compiles")
        .parse(text, rule)
        .unwrap_or_else(|failure| panic!("{failure}"))
}

fn parse(rule: EntryRule, text: &str) -> ParseTree {
    parse_with(GrammarOptions::default(), rule, text)
}

fn document(options: GrammarOptions, text: &str) -> Document {
    match parse_with(options, EntryRule::Document, text) {
        ParseTree::Document(document) => document,
        other => panic!("expected a document, got {other:?}"),
    }
}

fn first_section(document: &Document) -> &Section {
    &document.body.chapters[0].parts[0].sections[0]
}

fn text(value: &str) -> Vec<Inline> {
    vec![Inline::Text(value.to_string())]
}

fn remark(value: &str) -> Inline {
    Inline::Remark(Remark {
        status: RemarkStatus::Editorial,
        content: text(value),
    })
}

fn paragraph(value: &str) -> Paragraph {
    Paragraph {
        inlines: text(value),
    }
}

fn clauses(value: &str) -> Option<StatementContent> {
    Some(StatementContent::Clauses(text(value)))
}

fn numbered(num: &str, value: &str) -> Subsection {
    Subsection {
        statement: Some(Statement {
            num: Some(num.to_string()),
            content: clauses(value),
        }),
        blocklist: None,
    }
}

fn naked(value: &str) -> Subsection {
    Subsection {
        statement: Some(Statement {
            num: None,
            content: clauses(value),
        }),
        blocklist: None,
    }
}

fn item(num: &str, content: Option<&str>) -> Item {
    Item {
        num: num.to_string(),
        content: content.map(text),
        sublist: None,
    }
}

#[test]
fn chapter_title_comes_from_the_next_line() {
    assert_eq!(
        parse(
            EntryRule::Chapter,
            "ChaPTEr 2\nThe Chapter Heading\n1. Section\nHello there\n"
        ),
        ParseTree::Chapter(Chapter {
            heading: Some(Heading {
                num: "2".to_string(),
                title: Some("The Chapter Heading".to_string()),
            }),
            parts: vec![Part {
                heading: None,
                sections: vec![Section {
                    num: "1".to_string(),
                    title: "Section".to_string(),
                    subsections: vec![naked("Hello there")],
                }],
            }],
        })
    );
}

#[test]
fn part_headings_accept_dash_and_colon_separators() {
    for text in [
        "pART 2\nThe Part Heading\n1. Section\nHello there\n",
        "Part 2 - The Part Heading\n1. Section\nHello there\n",
        "Part 2: The Part Heading\n1. Section\nHello there\n",
    ] {
        let ParseTree::Part(part) = parse(EntryRule::Part, text) else {
            panic!("expected a part");
        };
        assert_eq!(
            part.heading,
            Some(Heading {
                num: "2".to_string(),
                title: Some("The Part Heading".to_string()),
            })
        );
        assert_eq!(part.sections.len(), 1);
    }
}

#[test]
fn chapter_heading_accepts_roman_numbers() {
    let ParseTree::Chapter(chapter) = parse(EntryRule::Chapter, "Chapter IV. Offences\n") else {
        panic!("expected a chapter");
    };
    assert_eq!(
        chapter.heading,
        Some(Heading {
            num: "IV".to_string(),
            title: Some("Offences".to_string()),
        })
    );
    assert!(chapter.parts.is_empty());
}

#[test]
fn heading_title_is_not_taken_from_a_structural_line() {
    let ParseTree::Chapter(chapter) = parse(EntryRule::Chapter, "Chapter 3\n1. Section\nText\n")
    else {
        panic!("expected a chapter");
    };
    assert_eq!(chapter.heading.and_then(|heading| heading.title), None);
    assert_eq!(chapter.parts[0].sections[0].title, "Section");
}

#[test]
fn part_with_odd_section_number_has_empty_title() {
    let document = document(
        GrammarOptions::default(),
        "PART 1\nPREVENTION AND SUPPRESSION OF HEALTH NUISANCES\n1.\nNo owner or occupier of any shop or business premises or vacant land adjoining a shop or business premises shall cause a health nuisance.\n",
    );

    let part = &document.body.chapters[0].parts[0];
    assert_eq!(
        part.heading,
        Some(Heading {
            num: "1".to_string(),
            title: Some("PREVENTION AND SUPPRESSION OF HEALTH NUISANCES".to_string()),
        })
    );
    assert_eq!(part.sections[0].num, "1");
    assert_eq!(part.sections[0].title, "");
    assert_eq!(part.sections[0].subsections.len(), 1);
}

#[test]
fn basic_subsection_keeps_its_parenthesised_number() {
    assert_eq!(
        parse(EntryRule::Subsection, "        (2) foo bar\n"),
        ParseTree::Subsection(numbered("(2)", "foo bar"))
    );
}

#[test]
fn naked_statement_is_a_subsection() {
    assert_eq!(
        parse(EntryRule::Subsection, "naked statement"),
        ParseTree::Subsection(naked("naked statement"))
    );
}

#[test]
fn naked_statement_introduces_a_blocklist() {
    let ParseTree::Subsection(subsection) = parse(
        EntryRule::Subsection,
        "        naked statement (c) blah\n        (a) foo\n        (b) bar\n",
    ) else {
        panic!("expected a subsection");
    };

    assert_eq!(
        subsection.statement,
        Some(Statement {
            num: None,
            content: clauses("naked statement (c) blah"),
        })
    );
    assert_eq!(
        subsection.blocklist,
        Some(Blocklist {
            items: vec![item("(a)", Some("foo")), item("(b)", Some("bar"))],
        })
    );
}

#[test]
fn numbered_statement_dives_straight_into_a_list() {
    let ParseTree::Subsection(subsection) =
        parse(EntryRule::Subsection, "(1) (a) one\n(b) two\n(c) three\n(i) four\n")
    else {
        panic!("expected a subsection");
    };

    assert_eq!(
        subsection.statement,
        Some(Statement {
            num: Some("(1)".to_string()),
            content: None,
        })
    );
    let items = subsection.blocklist.expect("list").items;
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], item("(a)", Some("one")));
    assert_eq!(items[3], item("(i)", Some("four")));
}

#[test]
fn empty_item_opens_a_nested_list() {
    let ParseTree::Subsection(subsection) = parse(
        EntryRule::Subsection,
        "(1) here's my list,\n(a) one\n(b) (i) single\n(ii) double\n",
    ) else {
        panic!("expected a subsection");
    };

    assert_eq!(subsection.num(), Some("(1)"));
    assert_eq!(
        subsection.blocklist,
        Some(Blocklist {
            items: vec![
                item("(a)", Some("one")),
                Item {
                    num: "(b)".to_string(),
                    content: None,
                    sublist: Some(Blocklist {
                        items: vec![item("(i)", Some("single")), item("(ii)", Some("double"))],
                    }),
                },
            ],
        })
    );
}

#[test]
fn numbered_statements_accept_letter_suffixes() {
    assert_eq!(
        parse(EntryRule::NumberedStatement, "(1) foo bar"),
        ParseTree::NumberedStatement(Statement {
            num: Some("(1)".to_string()),
            content: clauses("foo bar"),
        })
    );
    assert_eq!(
        parse(EntryRule::NumberedStatement, "(1a) foo bar"),
        ParseTree::NumberedStatement(Statement {
            num: Some("(1a)".to_string()),
            content: clauses("foo bar"),
        })
    );
}

#[test]
fn dotted_subsection_number_drops_trailing_dot() {
    assert_eq!(
        parse(EntryRule::Subsection, "          9.9. foo\n"),
        ParseTree::Subsection(numbered("9.9", "foo"))
    );
}

#[test]
fn dotted_sublists_nest_by_depth() {
    let ParseTree::Subsection(subsection) = parse(
        EntryRule::Subsection,
        "          9.9 foo\n          9.9.1 item1\n          9.9.2 item2\n          9.9.2.1 item3\n",
    ) else {
        panic!("expected a subsection");
    };

    assert_eq!(subsection.num(), Some("9.9"));
    assert_eq!(
        subsection.blocklist,
        Some(Blocklist {
            items: vec![
                item("9.9.1", Some("item1")),
                Item {
                    num: "9.9.2".to_string(),
                    content: Some(text("item2")),
                    sublist: Some(Blocklist {
                        items: vec![item("9.9.2.1", Some("item3"))],
                    }),
                },
            ],
        })
    );
}

#[test]
fn clauses_split_out_remarks() {
    assert_eq!(
        parse(EntryRule::Clauses, "simple text"),
        ParseTree::Clauses(text("simple text"))
    );
    assert_eq!(
        parse(EntryRule::Clauses, "simple [[remark]]. text"),
        ParseTree::Clauses(vec![
            Inline::Text("simple ".to_string()),
            remark("remark"),
            Inline::Text(". text".to_string()),
        ])
    );
    assert_eq!(
        parse(EntryRule::Clauses, "simple [[remark]][[another]] text"),
        ParseTree::Clauses(vec![
            Inline::Text("simple ".to_string()),
            remark("remark"),
            remark("another"),
            Inline::Text(" text".to_string()),
        ])
    );
}

#[test]
fn leading_text_is_preface() {
    let document = document(
        GrammarOptions::default(),
        "foo\nbar\n(1) stuff\n(2) more stuff\nbaz\n1. Section\n(1) hello\n",
    );

    assert_eq!(
        document
            .preface
            .as_ref()
            .map(|preface| preface.paragraphs.clone()),
        Some(vec![
            paragraph("foo"),
            paragraph("bar"),
            paragraph("(1) stuff"),
            paragraph("(2) more stuff"),
            paragraph("baz"),
        ])
    );
    assert_eq!(document.preamble, None);
    assert_eq!(first_section(&document).subsections, vec![numbered("(1)", "hello")]);
}

#[test]
fn preface_keyword_is_dropped() {
    let document = document(
        GrammarOptions::default(),
        "PREFACE\nfoo\n1. Section\n(1) hello\n",
    );

    assert_eq!(
        document.preface.map(|preface| preface.paragraphs),
        Some(vec![paragraph("foo")])
    );
}

#[test]
fn preface_and_preamble_keep_remarks() {
    for keyword in ["PREFACE", "PREAMBLE"] {
        let document = document(
            GrammarOptions::default(),
            &format!("{keyword}\n\n[[remark]]\n\nfoo\n\n[[ another remark]]\n\n1. Section\n(1) hello\n"),
        );

        let paragraphs = if keyword == "PREFACE" {
            document.preface.map(|preface| preface.paragraphs)
        } else {
            document.preamble.map(|preamble| preamble.paragraphs)
        };
        assert_eq!(
            paragraphs,
            Some(vec![
                Paragraph {
                    inlines: vec![remark("remark")],
                },
                paragraph("foo"),
                Paragraph {
                    inlines: vec![remark(" another remark")],
                },
            ])
        );
    }
}

#[test]
fn no_preface_or_preamble_before_first_section() {
    let document = document(GrammarOptions::default(), "1. Section\nbar\n");

    assert_eq!(document.preface, None);
    assert_eq!(document.preamble, None);
    assert_eq!(first_section(&document).subsections, vec![naked("bar")]);
}

#[test]
fn preface_then_preamble() {
    for text in [
        "this is in the preface\n\nPREAMBLE\n\nthis is in the preamble\n\n1. Section\n(1) hello\n",
        "PREFACE\nthis is in the preface\n\nPREAMBLE\nthis is in the preamble\n\n1. Section\n(1) hello\n",
    ] {
        let document = document(GrammarOptions::default(), text);
        assert_eq!(
            document.preface.map(|preface| preface.paragraphs),
            Some(vec![paragraph("this is in the preface")])
        );
        assert_eq!(
            document.preamble.map(|preamble| preamble.paragraphs),
            Some(vec![paragraph("this is in the preamble")])
        );
    }
}

#[test]
fn preamble_only() {
    let document = document(
        GrammarOptions::default(),
        "PREAMBLE\nfoo\n1. Section\n(1) hello\n",
    );

    assert_eq!(document.preface, None);
    assert_eq!(
        document.preamble.map(|preamble| preamble.paragraphs),
        Some(vec![paragraph("foo")])
    );
}

#[test]
fn section_number_after_title() {
    let options = GrammarOptions {
        section_number_after_title: true,
    };
    let document = document(options, "Section\n1. (1) hello\n");

    let section = first_section(&document);
    assert_eq!(section.num, "1");
    assert_eq!(section.title, "Section");
    assert_eq!(section.subsections, vec![numbered("(1)", "hello")]);
}

#[test]
fn section_number_after_title_falls_back_to_number_first() {
    let options = GrammarOptions {
        section_number_after_title: true,
    };
    let document = document(options, "1. Section\n(1) hello\n");

    let section = first_section(&document);
    assert_eq!(section.num, "1");
    assert_eq!(section.title, "Section");
}

#[test]
fn section_number_before_title() {
    let document = document(GrammarOptions::default(), "1. Section\n(1) hello\n");

    let section = first_section(&document);
    assert_eq!(section.num, "1");
    assert_eq!(section.title, "Section");
}

#[test]
fn section_numbers_without_a_dot() {
    let document = document(
        GrammarOptions::default(),
        "1 A section\n(1) hello\n2 Another section\n(2) Another line\n",
    );

    let sections = &document.body.chapters[0].parts[0].sections;
    assert_eq!(sections.len(), 2);
    assert_eq!((sections[0].num.as_str(), sections[0].title.as_str()), ("1", "A section"));
    assert_eq!(
        (sections[1].num.as_str(), sections[1].title.as_str()),
        ("2", "Another section")
    );
    assert_eq!(sections[1].subsections, vec![numbered("(2)", "Another line")]);
}

#[test]
fn section_without_title_starts_with_a_subsection() {
    let document = document(
        GrammarOptions::default(),
        "10. (1) Transporters must remove medical waste.\n(2) Without limiting generality, stuff.\n",
    );

    let section = first_section(&document);
    assert_eq!(section.num, "10");
    assert_eq!(section.title, "");
    assert_eq!(
        section.subsections,
        vec![
            numbered("(1)", "Transporters must remove medical waste."),
            numbered("(2)", "Without limiting generality, stuff."),
        ]
    );
}

#[test]
fn simple_schedule_has_no_number_or_title() {
    assert_eq!(
        parse(
            EntryRule::Schedules,
            "Schedule\nSubject to approval in terms of this By-Law, the erection:\n1. Foo\n2. Bar\n"
        ),
        ParseTree::Schedules(vec![Schedule {
            num: None,
            title: None,
            blocks: vec![
                Block::Paragraph(paragraph(
                    "Subject to approval in terms of this By-Law, the erection:"
                )),
                Block::Paragraph(paragraph("1. Foo")),
                Block::Paragraph(paragraph("2. Bar")),
            ],
        }])
    );
}

#[test]
fn many_schedules() {
    let ParseTree::Schedules(schedules) = parse(
        EntryRule::Schedules,
        "Schedule \"1\"\nA Title\n1. Foo\n2. Bar\nSchedule 2\nAnother Title\nBaz\nBoom\n",
    ) else {
        panic!("expected schedules");
    };

    assert_eq!(
        schedules,
        vec![
            Schedule {
                num: Some("1".to_string()),
                title: Some("A Title".to_string()),
                blocks: vec![
                    Block::Paragraph(paragraph("1. Foo")),
                    Block::Paragraph(paragraph("2. Bar")),
                ],
            },
            Schedule {
                num: Some("2".to_string()),
                title: Some("Another Title".to_string()),
                blocks: vec![
                    Block::Paragraph(paragraph("Baz")),
                    Block::Paragraph(paragraph("Boom")),
                ],
            },
        ]
    );
}

#[test]
fn schedule_title_must_follow_directly() {
    let ParseTree::Schedule(schedule) = parse(EntryRule::Schedule, "Schedule 1\n\nA Title\n")
    else {
        panic!("expected a schedule");
    };

    assert_eq!(schedule.title, None);
    assert_eq!(schedule.blocks, vec![Block::Paragraph(paragraph("A Title"))]);
}

#[test]
fn document_ends_with_schedules() {
    let document = document(
        GrammarOptions::default(),
        "1. Section\nText\nSchedule 1 - Fees\nOne rand.\n",
    );

    assert_eq!(first_section(&document).subsections, vec![naked("Text")]);
    assert_eq!(
        document.schedules,
        vec![Schedule {
            num: Some("1".to_string()),
            title: Some("Fees".to_string()),
            blocks: vec![Block::Paragraph(paragraph("One rand."))],
        }]
    );
}

#[test]
fn basic_table() {
    let cell = |value: &str| Cell {
        paragraph: paragraph(value),
    };

    assert_eq!(
        parse(
            EntryRule::Table,
            "{|\n| r1c1\n| r1c2\n|-\n| r2c1\n| r2c2\n|}\n"
        ),
        ParseTree::Table(Table {
            rows: vec![
                Row {
                    cells: vec![cell("r1c1"), cell("r1c2")],
                },
                Row {
                    cells: vec![cell("r2c1"), cell("r2c2")],
                },
            ],
        })
    );
}

#[test]
fn table_allows_leading_separator_and_blank_lines() {
    let ParseTree::Table(table) = parse(
        EntryRule::Table,
        "{|\n|-\n| a\n\n| b\n|-\n| c\n|}\n",
    ) else {
        panic!("expected a table");
    };

    let cell_counts = table
        .rows
        .iter()
        .map(|row| row.cells.len())
        .collect::<Vec<usize>>();
    assert_eq!(cell_counts, vec![2, 1]);
}

#[test]
fn table_in_a_section_is_its_own_subsection() {
    let ParseTree::Section(section) = parse(
        EntryRule::Section,
        "10. A section title\n\nHeres a table:\n\n{|\n| r1c1\n| r1c2\n|-\n| r2c1\n| r2c2\n|}\n",
    ) else {
        panic!("expected a section");
    };

    assert_eq!(section.subsections.len(), 2);
    assert_eq!(section.subsections[0], naked("Heres a table:"));
    assert!(matches!(
        &section.subsections[1].statement,
        Some(Statement {
            num: None,
            content: Some(StatementContent::Table(table)),
        }) if table.rows.len() == 2
    ));
}

#[test]
fn unterminated_table_falls_back_to_text() {
    let ParseTree::Section(section) = parse(EntryRule::Section, "1. Title\n{|\n| a\n") else {
        panic!("expected a section");
    };

    assert_eq!(section.subsections, vec![naked("{|"), naked("| a")]);
}

#[test]
fn crlf_line_endings_are_normalized() {
    assert_eq!(
        parse(EntryRule::Subsection, "(2) foo bar\r\n(a) one\r\n"),
        parse(EntryRule::Subsection, "(2) foo bar\n(a) one\n")
    );
}

#[test]
fn bad_table_line_reports_position_and_expectations() {
    let failure = Grammar::new(GrammarOptions::default())
        .expect("grammar compiles")
        .parse("{|\n| a\nnot a cell\n|}\n", EntryRule::Table)
        .expect_err("table should not parse");

    assert_eq!(failure.offset, 7);
    assert_eq!((failure.line, failure.column), (3, 1));
    assert_eq!(failure.rule_stack, vec!["table".to_string()]);
    assert_eq!(
        failure.expected,
        vec![
            "table cell".to_string(),
            "table end".to_string(),
            "table row separator".to_string(),
        ]
    );
}

#[test]
fn leftover_input_is_a_failure() {
    let failure = Grammar::new(GrammarOptions::default())
        .expect("grammar compiles")
        .parse("(2) foo\n(3) bar\n", EntryRule::Subsection)
        .expect_err("only one subsection is allowed");

    assert_eq!((failure.line, failure.column), (2, 1));
    assert!(failure.expected.contains(&"end of input".to_string()));
    assert!(
        failure
            .to_string()
            .starts_with("syntax failure at line 2, column 1: expected end of input")
    );
}

#[test]
fn trailing_blank_lines_are_ignored() {
    assert_eq!(
        parse(EntryRule::Clauses, "simple text\n\n\n"),
        ParseTree::Clauses(text("simple text"))
    );
}
