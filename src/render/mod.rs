use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::error::RenderError;
use crate::model::{Authorship, Identity};
use crate::numbering::{IdScope, join_id, marker_fragment};
use crate::tree::{
    Block, Blocklist, Chapter, Document, Heading, Inline, Paragraph, ParseTree, Part, Schedule,
    Section, StatementContent, Subsection, Table,
};

mod meta;
mod xml;

use xml::{Element, write_markup};

pub const AKOMA_NTOSO_NAMESPACE: &str = "http://www.akomantoso.org/2.0";

/// Renders parse trees for one act.
///
/// A [`ParseTree::Document`] becomes a complete document with an XML
/// declaration; every other tree renders as the fragment it describes, with
/// identifiers computed as if it stood alone.
#[derive(Debug, Clone)]
pub struct Renderer {
    identity: Identity,
    authorship: Authorship,
    generation_date: NaiveDate,
}

impl Renderer {
    pub fn new(identity: Identity) -> Self {
        let authorship = identity.authorship();
        Self {
            identity,
            authorship,
            generation_date: Utc::now().date_naive(),
        }
    }

    /// Fix the manifestation date instead of using today's date.
    pub fn with_generation_date(mut self, generation_date: NaiveDate) -> Self {
        self.generation_date = generation_date;
        self
    }

    pub fn render(&self, tree: &ParseTree) -> Result<String, RenderError> {
        let mut scope = IdScope::new();

        let (roots, declaration) = match tree {
            ParseTree::Document(document) => (vec![self.akoma_ntoso(document, &mut scope)?], true),
            ParseTree::Chapter(chapter) => (self.chapter(chapter, &mut scope)?, false),
            ParseTree::Part(part) => (self.part(part, &mut scope)?, false),
            ParseTree::Section(section) => (vec![self.section(section, &mut scope)?], false),
            ParseTree::Subsection(subsection) => {
                (vec![self.subsection(subsection, "", 0, &mut scope)], false)
            }
            ParseTree::NumberedStatement(statement) => {
                let subsection = Subsection {
                    statement: Some(statement.clone()),
                    blocklist: None,
                };
                (vec![self.subsection(&subsection, "", 0, &mut scope)], false)
            }
            ParseTree::Clauses(inlines) => (vec![paragraph_element(inlines)], false),
            ParseTree::Schedule(schedule) => (vec![self.schedule_doc(schedule, 1)], false),
            ParseTree::Schedules(schedules) => {
                (vec![self.components(schedules, &mut scope)?], false)
            }
            ParseTree::Table(table) => {
                let mut tables = 0;
                (vec![table_element(table, "", &mut tables)], false)
            }
        };

        let markup = write_markup(&roots, declaration)?;
        debug!(bytes = markup.len(), "rendered markup");
        Ok(markup)
    }

    fn akoma_ntoso(
        &self,
        document: &Document,
        scope: &mut IdScope,
    ) -> Result<Element, RenderError> {
        let meta = Element::new("meta")
            .with_child(self.identification("main", &self.identity.short_title))
            .with_child(meta::references(&self.authorship));

        let mut act = Element::new("act")
            .attr("contains", "originalVersion")
            .with_child(meta);

        if let Some(preface) = &document.preface {
            act.push(paragraphs_element("preface", &preface.paragraphs));
        }
        if let Some(preamble) = &document.preamble {
            act.push(paragraphs_element("preamble", &preamble.paragraphs));
        }

        let mut body = Element::new("body");
        for chapter in &document.body.chapters {
            for element in self.chapter(chapter, scope)? {
                body.push(element);
            }
        }
        act.push(body);

        if !document.schedules.is_empty() {
            act.push(self.components(&document.schedules, scope)?);
        }

        Ok(Element::new("akomaNtoso")
            .attr("xmlns", AKOMA_NTOSO_NAMESPACE)
            .with_child(act))
    }

    fn identification(&self, component: &str, alias: &str) -> Element {
        meta::identification(
            &self.identity,
            &self.authorship,
            self.generation_date,
            component,
            alias,
        )
    }

    fn chapter(&self, chapter: &Chapter, scope: &mut IdScope) -> Result<Vec<Element>, RenderError> {
        let mut parts = Vec::new();
        for part in &chapter.parts {
            parts.extend(self.part(part, scope)?);
        }

        match &chapter.heading {
            Some(heading) => Ok(vec![heading_element("chapter", heading, parts, scope)?]),
            None => Ok(parts),
        }
    }

    fn part(&self, part: &Part, scope: &mut IdScope) -> Result<Vec<Element>, RenderError> {
        let sections = part
            .sections
            .iter()
            .map(|section| self.section(section, scope))
            .collect::<Result<Vec<Element>, RenderError>>()?;

        match &part.heading {
            Some(heading) => Ok(vec![heading_element("part", heading, sections, scope)?]),
            None => Ok(sections),
        }
    }

    fn section(&self, section: &Section, scope: &mut IdScope) -> Result<Element, RenderError> {
        if section.num.is_empty() {
            return Err(RenderError::MissingField {
                node: "section",
                field: "num",
            });
        }

        let id = scope.claim(format!("section-{}", section.num), None);
        let mut element = Element::new("section")
            .attr("id", id.clone())
            .with_child(Element::new("num").with_text(&format!("{}.", section.num)));
        if !section.title.is_empty() {
            element.push(Element::new("heading").with_text(&section.title));
        }

        for (index, subsection) in section.subsections.iter().enumerate() {
            element.push(self.subsection(subsection, &id, index, scope));
        }
        Ok(element)
    }

    fn subsection(
        &self,
        subsection: &Subsection,
        prefix: &str,
        index: usize,
        scope: &mut IdScope,
    ) -> Element {
        let fragment = match subsection.num() {
            Some(num) => marker_fragment(num),
            None => format!("subsection-{}", index),
        };
        let id = scope.claim(join_id(prefix, &fragment), None);

        let mut element = Element::new("subsection").attr("id", id.clone());
        if let Some(num) = subsection.num() {
            element.push(Element::new("num").with_text(num));
        }

        let mut content = Element::new("content");
        let mut tables = 0;
        let statement_content = subsection
            .statement
            .as_ref()
            .and_then(|statement| statement.content.as_ref());

        match (statement_content, &subsection.blocklist) {
            (Some(StatementContent::Clauses(inlines)), Some(list)) => {
                content.push(self.blocklist(list, &id, Some(inlines), scope));
            }
            (Some(StatementContent::Table(table)), Some(list)) => {
                content.push(table_element(table, &id, &mut tables));
                content.push(self.blocklist(list, &id, None, scope));
            }
            (None, Some(list)) => content.push(self.blocklist(list, &id, None, scope)),
            (Some(StatementContent::Clauses(inlines)), None) => {
                content.push(paragraph_element(inlines));
            }
            (Some(StatementContent::Table(table)), None) => {
                content.push(table_element(table, &id, &mut tables));
            }
            (None, None) => {}
        }

        if !content.is_empty() {
            element.push(content);
        }
        element
    }

    fn blocklist(
        &self,
        list: &Blocklist,
        subsection_id: &str,
        introduction: Option<&Vec<Inline>>,
        scope: &mut IdScope,
    ) -> Element {
        let list_id = scope.claim(join_id(subsection_id, "list0"), None);
        let mut element = Element::new("blockList").attr("id", list_id.clone());

        if let Some(inlines) = introduction {
            let mut intro = Element::new("listIntroduction");
            push_inlines(&mut intro, inlines);
            element.push(intro);
        }

        push_items(&mut element, list, &list_id, None, scope);
        element
    }

    fn components(
        &self,
        schedules: &[Schedule],
        scope: &mut IdScope,
    ) -> Result<Element, RenderError> {
        let mut components = Element::new("components");
        for (index, schedule) in schedules.iter().enumerate() {
            let id = format!("component-{}", index + 1);
            scope.reserve(&id)?;
            components.push(
                Element::new("component")
                    .attr("id", id)
                    .with_child(self.schedule_doc(schedule, index + 1)),
            );
        }
        Ok(components)
    }

    fn schedule_doc(&self, schedule: &Schedule, ordinal: usize) -> Element {
        let number = schedule
            .num
            .clone()
            .unwrap_or_else(|| ordinal.to_string());
        let name = format!("schedule{}", number);

        let mut scope = IdScope::new();
        let article_id = scope.claim(format!("schedule-{}", number), None);
        let mut article = Element::new("article").attr("id", article_id.clone());
        if let Some(title) = &schedule.title {
            article.push(Element::new("heading").with_text(title));
        }

        let mut content = Element::new("content");
        let mut tables = 0;
        for block in &schedule.blocks {
            match block {
                Block::Paragraph(paragraph) => content.push(paragraph_element(&paragraph.inlines)),
                Block::Table(table) => content.push(table_element(table, &article_id, &mut tables)),
            }
        }
        if !content.is_empty() {
            article.push(content);
        }

        Element::new("doc")
            .attr("name", name.clone())
            .with_child(
                Element::new("meta")
                    .with_child(self.identification(&name, &format!("Schedule {}", number))),
            )
            .with_child(Element::new("mainBody").with_child(article))
    }
}

fn heading_element(
    name: &'static str,
    heading: &Heading,
    children: Vec<Element>,
    scope: &mut IdScope,
) -> Result<Element, RenderError> {
    if heading.num.is_empty() {
        return Err(RenderError::MissingField {
            node: name,
            field: "num",
        });
    }

    let id = scope.claim(format!("{}-{}", name, heading.num), None);
    let mut element = Element::new(name)
        .attr("id", id)
        .with_child(Element::new("num").with_text(&heading.num));
    if let Some(title) = heading.title.as_deref().filter(|title| !title.is_empty()) {
        element.push(Element::new("heading").with_text(title));
    }
    for child in children {
        element.push(child);
    }
    Ok(element)
}

fn push_items(
    element: &mut Element,
    list: &Blocklist,
    list_id: &str,
    parent_item: Option<&str>,
    scope: &mut IdScope,
) {
    for item in &list.items {
        let fragment = marker_fragment(&item.num);
        let id = scope.claim(
            join_id(list_id, &fragment),
            parent_item.map(|parent| join_id(parent, &fragment)),
        );

        let mut item_element = Element::new("item")
            .attr("id", id.clone())
            .with_child(Element::new("num").with_text(&item.num));
        if let Some(inlines) = &item.content {
            item_element.push(paragraph_element(inlines));
        }
        if let Some(sublist) = &item.sublist {
            let sublist_id = scope.claim(join_id(&id, "list0"), None);
            let mut sublist_element = Element::new("blockList").attr("id", sublist_id);
            push_items(&mut sublist_element, sublist, list_id, Some(&id), scope);
            item_element.push(sublist_element);
        }

        element.push(item_element);
    }
}

fn paragraphs_element(name: &'static str, paragraphs: &[Paragraph]) -> Element {
    paragraphs
        .iter()
        .fold(Element::new(name), |element, paragraph| {
            element.with_child(paragraph_element(&paragraph.inlines))
        })
}

fn paragraph_element(inlines: &[Inline]) -> Element {
    let mut element = Element::new("p");
    push_inlines(&mut element, inlines);
    element
}

fn push_inlines(element: &mut Element, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => element.push_text(text),
            Inline::Remark(remark) => {
                let mut remark_element = Element::new("remark").attr("status", remark.status.as_str());
                remark_element.push_text("[");
                push_inlines(&mut remark_element, &remark.content);
                remark_element.push_text("]");
                element.push(remark_element);
            }
        }
    }
}

fn table_element(table: &Table, container_id: &str, tables: &mut usize) -> Element {
    let id = join_id(container_id, &format!("table{}", tables));
    *tables += 1;

    let mut element = Element::new("table").attr("id", id);
    for (row_index, row) in table.rows.iter().enumerate() {
        if row_index > 0 {
            element.push_text("\n");
        }
        let mut tr = Element::new("tr");
        for (cell_index, cell) in row.cells.iter().enumerate() {
            if cell_index > 0 {
                tr.push_text("\n");
            }
            tr.push(Element::new("td").with_child(paragraph_element(&cell.paragraph.inlines)));
        }
        element.push(tr);
    }
    element
}
