use chrono::NaiveDate;

use super::xml::Element;
use crate::model::{Authorship, Identity};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_NAME: &str = "Generation";

pub(super) fn identification(
    identity: &Identity,
    authorship: &Authorship,
    generation_date: NaiveDate,
    component: &str,
    alias: &str,
) -> Element {
    let work_uri = identity.work_uri();
    let expression_uri = identity.expression_uri();
    let expression_this = format!("{}/{}", expression_uri, component);
    let enacted = identity.enacted_date.format(DATE_FORMAT).to_string();
    let author = format!("#{}", authorship.author.id);

    let work = Element::new("FRBRWork")
        .with_child(value("FRBRthis", format!("{}/{}", work_uri, component)))
        .with_child(value("FRBRuri", work_uri.clone()))
        .with_child(value("FRBRalias", alias.to_string()))
        .with_child(date(&enacted))
        .with_child(Element::new("FRBRauthor").attr("href", author.clone()))
        .with_child(value("FRBRcountry", identity.jurisdiction.clone()));

    let expression = Element::new("FRBRExpression")
        .with_child(value("FRBRthis", expression_this.clone()))
        .with_child(value("FRBRuri", expression_uri.clone()))
        .with_child(date(&enacted))
        .with_child(Element::new("FRBRauthor").attr("href", author))
        .with_child(Element::new("FRBRlanguage").attr("language", identity.language.clone()));

    let manifestation = Element::new("FRBRManifestation")
        .with_child(value("FRBRthis", expression_this))
        .with_child(value("FRBRuri", expression_uri))
        .with_child(date(&generation_date.format(DATE_FORMAT).to_string()))
        .with_child(
            Element::new("FRBRauthor").attr("href", format!("#{}", authorship.generator.id)),
        );

    Element::new("identification")
        .attr("source", format!("#{}", authorship.generator.id))
        .with_child(work)
        .with_child(expression)
        .with_child(manifestation)
}

pub(super) fn references(authorship: &Authorship) -> Element {
    [&authorship.generator, &authorship.author]
        .into_iter()
        .fold(
            Element::new("references").attr("source", "#this"),
            |references, organization| {
                references.with_child(
                    Element::new("TLCOrganization")
                        .attr("id", organization.id.clone())
                        .attr("href", organization.href.clone())
                        .attr("showAs", organization.show_as.clone()),
                )
            },
        )
}

fn value(name: &'static str, value: String) -> Element {
    Element::new(name).attr("value", value)
}

fn date(date: &str) -> Element {
    Element::new("FRBRdate")
        .attr("date", date)
        .attr("name", DATE_NAME)
}
