use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GENERATOR_ID: &str = "legis";
pub const DEFAULT_GENERATOR_NAME: &str = "Legis";
pub const DEFAULT_AUTHOR_ID: &str = "council";
pub const DEFAULT_AUTHOR_NAME: &str = "Council";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarOptions {
    pub section_number_after_title: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub jurisdiction: String,
    pub year: String,
    pub number: String,
    pub short_title: String,
    pub language: String,
    pub enacted_date: NaiveDate,
    #[serde(default)]
    pub authorship: Option<Authorship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorship {
    pub generator: Organization,
    pub author: Organization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub href: String,
    pub show_as: String,
}

impl Identity {
    pub fn work_uri(&self) -> String {
        format!("/{}/act/{}/{}", self.jurisdiction, self.year, self.number)
    }

    pub fn expression_uri(&self) -> String {
        format!("{}/{}@", self.work_uri(), self.language)
    }

    pub fn authorship(&self) -> Authorship {
        self.authorship.clone().unwrap_or_else(|| Authorship {
            generator: Organization {
                id: DEFAULT_GENERATOR_ID.to_string(),
                href: format!("/ontology/organization/{}", DEFAULT_GENERATOR_ID),
                show_as: DEFAULT_GENERATOR_NAME.to_string(),
            },
            author: Organization {
                id: DEFAULT_AUTHOR_ID.to_string(),
                href: format!(
                    "/ontology/organization/{}/{}",
                    self.jurisdiction, DEFAULT_AUTHOR_ID
                ),
                show_as: DEFAULT_AUTHOR_NAME.to_string(),
            },
        })
    }
}
