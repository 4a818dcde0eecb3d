//! Plain-text legislation to Akoma Ntoso 2.0 markup.
//!
//! [`Grammar`] recovers a [`ParseTree`] from loosely structured statutory
//! text; [`Renderer`] turns that tree into markup with identifiers and
//! identification metadata for an [`Identity`].

pub mod error;
pub mod grammar;
pub mod model;
pub mod numbering;
pub mod remarks;
pub mod render;
pub mod tree;
pub mod unparse;

pub use error::{Error, RenderError, SyntaxFailure};
pub use grammar::{EntryRule, Grammar};
pub use model::{Authorship, GrammarOptions, Identity, Organization};
pub use render::Renderer;
pub use tree::ParseTree;

/// Parse `text` starting from `rule`.
pub fn parse(text: &str, rule: EntryRule, options: GrammarOptions) -> Result<ParseTree, Error> {
    Ok(Grammar::new(options)?.parse(text, rule)?)
}

/// Render `tree` for `identity`, stamped with today's date.
pub fn render(tree: &ParseTree, identity: &Identity) -> Result<String, RenderError> {
    Renderer::new(identity.clone()).render(tree)
}
