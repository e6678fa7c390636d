//! A backtracking tokenizer for MediaWiki wikicode.
//!
//! [`tokenize`] turns a wikicode string into a flat stream of [`Token`]s,
//! recognizing templates (`{{foo|bar=baz}}`), section headings
//! (`== title ==`), and HTML character references (`&amp;`, `&#39;`). Markup
//! that doesn't parse as one of those constructs — an unmatched `{{`, a `=`
//! that never finds a matching close — degrades to literal [`Token::Text`]
//! rather than producing an error; there is no such thing as invalid
//! wikicode, only wikicode that wasn't what it looked like.
//!
//! The tokenizer does not build a tree and does not resolve templates or
//! entities to their replacement values; see [`entities::decode`] for the
//! latter as a separate, opt-in step.
//!
//! ```
//! use wikitext_tokenizer::{tokenize, Token};
//!
//! let tokens = tokenize("{{foo|bar=baz}}");
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::TemplateOpen,
//!         Token::Text("foo".into()),
//!         Token::TemplateParamSeparator,
//!         Token::Text("bar".into()),
//!         Token::TemplateParamEquals,
//!         Token::Text("baz".into()),
//!         Token::TemplateClose,
//!     ]
//! );
//! ```

#![warn(clippy::pedantic, missing_docs, rust_2018_idioms)]
#![allow(clippy::must_use_candidate)]

mod context;
mod cursor;
mod frame;
mod token;
mod tokenizer;

pub mod entities;

mod config;

pub use config::TokenizerConfig;
pub use token::Token;
pub use tokenizer::{tokenize, tokenize_with_config};
