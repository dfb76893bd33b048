//! # Brain Module
//!
//! Rule-based reply generation for EcoSea. No language model involved:
//! the question is classified with regex tables and answered from
//! hand-written templates grounded with excerpts from retrieved passages.
//!
//! ## Components
//! - `intent`: Intent classification using ordered regex rules
//! - `location`: Beach name detection from an ordered substring table
//! - `keywords`: Key sentence extraction from retrieved passages
//! - `composer`: Template-based reply assembly

pub mod composer;
pub mod intent;
pub mod keywords;
pub mod location;

pub use composer::{compose, render_reply, ResponseComposer, EMPTY_MESSAGE_REPLY};
pub use intent::{Intent, IntentClassifier, IntentResult, IntentRule};
pub use keywords::{KeySentence, KeySentenceExtractor};
pub use location::LocationResolver;
