//! Search-engine metadata for route documents.
//!
//! - **head**: strip/inject the marked `<head>` tags
//! - **og**: Open Graph and Twitter Card values
//! - **jsonld**: schema.org structured data

pub mod head;
pub mod jsonld;
pub mod og;
