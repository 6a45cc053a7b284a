//! Auxiliary files generated from the route table.
//!
//! - **Sitemap**: search engine indexing (`sitemap.xml`)

pub mod sitemap;
