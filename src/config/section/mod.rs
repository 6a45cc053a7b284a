//! Configuration section definitions.
//!
//! Each module corresponds to a section in `prerender.toml`:
//!
//! | Module     | TOML Section                                | Purpose                     |
//! |------------|---------------------------------------------|-----------------------------|
//! | `site`     | `[site]`                                    | Origin, dist, SPA shell     |
//! | `catalog`  | `[catalog]`                                 | Remote item listing         |
//! | `sitemap`  | `[sitemap]`, `[not_found]`                  | Extra output documents      |
//! | `snapshot` | `[snapshot]`                                | Server, browser, targets    |
//! | `content`  | `[[pages]]`, `[[categories]]`, `[seo.<key>]`| Route content               |

mod catalog;
pub mod content;
mod site;
mod sitemap;
mod snapshot;

pub use catalog::CatalogConfig;
pub use content::{CategoryConfig, CategoryGroup, PageConfig, SeoCopy};
pub use site::SiteSection;
pub use sitemap::{NotFoundConfig, SitemapConfig};
pub use snapshot::SnapshotConfig;
