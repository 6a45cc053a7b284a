//! Stage 1: route and metadata synthesis.
//!
//! Turns the shared SPA shell into one crawlable document per route.
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────────────────┐
//! │ template │ + │ route table  │ ─►│ <dist>/<path>/index.html │
//! └──────────┘   └──────────────┘   │ <dist>/404.html          │
//!                                   │ <dist>/sitemap.xml       │
//!                                   └──────────────────────────┘
//! ```
//!
//! The template is read and checked before anything is written. After that,
//! a failing write only affects its own route; the run continues and then
//! fails with a summary.

pub mod document;
mod not_found;

pub use document::{DocumentContext, render_route};
pub use not_found::render_not_found;

use crate::catalog::CatalogItem;
use crate::config::SiteConfig;
use crate::generator::sitemap::build_sitemap;
use crate::logger::ProgressLine;
use crate::route::{RouteTable, collect_routes};
use crate::seo::head::head_close;
use crate::utils::fs::write_atomic;
use crate::utils::html::find_element_by_id;
use crate::utils::plural_count;
use crate::{debug, log};
use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal stage-1 failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("template not found: {0}")]
    TemplateMissing(PathBuf),

    #[error("failed to read template {0}")]
    TemplateUnreadable(PathBuf, #[source] io::Error),

    #[error("template {0} has no </head>")]
    MalformedTemplate(PathBuf),

    #[error("{failed} of {total} documents could not be written")]
    WriteFailures { failed: usize, total: usize },
}

/// The SPA shell every document starts from.
#[derive(Debug, Clone)]
pub struct Template {
    pub path: PathBuf,
    pub html: String,
}

impl Template {
    /// Read and sanity-check the template.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let html = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PipelineError::TemplateMissing(path.to_path_buf()),
            _ => PipelineError::TemplateUnreadable(path.to_path_buf(), err),
        })?;

        if head_close(&html).is_none() {
            return Err(PipelineError::MalformedTemplate(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            html,
        })
    }
}

/// What a stage-1 run produced.
#[derive(Debug, Default)]
pub struct Synthesis {
    pub routes: usize,
    pub written: usize,
    pub not_found: Option<PathBuf>,
    pub sitemap: Option<PathBuf>,
}

/// Run stage 1 against fetched catalog items.
pub fn synthesize(config: &SiteConfig, items: &[CatalogItem]) -> Result<Synthesis> {
    let template = Template::load(&config.template_path())?;
    if find_element_by_id(&template.html, &config.site.mount_id).is_none() {
        log!("warn"; "template has no element with id=\"{}\", route content will not be inserted", config.site.mount_id);
    }

    let table = collect_routes(config, items);
    log!(
        "generate";
        "{} ({} static, {} categories, {} items)",
        plural_count(table.len(), "route"),
        table.report.static_routes,
        table.report.categories,
        table.report.items
    );

    let ctx = DocumentContext::from_config(config);
    let mut failed = 0;
    let written = write_routes(config, &template, &table, &ctx, &mut failed);

    let not_found = if config.not_found.enable {
        let path = config.dist().join(&config.not_found.path);
        match write_not_found(config, &template, &path) {
            Ok(()) => Some(path),
            Err(e) => {
                log!("error"; "{:#}", e);
                failed += 1;
                None
            }
        }
    } else {
        None
    };

    let sitemap = build_sitemap(config, &table)?;

    if failed > 0 {
        return Err(PipelineError::WriteFailures {
            failed,
            total: table.len() + usize::from(config.not_found.enable),
        }
        .into());
    }

    Ok(Synthesis {
        routes: table.len(),
        written,
        not_found,
        sitemap,
    })
}

fn write_routes(
    config: &SiteConfig,
    template: &Template,
    table: &RouteTable,
    ctx: &DocumentContext<'_>,
    failed: &mut usize,
) -> usize {
    let progress = ProgressLine::new("generate", &[("write", table.len())]);
    let mut written = 0;

    for route in table.iter() {
        let output = route.path.output_file(config.dist());
        let result = render_route(template, route, ctx)
            .map_err(anyhow::Error::from)
            .and_then(|html| write_atomic(&output, &html));

        match result {
            Ok(()) => {
                written += 1;
                debug!("generate"; "{} -> {}", route.path, config.root_relative(&output).display());
            }
            Err(e) => {
                log!("error"; "{}: {:#}", route.path, e);
                *failed += 1;
            }
        }
        progress.inc("write");
    }

    progress.finish();
    written
}

fn write_not_found(config: &SiteConfig, template: &Template, path: &Path) -> Result<()> {
    let html = render_not_found(template, &config.not_found.title, &config.site.mount_id)?;
    write_atomic(path, &html)?;
    log!("generate"; "{}", config.root_relative(path).display());
    Ok(())
}
