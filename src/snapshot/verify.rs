//! Post-snapshot verification.
//!
//! Reads each target's document back from disk and checks that it looks
//! hydrated. Findings are advisory: they are printed, never fatal.

use crate::core::RoutePath;
use crate::log;
use crate::utils::plural_count;
use std::fmt;
use std::path::Path;

/// What is wrong with a target's document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// No document on disk.
    Missing,
    /// Mount element absent or without element children.
    NotHydrated,
    /// Mount holds only the stage-1 `data-rh` wrapper: the snapshot never
    /// replaced this document.
    StaticFallback,
    /// Hydrated, but there is no `<h1>`.
    NoHeading,
    /// Could not read or parse the file.
    Unreadable(String),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing file"),
            Self::NotHydrated => f.write_str("mount element is empty (not hydrated)"),
            Self::StaticFallback => f.write_str("stage-1 document, not a snapshot"),
            Self::NoHeading => f.write_str("no <h1> (hydrated without content)"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    pub checked: usize,
    pub findings: Vec<(RoutePath, Finding)>,
}

impl VerifyReport {
    pub fn passed(&self) -> usize {
        self.checked - self.findings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Print one line per finding plus a summary.
    pub fn print(&self) {
        for (path, finding) in &self.findings {
            log!("warn"; "{}: {}", path, finding);
        }
        log!("verify"; "{}/{} ok", self.passed(), plural_count(self.checked, "target"));
    }
}

/// Check every target's document under `dist`.
pub fn verify_targets(dist: &Path, targets: &[RoutePath], mount_id: &str) -> VerifyReport {
    let mut report = VerifyReport::default();
    for target in targets {
        report.checked += 1;
        if let Some(finding) = check_document(&target.output_file(dist), mount_id) {
            report.findings.push((target.clone(), finding));
        }
    }
    report
}

fn check_document(path: &Path, mount_id: &str) -> Option<Finding> {
    let html = match std::fs::read_to_string(path) {
        Ok(html) => html,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Some(Finding::Missing),
        Err(e) => return Some(Finding::Unreadable(e.to_string())),
    };
    inspect_html(&html, mount_id)
}

/// Inspect a document; `None` means it passed.
pub fn inspect_html<'a>(html: &'a str, mount_id: &'a str) -> Option<Finding> {
    let dom = match tl::parse(html, tl::ParserOptions::default().track_ids()) {
        Ok(dom) => dom,
        Err(e) => return Some(Finding::Unreadable(e.to_string())),
    };
    let parser = dom.parser();

    let Some(mount) = dom
        .get_element_by_id(mount_id)
        .and_then(|handle| handle.get(parser))
        .and_then(tl::Node::as_tag)
    else {
        return Some(Finding::NotHydrated);
    };

    let children: Vec<&tl::HTMLTag> = mount
        .children()
        .top()
        .iter()
        .filter_map(|child| child.get(parser))
        .filter_map(tl::Node::as_tag)
        .collect();
    if children.is_empty() {
        return Some(Finding::NotHydrated);
    }
    if children.iter().all(|tag| is_marked(tag)) {
        return Some(Finding::StaticFallback);
    }

    let has_heading = dom
        .query_selector("h1")
        .is_some_and(|mut headings| headings.next().is_some());
    if !has_heading {
        return Some(Finding::NoHeading);
    }

    None
}

/// Carries the hydration marker stage 1 wraps route content in.
fn is_marked(tag: &tl::HTMLTag<'_>) -> bool {
    tag.attributes()
        .get("data-rh")
        .flatten()
        .is_some_and(|value| value.as_utf8_str() == "true")
}
