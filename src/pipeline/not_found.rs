//! Hardened not-found document.
//!
//! Same shell as every route, but with no canonical, Open Graph or Twitter
//! tags and a `noindex` robots directive, so search engines never index the
//! fallback page under whatever URL served it.

use super::document::replace_mount;
use super::{PipelineError, Template};
use crate::seo::head;

const ROBOTS: &str = "noindex, follow";

pub fn render_not_found(
    template: &Template,
    title: &str,
    mount_id: &str,
) -> Result<String, PipelineError> {
    let malformed = || PipelineError::MalformedTemplate(template.path.clone());

    let stripped = head::strip_managed_tags(&template.html).ok_or_else(malformed)?;
    let tags = [head::title_tag(title), head::meta_name("robots", ROBOTS)];
    let html = head::inject_before_head_close(&stripped, &tags).ok_or_else(malformed)?;

    Ok(replace_mount(&html, mount_id, None))
}
