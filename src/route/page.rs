//! Static and category landing routes.

use super::{Route, RouteContext, RouteKind};
use crate::config::PageConfig;
use crate::route::CategoryEntry;
use crate::seo::jsonld;
use crate::utils::html::escape;

/// `[[pages]]` entries, verbatim.
pub(super) fn static_routes(pages: &[PageConfig]) -> impl Iterator<Item = Route> + '_ {
    pages.iter().map(|page| Route {
        path: page.path.clone(),
        kind: RouteKind::Static,
        title: page.title.clone(),
        description: page.description.clone(),
        image: page.image.clone(),
        structured_data: page.structured_data.clone(),
        content: page.content.clone(),
        lastmod: None,
    })
}

/// Landing page of a mapped category, or `None` without `[seo.<key>]` copy.
pub(super) fn category_route(ctx: &RouteContext<'_>, entry: &CategoryEntry) -> Option<Route> {
    let copy = ctx.seo.get(&entry.key)?;
    let path = ctx.mapping.category_path(entry);
    let url = path.canonical(ctx.origin);

    let heading = copy
        .h1
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(&copy.title);
    let content = format!("<section><h1>{}</h1>{}</section>", escape(heading), copy.html);

    let structured_data = vec![
        jsonld::collection_page(heading, &copy.description, &url),
        jsonld::breadcrumb_list(&[ctx.home_crumb(), ctx.category_crumb(entry)]),
    ];

    Some(Route {
        path,
        kind: RouteKind::Category,
        title: copy.title.clone(),
        description: copy.description.clone(),
        image: copy.image.clone(),
        structured_data,
        content: Some(content),
        lastmod: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::route::RouteCategoryMapping;

    fn build(extra: &str) -> Vec<Option<Route>> {
        let config = test_parse_config(extra);
        let mapping = RouteCategoryMapping::new(&config.categories, &config.site.nested_segment);
        let ctx = RouteContext {
            origin: config.site.origin(),
            site_name: &config.site.name,
            currency: &config.site.currency,
            mapping: &mapping,
            seo: &config.seo,
        };
        mapping.iter().map(|e| category_route(&ctx, e)).collect()
    }

    #[test]
    fn test_static_routes_verbatim() {
        let config = test_parse_config(
            "[[pages]]\npath = \"/about\"\ntitle = \"Про нас\"\ncontent = \"<h1>Про нас</h1>\"\nimage = \"/about.jpg\"",
        );
        let routes: Vec<_> = static_routes(&config.pages).collect();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/about/");
        assert_eq!(routes[0].kind, RouteKind::Static);
        assert_eq!(routes[0].content.as_deref(), Some("<h1>Про нас</h1>"));
        assert_eq!(routes[0].image.as_deref(), Some("/about.jpg"));
    }

    #[test]
    fn test_category_route_content_and_data() {
        let routes = build(
            r#"
[[categories]]
key = "wedding"
slug = "vesilni"
group = "nested"

[seo.wedding]
title = "Весільні торти | Antreme"
description = "Опис"
h1 = "Весільні торти & декор"
html = "<p>Копірайт</p>"
"#,
        );
        let route = routes[0].as_ref().unwrap();

        assert_eq!(route.path, "/torty-na-zamovlennya/vesilni/");
        assert_eq!(route.kind, RouteKind::Category);
        assert_eq!(
            route.content.as_deref(),
            Some("<section><h1>Весільні торти &amp; декор</h1><p>Копірайт</p></section>")
        );

        assert_eq!(route.structured_data.len(), 2);
        assert_eq!(route.structured_data[0]["@type"], "CollectionPage");
        assert_eq!(
            route.structured_data[0]["url"],
            "https://antreme.kyiv.ua/torty-na-zamovlennya/vesilni/"
        );
        let crumbs = &route.structured_data[1]["itemListElement"];
        assert_eq!(crumbs[0]["name"], "Antreme");
        assert_eq!(crumbs[0]["item"], "https://antreme.kyiv.ua/");
        assert_eq!(crumbs[1]["name"], "Весільні торти & декор");
    }

    #[test]
    fn test_category_heading_falls_back_to_title() {
        let routes = build(
            "[[categories]]\nkey = \"bento\"\nslug = \"bento-torty\"\ngroup = \"top-level\"\n[seo.bento]\ntitle = \"Бенто\"\n",
        );
        let route = routes[0].as_ref().unwrap();
        assert_eq!(route.path, "/bento-torty/");
        assert_eq!(route.content.as_deref(), Some("<section><h1>Бенто</h1></section>"));
    }

    #[test]
    fn test_category_without_copy_is_none() {
        let routes = build("[[categories]]\nkey = \"kids\"\nslug = \"dytyachi\"\ngroup = \"nested\"\n");
        assert!(routes[0].is_none());
    }
}
