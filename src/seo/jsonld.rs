//! schema.org structured data builders.

use serde_json::{Map, Value, json};

const CONTEXT: &str = "https://schema.org";

/// One breadcrumb step: display name and absolute URL.
pub struct Crumb {
    pub name: String,
    pub url: String,
}

/// `BreadcrumbList` with 1-based positions.
pub fn breadcrumb_list(crumbs: &[Crumb]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(idx, crumb)| {
            json!({
                "@type": "ListItem",
                "position": idx + 1,
                "name": crumb.name,
                "item": crumb.url,
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// `CollectionPage` for a category landing page.
pub fn collection_page(name: &str, description: &str, url: &str) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "CollectionPage",
        "name": name,
        "description": description,
        "url": url,
    })
}

/// Product fields needed for the `Product` block.
pub struct ProductData<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: Option<&'a str>,
    pub url: &'a str,
    pub price: Option<f64>,
    pub currency: &'a str,
    pub available: bool,
}

/// `Product`, with an `Offer` when a price is known.
pub fn product(data: &ProductData<'_>) -> Value {
    let mut obj = Map::new();
    obj.insert("@context".into(), CONTEXT.into());
    obj.insert("@type".into(), "Product".into());
    obj.insert("name".into(), data.name.into());
    obj.insert("description".into(), data.description.into());
    if let Some(image) = data.image {
        obj.insert("image".into(), image.into());
    }
    obj.insert("url".into(), data.url.into());

    if let Some(price) = data.price.filter(|p| p.is_finite() && *p >= 0.0) {
        let availability = if data.available {
            "https://schema.org/InStock"
        } else {
            "https://schema.org/OutOfStock"
        };
        obj.insert(
            "offers".into(),
            json!({
                "@type": "Offer",
                "price": price,
                "priceCurrency": data.currency,
                "availability": availability,
                "url": data.url,
            }),
        );
    }

    Value::Object(obj)
}

/// Serialize for embedding inside `<script>`.
///
/// A single object stays an object; several become an array. `</` is
/// escaped so the payload cannot close the script element.
pub fn to_script_json(data: &[Value]) -> Option<String> {
    let json = match data {
        [] => return None,
        [single] => serde_json::to_string(single),
        many => serde_json::to_string(many),
    }
    .ok()?;
    Some(json.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumb_positions() {
        let list = breadcrumb_list(&[
            Crumb {
                name: "Головна".into(),
                url: "https://antreme.kyiv.ua/".into(),
            },
            Crumb {
                name: "Бенто-торти".into(),
                url: "https://antreme.kyiv.ua/bento-torty/".into(),
            },
        ]);
        assert_eq!(list["@type"], "BreadcrumbList");
        assert_eq!(list["itemListElement"][0]["position"], 1);
        assert_eq!(list["itemListElement"][1]["position"], 2);
        assert_eq!(list["itemListElement"][1]["item"], "https://antreme.kyiv.ua/bento-torty/");
    }

    #[test]
    fn test_product_with_offer() {
        let value = product(&ProductData {
            name: "Choco Dream",
            description: "Шоколадний бенто",
            image: Some("https://antreme.kyiv.ua/img/choco.webp"),
            url: "https://antreme.kyiv.ua/bento-torty/choco-dream/",
            price: Some(650.0),
            currency: "UAH",
            available: false,
        });
        assert_eq!(value["@type"], "Product");
        assert_eq!(value["offers"]["price"], 650.0);
        assert_eq!(value["offers"]["priceCurrency"], "UAH");
        assert_eq!(value["offers"]["availability"], "https://schema.org/OutOfStock");
    }

    #[test]
    fn test_product_without_price_has_no_offer() {
        let value = product(&ProductData {
            name: "Mystery",
            description: "",
            image: None,
            url: "https://antreme.kyiv.ua/x/",
            price: None,
            currency: "UAH",
            available: true,
        });
        assert!(value.get("offers").is_none());
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_to_script_json_shapes() {
        assert_eq!(to_script_json(&[]), None);

        let one = to_script_json(&[json!({"a": 1})]).unwrap();
        assert!(one.starts_with('{'));

        let many = to_script_json(&[json!({"a": 1}), json!({"b": 2})]).unwrap();
        assert!(many.starts_with('['));
    }

    #[test]
    fn test_to_script_json_escapes_close_tag() {
        let json = to_script_json(&[json!({"text": "</script><script>alert(1)"})]).unwrap();
        assert!(!json.contains("</script"));
        assert!(json.contains("<\\/script"));
    }
}
