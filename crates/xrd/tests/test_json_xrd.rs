mod common;

use helios_xrd::{
    Document, Link, Property, PropertyMap, Result, from_json_str, from_json_value,
    link_from_json_value, to_json_string, to_json_value,
};
use serde_json::json;

#[test]
fn test_json_webfinger_scenario() -> Result<()> {
    common::init_tracing();
    let json = r#"{"subject":"acct:carol@example.com","links":[{"rel":"http://webfinger.net/rel/avatar","href":"http://example.com/carol.jpg"}]}"#;

    let doc = from_json_str(json)?;
    assert_eq!(doc.subject(), Some("acct:carol@example.com"));
    assert_eq!(doc.links().map(<[Link]>::len), Some(1));
    assert_eq!(doc.aliases(), None);
    assert_eq!(doc.properties(), None);
    assert_eq!(doc.expires(), None);

    let avatar = doc.link("http://webfinger.net/rel/avatar").unwrap();
    assert_eq!(avatar.rel(), Some("http://webfinger.net/rel/avatar"));
    assert_eq!(avatar.href(), Some("http://example.com/carol.jpg"));
    assert_eq!(avatar.template(), None);

    // Re-encoding gives back exactly the keys that were present.
    assert_eq!(to_json_string(&doc)?, json);
    Ok(())
}

#[test]
fn test_json_nil_property_round_trip() -> Result<()> {
    let doc = Document::builder()
        .property(Property::nil("http://example.com/ns/nil"))
        .property(Property::new("http://example.com/ns/empty", ""))
        .build();

    let value = to_json_value(&doc)?;
    assert_eq!(
        value,
        json!({
            "properties": {
                "http://example.com/ns/nil": null,
                "http://example.com/ns/empty": ""
            }
        })
    );

    let back = from_json_value(value)?;
    assert_eq!(back.properties().unwrap()[0], Property::nil("http://example.com/ns/nil"));
    assert_eq!(back.properties().unwrap()[1].value(), Some(""));
    assert_eq!(back, doc);
    Ok(())
}

#[test]
fn test_json_decodes_rfc6415_example() -> Result<()> {
    let doc = from_json_value(common::rfc6415_json())?;

    assert_eq!(doc.subject(), Some("http://blog.example.com/article/id/314"));
    assert_eq!(
        doc.expires().map(|e| e.to_rfc3339()),
        Some("2010-01-30T09:30:00+00:00".to_string())
    );
    assert_eq!(doc.aliases().map(<[String]>::len), Some(2));
    assert_eq!(doc.property("http://blgx.example.net/ns/version"), Some("1.3"));
    assert_eq!(doc.property("http://blgx.example.net/ns/ext"), None);

    let authors: Vec<_> = doc.all_links("author").collect();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].title(Some("en-us")), Some("Author Information"));
    assert_eq!(authors[0].property("http://example.com/role"), Some("editor"));
    assert_eq!(authors[1].title(None), Some("The other author"));

    let copyright = doc.link("copyright").unwrap();
    assert_eq!(
        copyright.resolve_href("http://blog.example.com/article/id/314").as_deref(),
        Some("http://example.com/copyright?id=http://blog.example.com/article/id/314")
    );

    assert_eq!(to_json_value(&doc)?, common::rfc6415_json());
    Ok(())
}

#[test]
fn test_json_property_order_is_preserved() -> Result<()> {
    let doc = from_json_str(r#"{"properties": {"z": "1", "a": "2", "m": null}}"#)?;
    let types: Vec<_> = doc.properties().unwrap().iter().map(Property::type_).collect();
    assert_eq!(types, vec!["z", "a", "m"]);
    assert_eq!(
        to_json_string(&doc)?,
        r#"{"properties":{"z":"1","a":"2","m":null}}"#
    );
    Ok(())
}

#[test]
fn test_json_properties_from_map_input() -> Result<()> {
    let mut map = PropertyMap::new();
    map.insert("http://example.com/ns/a".to_string(), Some("1".to_string()));
    map.insert("http://example.com/ns/b".to_string(), None);

    let doc = Document::builder().properties(map.clone()).build();
    assert_eq!(doc.property_map(), Some(map));
    Ok(())
}

#[test]
fn test_json_duplicate_properties_are_dropped() -> Result<()> {
    let doc = Document::builder()
        .property(Property::new("t", "first"))
        .property(Property::new("u", "other"))
        .property(Property::new("t", "last"))
        .build();

    let back = from_json_value(to_json_value(&doc)?)?;
    assert_ne!(back, doc);
    assert_eq!(
        back.properties().unwrap(),
        &[Property::new("t", "last"), Property::new("u", "other")]
    );
    Ok(())
}

#[test]
fn test_json_ignores_unknown_keys() -> Result<()> {
    let doc = from_json_str(r#"{"subject": "acct:a@example.com", "x-extra": [1, 2]}"#)?;
    assert_eq!(doc, Document::builder().subject("acct:a@example.com").build());
    Ok(())
}

#[test]
fn test_json_errors() {
    let err = from_json_str(r#"{"links": [{"href": "http://a", "template": "http://b/{uri}"}]}"#)
        .unwrap_err();
    assert!(err.is_validation());

    let err = from_json_str(r#"{"expires": "2010-13-45"}"#).unwrap_err();
    assert!(err.is_format());

    let err = from_json_str(r#"{"aliases": "not-a-list"}"#).unwrap_err();
    assert!(err.is_format());

    let err = link_from_json_value(json!({"properties": {"t": 5}})).unwrap_err();
    assert!(err.is_format());
}
