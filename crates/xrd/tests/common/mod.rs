//! Shared fixtures for the XRD integration tests.
#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// RFC 6415 Appendix A example, XML form.
pub const RFC6415_XML: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<XRD xmlns='http://docs.oasis-open.org/ns/xri/xrd-1.0'
     xmlns:xsi='http://www.w3.org/2001/XMLSchema-instance'>

  <Subject>http://blog.example.com/article/id/314</Subject>
  <Expires>2010-01-30T09:30:00Z</Expires>

  <Alias>http://blog.example.com/cool_new_thing</Alias>
  <Alias>http://blog.example.com/steve/article/7</Alias>

  <Property type='http://blgx.example.net/ns/version'>1.2</Property>
  <Property type='http://blgx.example.net/ns/version'>1.3</Property>
  <Property type='http://blgx.example.net/ns/ext' xsi:nil='true' />

  <Link rel='author' type='text/html'
        href='http://blog.example.com/author/steve'>
    <Title>About the Author</Title>
    <Title xml:lang='en-us'>Author Information</Title>
    <Property type='http://example.com/role'>editor</Property>
  </Link>

  <Link rel='author' href='http://example.com/author/john'>
    <Title>The other guy</Title>
    <Title>The other author</Title>
  </Link>
  <Link rel='copyright'
        template='http://example.com/copyright?id={uri}' />
</XRD>
"#;

/// RFC 6415 Appendix A example, JSON form.
pub fn rfc6415_json() -> serde_json::Value {
    serde_json::json!({
        "subject": "http://blog.example.com/article/id/314",
        "expires": "2010-01-30T09:30:00Z",
        "aliases": [
            "http://blog.example.com/cool_new_thing",
            "http://blog.example.com/steve/article/7"
        ],
        "properties": {
            "http://blgx.example.net/ns/version": "1.3",
            "http://blgx.example.net/ns/ext": null
        },
        "links": [
            {
                "rel": "author",
                "type": "text/html",
                "href": "http://blog.example.com/author/steve",
                "titles": {
                    "default": "About the Author",
                    "en-us": "Author Information"
                },
                "properties": {
                    "http://example.com/role": "editor"
                }
            },
            {
                "rel": "author",
                "href": "http://example.com/author/john",
                "titles": {
                    "default": "The other author"
                }
            },
            {
                "rel": "copyright",
                "template": "http://example.com/copyright?id={uri}"
            }
        ]
    })
}

/// Routes `tracing` output to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
