use teifix::{Document, Error, ValueType};

#[test]
fn test_parse_element_tree() {
    let doc = Document::parse(r#"<TEI><text><body><p n="1">Hello</p></body></text></TEI>"#).unwrap();
    let tei = doc.document_element().unwrap();
    assert_eq!(doc.local_name(tei), Some("TEI"));
    let p = doc
        .descendants(tei)
        .find(|node| doc.local_name(*node) == Some("p"))
        .unwrap();
    assert_eq!(doc.attribute_by_local_name(p, "n"), Some("1"));
    assert_eq!(doc.text_content(p), "Hello");
    assert_eq!(doc.location(p), "/TEI/text/body/p");
}

#[test]
fn test_parse_entities_and_character_references() {
    let doc = Document::parse("<p a=\"&quot;x&quot;\">&lt;&#65;&#x42;&amp;</p>").unwrap();
    let p = doc.document_element().unwrap();
    assert_eq!(doc.text_content(p), "<AB&");
    assert_eq!(doc.attribute_by_local_name(p, "a"), Some("\"x\""));
}

#[test]
fn test_parse_prefixed_names() {
    let doc = Document::parse(
        r#"<tei:TEI xmlns:tei="http://www.tei-c.org/ns/1.0"><tei:text/></tei:TEI>"#,
    )
    .unwrap();
    let tei = doc.document_element().unwrap();
    let text = doc.first_child(tei).unwrap();
    assert_eq!(doc.local_name(text), Some("text"));
    assert_eq!(
        doc.qualified_tag(text).unwrap(),
        "{http://www.tei-c.org/ns/1.0}text"
    );
}

#[test]
fn test_parse_comments_and_processing_instructions() {
    let doc = Document::parse("<!--before--><a><?pi data?><!--inside--></a>").unwrap();
    let children = doc.children(doc.root()).collect::<Vec<_>>();
    assert_eq!(doc.value_type(children[0]), ValueType::Comment);
    assert_eq!(doc.value_type(children[1]), ValueType::Element);
    let inside = doc
        .children(children[1])
        .map(|node| doc.value_type(node))
        .collect::<Vec<_>>();
    assert_eq!(
        inside,
        vec![ValueType::ProcessingInstruction, ValueType::Comment]
    );
}

#[test]
fn test_unknown_prefix() {
    assert!(matches!(
        Document::parse("<tei:TEI/>"),
        Err(Error::UnknownPrefix(prefix)) if prefix == "tei"
    ));
}

#[test]
fn test_mismatched_close_tag() {
    let err = Document::parse("<div><p></div>").unwrap_err();
    match err {
        Error::InvalidCloseTag { expected, found } => {
            assert_eq!(expected, "p");
            assert_eq!(found, "div");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unclosed_element() {
    assert!(Document::parse("<div><p/>").is_err());
}

#[test]
fn test_no_document_element() {
    assert!(matches!(
        Document::parse("<!-- only a comment -->"),
        Err(Error::NoDocumentElement)
    ));
}

#[test]
fn test_content_after_document_element() {
    assert!(Document::parse("<a/><b/>").is_err());
    assert!(Document::parse("<a/>text").is_err());
}

#[test]
fn test_parse_bytes_detects_encoding() {
    let doc = Document::parse_bytes(
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<p>\xE9t\xE9</p>\n",
    )
    .unwrap();
    let p = doc.document_element().unwrap();
    assert_eq!(doc.text_content(p), "été");
    assert_eq!(doc.encoding(), encoding_rs::WINDOWS_1252);
}

#[test]
fn test_parse_bytes_with_byte_order_mark() {
    let doc = Document::parse_bytes(b"\xEF\xBB\xBF<p>x</p>").unwrap();
    assert_eq!(doc.encoding(), encoding_rs::UTF_8);
    let p = doc.document_element().unwrap();
    assert_eq!(doc.text_content(p), "x");
}
