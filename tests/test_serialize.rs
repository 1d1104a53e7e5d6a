use rstest::rstest;
use teifix::Document;

#[rstest]
#[case::empty_element("<TEI/>")]
#[case::attributes_keep_order(r#"<p rend="it" n="2" type="x"/>"#)]
#[case::mixed_content("<p>Hello <hi>world</hi>!</p>")]
#[case::comments_and_pis("<a><!--c--><?pi?><?pi data?></a>")]
#[case::default_namespace(r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><text/></TEI>"#)]
#[case::prefixed(r#"<tei:TEI xmlns:tei="http://www.tei-c.org/ns/1.0"><tei:text tei:n="1"/></tei:TEI>"#)]
#[case::xml_prefix(r#"<p xml:id="p1" xml:lang="en"/>"#)]
#[case::nested_redeclaration(r#"<a xmlns="urn:a"><b xmlns="urn:b"><c/></b><d/></a>"#)]
#[case::escapes("<p a=\"&lt;&amp;&quot;\">&lt;&amp;&gt;</p>")]
#[case::prolog("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE TEI SYSTEM \"tei.dtd\">\n<TEI/>\n")]
#[case::root_level_comments("<!--a-->\n<TEI/>\n<!--b-->")]
#[case::prolog_on_one_line("<?xml version=\"1.0\"?><!DOCTYPE TEI><TEI/>")]
fn test_roundtrip(#[case] xml: &str) {
    let doc = Document::parse(xml).unwrap();
    assert_eq!(doc.serialize_to_string().unwrap(), xml);
}

#[test]
fn test_cdata_is_written_as_text() {
    let doc = Document::parse("<p><![CDATA[a<b]]></p>").unwrap();
    assert_eq!(doc.serialize_to_string().unwrap(), "<p>a&lt;b</p>");
}

#[test]
fn test_element_emptied_by_mutation_is_self_closing() {
    let mut doc = Document::parse("<div><p>x</p></div>").unwrap();
    let div = doc.document_element().unwrap();
    let p = doc.first_child(div).unwrap();
    doc.remove(p).unwrap();
    assert_eq!(doc.serialize_to_string().unwrap(), "<div/>");
}

#[test]
fn test_write_re_encodes() {
    let doc = Document::parse_bytes(
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<p>caf\xE9</p>",
    )
    .unwrap();
    let mut out = Vec::new();
    doc.write(&mut out).unwrap();
    assert_eq!(
        out,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<p>caf\xE9</p>".to_vec()
    );
}
