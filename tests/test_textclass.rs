use rstest::rstest;
use teifix::{repair_str, Category, Document, Engine, Registry, TEI_NAMESPACE};

fn textclass_registry() -> Registry {
    Registry::from_categories([Category::TextClass])
}

#[test]
fn test_textclass_is_renamed() {
    let repaired = repair_str(r#"<textclass attrib="b"/>"#, &textclass_registry()).unwrap();
    assert_eq!(repaired.output, r#"<textClass attrib="b"/>"#);
    assert_eq!(repaired.report.fixes[0].observer, "textclass-casing");
    assert_eq!(repaired.report.fixes[0].local_name, "textclass");
}

#[rstest]
#[case("<textClass/>")]
#[case("<TextClass/>")]
#[case("<TEXTCLASS/>")]
#[case("<classCode/>")]
fn test_other_spellings_are_left_alone(#[case] xml: &str) {
    let repaired = repair_str(xml, &textclass_registry()).unwrap();
    assert!(!repaired.changed());
    assert_eq!(repaired.output, xml);
}

#[test]
fn test_default_namespace_is_kept() {
    let xml = format!(
        r#"<TEI xmlns="{}"><textclass><classCode scheme="x">1</classCode></textclass></TEI>"#,
        TEI_NAMESPACE
    );
    let mut doc = Document::parse(&xml).unwrap();
    let report = Engine::new(&textclass_registry()).run(&mut doc).unwrap();
    assert_eq!(report.len(), 1);

    let tei = doc.document_element().unwrap();
    let text_class = doc.first_child(tei).unwrap();
    let class_code = doc.first_child(text_class).unwrap();
    assert_eq!(doc.local_name(text_class), Some("textClass"));
    assert_eq!(doc.namespace_uri(text_class), Some(TEI_NAMESPACE));
    assert_eq!(doc.namespace_uri(class_code), Some(TEI_NAMESPACE));
    assert_eq!(doc.local_name(class_code), Some("classCode"));
    assert_eq!(
        doc.serialize_to_string().unwrap(),
        format!(
            r#"<TEI xmlns="{}"><textClass><classCode scheme="x">1</classCode></textClass></TEI>"#,
            TEI_NAMESPACE
        )
    );
}

#[test]
fn test_prefixed_textclass_keeps_prefix() {
    let repaired = repair_str(
        r#"<t:teiHeader xmlns:t="http://www.tei-c.org/ns/1.0"><t:textclass t:n="1"/></t:teiHeader>"#,
        &textclass_registry(),
    )
    .unwrap();
    assert_eq!(
        repaired.output,
        r#"<t:teiHeader xmlns:t="http://www.tei-c.org/ns/1.0"><t:textClass t:n="1"/></t:teiHeader>"#
    );
}

#[test]
fn test_every_textclass_is_renamed() {
    let repaired = repair_str(
        "<teiHeader><textclass/><profileDesc><textclass>x</textclass></profileDesc></teiHeader>",
        &textclass_registry(),
    )
    .unwrap();
    assert_eq!(
        repaired.output,
        "<teiHeader><textClass/><profileDesc><textClass>x</textClass></profileDesc></teiHeader>"
    );
    assert_eq!(repaired.report.len(), 2);
}
