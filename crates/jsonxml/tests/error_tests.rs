use jsonxml::{from_xml, from_xml_to_array, from_xml_to_object, ErrorCategory, ErrorKind};

fn category(xml: &str) -> Option<ErrorCategory> {
    from_xml(xml).err().map(|err| err.category())
}

fn kind(xml: &str) -> Option<ErrorKind> {
    from_xml(xml).err().map(|err| err.kind().clone())
}

#[test]
fn test_malformed_xml() {
    for xml in [
        "",
        "   ",
        "text only",
        "<a>",
        "<a></b>",
        "</a>",
        "<a x=1/>",
        "<a x=\"1\"x=\"2\"/>",
        "<a>&bogus;</a>",
        "<a>&amp</a>",
        "<root1>coco</root1><root2>coco</root2>",
        "<a/>trailing",
        "<a><!-- never closed </a>",
    ] {
        assert_eq!(category(xml), Some(ErrorCategory::MalformedXml), "input {xml:?}");
    }
}

#[test]
fn test_structural_ambiguity() {
    for xml in [
        "<a><b>1</b><b>2</b></a>",
        "<a><b>text<c/></b></a>",
        "<a><b><c/>text</b></a>",
        "<a isArray=\"true\"><element><f>1</f><g>2</g></element></a>",
        "<a isArray=\"true\"><element>text<f>1</f></element></a>",
        "<a isArray=\"true\"><item>1</item></a>",
        "<a isArray=\"true\">text<element>1</element></a>",
        "<list><element>1</element><element>2</element><x/></list>",
        "<a><p:>1</p:></a>",
    ] {
        assert_eq!(category(xml), Some(ErrorCategory::StructuralAmbiguity), "input {xml:?}");
    }
}

#[test]
fn test_unsupported_target_shape() {
    let err = from_xml_to_array("<a><b>1</b></a>").err();
    assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::UnsupportedTargetShape));

    let err = from_xml_to_object("<a isArray=\"true\"><element>1</element></a>").err();
    assert_eq!(err.map(|e| e.category()), Some(ErrorCategory::UnsupportedTargetShape));

    let err = from_xml_to_object("<a>just text</a>").err();
    assert!(matches!(
        err.map(|e| e.kind().clone()),
        Some(ErrorKind::UnsupportedTargetShape { expected, found }) if expected == "object" && found == "string"
    ));
}

#[test]
fn test_error_kinds() {
    assert_eq!(kind("<root1/><root2/>"), Some(ErrorKind::MultipleRoots));
    assert_eq!(kind(""), Some(ErrorKind::MissingRoot));
    assert_eq!(
        kind("<a isArray=\"true\"><element><f/><g/><h/></element></a>"),
        Some(ErrorKind::TooManyArrayChildren { count: 3 })
    );
    assert_eq!(
        kind("<a><b>1</b><b>2</b></a>"),
        Some(ErrorKind::DuplicateField { name: "b".to_string() })
    );
    assert_eq!(
        kind("<list><element>1</element><other/><element>2</element></list>"),
        Some(ErrorKind::DuplicateField { name: "element".to_string() })
    );
    assert_eq!(
        kind("<a isArray=\"true\"><item>1</item></a>"),
        Some(ErrorKind::UnexpectedArrayChild { name: "item".to_string() })
    );
}

#[test]
fn test_error_reports_position() {
    let err = from_xml("<a>\n  <b>1</b>\n  <b>2</b>\n</a>").err();
    let span = err.as_ref().map(|e| e.span());
    assert_eq!(span.map(|s| s.start.line), Some(3));
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.starts_with("error at 3:"), "{message}");
}
