use annotator_editor::{
    Duration, EditorError, InputDebouncer, Instant, Mutation, OverlapReason, TagKind, TextDocument,
};
use annotator_leiden::visible_text;

#[test]
fn test_tagging_scenario() {
    let mut doc = TextDocument::new("Caesar crossed the river.");

    let check = doc.check_selection(0, 6).unwrap();
    assert!(!check.overlaps);

    let result = doc.tag_selection(0, 6, TagKind::Person).unwrap();
    assert_eq!(
        doc.source(),
        r#"<w id="1" type="person">Caesar</w> crossed the river."#
    );
    let (start, end) = result.selection.unwrap();
    assert_eq!(&doc.source()[start..end], "Caesar");

    let tags = doc.tags().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, "1");
    assert_eq!(tags[0].text, "Caesar");
    assert_eq!(tags[0].kind, TagKind::Person);

    assert_eq!(visible_text(doc.display()), "Caesar crossed the river.");
}

#[test]
fn test_retagging_compound_span() {
    let mut doc = TextDocument::new(r#"<w id="1">Gaius</w> <w id="2">Iulius</w> Caesar"#);
    let end = doc.source().len();
    let result = doc.tag_selection(0, end, TagKind::Person).unwrap();
    assert_eq!(result.tag_id, Some(3));

    let tags = doc.tags().unwrap();
    let ids: Vec<_> = tags.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
    assert_eq!(tags[0].text, "Gaius Iulius Caesar");
}

#[test]
fn test_selection_across_tag_boundary_is_refused() {
    let mut doc = TextDocument::new(r#"<w id="1">Caesar crossed</w> the river"#);
    let start = doc.source().find("crossed").unwrap();
    let end = doc.source().find("river").unwrap();

    let err = doc.tag_selection(start, end, TagKind::Place).unwrap_err();
    assert_eq!(err, EditorError::Overlap(OverlapReason::EndOfTag));
    assert_eq!(
        err.to_string(),
        "Invalid selection: end of tag selected. Cannot add the tag."
    );
}

#[test]
fn test_qid_stamp_after_record_creation() {
    let mut doc = TextDocument::new("Roma");
    doc.tag_selection(0, 4, TagKind::Place).unwrap();
    doc.apply(Mutation::SetTagAttribute {
        tag_id: "1".to_string(),
        name: "qid".to_string(),
        value: "12".to_string(),
    })
    .unwrap();

    assert_eq!(doc.source(), r#"<w id="1" type="place" qid="12">Roma</w>"#);
    assert_eq!(doc.tags().unwrap()[0].qid.as_deref(), Some("12"));
}

#[test]
fn test_debounced_typing_applies_last_text() {
    let mut doc = TextDocument::new("");
    let mut debouncer = InputDebouncer::default();
    let t0 = Instant::now();

    for (i, text) in ["C", "Ca", "Cae", "Caesar"].into_iter().enumerate() {
        debouncer.schedule(text.to_string(), t0 + Duration::from_millis(50 * i as u64));
    }
    assert_eq!(debouncer.poll(t0 + Duration::from_millis(300)), None);

    let text = debouncer.poll(t0 + Duration::from_millis(400)).unwrap();
    doc.apply(Mutation::ReplaceText { text }).unwrap();
    assert_eq!(doc.source(), "Caesar");
    assert_eq!(doc.version(), 1);
}
