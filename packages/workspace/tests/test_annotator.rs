use std::sync::Mutex;

use annotator_editor::{Duration, Instant, TagKind};
use annotator_reconcile::{DropOutcome, Notifier, ReconciliationStatus, TokenId, TokenKind};
use annotator_workspace::{
    Annotator, AnnotatorConfig, AnnotatorEvent, Datatype, RecordCreation, RecordSearch, RecordSeed,
    RecordSummary, SearchResults, ServiceError, SnakPath, SnakType, TermKind,
};
use async_trait::async_trait;
use serde_json::json;

const TEXT: &str = r#"<w id="1" type="person">Caesar</w> crossed the <w id="2" type="place">Rubicon</w>."#;

#[derive(Default)]
struct Dialogs {
    alerts: Vec<String>,
}

impl Notifier for Dialogs {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Creates records Q100, Q101, ... and fails for seeds labelled "fail"
#[derive(Default)]
struct Registry {
    seeds: Mutex<Vec<RecordSeed>>,
}

#[async_trait]
impl RecordCreation for Registry {
    async fn create(&self, seed: &RecordSeed) -> Result<String, ServiceError> {
        let mut seeds = self.seeds.lock().unwrap();
        if seed.terms.iter().any(|t| t.value == "fail") {
            return Err(ServiceError::Request("rejected".to_string()));
        }
        seeds.push(seed.clone());
        Ok(format!("{}", 100 + seeds.len() - 1))
    }
}

struct Catalog;

#[async_trait]
impl RecordSearch for Catalog {
    async fn search(&self, query: &str) -> Result<SearchResults, ServiceError> {
        let mut results = SearchResults::new();
        if query == "rub" {
            let mut summary = RecordSummary::default();
            summary.labels.insert("en".to_string(), "Rubicon".to_string());
            results.insert("7".to_string(), summary);
        }
        Ok(results)
    }
}

fn drag(annotator: &mut Annotator, token: &str, zone: annotator_reconcile::ZoneId) -> DropOutcome {
    let transfer = annotator.begin_drag(token).unwrap();
    annotator
        .drop_on(transfer, zone, &mut Dialogs::default())
        .unwrap()
}

#[test]
fn test_debounced_typing_refreshes_tokens_once() {
    let mut annotator = Annotator::new("", AnnotatorConfig::default()).unwrap();
    annotator.drain_events();
    let start = Instant::now();

    annotator.on_text_input(r#"<w id="1">Cae</w>"#, start);
    annotator.on_text_input(r#"<w id="1">Caesar</w>"#, start + Duration::from_millis(100));
    assert!(!annotator.tick(start + Duration::from_millis(300)).unwrap());
    assert!(annotator.tick(start + Duration::from_millis(350)).unwrap());

    let refreshed: Vec<_> = annotator
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, AnnotatorEvent::TokensRefreshed { .. }))
        .collect();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(annotator.board().get_token("t1").unwrap().full_text(), "Caesar");
}

#[test]
fn test_renamed_tag_updates_every_rendering() {
    let mut annotator = Annotator::new(TEXT, AnnotatorConfig::default()).unwrap();
    let new_items = annotator.reconciler().new_items();
    drag(&mut annotator, "t1", new_items);

    annotator.on_text_input(TEXT.replace("Caesar", "Iulius"), Instant::now());
    annotator.flush_input().unwrap();

    let token = annotator.board().get_token("t1").unwrap();
    assert_eq!(token.full_text(), "Iulius");
    let texts: Vec<_> = token
        .containers()
        .filter_map(|c| token.view(c))
        .map(|v| v.text.clone())
        .collect();
    assert_eq!(texts, vec!["Iulius".to_string(), "Iulius".to_string()]);
}

#[test]
fn test_full_session_submission() {
    let mut annotator = Annotator::new(TEXT, AnnotatorConfig::default())
        .unwrap()
        .with_document_id("D12");
    let new_items = annotator.reconciler().new_items();
    let unknown_items = annotator.reconciler().unknown_items();

    assert_eq!(drag(&mut annotator, "t1", new_items), DropOutcome::Placed);
    let brutus = annotator.add_untagged_token("Brutus").unwrap();
    assert_eq!(drag(&mut annotator, &brutus.to_string(), unknown_items), DropOutcome::Placed);
    let link = annotator.create_link().unwrap();
    annotator.select_link_record(link, "7", Some("Rubicon".to_string())).unwrap();
    drag(&mut annotator, "t2", link);

    let schema = annotator.add_schema();
    let schema_zone = annotator.schemas().schema(schema).unwrap().zone();
    assert_eq!(drag(&mut annotator, "t1", schema_zone), DropOutcome::Placed);
    assert_eq!(
        annotator.schemas().schema(schema).unwrap().title.as_deref(),
        Some("Caesar")
    );

    annotator
        .edit_schema(schema, |schema, board| {
            schema.add_term(TermKind::Label, "la", "Gaius Iulius Caesar");
            let group = schema.add_group();
            schema.groups[group]
                .select_property(board, "P20", Some("crossed".to_string()), Datatype::Item)
                .unwrap();
            schema.groups[group].add_statement(board).unwrap();
        })
        .unwrap();

    let crossed = SnakPath::Main {
        schema,
        group: 0,
        statement: 0,
    };
    let accomplice = SnakPath::Main {
        schema,
        group: 0,
        statement: 1,
    };
    annotator.select_snak_item(crossed, "7", "Rubicon").unwrap();
    let accomplice_zone = annotator
        .schemas()
        .schema(schema)
        .unwrap()
        .groups[0]
        .statements[1]
        .main_snak
        .zone()
        .unwrap();
    drag(&mut annotator, &brutus.to_string(), accomplice_zone);

    let payload = serde_json::to_value(annotator.submission().unwrap()).unwrap();

    assert_eq!(payload["document"], "D12");
    assert_eq!(payload["entities"]["taggedEntities"]["1"]["tokenId"], "t1");
    assert_eq!(payload["entities"]["untaggedEntities"]["1"]["text"], "Brutus");
    assert_eq!(payload["reconciliations"]["newEntities"][0]["tokenId"], "t1");
    assert_eq!(payload["reconciliations"]["unknownEntities"][0]["tokenId"], "u1");
    assert_eq!(payload["reconciliations"]["linkedEntities"][0]["token"]["tokenId"], "t2");
    assert_eq!(payload["reconciliations"]["linkedEntities"][0]["qid"], "7");
    assert_eq!(payload["reconciliations"]["linkedEntities"].as_array().unwrap().len(), 1);

    let schemata = payload["schemata"].as_array().unwrap();
    assert_eq!(schemata.len(), 1);
    assert_eq!(schemata[0]["token"]["tokenId"], "t1");
    assert_eq!(schemata[0]["terms"][0], json!({"type": "label", "langCode": "la", "value": "Gaius Iulius Caesar"}));
    let statements = &schemata[0]["statements"][0];
    assert_eq!(statements["property"], "P20");
    assert_eq!(statements["statements"][0]["mainSnak"]["value"]["item"]["tokenId"], "t2");
    assert_eq!(statements["statements"][1]["mainSnak"]["snakType"], "somevalue");
    assert!(statements["statements"][1]["mainSnak"].get("value").is_none());
}

#[test]
fn test_unknown_token_refused_by_schema() {
    let mut annotator = Annotator::new(TEXT, AnnotatorConfig::default()).unwrap();
    let unknown_items = annotator.reconciler().unknown_items();
    drag(&mut annotator, "t1", unknown_items);
    let schema = annotator.add_schema();
    let zone = annotator.schemas().schema(schema).unwrap().zone();

    let mut dialogs = Dialogs::default();
    let transfer = annotator.begin_drag("t1").unwrap();
    let outcome = annotator.drop_on(transfer, zone, &mut dialogs).unwrap();

    assert!(matches!(outcome, DropOutcome::Rejected { .. }));
    assert_eq!(
        dialogs.alerts,
        vec!["This token cannot be used here as it will reconcile with the UNKNOWN value.".to_string()]
    );
}

#[test]
fn test_no_value_snak_empties_zone() {
    let mut annotator = Annotator::new(TEXT, AnnotatorConfig::default()).unwrap();
    let schema = annotator.add_schema();
    annotator
        .edit_schema(schema, |schema, board| {
            let group = schema.add_group();
            schema.groups[group]
                .select_property(board, "P1", None, Datatype::Item)
                .unwrap();
        })
        .unwrap();
    let path = SnakPath::Main {
        schema,
        group: 0,
        statement: 0,
    };
    annotator.select_snak_item(path, "9", "Roma").unwrap();

    annotator.set_snak_type(path, SnakType::NoValue).unwrap();

    let zone = annotator.schemas().schema(schema).unwrap().groups[0].statements[0]
        .main_snak
        .zone()
        .unwrap();
    assert!(annotator.board().zone(zone).unwrap().occupant().is_none());
    assert!(annotator.set_snak_value(path, json!("x")).is_err());
}

#[tokio::test]
async fn test_search_uses_configured_language() {
    let config = AnnotatorConfig {
        language: "la".to_string(),
        ..AnnotatorConfig::default()
    };
    let annotator = Annotator::new("", config).unwrap();

    let candidates = annotator.search(&Catalog, "rub").await;
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].label, "(en) Rubicon");
    assert!(annotator.search(&Catalog, "xyz").await.is_empty());
}

#[tokio::test]
async fn test_record_creation_stamps_qid_and_links() {
    let mut annotator = Annotator::new(TEXT, AnnotatorConfig::default()).unwrap();
    let new_items = annotator.reconciler().new_items();
    drag(&mut annotator, "t1", new_items);
    let failing = annotator.add_untagged_token("fail").unwrap();
    drag(&mut annotator, &failing.to_string(), new_items);

    let registry = Registry::default();
    let reports = annotator.create_new_records(&registry).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].token, TokenId::tagged("1"));
    assert_eq!(reports[0].outcome, Ok("100".to_string()));
    assert!(reports[1].outcome.is_err());

    assert!(annotator.source().starts_with(r#"<w id="1" type="person" qid="100">Caesar</w>"#));
    assert_eq!(annotator.reconciler().token_for(annotator.board(), "100"), Some(TokenId::tagged("1")));
    assert_eq!(
        annotator.board().get_token("t1").unwrap().status(),
        ReconciliationStatus::Linked
    );
    assert_eq!(annotator.reconciler().new_entities(annotator.board()), vec![failing]);

    let seeds = registry.seeds.lock().unwrap();
    assert_eq!(seeds[0].terms[0].kind, TermKind::Label);
    assert_eq!(seeds[0].terms[0].value, "Caesar");
    assert_eq!(seeds[0].terms[0].lang_code, "en");
}

#[test]
fn test_tagging_from_annotator() {
    let mut annotator = Annotator::new("Marcus Antonius", AnnotatorConfig::default()).unwrap();
    assert!(annotator.check_selection(0, 6).unwrap().message().is_empty());
    annotator.tag_selection(0, 6, TagKind::Person).unwrap();
    assert_eq!(annotator.board().pool(TokenKind::Tagged).len(), 1);
}
