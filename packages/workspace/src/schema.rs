//! # Schema editor
//!
//! Describes the records a submission creates or completes. One schema
//! per token dropped in its schema zone:
//!
//! ```text
//! Schema ── zone (token)
//!   ├── terms: label / description / alias (language code, value)
//!   └── statement groups: property ─▶ statements
//!         └── Statement
//!               ├── main snak
//!               ├── qualifiers: property ─▶ snak
//!               └── reference records: [property ─▶ snak]
//! ```
//!
//! An item snak holds its value in a drop zone; every other snak holds
//! the JSON value of the widget that edits it.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use annotator_reconcile::{
    Board, Condition, DropZone, ReconcileResult, ReconciliationStatus, TokenId, TokenSummary, ZoneId,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{WorkspaceError, WorkspaceResult};

pub const UNKNOWN_REJECTED: &str =
    "This token cannot be used here as it will reconcile with the UNKNOWN value.";

/// `[[day/]month/]year[ CE|BCE]`
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:(\d\d?)/)?(0?[1-9]|1[012])/)?(\d+)(?: (B?CE))?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub u64);

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema-{}", self.0)
    }
}

/// Value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datatype {
    Item,
    Property,
    StringValue,
    UrlValue,
    QuantityValue,
    TimeValue,
    GlobeCoordinateValue,
    MonolingualTextValue,
}

impl Datatype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Datatype::Item => "Item",
            Datatype::Property => "Property",
            Datatype::StringValue => "StringValue",
            Datatype::UrlValue => "UrlValue",
            Datatype::QuantityValue => "QuantityValue",
            Datatype::TimeValue => "TimeValue",
            Datatype::GlobeCoordinateValue => "GlobeCoordinateValue",
            Datatype::MonolingualTextValue => "MonolingualTextValue",
        }
    }
}

impl FromStr for Datatype {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Item" => Ok(Datatype::Item),
            "Property" => Ok(Datatype::Property),
            "StringValue" => Ok(Datatype::StringValue),
            "UrlValue" => Ok(Datatype::UrlValue),
            "QuantityValue" => Ok(Datatype::QuantityValue),
            "TimeValue" => Ok(Datatype::TimeValue),
            "GlobeCoordinateValue" => Ok(Datatype::GlobeCoordinateValue),
            "MonolingualTextValue" => Ok(Datatype::MonolingualTextValue),
            other => Err(WorkspaceError::UnknownDatatype(other.to_string())),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakType {
    #[default]
    Value,
    SomeValue,
    NoValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Label,
    Description,
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    #[serde(rename = "type")]
    pub kind: TermKind,
    pub lang_code: String,
    pub value: String,
}

/// Wikibase-style time: `+yyyy-mm-dd` with a precision of 9 (year),
/// 10 (month) or 11 (day)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    pub time: String,
    pub precision: u8,
}

pub fn parse_time(input: &str) -> WorkspaceResult<TimeValue> {
    let caps = TIME_RE
        .captures(input.trim())
        .ok_or_else(|| WorkspaceError::InvalidTime(input.to_string()))?;

    let day = caps.get(1).map(|m| m.as_str());
    let month = caps.get(2).map(|m| m.as_str());
    let year = caps.get(3).map_or("", |m| m.as_str());
    let sign = match caps.get(4).map(|m| m.as_str()) {
        Some("BCE") => '-',
        _ => '+',
    };
    let precision = match (day, month) {
        (Some(_), _) => 11,
        (None, Some(_)) => 10,
        (None, None) => 9,
    };

    Ok(TimeValue {
        time: format!(
            "{sign}{year}-{:0>2}-{:0>2}",
            month.unwrap_or("01"),
            day.unwrap_or("01")
        ),
        precision,
    })
}

/// What a snak stores
#[derive(Debug, Clone, PartialEq)]
pub enum SnakInput {
    /// Token dropped in the snak's own zone
    Item { zone: ZoneId },
    /// Value of the editing widget, if any yet
    Widget(Option<serde_json::Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snak {
    datatype: Datatype,
    snak_type: SnakType,
    input: SnakInput,
}

impl Snak {
    pub fn new(board: &mut Board, datatype: Datatype) -> Self {
        let input = match datatype {
            Datatype::Item => SnakInput::Item {
                zone: board.add_zone(DropZone::single("item value")),
            },
            _ => SnakInput::Widget(None),
        };
        Self {
            datatype,
            snak_type: SnakType::Value,
            input,
        }
    }

    pub fn datatype(&self) -> Datatype {
        self.datatype
    }

    pub fn snak_type(&self) -> SnakType {
        self.snak_type
    }

    pub fn input(&self) -> &SnakInput {
        &self.input
    }

    /// Drop zone of an item snak
    pub fn zone(&self) -> Option<ZoneId> {
        match self.input {
            SnakInput::Item { zone } => Some(zone),
            SnakInput::Widget(_) => None,
        }
    }

    /// Only a "value" snak takes input; leaving it empties the item zone
    pub fn set_snak_type(&mut self, board: &mut Board, snak_type: SnakType) -> ReconcileResult<()> {
        self.snak_type = snak_type;
        if let Some(zone) = self.zone() {
            if snak_type == SnakType::Value {
                board.enable_zone(zone)?;
            } else {
                board.disable_zone(zone)?;
            }
        }
        Ok(())
    }

    pub fn set_value(&mut self, value: serde_json::Value) -> WorkspaceResult<()> {
        match &mut self.input {
            SnakInput::Item { .. } => Err(WorkspaceError::ItemSnakValue),
            SnakInput::Widget(slot) => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    /// Payload form. An item whose token reconciles with the unknown value
    /// is submitted as "some value".
    pub fn payload(&self, board: &Board, unknown: &[TokenId]) -> WorkspaceResult<SnakPayload> {
        let mut snak_type = self.snak_type;
        let value = match (&self.input, snak_type) {
            (_, SnakType::SomeValue | SnakType::NoValue) => None,
            (SnakInput::Item { zone }, SnakType::Value) => {
                let token = board
                    .zone(*zone)
                    .and_then(|z| z.occupant())
                    .and_then(|id| board.token(id));
                match token {
                    Some(token) if unknown.contains(token.id()) => {
                        snak_type = SnakType::SomeValue;
                        None
                    }
                    Some(token) => Some(SnakValue::Item {
                        item: token.summary(),
                    }),
                    None => None,
                }
            }
            (SnakInput::Widget(None), SnakType::Value) => None,
            (SnakInput::Widget(Some(value)), SnakType::Value) => {
                Some(widget_value(self.datatype, value)?)
            }
        };

        Ok(SnakPayload {
            datatype: self.datatype,
            value,
            snak_type,
        })
    }
}

fn widget_value(datatype: Datatype, value: &serde_json::Value) -> WorkspaceResult<SnakValue> {
    Ok(match datatype {
        Datatype::StringValue | Datatype::UrlValue => SnakValue::Json(json!({ "value": value })),
        Datatype::QuantityValue => SnakValue::Json(json!({ "number": value })),
        Datatype::TimeValue => {
            let text = value
                .as_str()
                .ok_or_else(|| WorkspaceError::InvalidTime(value.to_string()))?;
            SnakValue::Time(parse_time(text)?)
        }
        _ => SnakValue::Json(value.clone()),
    })
}

/// A property with the snak giving its value. The snak appears once a
/// property is chosen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertySnak {
    pub property: Option<String>,
    pub snak: Option<Snak>,
}

impl PropertySnak {
    /// Choose the property, replacing the snak with one of its datatype
    pub fn select_property(
        &mut self,
        board: &mut Board,
        property: impl Into<String>,
        datatype: Datatype,
    ) -> ReconcileResult<&mut Snak> {
        if let Some(zone) = self.snak.as_ref().and_then(Snak::zone) {
            board.remove_zone(zone)?;
        }
        self.property = Some(property.into());
        Ok(self.snak.insert(Snak::new(board, datatype)))
    }

    fn zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.snak.iter().filter_map(Snak::zone)
    }

    fn payload(&self, board: &Board, unknown: &[TokenId]) -> WorkspaceResult<Option<PropertySnakPayload>> {
        let (Some(property), Some(snak)) = (&self.property, &self.snak) else {
            return Ok(None);
        };
        Ok(Some(PropertySnakPayload {
            property: property.clone(),
            snak: snak.payload(board, unknown)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub main_snak: Snak,
    pub qualifiers: Vec<PropertySnak>,
    pub reference_records: Vec<Vec<PropertySnak>>,
}

impl Statement {
    pub fn new(board: &mut Board, datatype: Datatype) -> Self {
        Self {
            main_snak: Snak::new(board, datatype),
            qualifiers: Vec::new(),
            reference_records: Vec::new(),
        }
    }

    pub fn add_qualifier(&mut self) -> usize {
        self.qualifiers.push(PropertySnak::default());
        self.qualifiers.len() - 1
    }

    pub fn add_reference_record(&mut self) -> usize {
        self.reference_records.push(Vec::new());
        self.reference_records.len() - 1
    }

    fn zones(&self) -> Vec<ZoneId> {
        self.main_snak
            .zone()
            .into_iter()
            .chain(self.qualifiers.iter().flat_map(PropertySnak::zones))
            .chain(self.reference_records.iter().flatten().flat_map(PropertySnak::zones))
            .collect()
    }

    fn payload(&self, board: &Board, unknown: &[TokenId]) -> WorkspaceResult<StatementPayload> {
        let mut qualifiers = Vec::new();
        for qualifier in &self.qualifiers {
            qualifiers.extend(qualifier.payload(board, unknown)?);
        }
        let mut reference_records = Vec::new();
        for record in &self.reference_records {
            let mut references = Vec::new();
            for reference in record {
                references.extend(reference.payload(board, unknown)?);
            }
            if !references.is_empty() {
                reference_records.push(references);
            }
        }

        Ok(StatementPayload {
            main_snak: self.main_snak.payload(board, unknown)?,
            qualifiers,
            reference_records,
        })
    }
}

/// Statements about one property
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementGroup {
    pub property: Option<String>,
    pub label: Option<String>,
    pub datatype: Option<Datatype>,
    pub statements: Vec<Statement>,
}

impl StatementGroup {
    /// Choose the property. Previous statements are dropped and a first
    /// statement of the property's datatype is created.
    pub fn select_property(
        &mut self,
        board: &mut Board,
        property: impl Into<String>,
        label: Option<String>,
        datatype: Datatype,
    ) -> ReconcileResult<()> {
        release(board, self.zones())?;
        self.statements.clear();
        self.property = Some(property.into());
        self.label = label;
        self.datatype = Some(datatype);
        self.statements.push(Statement::new(board, datatype));
        Ok(())
    }

    /// Add a value of the selected property
    pub fn add_statement(&mut self, board: &mut Board) -> WorkspaceResult<usize> {
        let datatype = self.datatype.ok_or(WorkspaceError::NoProperty)?;
        self.statements.push(Statement::new(board, datatype));
        Ok(self.statements.len() - 1)
    }

    fn zones(&self) -> Vec<ZoneId> {
        self.statements.iter().flat_map(Statement::zones).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    id: SchemaId,
    zone: ZoneId,
    /// Text of the token last dropped in the schema zone
    pub title: Option<String>,
    pub terms: Vec<Term>,
    pub groups: Vec<StatementGroup>,
}

impl Schema {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn token<'b>(&self, board: &'b Board) -> Option<&'b TokenId> {
        board.zone(self.zone)?.occupant()
    }

    pub fn add_term(&mut self, kind: TermKind, lang_code: impl Into<String>, value: impl Into<String>) {
        self.terms.push(Term {
            kind,
            lang_code: lang_code.into(),
            value: value.into(),
        });
    }

    pub fn add_group(&mut self) -> usize {
        self.groups.push(StatementGroup::default());
        self.groups.len() - 1
    }

    fn zones(&self) -> Vec<ZoneId> {
        std::iter::once(self.zone)
            .chain(self.groups.iter().flat_map(StatementGroup::zones))
            .collect()
    }

    /// Payload of a schema that holds a token
    pub fn payload(&self, board: &Board, unknown: &[TokenId]) -> WorkspaceResult<Option<SchemaPayload>> {
        let Some(token) = self.token(board).and_then(|id| board.token(id)) else {
            return Ok(None);
        };

        let mut statements = Vec::new();
        for group in &self.groups {
            let Some(property) = &group.property else {
                continue;
            };
            let mut payloads = Vec::new();
            for statement in &group.statements {
                payloads.push(statement.payload(board, unknown)?);
            }
            statements.push(StatementGroupPayload {
                property: property.clone(),
                statements: payloads,
            });
        }

        Ok(Some(SchemaPayload {
            token: token.summary(),
            terms: self.terms.clone(),
            statements,
        }))
    }
}

/// Location of a snak inside the schema editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakPath {
    Main {
        schema: SchemaId,
        group: usize,
        statement: usize,
    },
    Qualifier {
        schema: SchemaId,
        group: usize,
        statement: usize,
        qualifier: usize,
    },
    Reference {
        schema: SchemaId,
        group: usize,
        statement: usize,
        record: usize,
        reference: usize,
    },
}

impl SnakPath {
    pub fn schema(&self) -> SchemaId {
        match *self {
            SnakPath::Main { schema, .. }
            | SnakPath::Qualifier { schema, .. }
            | SnakPath::Reference { schema, .. } => schema,
        }
    }
}

impl fmt::Display for SnakPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnakPath::Main {
                schema,
                group,
                statement,
            } => write!(f, "{schema}/{group}/{statement}"),
            SnakPath::Qualifier {
                schema,
                group,
                statement,
                qualifier,
            } => write!(f, "{schema}/{group}/{statement}/q{qualifier}"),
            SnakPath::Reference {
                schema,
                group,
                statement,
                record,
                reference,
            } => write!(f, "{schema}/{group}/{statement}/r{record}.{reference}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SchemaEditor {
    schemas: Vec<Schema>,
    next_id: u64,
}

impl SchemaEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema with an empty schema zone. Tokens reconciling with the
    /// unknown value are refused.
    pub fn add_schema(&mut self, board: &mut Board) -> SchemaId {
        self.next_id += 1;
        let id = SchemaId(self.next_id);
        let zone = board.add_zone(
            DropZone::single("schema").for_schema().with_condition(Condition::new(
                |token| token.status() == ReconciliationStatus::Unknown,
                UNKNOWN_REJECTED,
            )),
        );
        self.schemas.push(Schema {
            id,
            zone,
            title: None,
            terms: Vec::new(),
            groups: Vec::new(),
        });
        debug!(schema = %id, %zone, "Schema added");
        id
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schema(&self, id: SchemaId) -> WorkspaceResult<&Schema> {
        self.schemas
            .iter()
            .find(|s| s.id == id)
            .ok_or(WorkspaceError::UnknownSchema(id))
    }

    pub fn schema_mut(&mut self, id: SchemaId) -> WorkspaceResult<&mut Schema> {
        self.schemas
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(WorkspaceError::UnknownSchema(id))
    }

    /// Schema whose zone holds `token`
    pub fn schema_for_token(&self, board: &Board, token: &TokenId) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.token(board) == Some(token))
    }

    /// Remove a schema along with every zone it owns
    pub fn remove_schema(&mut self, board: &mut Board, id: SchemaId) -> WorkspaceResult<Schema> {
        let index = self
            .schemas
            .iter()
            .position(|s| s.id == id)
            .ok_or(WorkspaceError::UnknownSchema(id))?;
        release(board, self.schemas[index].zones())?;
        debug!(schema = %id, "Schema removed");
        Ok(self.schemas.remove(index))
    }

    /// Title a schema after the token that entered its zone
    pub fn on_token_added(&mut self, board: &Board, zone: ZoneId, token: &TokenId) {
        if let Some(schema) = self.schemas.iter_mut().find(|s| s.zone == zone) {
            schema.title = board.token(token).map(|t| t.text());
        }
    }

    /// A schema whose zone was emptied has no title
    pub fn on_token_removed(&mut self, zone: ZoneId) {
        if let Some(schema) = self.schemas.iter_mut().find(|s| s.zone == zone) {
            schema.title = None;
        }
    }

    /// Take `token` out of every schema zone holding it. Returns the
    /// zones it left.
    pub fn release_token(&self, board: &mut Board, token: &TokenId) -> ReconcileResult<Vec<ZoneId>> {
        let zones: Vec<ZoneId> = self
            .schemas
            .iter()
            .filter(|s| s.token(board) == Some(token))
            .map(|s| s.zone)
            .collect();
        for zone in &zones {
            board.remove_from_zone(*zone, Some(token))?;
        }
        if !zones.is_empty() {
            debug!(%token, schemas = zones.len(), "Token released from schemas");
        }
        Ok(zones)
    }

    pub fn snak_mut(&mut self, path: SnakPath) -> WorkspaceResult<&mut Snak> {
        let missing = || WorkspaceError::UnknownSnak(path.to_string());
        let schema = self.schema_mut(path.schema())?;
        match path {
            SnakPath::Main {
                group, statement, ..
            } => schema
                .groups
                .get_mut(group)
                .and_then(|g| g.statements.get_mut(statement))
                .map(|s| &mut s.main_snak)
                .ok_or_else(missing),
            SnakPath::Qualifier {
                group,
                statement,
                qualifier,
                ..
            } => schema
                .groups
                .get_mut(group)
                .and_then(|g| g.statements.get_mut(statement))
                .and_then(|s| s.qualifiers.get_mut(qualifier))
                .and_then(|q| q.snak.as_mut())
                .ok_or_else(missing),
            SnakPath::Reference {
                group,
                statement,
                record,
                reference,
                ..
            } => schema
                .groups
                .get_mut(group)
                .and_then(|g| g.statements.get_mut(statement))
                .and_then(|s| s.reference_records.get_mut(record))
                .and_then(|r| r.get_mut(reference))
                .and_then(|r| r.snak.as_mut())
                .ok_or_else(missing),
        }
    }

    /// Payloads of every schema holding a token
    pub fn payload(&self, board: &Board, unknown: &[TokenId]) -> WorkspaceResult<Vec<SchemaPayload>> {
        let mut payloads = Vec::new();
        for schema in &self.schemas {
            payloads.extend(schema.payload(board, unknown)?);
        }
        Ok(payloads)
    }
}

fn release(board: &mut Board, zones: Vec<ZoneId>) -> ReconcileResult<()> {
    for zone in zones {
        board.remove_zone(zone)?;
    }
    Ok(())
}

// ---- payloads ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnakValue {
    Item { item: TokenSummary },
    Time(TimeValue),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakPayload {
    #[serde(rename = "type")]
    pub datatype: Datatype,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SnakValue>,
    pub snak_type: SnakType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnakPayload {
    pub property: String,
    pub snak: SnakPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPayload {
    pub main_snak: SnakPayload,
    pub qualifiers: Vec<PropertySnakPayload>,
    pub reference_records: Vec<Vec<PropertySnakPayload>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementGroupPayload {
    pub property: String,
    pub statements: Vec<StatementPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPayload {
    pub token: TokenSummary,
    pub terms: Vec<Term>,
    pub statements: Vec<StatementGroupPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_reconcile::{DropOutcome, Notifier, TokenKind};

    #[derive(Default)]
    struct Alerts(Vec<String>);

    impl Notifier for Alerts {
        fn alert(&mut self, message: &str) {
            self.0.push(message.to_string());
        }

        fn confirm(&mut self, _message: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_datatype_from_str() {
        assert_eq!("TimeValue".parse::<Datatype>().unwrap(), Datatype::TimeValue);
        let err = "Color".parse::<Datatype>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown datatype for the statement creation: Color.");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("1492").unwrap(),
            TimeValue {
                time: "+1492-01-01".to_string(),
                precision: 9
            }
        );
        assert_eq!(parse_time("3/44").unwrap().time, "+44-03-01");
        assert_eq!(parse_time("3/44").unwrap().precision, 10);
        assert_eq!(
            parse_time("15/3/44 BCE").unwrap(),
            TimeValue {
                time: "-44-03-15".to_string(),
                precision: 11
            }
        );
        assert_eq!(parse_time("1/1/2000 CE").unwrap().time, "+2000-01-01");
        assert!(matches!(parse_time("13/2000"), Err(WorkspaceError::InvalidTime(_))));
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_schema_zone_refuses_unknown_tokens() {
        let mut board = Board::new();
        let unknown = board.add_zone(DropZone::multi("unknown").with_status(ReconciliationStatus::Unknown));
        let token = board.add_token(TokenKind::Tagged, "1", "Caesar").unwrap();
        board.place(unknown, &token).unwrap();

        let mut editor = SchemaEditor::new();
        let id = editor.add_schema(&mut board);
        let zone = editor.schema(id).unwrap().zone();

        let mut alerts = Alerts::default();
        let transfer = board.begin_drag(&token).unwrap();
        let outcome = board.drop_on(transfer, zone, &mut alerts).unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Rejected {
                message: UNKNOWN_REJECTED.to_string()
            }
        );
        assert_eq!(alerts.0, vec![UNKNOWN_REJECTED.to_string()]);
        assert!(editor.schema(id).unwrap().token(&board).is_none());
    }

    #[test]
    fn test_schema_title_follows_token() {
        let mut board = Board::new();
        let token = board.add_token(TokenKind::Untagged, "1", "Marcus Antonius").unwrap();
        let mut editor = SchemaEditor::new();
        let id = editor.add_schema(&mut board);
        let zone = editor.schema(id).unwrap().zone();

        board.place(zone, &token).unwrap();
        editor.on_token_added(&board, zone, &token);

        assert_eq!(editor.schema(id).unwrap().title.as_deref(), Some("Marcus Antonius"));
        assert!(board.is_used_in_schema(&token));
        assert_eq!(editor.schema_for_token(&board, &token).map(Schema::id), Some(id));
    }

    #[test]
    fn test_schema_title_cleared_when_token_leaves() {
        let mut board = Board::new();
        let token = board.add_token(TokenKind::Untagged, "1", "Brutus").unwrap();
        let mut editor = SchemaEditor::new();
        let id = editor.add_schema(&mut board);
        let zone = editor.schema(id).unwrap().zone();

        board.place(zone, &token).unwrap();
        editor.on_token_added(&board, zone, &token);

        let released = editor.release_token(&mut board, &token).unwrap();
        assert_eq!(released, vec![zone]);
        assert!(editor.schema(id).unwrap().token(&board).is_none());

        for event in board.drain_events() {
            if let annotator_reconcile::BoardEvent::TokenRemoved { zone, .. } = event {
                editor.on_token_removed(zone);
            }
        }
        assert_eq!(editor.schema(id).unwrap().title, None);
        assert!(editor.release_token(&mut board, &token).unwrap().is_empty());
    }

    #[test]
    fn test_switching_snak_type_disables_item_zone() {
        let mut board = Board::new();
        let token = board.add_token(TokenKind::Tagged, "1", "Roma").unwrap();
        let mut snak = Snak::new(&mut board, Datatype::Item);
        let zone = snak.zone().unwrap();

        board.place(zone, &token).unwrap();
        snak.set_snak_type(&mut board, SnakType::SomeValue).unwrap();

        assert!(!board.zone(zone).unwrap().is_enabled());
        assert!(board.zone(zone).unwrap().occupant().is_none());
        assert_eq!(board.place(zone, &token).unwrap(), DropOutcome::Disabled);

        snak.set_snak_type(&mut board, SnakType::Value).unwrap();
        assert_eq!(board.place(zone, &token).unwrap(), DropOutcome::Placed);
    }

    #[test]
    fn test_snak_payloads() {
        let mut board = Board::new();
        let token = board.add_token(TokenKind::Tagged, "1", "Roma").unwrap();

        let mut item = Snak::new(&mut board, Datatype::Item);
        board.place(item.zone().unwrap(), &token).unwrap();
        let payload = serde_json::to_value(item.payload(&board, &[]).unwrap()).unwrap();
        assert_eq!(payload["type"], "Item");
        assert_eq!(payload["snakType"], "value");
        assert_eq!(payload["value"]["item"]["tokenId"], "t1");

        let payload = item.payload(&board, &[token.clone()]).unwrap();
        assert_eq!(payload.snak_type, SnakType::SomeValue);
        assert!(payload.value.is_none());

        item.set_snak_type(&mut board, SnakType::NoValue).unwrap();
        assert!(item.payload(&board, &[]).unwrap().value.is_none());
        assert!(item.set_value(json!("x")).is_err());

        let mut string = Snak::new(&mut board, Datatype::StringValue);
        string.set_value(json!("Via Appia")).unwrap();
        let payload = serde_json::to_value(string.payload(&board, &[]).unwrap()).unwrap();
        assert_eq!(payload["value"]["value"], "Via Appia");

        let mut quantity = Snak::new(&mut board, Datatype::QuantityValue);
        quantity.set_value(json!("12")).unwrap();
        let payload = serde_json::to_value(quantity.payload(&board, &[]).unwrap()).unwrap();
        assert_eq!(payload["value"]["number"], "12");

        let mut time = Snak::new(&mut board, Datatype::TimeValue);
        time.set_value(json!("15/3/44 BCE")).unwrap();
        let payload = serde_json::to_value(time.payload(&board, &[]).unwrap()).unwrap();
        assert_eq!(payload["value"]["time"], "-44-03-15");
        assert_eq!(payload["value"]["precision"], 11);
    }

    #[test]
    fn test_payload_filters_incomplete_parts() {
        let mut board = Board::new();
        let token = board.add_token(TokenKind::Untagged, "1", "Marcus").unwrap();
        let mut editor = SchemaEditor::new();
        let empty = editor.add_schema(&mut board);
        let id = editor.add_schema(&mut board);
        let zone = editor.schema(id).unwrap().zone();
        board.place(zone, &token).unwrap();

        let schema = editor.schema_mut(id).unwrap();
        schema.add_term(TermKind::Label, "la", "Marcus");
        schema.add_group();
        let group = schema.add_group();
        schema.groups[group]
            .select_property(&mut board, "P5", Some("name".to_string()), Datatype::StringValue)
            .unwrap();
        let statement = &mut schema.groups[group].statements[0];
        statement.main_snak.set_value(json!("Marcus")).unwrap();
        statement.add_qualifier();
        let record = statement.add_reference_record();
        statement.reference_records[record].push(PropertySnak::default());
        statement.add_reference_record();

        let payloads = editor.payload(&board, &[]).unwrap();
        assert_eq!(payloads.len(), 1);
        let payload = &payloads[0];
        assert_eq!(payload.token.token_id, token);
        assert_eq!(payload.terms.len(), 1);
        assert_eq!(payload.statements.len(), 1);
        assert_eq!(payload.statements[0].property, "P5");
        let statement = &payload.statements[0].statements[0];
        assert!(statement.qualifiers.is_empty());
        assert!(statement.reference_records.is_empty());

        assert!(editor.schema(empty).unwrap().payload(&board, &[]).unwrap().is_none());
    }

    #[test]
    fn test_remove_schema_releases_zones() {
        let mut board = Board::new();
        let mut editor = SchemaEditor::new();
        let id = editor.add_schema(&mut board);
        let schema = editor.schema_mut(id).unwrap();
        let group = schema.add_group();
        schema.groups[group]
            .select_property(&mut board, "P1", None, Datatype::Item)
            .unwrap();
        schema.groups[group].add_statement(&mut board).unwrap();
        let q = schema.groups[group].statements[0].add_qualifier();
        schema.groups[group].statements[0].qualifiers[q]
            .select_property(&mut board, "P2", Datatype::Item)
            .unwrap();
        assert_eq!(board.zones().count(), 4);

        editor.remove_schema(&mut board, id).unwrap();
        assert_eq!(board.zones().count(), 0);
        assert!(matches!(editor.schema(id), Err(WorkspaceError::UnknownSchema(_))));
    }

    #[test]
    fn test_reselecting_property_drops_statements() {
        let mut board = Board::new();
        let mut group = StatementGroup::default();
        assert!(matches!(group.add_statement(&mut board), Err(WorkspaceError::NoProperty)));

        group.select_property(&mut board, "P1", None, Datatype::Item).unwrap();
        group.add_statement(&mut board).unwrap();
        assert_eq!(board.zones().count(), 2);

        group.select_property(&mut board, "P2", None, Datatype::TimeValue).unwrap();
        assert_eq!(group.statements.len(), 1);
        assert_eq!(group.statements[0].main_snak.datatype(), Datatype::TimeValue);
        assert_eq!(board.zones().count(), 0);
    }

    #[test]
    fn test_snak_path_lookup() {
        let mut board = Board::new();
        let mut editor = SchemaEditor::new();
        let id = editor.add_schema(&mut board);
        let schema = editor.schema_mut(id).unwrap();
        let group = schema.add_group();
        schema.groups[group]
            .select_property(&mut board, "P1", None, Datatype::Item)
            .unwrap();

        let main = SnakPath::Main {
            schema: id,
            group,
            statement: 0,
        };
        assert_eq!(editor.snak_mut(main).unwrap().datatype(), Datatype::Item);

        let missing = SnakPath::Qualifier {
            schema: id,
            group,
            statement: 0,
            qualifier: 3,
        };
        assert!(matches!(editor.snak_mut(missing), Err(WorkspaceError::UnknownSnak(_))));
    }
}
