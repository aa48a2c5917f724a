//! Tests for the mapping-source loaders.

use std::fs::write;

use tagbridge::sources::{
    load_context_file, load_mapping_file, load_query_file, parse_context_csv, parse_mapping_json,
    parse_query_sql,
};
use tagbridge::{ContextRow, LoadError, MappingSources, ResolutionMethod, convert_text};
use tempfile::TempDir;

const MAPPING_JSON: &str = r#"{
    "direct_mappings": {
        "{{DocumentDate}}": "{{current_date}}",
        "{{SenderName}}": "sender.full_name"
    },
    "type_rules": { "date": "YYYY-MM-DD" },
    "nested_paths": {
        "opportunity.line_items": {
            "source_path": "TableStart:LineItems",
            "fields": { "{{ProductName}}": "name", "{{Quantity}}": "quantity" }
        }
    }
}"#;

// =========================================================================
// Mapping file
// =========================================================================

#[test]
fn mapping_file_builds_sources() {
    let mapping = parse_mapping_json(MAPPING_JSON).unwrap();
    let sources = mapping.into_sources().unwrap();

    assert_eq!(sources.direct.get("SenderName"), Some("sender.full_name"));
    assert_eq!(sources.direct.get("DocumentDate"), Some("{{current_date}}"));
    assert_eq!(sources.type_rules.get("date").map(String::as_str), Some("YYYY-MM-DD"));

    let section = sources.section_for_block("LineItems").unwrap();
    assert_eq!(section.target_path, "opportunity.line_items");
    assert_eq!(section.fields.get("Quantity"), Some("quantity"));
}

#[test]
fn mapping_file_sections_are_optional() {
    let mapping = parse_mapping_json(r#"{ "direct_mappings": { "Name": "contact.name" } }"#)
        .unwrap();
    let sources = mapping.into_sources().unwrap();
    assert_eq!(sources.direct.len(), 1);
    assert!(sources.sections.is_empty());
    assert!(sources.type_rules.is_empty());
}

#[test]
fn mapping_file_drives_conversion() {
    let sources = parse_mapping_json(MAPPING_JSON)
        .unwrap()
        .into_sources()
        .unwrap();
    let result = convert_text(
        "{{DocumentDate}} {{SenderName}}{{TableStart:LineItems}}{{ProductName}}{{TableEnd}}",
        &sources,
    )
    .unwrap();

    assert_eq!(
        result.converted,
        "{{current_date}} {{sender.full_name}}{{#opportunity.line_items}}{{name}}{{/opportunity.line_items}}"
    );
    assert!(result.errors.is_empty());
}

#[test]
fn malformed_json_is_rejected() {
    let err = parse_mapping_json("{ \"direct_mappings\": [").unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}

#[test]
fn section_without_table_start_is_rejected() {
    let mapping = parse_mapping_json(
        r#"{ "nested_paths": { "items": { "source_path": "IF:Items", "fields": {} } } }"#,
    )
    .unwrap();
    let err = mapping.into_sources().unwrap_err();
    match err {
        LoadError::Section { name, .. } => assert_eq!(name, "items"),
        other => panic!("expected section error, got {other:?}"),
    }
}

#[test]
fn section_without_block_name_is_rejected() {
    let mapping = parse_mapping_json(
        r#"{ "nested_paths": { "items": { "source_path": "TableStart:  " } } }"#,
    )
    .unwrap();
    assert!(matches!(
        mapping.sections(),
        Err(LoadError::Section { .. })
    ));
}

#[test]
fn missing_mapping_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_mapping_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

// =========================================================================
// Context CSV
// =========================================================================

#[test]
fn context_csv_with_export_headers() {
    let csv = "CongaField,RelatedBoxField,DataType,SourceTable\n\
               {{OpportunityName}},opportunity.name,string,Opportunity\n\
               {{LegacyId}},,,\n";
    let rows = parse_context_csv(csv.as_bytes()).unwrap();

    assert_eq!(
        rows,
        vec![
            ContextRow::new("OpportunityName", Some("opportunity.name"))
                .with_data_type("string")
                .with_origin("Opportunity"),
            ContextRow::new("LegacyId", None),
        ]
    );
}

#[test]
fn context_csv_with_snake_case_headers() {
    let csv = "source_key,target\nEmail, contact.email \n";
    let rows = parse_context_csv(csv.as_bytes()).unwrap();
    assert_eq!(rows, vec![ContextRow::new("Email", Some("contact.email"))]);
}

#[test]
fn context_csv_skips_blank_keys() {
    let csv = "source_key,target\n,orphan.target\nName,contact.name\n";
    let rows = parse_context_csv(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source_key, "Name");
}

#[test]
fn context_csv_requires_key_column() {
    let csv = "target,data_type\ncontact.email,string\n";
    let err = parse_context_csv(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::Csv(_)));
}

#[test]
fn context_file_round_trip_through_conversion() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("context.csv");
    write(
        &path,
        "CongaField,RelatedBoxField\n{{Email}},contact.email\n{{Email}},ignored.email\n",
    )
    .unwrap();

    let rows = load_context_file(&path).unwrap();
    let sources = MappingSources::builder().context(rows).build();
    let result = convert_text("{{Email}}", &sources).unwrap();

    assert_eq!(result.converted, "{{contact.email}}");
    assert_eq!(result.report[0].method, ResolutionMethod::ContextLookup);
}

// =========================================================================
// Query SQL
// =========================================================================

#[test]
fn select_list_aliases_and_names() {
    let sql = "SELECT Id, Name, Account.Name AS AccountName FROM Opportunity WHERE StageName = 'Closed Won';";
    assert_eq!(
        parse_query_sql(sql).unwrap(),
        vec!["Id", "Name", "AccountName"]
    );
}

#[test]
fn subqueries_comments_and_multiple_statements() {
    let sql = "
    -- primary query
    SELECT
        o.Id AS OpportunityId,
        o.Name OpportunityName,
        (SELECT COUNT(Id) FROM OpportunityLineItem WHERE OpportunityId = o.Id) AS NumberOfProducts
    FROM Opportunity o;

    SELECT DISTINCT UserId, Username, o.Id AS OpportunityId FROM User;
    UPDATE User SET Name = 'x';
    ";
    assert_eq!(
        parse_query_sql(sql).unwrap(),
        vec![
            "OpportunityId",
            "OpportunityName",
            "NumberOfProducts",
            "UserId",
            "Username",
        ]
    );
}

#[test]
fn expressions_without_alias_keep_their_text() {
    let sql = "select COUNT(*), a + b from t";
    assert_eq!(parse_query_sql(sql).unwrap(), vec!["COUNT(*)", "a + b"]);
}

#[test]
fn empty_query_has_no_fields() {
    assert!(parse_query_sql("   \n").unwrap().is_empty());
    assert!(parse_query_sql("-- nothing here").unwrap().is_empty());
}

#[test]
fn empty_select_list_is_a_syntax_error() {
    let err = parse_query_sql("SELECT Id;\nSELECT FROM Account").unwrap_err();
    match err {
        LoadError::Query { line, .. } => assert_eq!(line, 2),
        other => panic!("expected query error, got {other:?}"),
    }
}

#[test]
fn query_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("query.sql");
    write(&path, "SELECT Name FROM Contact").unwrap();
    assert_eq!(load_query_file(&path).unwrap(), vec!["Name"]);
}
