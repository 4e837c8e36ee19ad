//! Integration tests for running TOML pipelines over JSON dataset files.

use chrono::NaiveDate;
use column_transforms::checksum::{calculate_checksum, ChecksumAlgorithm};
use column_transforms::models::{DataType, Value};
use column_transforms::parsing::{parse_dataset_json, write_dataset_json};
use column_transforms::pipeline::{PipelineConfig, TransformPipeline};
use std::fs;
use tempfile::TempDir;

const ORDERS_JSON: &str = r#"{
    "schema": [
        {"name": "order_id", "type": "integer", "nullable": false},
        {"name": "customer", "type": "text"},
        {"name": "order_jdate", "type": "integer"},
        {"name": "ship_date", "type": "date"},
        {"name": "created_at", "type": "timestamp"},
        {"name": "_ingested_by", "type": "text"}
    ],
    "records": [
        {
            "order_id": 1,
            "customer": "  acme  ",
            "order_jdate": 23100,
            "ship_date": "2023-04-12",
            "created_at": "2023-04-10T10:00:00",
            "_ingested_by": "loader-a"
        },
        {
            "order_id": 1,
            "customer": "acme",
            "order_jdate": 23100,
            "ship_date": "2023-04-12",
            "created_at": "2023-04-10T10:00:00",
            "_ingested_by": "loader-b"
        },
        {
            "order_id": 2,
            "customer": "globex",
            "order_jdate": "1999365",
            "ship_date": null,
            "created_at": "2023-01-15 23:30:00",
            "_ingested_by": "loader-a"
        },
        {
            "order_id": 3,
            "customer": null,
            "order_jdate": 123456,
            "created_at": null
        }
    ]
}"#;

const ORDERS_PIPELINE: &str = r#"
name = "orders"

[[steps]]
op = "trim"

[[steps]]
op = "drop_columns"
columns = ["_ingested_by"]

[[steps]]
op = "deduplicate"
subset = ["order_id", "customer"]

[[steps]]
op = "replace_null"
value = "1900-01-01"

[[steps]]
op = "julian_to_calendar"
columns = ["order_jdate"]

[[steps]]
op = "local_to_utc"
timezone = "Europe/Madrid"
subset = ["created_at"]

[[steps]]
op = "add_literal_columns"
columns = [{ name = "source_system", value = "erp" }]

[[steps]]
op = "add_checksum"
column = "row_hash"
"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_pipeline_from_files() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("transforms.toml");
    let data_path = dir.path().join("orders.json");
    fs::write(&config_path, ORDERS_PIPELINE).unwrap();
    fs::write(&data_path, ORDERS_JSON).unwrap();

    let pipeline = TransformPipeline::from_file(&config_path).unwrap();
    assert_eq!(pipeline.config().name.as_deref(), Some("orders"));

    let result = pipeline.process_file(&data_path).unwrap();
    assert_eq!(result.steps_applied, 8);
    assert_eq!(result.rows_in, 4);
    assert_eq!(result.rows_out, 3);

    let df = &result.dataset;
    assert_eq!(
        df.schema().names(),
        vec![
            "order_id",
            "customer",
            "order_jdate",
            "ship_date",
            "created_at",
            "source_system",
            "row_hash"
        ]
    );
    assert_eq!(df.schema().field("order_jdate").unwrap().data_type, DataType::Date);

    // Trimmed, then de-duplicated on (order_id, customer)
    assert_eq!(df.value(0, "customer"), Some(Value::from("acme")));
    assert_eq!(df.value(1, "customer"), Some(Value::from("globex")));
    // Text default that spells a date only fills date columns
    assert_eq!(df.value(2, "customer"), Some(Value::Null));
    assert_eq!(df.value(1, "ship_date"), Some(Value::Date(date(1900, 1, 1))));

    assert_eq!(df.value(0, "order_jdate"), Some(Value::Date(date(2023, 4, 10))));
    assert_eq!(df.value(1, "order_jdate"), Some(Value::Date(date(1999, 12, 31))));
    assert_eq!(df.value(2, "order_jdate"), Some(Value::Date(date(0, 1, 1))));

    // Madrid is UTC+2 in April and UTC+1 in January
    assert_eq!(
        df.value(0, "created_at"),
        Some(Value::Timestamp(date(2023, 4, 10).and_hms_opt(8, 0, 0).unwrap()))
    );
    assert_eq!(
        df.value(1, "created_at"),
        Some(Value::Timestamp(date(2023, 1, 15).and_hms_opt(22, 30, 0).unwrap()))
    );
    assert_eq!(df.value(2, "created_at"), Some(Value::Null));

    assert_eq!(df.value(2, "source_system"), Some(Value::from("erp")));

    let expected_hash = calculate_checksum(
        "1~~acme~~2023-04-10~~2023-04-12~~2023-04-10 08:00:00~~erp",
        ChecksumAlgorithm::Sha1,
    );
    assert_eq!(df.value(0, "row_hash"), Some(Value::Text(expected_hash)));

    let out_path = dir.path().join("orders_out.json");
    write_dataset_json(df, &out_path).unwrap();
    assert_eq!(&parse_dataset_json(&out_path).unwrap(), df);
}

#[test]
fn test_config_errors_surface_with_path() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("transforms.toml");
    fs::write(&config_path, "[[steps]]\nop = \"trim\"\n\n[[steps]]\nop = \"julian_to_calendar\"\n")
        .unwrap();

    let err = PipelineConfig::from_file(&config_path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("transforms.toml"), "{}", msg);
    assert!(msg.contains("steps[1]"), "{}", msg);
}

#[test]
fn test_invalid_timezone_stops_the_pipeline() {
    let config = PipelineConfig::from_toml_str(
        "[[steps]]\nop = \"utc_to_local\"\ntimezone = \"Europe/Atlantis\"\n",
    )
    .unwrap();
    let err = TransformPipeline::new(config)
        .process_json_str(ORDERS_JSON)
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Europe/Atlantis"));
}
