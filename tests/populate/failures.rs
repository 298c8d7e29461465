//! Configuration errors, runtime failures and their isolation.

use crate::helpers::{init_tracing, populate_args, read_csv};
use relgen::{execute_plan, PopulatePlan, RunSettings};
use relgen_core::GeneratorSchema;
use relgen_populate_csv::OutputMode;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
seed: 7
fields:
  - name: cnpj
    generator:
      type: pattern
      pattern: "{rand:14}"
  - name: cpf
    generator:
      type: sequential
      start: 1
  - name: cliente_id
    generator:
      type: uuid_v4
  - name: nome
    generator:
      type: one_of
      values: [Ana, Bruno]
tables:
  - name: empresas
    index_fields: [cnpj]
  - name: funcionarios
    index_fields: [cpf]
    foreign_table: empresas
    data_fields: [nome]
  - name: clientes
    index_fields: [cliente_id]
    data_fields: [nome]
plan:
  - table: empresas
    rows: 20
  - table: funcionarios
    rows: 100
    chunk_size: 10
  - table: clientes
    rows: 30
"#;

fn settings(output_dir: &Path) -> RunSettings {
    RunSettings {
        output_dir: output_dir.to_path_buf(),
        output_mode: OutputMode::Replace,
        seed: Some(7),
        max_parallel: 0,
    }
}

fn plan(schema: &GeneratorSchema, output_dir: &Path) -> PopulatePlan {
    PopulatePlan::build(schema, &populate_args(output_dir)).unwrap()
}

#[tokio::test]
async fn test_failing_table_does_not_stop_siblings() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let schema = GeneratorSchema::from_yaml(SCHEMA).unwrap();
    let plan = plan(&schema, temp_dir.path());

    // A directory in place of the output file makes the job fail on I/O
    std::fs::create_dir(temp_dir.path().join("clientes.csv")).unwrap();

    let result = execute_plan(&schema, &plan, &settings(temp_dir.path())).await;

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Populate failed with 1 error(s)"), "{message}");
    assert!(message.contains("Failed to populate table 'clientes'"), "{message}");

    let (_, empresas) = read_csv(&temp_dir.path().join("empresas.csv"));
    let (_, funcionarios) = read_csv(&temp_dir.path().join("funcionarios.csv"));
    assert_eq!(empresas.len(), 20);
    assert_eq!(funcionarios.len(), 100);
}

#[tokio::test]
async fn test_dependency_failure_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let schema = GeneratorSchema::from_yaml(SCHEMA).unwrap();
    let plan = plan(&schema, temp_dir.path());

    std::fs::create_dir(temp_dir.path().join("empresas.csv")).unwrap();

    let result = execute_plan(&schema, &plan, &settings(temp_dir.path())).await;

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Populate failed with 2 error(s)"), "{message}");
    assert!(message.contains("Dependency 'empresas' failed"), "{message}");

    // The dependent never started writing; the unrelated table finished
    assert!(!temp_dir.path().join("funcionarios.csv").exists());
    let (_, clientes) = read_csv(&temp_dir.path().join("clientes.csv"));
    assert_eq!(clientes.len(), 30);
}

#[tokio::test]
async fn test_undefined_field_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = SCHEMA.replace(
        "data_fields: [nome]\n  - name: clientes",
        "data_fields: [salario]\n  - name: clientes",
    );
    let schema = GeneratorSchema::from_yaml(&yaml).unwrap();
    let plan = plan(&schema, temp_dir.path());

    let result = execute_plan(&schema, &plan, &settings(temp_dir.path())).await;

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("configuration error"), "{message}");
    assert!(message.contains("salario"), "{message}");
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_referenced_table_without_primary_key() {
    let temp_dir = TempDir::new().unwrap();
    let schema = GeneratorSchema::from_yaml(
        r#"
fields:
  - name: nome
    generator:
      type: one_of
      values: [Ana]
tables:
  - name: logs
    data_fields: [nome]
  - name: eventos
    foreign_table: logs
    data_fields: [nome]
"#,
    )
    .unwrap();

    let result = PopulatePlan::build(&schema, &populate_args(temp_dir.path()));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("logs"), "{message}");
}

#[tokio::test]
async fn test_bounded_parallelism_with_dependencies() {
    let temp_dir = TempDir::new().unwrap();
    let schema = GeneratorSchema::from_yaml(SCHEMA).unwrap();
    let plan = plan(&schema, temp_dir.path());

    let mut settings = settings(temp_dir.path());
    settings.max_parallel = 1;

    let reports = execute_plan(&schema, &plan, &settings).await.unwrap();

    let rows: Vec<u64> = reports.iter().map(|r| r.rows_written).collect();
    assert_eq!(rows, vec![20, 100, 30]);
}
