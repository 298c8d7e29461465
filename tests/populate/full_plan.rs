//! End-to-end runs of the fixture schema plan.

use crate::helpers::{column_values, init_tracing, populate_args, read_csv};
use relgen::run_populate;
use relgen_populate_csv::{parse_row_override, TREE_ROOT_PROPORTION};
use tempfile::TempDir;

#[tokio::test]
async fn test_populate_fixture_plan() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let temp_dir = TempDir::new()?;

    let reports = run_populate(populate_args(temp_dir.path())).await?;

    let tables: Vec<&str> = reports.iter().map(|r| r.table.as_str()).collect();
    assert_eq!(tables, vec!["empresas", "funcionarios", "clientes", "hierarquias"]);
    assert!(reports.iter().all(|r| !r.key_exhausted));
    assert_eq!(reports[1].chunks_written, 7); // 2000 rows in chunks of 300

    let (header, empresas) = read_csv(&temp_dir.path().join("empresas.csv"));
    assert_eq!(header, vec!["cnpj", "razao_social", "fundacao"]);
    assert_eq!(empresas.len(), 200);
    assert_eq!(column_values(&empresas, 0).len(), 200);

    let (header, funcionarios) = read_csv(&temp_dir.path().join("funcionarios.csv"));
    assert_eq!(header, vec!["cpf", "cnpj", "nome", "salario", "ativo"]);
    assert_eq!(funcionarios.len(), 2000);
    assert_eq!(column_values(&funcionarios, 0).len(), 2000);

    let cnpjs = column_values(&empresas, 0);
    assert!(funcionarios.iter().all(|row| cnpjs.contains(&row[1])));
    assert!(column_values(&funcionarios, 2).contains("Silva; Souza"));

    let (header, clientes) = read_csv(&temp_dir.path().join("clientes.csv"));
    assert_eq!(header, vec!["cliente_id", "email", "cadastro", "observacao"]);
    assert_eq!(clientes.len(), 500);
    assert!(clientes.iter().all(|row| row[3].is_empty()));

    let (header, hierarquias) = read_csv(&temp_dir.path().join("hierarquias.csv"));
    assert_eq!(header, vec!["codigo", "codigo", "descricao"]);
    assert_eq!(hierarquias.len(), 1000);

    let codigos = column_values(&hierarquias, 0);
    let roots = hierarquias.iter().filter(|row| row[1].is_empty()).count();
    let expected = (TREE_ROOT_PROPORTION * 1000.0) as usize;
    assert!(roots.abs_diff(expected) <= 70, "roots = {roots}");
    assert!(hierarquias
        .iter()
        .filter(|row| !row[1].is_empty())
        .all(|row| codigos.contains(&row[1])));

    Ok(())
}

#[tokio::test]
async fn test_seeded_runs_are_identical() -> Result<(), Box<dyn std::error::Error>> {
    let dir1 = TempDir::new()?;
    let dir2 = TempDir::new()?;

    let mut args1 = populate_args(dir1.path());
    args1.max_parallel = 1;
    run_populate(args1).await?;
    run_populate(populate_args(dir2.path())).await?;

    for table in ["empresas", "funcionarios", "clientes", "hierarquias"] {
        let file = format!("{table}.csv");
        let content1 = std::fs::read_to_string(dir1.path().join(&file))?;
        let content2 = std::fs::read_to_string(dir2.path().join(&file))?;
        assert_eq!(content1, content2, "{table} differs between runs");
    }

    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let output_dir = temp_dir.path().join("out");

    let mut args = populate_args(&output_dir);
    args.dry_run = true;
    let reports = run_populate(args).await?;

    assert!(reports.is_empty());
    assert!(!output_dir.exists());
    Ok(())
}

#[tokio::test]
async fn test_single_table_reuses_existing_dependency() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    run_populate(populate_args(temp_dir.path())).await?;
    let empresas_before = std::fs::read_to_string(temp_dir.path().join("empresas.csv"))?;

    let mut args = populate_args(temp_dir.path());
    args.tables = vec!["funcionarios".to_string()];
    args.rows = vec![parse_row_override("funcionarios=50")?];
    args.chunk_size = Some(7);
    let reports = run_populate(args).await?;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].rows_written, 50);
    assert_eq!(reports[0].chunks_written, 8);

    let empresas_after = std::fs::read_to_string(temp_dir.path().join("empresas.csv"))?;
    assert_eq!(empresas_before, empresas_after);

    let (_, empresas) = read_csv(&temp_dir.path().join("empresas.csv"));
    let (_, funcionarios) = read_csv(&temp_dir.path().join("funcionarios.csv"));
    let cnpjs = column_values(&empresas, 0);
    assert_eq!(funcionarios.len(), 50);
    assert!(funcionarios.iter().all(|row| cnpjs.contains(&row[1])));

    Ok(())
}

#[tokio::test]
async fn test_append_mode_writes_header_once() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;

    for _ in 0..2 {
        let mut args = populate_args(temp_dir.path());
        args.tables = vec!["clientes".to_string()];
        args.rows = vec![parse_row_override("clientes=10")?];
        args.append = true;
        run_populate(args).await?;
    }

    let content = std::fs::read_to_string(temp_dir.path().join("clientes.csv"))?;
    assert_eq!(content.lines().count(), 21);
    assert!(content.starts_with("cliente_id;email;cadastro;observacao\n"));
    assert_eq!(content.matches("cliente_id;").count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_chunk_size_does_not_change_shape() -> Result<(), Box<dyn std::error::Error>> {
    let whole = TempDir::new()?;
    let chunked = TempDir::new()?;

    for (dir, chunk_size) in [(&whole, 2000), (&chunked, 200)] {
        let mut args = populate_args(dir.path());
        args.tables = vec!["empresas".to_string(), "funcionarios".to_string()];
        args.chunk_size = Some(chunk_size);
        run_populate(args).await?;
    }

    let (header1, rows1) = read_csv(&whole.path().join("funcionarios.csv"));
    let (header2, rows2) = read_csv(&chunked.path().join("funcionarios.csv"));
    assert_eq!(header1, header2);
    assert_eq!(rows1.len(), rows2.len());

    Ok(())
}
