//! End-to-end runs of the transform pipeline against files on disk.

use std::fs;
use std::path::Path;

use sales_disagg::app::pipeline::run_transform;
use sales_disagg::domain::{HeaderSchema, InputEncoding, InvalidRowPolicy, TransformConfig};
use sales_disagg::error::CoreError;
use sales_disagg::io::{build_summary, write_daily_csv, write_summary_json};

fn config(dir: &Path, input: &str, policy: InvalidRowPolicy) -> TransformConfig {
    TransformConfig {
        input: dir.join(input),
        output: dir.join("daily.csv"),
        encoding: InputEncoding::Auto,
        invalid_rows: policy,
        allow_empty: false,
        export_summary: Some(dir.join("summary.json")),
        quiet: true,
    }
}

/// Long-header export as the report tool writes it: Latin-1, two `Código` columns.
fn long_report_bytes() -> Vec<u8> {
    let text = "\
Numanio,Mes,Semana,Formato,Código,Tienda,Código,Categoria,Codbarbar,Alterno,Producto,Clasif Repedido,Medida,Venta Unidades,Venta Fardos,Total de Ventas
2024,1,4,Super,T01,Centro,C9,Bebidas,7401,P100,Agua Pura,A,600ml,70,2,700
2024,1,5,Super,T01,Centro,C9,Bebidas,7401,P100,Agua Pura,A,600ml,90,3,900
2024,1,4,Super,T02,Norte,C9,Bebidas,7402,P200,Café Molido,B,1lb,0,0,0
";
    text.chars().map(|c| c as u32 as u8).collect()
}

#[test]
fn long_latin1_report_expands_to_daily_csv() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("semanal.csv"), long_report_bytes()).unwrap();
    let config = config(dir.path(), "semanal.csv", InvalidRowPolicy::Error);

    let run = run_transform(&config).unwrap();
    assert_eq!(run.ingest.table.schema, HeaderSchema::Long);
    assert_eq!(run.ingest.encoding, InputEncoding::Latin1);

    // Week 4: 7 January days. Week 5 in January: Jan 29..31. Zero row: dropped.
    assert_eq!(run.expansion.daily.len(), 10);
    assert_eq!(run.expansion.stats.zero_rows_dropped, 7);

    let written = write_daily_csv(&config.output, &run.ingest.table, &run.expansion.daily).unwrap();
    assert_eq!(written, 10);

    let text = fs::read_to_string(&config.output).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Numanio,Mes,Semana,Formato,Tdacod,Tienda,Catcod,Categoria,Codbarbar,Ptmcod,Producto,\
Clasif Repedido,Desmed,Venta Unidad,Ventas Fardos,Ventas con IVA (Q),Fecha"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2024,1,4,Super,T01,Centro,C9,Bebidas,7401,P100,Agua Pura,A,600ml,10.0,2,100.0,2024-01-22"
    );
    let last = text.lines().last().unwrap();
    assert_eq!(
        last,
        "2024,1,5,Super,T01,Centro,C9,Bebidas,7401,P100,Agua Pura,A,600ml,30.0,3,300.0,2024-01-31"
    );
    assert!(!text.contains("Café"));

    let summary = build_summary(&run, &config, written);
    assert!((summary.totals.unit_sales_in - 160.0).abs() < 1e-9);
    assert!((summary.totals.unit_sales_out - 160.0).abs() < 1e-9);
    write_summary_json(config.export_summary.as_deref().unwrap(), &summary).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap()).unwrap();
    assert_eq!(json["schema"], "long");
    assert_eq!(json["encoding"], "latin1");
    assert_eq!(json["daily_rows_written"], 10);
    assert_eq!(json["expansion"]["before_week_start"], 4);
}

#[test]
fn passthrough_text_survives_in_utf8_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "\
Numanio,Mes,Semana,Tdacod,Tienda,Ptmcod,Producto,Venta Unidad,Ventas con IVA (Q)
2024,2,5,T01,Petén,P1,Café,20,40
";
    fs::write(dir.path().join("short.csv"), csv).unwrap();
    let config = config(dir.path(), "short.csv", InvalidRowPolicy::Error);

    let run = run_transform(&config).unwrap();
    write_daily_csv(&config.output, &run.ingest.table, &run.expansion.daily).unwrap();

    let text = fs::read_to_string(&config.output).unwrap();
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], "2024,2,5,T01,Petén,P1,Café,5.0,10.0,2024-02-01");
    assert!(rows[3].ends_with(",2024-02-04"));
}

#[test]
fn schema_mismatch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.csv"), "Numanio,Semana\n2024,4\n").unwrap();
    let config = config(dir.path(), "bad.csv", InvalidRowPolicy::Error);

    let err = run_transform(&config).unwrap_err();
    assert!(matches!(err, CoreError::SchemaMismatch { .. }));
    assert!(!config.output.exists());
}

#[test]
fn skipped_rows_are_reported_and_the_rest_expands() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "\
Numanio,Mes,Semana,Tienda,Ptmcod,Venta Unidad,Ventas con IVA (Q)
2024,1,4,A,X,14,14
2024,0,4,A,X,14,14
";
    fs::write(dir.path().join("weekly.csv"), csv).unwrap();

    let strict = config(dir.path(), "weekly.csv", InvalidRowPolicy::Error);
    assert!(matches!(
        run_transform(&strict),
        Err(CoreError::InvalidCalendarInput { line: 3, .. })
    ));

    let lenient = config(dir.path(), "weekly.csv", InvalidRowPolicy::Skip);
    let run = run_transform(&lenient).unwrap();
    assert_eq!(run.ingest.row_errors.len(), 1);
    assert_eq!(run.expansion.daily.len(), 7);
    assert!(run.expansion.daily.iter().all(|d| (d.unit_sales - 2.0).abs() < 1e-12));
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), "nope.csv", InvalidRowPolicy::Error);
    let err = run_transform(&config).unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }));
    assert_eq!(err.exit_code(), 2);
}
