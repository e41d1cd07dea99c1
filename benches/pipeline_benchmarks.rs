//! Performance benchmarks for the Appraisal Reconciliation Engine.
//!
//! Covers the reconciliation pipeline on in-memory workbooks of growing
//! size, xlsx decoding, and a full multipart request through the router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use appraisal_engine::api::{AppState, create_router};
use appraisal_engine::calculation::run_appraisal;
use appraisal_engine::config::{ConfigLoader, RuleSetKind};
use appraisal_engine::decode::decode_workbook;
use appraisal_engine::models::{Cell, Sheet, Workbook};

use axum::{body::Body, http::Request};
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use tower::ServiceExt;

const BOUNDARY: &str = "appraisal-bench-boundary";

const ROSTER_HEADER: [&str; 9] = [
    "員工工號",
    "中文姓名",
    "部門",
    "到職日期",
    "職稱",
    "職等",
    "留職停薪日",
    "留停復職日",
    "項目考核類別",
];

fn load_loader() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

/// Builds the text of one roster row; every seventh employee is on unpaid leave.
fn roster_row(i: usize) -> Vec<String> {
    let hire_date = format!("{}-{:02}-{:02}", 2015 + (i % 10), 1 + (i % 12), 1 + (i % 28));
    let (lwop_start, lwop_end) = match (i % 7, i % 2) {
        (0, 0) => ("2024-03-01", "2024-06-30"),
        (0, _) => ("2024-03-01", ""),
        _ => ("", ""),
    };
    vec![
        format!("E{:05}", i),
        format!("員工{}", i),
        format!("部門{}", i % 8),
        hire_date,
        "專員".to_string(),
        ["A", "B", "C"][i % 3].to_string(),
        lwop_start.to_string(),
        lwop_end.to_string(),
        (1 + i % 6).to_string(),
    ]
}

fn leave_row(i: usize) -> Vec<String> {
    vec![format!("E{:05}", i), ((i * 13) % 240).to_string()]
}

fn to_cells(values: &[String]) -> Vec<Cell> {
    values.iter().map(|v| Cell::from(v.as_str())).collect()
}

fn in_memory_workbooks(employees: usize) -> (Workbook, Workbook) {
    let mut roster_rows = vec![
        vec![Cell::from("113年度員工名冊")],
        to_cells(&ROSTER_HEADER.map(String::from)),
    ];
    roster_rows.extend((0..employees).map(|i| to_cells(&roster_row(i))));

    let mut leave_rows = vec![vec![Cell::from("員工工號"), Cell::from("合計")]];
    leave_rows.extend((0..employees).filter(|i| i % 3 != 0).map(|i| to_cells(&leave_row(i))));

    (
        Workbook::new(vec![Sheet::new("名冊", roster_rows)]),
        Workbook::new(vec![Sheet::new("請假", leave_rows)]),
    )
}

fn xlsx_bytes(
    sheet_name: &str,
    header: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) -> Vec<u8> {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    for (c, value) in header.iter().enumerate() {
        sheet.write_string(0, c as u16, *value).unwrap();
    }
    for (r, row) in rows.enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, c as u16, value.as_str()).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn xlsx_workbooks(employees: usize) -> (Vec<u8>, Vec<u8>) {
    (
        xlsx_bytes("名冊", &ROSTER_HEADER, (0..employees).map(roster_row)),
        xlsx_bytes("請假", &["員工工號", "合計"], (0..employees).map(leave_row)),
    )
}

fn multipart_body(employees: &[u8], leave: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in [("employees", employees), ("leave", leave)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.xlsx\"\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Benchmark: pipeline over in-memory workbooks of growing size.
fn bench_pipeline_scaling(c: &mut Criterion) {
    let loader = load_loader();
    let mut group = c.benchmark_group("pipeline");

    for employees in [10usize, 100, 1_000, 5_000] {
        let (roster, leave) = in_memory_workbooks(employees);

        group.throughput(Throughput::Elements(employees as u64));
        group.bench_with_input(
            BenchmarkId::new("service_days", employees),
            &employees,
            |b, _| b.iter(|| black_box(run_appraisal(&roster, &leave, loader.config()).unwrap())),
        );

        let leave_rule = loader.config().with_rule(RuleSetKind::LeaveHours);
        group.bench_with_input(
            BenchmarkId::new("leave_hours", employees),
            &employees,
            |b, _| b.iter(|| black_box(run_appraisal(&roster, &leave, &leave_rule).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark: xlsx decoding.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.sample_size(20);

    for employees in [100usize, 1_000] {
        let (roster, _) = xlsx_workbooks(employees);
        group.throughput(Throughput::Bytes(roster.len() as u64));
        group.bench_with_input(BenchmarkId::new("roster_xlsx", employees), &roster, |b, bytes| {
            b.iter(|| black_box(decode_workbook("roster.xlsx", bytes).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: full multipart request through the router.
fn bench_http_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(load_loader());
    let (roster, leave) = xlsx_workbooks(500);
    let body = multipart_body(&roster, &leave);

    let mut group = c.benchmark_group("http");
    group.sample_size(20);
    group.bench_function("appraisals_500", |b| {
        b.to_async(&rt).iter(|| async {
            let router = create_router(state.clone());
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/appraisals")
                        .header(
                            "Content-Type",
                            format!("multipart/form-data; boundary={BOUNDARY}"),
                        )
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline_scaling, bench_decode, bench_http_request);
criterion_main!(benches);
