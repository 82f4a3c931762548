//! KPI benchmark: full dashboard report over a synthetic employee table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use turnover_insight::kpi::{JobFilter, KpiReport};
use turnover_insight::{EmployeeRecord, Table};

fn make_table(n: u64) -> Table {
    let records = (0..n)
        .map(|i| {
            let f = i as f64;
            EmployeeRecord {
                id: i + 1,
                job: ["sales", "hr", "technical", "support"][(i % 4) as usize].to_string(),
                satisfaction_level: Some((f * 0.137) % 1.0),
                last_evaluation: Some(0.4 + (f * 0.071) % 0.6),
                project_count: Some((2 + i % 6) as f64),
                average_monthly_hours: Some(100.0 + (f * 17.0) % 200.0),
                tenure_years: Some((1 + i % 8) as f64),
                work_accident: Some((i % 7 == 0) as u8 as f64),
                salary_encoded: Some((i % 3) as f64),
                left: (i % 4 == 0) as u8,
            }
        })
        .collect();
    Table::from_records(records).unwrap()
}

fn bench_kpi_report(c: &mut Criterion) {
    let table = make_table(15_000);

    c.bench_function("kpi_report_15k_all", |b| {
        b.iter(|| KpiReport::build(black_box(&table), &JobFilter::All))
    });
    c.bench_function("kpi_report_15k_job", |b| {
        let filter = JobFilter::Job("sales".to_string());
        b.iter(|| KpiReport::build(black_box(&table), &filter))
    });
}

criterion_group!(benches, bench_kpi_report);
criterion_main!(benches);
