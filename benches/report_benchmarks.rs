//! Performance benchmarks for report aggregation and export.
//!
//! Covers the three report paths an administrator hits:
//! - Aggregating a month of entries in memory
//! - Rendering the CSV export
//! - The `/reports` endpoint end to end
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use timeclock::api::{create_router, AppState};
use timeclock::clock::SystemClock;
use timeclock::config::TerminalSettings;
use timeclock::models::{Role, TimeEntry, User};
use timeclock::reporting::{aggregate, to_csv};
use timeclock::store::{InMemoryStore, TimeClockStore};
use timeclock::terminal::Terminal;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates `employee_count` employees each working one 8-hour shift per day
/// for the 30 days of a month.
fn create_month(employee_count: usize) -> (Vec<User>, Vec<TimeEntry>) {
    let month_start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

    let users: Vec<User> = (0..employee_count)
        .map(|i| User {
            id: format!("emp_{:04}", i),
            email: format!("emp_{:04}@example.com", i),
            first_name: "Employee".to_string(),
            last_name: format!("{:04}", i),
            access_code: Some(format!("{:04}", i)),
            role: Role::Employee,
            active: true,
        })
        .collect();

    let entries = users
        .iter()
        .flat_map(|user| {
            (0..30).map(move |day| {
                let clock_in = (month_start + TimeDelta::days(day))
                    .and_hms_opt(9, 0, 0)
                    .unwrap();
                TimeEntry {
                    id: format!("{}_{:02}", user.id, day),
                    employee_id: user.id.clone(),
                    clock_in,
                    clock_out: Some(clock_in + TimeDelta::minutes(480)),
                    station_id: "st_front".to_string(),
                }
            })
        })
        .collect();

    (users, entries)
}

fn name_map(users: &[User]) -> HashMap<String, String> {
    users
        .iter()
        .map(|u| (u.id.clone(), u.display_name()))
        .collect()
}

/// Benchmark: Aggregation by employee count.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for employees in [10usize, 100, 500] {
        let (users, entries) = create_month(employees);
        let names = name_map(&users);

        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(employees), &entries, |b, entries| {
            b.iter(|| black_box(aggregate(black_box(entries), &names)))
        });
    }
    group.finish();
}

/// Benchmark: CSV export of 100 employees over a month.
fn bench_csv_export(c: &mut Criterion) {
    let (users, entries) = create_month(100);
    let reports = aggregate(&entries, &name_map(&users));

    c.bench_function("csv_export_100_employees", |b| {
        b.iter(|| black_box(to_csv(black_box(&reports)).unwrap()))
    });
}

/// Benchmark: `/reports` over HTTP for 100 employees.
fn bench_reports_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (users, entries) = create_month(100);

    let store = Arc::new(InMemoryStore::with_records(users, vec![]));
    for entry in &entries {
        let id = store
            .insert_entry(&entry.employee_id, &entry.station_id, entry.clock_in)
            .unwrap();
        store
            .update_entry(&id, entry.clock_in, entry.clock_out)
            .unwrap();
    }
    let terminal = Terminal::new(store.clone(), Arc::new(SystemClock), &TerminalSettings::default());
    let router = create_router(AppState::new(terminal, store));

    c.bench_function("reports_endpoint_100_employees", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/reports?start=2026-01-01&end=2026-01-31")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_csv_export,
    bench_reports_endpoint
);
criterion_main!(benches);
