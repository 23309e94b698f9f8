//! Criterion microbenchmarks for skyferry-api hot paths.
//!
//! Run with:
//!   cargo bench -p skyferry-api
//!
//! HTML reports are written to `target/criterion/`.

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use skyferry_api::auth;
use skyferry_common::{
    auth::validate_token,
    ids,
    models::flight::{FerryFlight, FlightResponse},
    phases::{self, FlightStatus},
    validation::normalize_tail_number,
};
use uuid::Uuid;

const SECRET: &str = "bench-secret-key-32-bytes-padded!!";

fn sample_flight(notes: Option<String>) -> FerryFlight {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    FerryFlight {
        id: Uuid::now_v7(),
        organization_id: Uuid::now_v7(),
        aircraft_id: Uuid::now_v7(),
        created_by: Uuid::now_v7(),
        origin: "KSEA".into(),
        destination: "KBFI".into(),
        reason: "Annual inspection overdue, repositioning to maintenance base".into(),
        status: "faa_submitted".into(),
        planned_departure: Some(at),
        pilot_id: Some(Uuid::now_v7()),
        notes,
        is_example: false,
        created_at: at,
        updated_at: at,
    }
}

// ── Phase table ───────────────────────────────────────────────────────────────

fn bench_phase_lookup(c: &mut Criterion) {
    c.bench_function("phases/phase_for_status", |b| {
        b.iter(|| phases::phase_for_status(black_box("ready_for_departure")))
    });

    c.bench_function("phases/progress", |b| {
        b.iter(|| phases::progress(black_box("inspection_scheduled")))
    });
}

fn bench_transition_check(c: &mut Criterion) {
    c.bench_function("phases/check_transition", |b| {
        b.iter(|| {
            phases::check_transition(
                black_box(FlightStatus::InspectionComplete),
                black_box(FlightStatus::PendingFaa),
            )
        })
    });
}

// ── Flight serialisation ──────────────────────────────────────────────────────

fn bench_flight_serialise(c: &mut Criterion) {
    let response: FlightResponse = sample_flight(None).into();

    c.bench_function("flight/serialise", |b| {
        b.iter(|| serde_json::to_string(black_box(&response)).unwrap())
    });
}

/// Flight serialisation as the free-text notes grow.
fn bench_flight_notes_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("flight/notes_scaling");

    for size in [64usize, 512, 4000] {
        let response: FlightResponse = sample_flight(Some("x".repeat(size))).into();

        group.bench_with_input(BenchmarkId::from_parameter(size), &response, |b, r| {
            b.iter(|| serde_json::to_string(black_box(r)).unwrap())
        });
    }

    group.finish();
}

// ── Identifiers & validation ──────────────────────────────────────────────────

fn bench_tail_number(c: &mut Criterion) {
    c.bench_function("validation/tail_number", |b| {
        b.iter(|| normalize_tail_number(black_box(" n-172sp ")).unwrap())
    });
}

fn bench_storage_key(c: &mut Criterion) {
    let flight = Uuid::now_v7();
    let document = Uuid::now_v7();
    c.bench_function("id/document_storage_key", |b| {
        b.iter(|| ids::document_storage_key(black_box(flight), black_box(document), "registration.pdf"))
    });
}

// ── Auth ──────────────────────────────────────────────────────────────────────

fn bench_password_verify(c: &mut Criterion) {
    let hash = auth::hash_password("hunter2-password-bench").unwrap();

    c.bench_function("auth/argon2_verify", |b| {
        b.iter(|| auth::verify_password(black_box("hunter2-password-bench"), &hash).unwrap())
    });
}

fn bench_token_pair(c: &mut Criterion) {
    let user = Uuid::now_v7();
    c.bench_function("auth/token_pair", |b| {
        b.iter(|| auth::generate_token_pair(user, "pilot@example.com", SECRET, 900, 3600).unwrap())
    });
}

fn bench_token_validate(c: &mut Criterion) {
    let token =
        auth::generate_access_token(Uuid::now_v7(), "pilot@example.com", SECRET, 3600).unwrap();

    c.bench_function("auth/jwt_validate", |b| {
        b.iter(|| validate_token(black_box(&token), SECRET).unwrap())
    });
}

// ── criterion entrypoints ─────────────────────────────────────────────────────

criterion_group!(workflow, bench_phase_lookup, bench_transition_check);

criterion_group!(
    serialisation,
    bench_flight_serialise,
    bench_flight_notes_scaling,
);

criterion_group!(validation, bench_tail_number, bench_storage_key);

criterion_group!(
    tokens,
    bench_password_verify,
    bench_token_pair,
    bench_token_validate,
);

criterion_main!(workflow, serialisation, validation, tokens);
