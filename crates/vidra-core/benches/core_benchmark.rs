//! Benchmark tests for vidra-core operations
//!
//! Run with: cargo bench -p vidra-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use vidra_core::backend::ScriptedBackend;
use vidra_core::{
    EventNotifier, MediaKind, PlayerConfig, PlayerController, PlayerEvent, PlayerEventListener,
    VideoOptions,
};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct CountingListener {
    seen: AtomicUsize,
}

impl PlayerEventListener for CountingListener {
    fn on_seek(&self, _from: f64, _to: f64) {
        self.seen.fetch_add(1, Ordering::Relaxed);
    }
}

fn listeners(count: usize) -> Vec<Arc<CountingListener>> {
    (0..count).map(|_| Arc::new(CountingListener::default())).collect()
}

// ============================================================================
// Notifier
// ============================================================================

fn bench_notifier_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("Notifier Fan-out");
    let event = PlayerEvent::Seek { from: 1.0, to: 30.0 };

    for &count in &[1, 10, 100, 1000] {
        let notifier = EventNotifier::new();
        let held = listeners(count);
        notifier.add_all(&held);

        group.bench_with_input(BenchmarkId::new("notify", count), &count, |b, _| {
            b.iter(|| notifier.notify(black_box(&event)));
        });
    }

    group.finish();
}

fn bench_notifier_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("Notifier Membership");

    for &count in &[10, 100] {
        let held = listeners(count);
        group.bench_with_input(BenchmarkId::new("add_remove_all", count), &count, |b, _| {
            b.iter(|| {
                let notifier = EventNotifier::new();
                notifier.add_all(&held);
                notifier.remove_all(&held);
                black_box(notifier.is_empty())
            });
        });
    }

    group.finish();
}

// ============================================================================
// URL derivation
// ============================================================================

fn bench_url_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("URL Derivation");
    let public = VideoOptions::vod("vi5fv44Hol1jFrCovyktAJS9");
    let private = public.clone().with_token("831a9bd9-9f50-464c-a369-8e9d914371ae");

    for kind in [MediaKind::AdaptiveManifest, MediaKind::Progressive, MediaKind::Thumbnail] {
        group.bench_function(format!("public_{}", kind), |b| {
            b.iter(|| black_box(public.url_for(kind)))
        });
        group.bench_function(format!("private_{}", kind), |b| {
            b.iter(|| black_box(private.url_for(kind)))
        });
    }

    group.finish();
}

// ============================================================================
// Controller
// ============================================================================

fn bench_seek_round_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let backend = Arc::new(ScriptedBackend::new());
    let mut player = rt.block_on(async {
        let mut player = PlayerController::new(
            backend.clone(),
            Some(VideoOptions::vod("vi-bench")),
            PlayerConfig::default(),
        )
        .unwrap();
        while backend.current_item().is_none() {
            tokio::time::timeout(Duration::from_secs(1), player.process_next())
                .await
                .unwrap();
        }
        player.process_pending();
        player
    });

    let listener = Arc::new(CountingListener::default());
    player.add_listener(&listener);

    c.bench_function("seek_and_process", |b| {
        b.iter(|| {
            player.seek(black_box(12.5));
            black_box(player.process_pending())
        });
    });
}

criterion_group!(notifier_benches, bench_notifier_fan_out, bench_notifier_membership);

criterion_group!(url_benches, bench_url_derivation);

criterion_group!(controller_benches, bench_seek_round_trip);

criterion_main!(notifier_benches, url_benches, controller_benches);
