use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use frame_core::{Motion, Rect, Registry};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (frame-core benchmark line)\n"
        ));
    }
    out
}

fn open(text: &str, views: usize) -> Registry {
    let mut registry = Registry::new();
    let buffer = registry.open_buffer(text).unwrap();
    for _ in 0..views {
        registry
            .open_frame(buffer, Rect::new(0.0, 0.0, 120.0, 40.0))
            .unwrap();
    }
    registry
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let registry = open(black_box(&text), 1);
            black_box(registry.frame_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts_4_views", |b| {
        b.iter_batched(
            || {
                let mut registry = open(&text, 4);
                let frame = registry.focused().unwrap();
                registry
                    .move_cursor(frame, Motion::To(text.len() / 2))
                    .unwrap();
                (registry, frame)
            },
            |(mut registry, frame)| {
                for _ in 0..100 {
                    registry.insert_text(frame, "x").unwrap();
                }
                black_box(registry.buffer_of(frame).unwrap().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_vertical_navigation(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut registry = open(&text, 1);
    let frame = registry.focused().unwrap();
    registry
        .move_cursor(frame, Motion::To(text.len() / 2))
        .unwrap();

    c.bench_function("navigation/60_lines_down_up", |b| {
        b.iter(|| {
            for _ in 0..60 {
                registry.move_cursor(frame, Motion::Down).unwrap();
            }
            for _ in 0..60 {
                registry.move_cursor(frame, Motion::Up).unwrap();
            }
            black_box(registry.frame(frame).unwrap().cursor());
        })
    });
}

fn bench_undo_redo_cycle(c: &mut Criterion) {
    let text = large_text(10_000);
    c.bench_function("undo_redo/200_steps", |b| {
        b.iter_batched(
            || {
                let mut registry = open(&text, 1);
                let frame = registry.focused().unwrap();
                for i in 0..200 {
                    registry.move_cursor(frame, Motion::To(i * 37)).unwrap();
                    registry.insert_text(frame, "edit").unwrap();
                }
                (registry, frame)
            },
            |(mut registry, frame)| {
                while registry.undo(frame).unwrap().is_some() {}
                while registry.redo(frame).unwrap().is_some() {}
                black_box(registry.buffer_of(frame).unwrap().len());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_typing_in_middle,
    bench_vertical_navigation,
    bench_undo_redo_cycle
);
criterion_main!(benches);
