//! Benchmarks for per-tick collision work.
//!
//! The resolver runs on every pointer move during a drag, so both the pure
//! priority pass and the geometric candidate build are measured at course
//! sizes from a handful of modules up to very large syllabi.
//!
//! Run with: cargo bench -p syllabus-dnd

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use syllabus_core::{DropTarget, LessonId, ModuleId};
use syllabus_dnd::{CollisionFrame, Rect, resolve_collision};

/// Lay out `modules` stacked zones with `lessons_per_module` cards each, plus
/// one add-lesson affordance at the bottom of every zone.
fn make_frame(modules: usize, lessons_per_module: usize) -> CollisionFrame {
    let mut frame = CollisionFrame::new();
    let card_height = 48.0;
    let mut y = 0.0;
    for m in 0..modules {
        let module = ModuleId::new(format!("m{m}"));
        let zone_height = card_height * (lessons_per_module as f32 + 1.0);
        frame.register(
            DropTarget::ModuleZone(module.clone()),
            Rect::new(0.0, y, 640.0, zone_height),
        );
        for l in 0..lessons_per_module {
            frame.register(
                DropTarget::Lesson(LessonId::new(format!("m{m}-l{l}"))),
                Rect::new(8.0, y + card_height * l as f32, 624.0, card_height - 4.0),
            );
        }
        frame.register(
            DropTarget::AddLessonAffordance(module),
            Rect::new(8.0, y + zone_height - card_height, 624.0, 32.0),
        );
        y += zone_height + 16.0;
    }
    frame
}

fn bench_detect_and_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/detect_and_resolve");
    for (modules, lessons) in [(3, 5), (10, 10), (40, 25)] {
        let frame = make_frame(modules, lessons);
        let active = Rect::new(8.0, 100.0, 624.0, 44.0);
        group.bench_with_input(
            BenchmarkId::new("targets", frame.len()),
            &frame,
            |b, frame| b.iter(|| black_box(resolve_collision(&frame.detect(black_box(active))))),
        );
    }
    group.finish();
}

fn bench_resolve_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/resolve_only");
    for (modules, lessons) in [(3, 5), (40, 25)] {
        let input = make_frame(modules, lessons).detect(Rect::new(8.0, 100.0, 624.0, 44.0));
        group.bench_with_input(
            BenchmarkId::new("ranking", input.nearest_center.len()),
            &input,
            |b, input| b.iter(|| black_box(resolve_collision(black_box(input)))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_detect_and_resolve, bench_resolve_only);
criterion_main!(benches);
