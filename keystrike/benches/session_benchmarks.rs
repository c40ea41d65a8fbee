use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keystrike::{Duration, ManualClock, ScoringMode, SessionConfig, TypingSession};

fn lesson_text(size: usize) -> String {
    "pack my box with five dozen liquor jugs "
        .chars()
        .cycle()
        .take(size)
        .collect()
}

/// Type the whole text, one edit per character, with a typo-and-fix every 20 characters
fn type_lesson(text: &str, mode: ScoringMode) -> Option<keystrike::SessionResult> {
    let clock = ManualClock::new();
    let mut session =
        TypingSession::with_clock(text, SessionConfig::new(mode), clock.clone()).ok()?;
    session.start();

    let mut buffer = String::with_capacity(text.len());
    let mut result = None;

    for (i, character) in text.chars().enumerate() {
        clock.advance(Duration::from_millis(150));
        if i % 20 == 0 {
            buffer.push('#');
            session.apply_edit(&buffer);
            buffer.pop();
            session.apply_edit(&buffer);
        }
        buffer.push(character);
        result = session.apply_edit(&buffer);
    }

    result
}

fn benchmark_full_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_session");

    for size in [50, 200, 1000] {
        let text = lesson_text(size);

        for mode in [ScoringMode::Gross, ScoringMode::Net] {
            group.bench_with_input(
                BenchmarkId::new(format!("type_{mode}"), size),
                &text,
                |b, text| b.iter(|| type_lesson(black_box(text), mode)),
            );
        }
    }

    group.finish();
}

fn benchmark_live_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("live_statistics");

    let text = lesson_text(500);
    let clock = ManualClock::new();
    let Ok(mut session) =
        TypingSession::with_clock(&text, SessionConfig::default(), clock.clone())
    else {
        return;
    };
    session.start();
    clock.advance(Duration::from_secs(45));
    session.apply_edit(&text[..250]);

    group.bench_function("live", |b| b.iter(|| black_box(&session).live()));

    group.finish();
}

criterion_group!(benches, benchmark_full_session, benchmark_live_statistics);
criterion_main!(benches);
