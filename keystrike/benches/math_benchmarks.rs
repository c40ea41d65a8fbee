use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keystrike::{
    KeystrokeTally, LessonText, ScoringMode,
    math::{Performance, Wpm, score},
};

fn benchmark_wpm_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("wpm_calculations");

    let test_cases = vec![
        (100, 5, 1.0),        // Small dataset
        (1000, 50, 10.0),     // Medium dataset
        (10000, 500, 100.0), // Large dataset
    ];

    for (keystrokes, errors, minutes) in test_cases {
        group.bench_with_input(
            BenchmarkId::new(
                "calculate",
                format!("{}keystrokes_{}min", keystrokes, minutes as u32),
            ),
            &(keystrokes, errors, minutes),
            |b, &(keystrokes, errors, minutes)| {
                b.iter(|| {
                    Wpm::calculate(black_box(keystrokes), black_box(errors), black_box(minutes))
                })
            },
        );
    }

    group.finish();
}

fn benchmark_performance_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("performance_measure");

    let tally = KeystrokeTally {
        correct: 950,
        incorrect: 50,
    };

    for mode in [ScoringMode::Gross, ScoringMode::Net] {
        group.bench_with_input(BenchmarkId::new("measure", mode), &mode, |b, &mode| {
            b.iter(|| {
                Performance::measure(
                    black_box(&tally),
                    black_box(12),
                    black_box(3.5),
                    black_box(mode),
                )
            })
        });
    }

    group.bench_function("score", |b| {
        b.iter(|| score(black_box(72), black_box(97)))
    });

    group.finish();
}

fn benchmark_unfixed_error_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("unfixed_error_scan");

    for size in [100, 1000, 10000] {
        let text: String = "the quick brown fox jumps over the lazy dog "
            .chars()
            .cycle()
            .take(size)
            .collect();
        let lesson = LessonText::new(&text).expect("benchmark text is not empty");
        // Every 10th character wrong
        let input: Vec<char> = text
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 10 == 0 { '#' } else { c })
            .collect();

        group.bench_with_input(BenchmarkId::new("rescan", size), &input, |b, input| {
            b.iter(|| lesson.unfixed_errors(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_wpm_calculations,
    benchmark_performance_measure,
    benchmark_unfixed_error_scan
);
criterion_main!(benches);
