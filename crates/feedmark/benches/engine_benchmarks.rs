//! Engine performance benchmarks.
//!
//! Measures feedback parsing, annotation and batch distribution across
//! document and upload sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use feedmark::{
    sanitize, AnnotationPair, Annotator, BatchDistributor, FeedbackParser, RowReader, TabularRow,
};

const WORDS: &[&str] = &[
    "the", "experiment", "shows", "that", "light", "affects", "growth", "in", "plants", "and",
    "results", "were", "measured", "over", "three", "weeks",
];

/// Generate writing with the given number of sentences.
fn generate_writing(sentences: usize) -> String {
    let mut writing = String::new();
    for s in 0..sentences {
        for w in 0..8 {
            if w > 0 {
                writing.push(' ');
            }
            writing.push_str(WORDS[(s * 3 + w) % WORDS.len()]);
        }
        writing.push_str(". ");
    }
    writing
}

/// Generate a feedback document with the given number of pairs.
fn generate_feedback(pairs: usize) -> String {
    let mut document = String::from("Overall a solid piece of work.\n\n");
    for p in 0..pairs {
        document.push_str(&format!(
            "**Original Text:** \"{} {}\" <endoforiginal>\n\
             **Improvement:** Be more specific here ({}). <endofimprovement>\n\n",
            WORDS[p % WORDS.len()],
            WORDS[(p + 1) % WORDS.len()],
            p
        ));
    }
    document.push_str("Keep refining your conclusions.");
    document
}

/// Generate an upload with the given number of data rows.
fn generate_upload(rows: usize) -> String {
    let mut data = String::from("id,question,response\n");
    for r in 0..rows {
        data.push_str(&format!(
            "{},Question {},{}\n",
            1000 + r / 5,
            r % 5,
            generate_writing(1).trim()
        ));
    }
    data
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_feedback");
    let parser = FeedbackParser::new();

    for pairs in [1, 10, 50, 200] {
        let document = generate_feedback(pairs);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &document, |b, doc| {
            b.iter(|| parser.parse(black_box(doc)))
        });
    }

    group.finish();
}

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    let annotator = Annotator::new();
    let writing = generate_writing(40);

    for pairs in [1, 5, 10] {
        let parsed = FeedbackParser::new().parse(&generate_feedback(pairs));
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &parsed.pairs, |b, pairs| {
            b.iter(|| annotator.annotate(black_box(&writing), black_box(pairs)))
        });
    }

    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let pairs = vec![
        AnnotationPair::new("light", "Say which wavelengths."),
        AnnotationPair::new("growth", "Height or mass?"),
    ];
    let markup = Annotator::new()
        .rewrite(&generate_writing(100), &pairs)
        .expect("Rewrite failed");

    let mut group = c.benchmark_group("sanitize");
    group.throughput(Throughput::Bytes(markup.len() as u64));
    group.bench_function("annotated_markup", |b| b.iter(|| sanitize(black_box(&markup))));

    for elements in [2_000, 8_000, 32_000] {
        let scripts = "<script></script>x".repeat(elements);
        group.throughput(Throughput::Bytes(scripts.len() as u64));
        group.bench_with_input(BenchmarkId::new("script_elements", elements), &scripts, |b, s| {
            b.iter(|| sanitize(black_box(s)))
        });
    }
    group.finish();
}

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute");

    for rows in [10, 100, 1_000] {
        let upload = generate_upload(rows);
        let parsed: Vec<TabularRow> = RowReader::new().read_str(&upload).expect("Read failed");
        let bulk = (0..rows)
            .map(|i| format!("Feedback paragraph {}.", i))
            .collect::<Vec<_>>()
            .join("\n\n");

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("read_rows", rows), &upload, |b, upload| {
            b.iter(|| RowReader::new().read_str(black_box(upload)))
        });
        group.bench_with_input(BenchmarkId::new("distribute_group", rows), &parsed, |b, parsed| {
            b.iter(|| {
                let records = BatchDistributor::distribute(black_box(&bulk), parsed);
                BatchDistributor::group_by_owner(records)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_annotate, bench_sanitize, bench_distribute);
criterion_main!(benches);
