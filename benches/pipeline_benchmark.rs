//! Benchmarks for retex pipeline performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the pipeline over synthetic converter output.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic converter-output document with the given number of
/// sections, each carrying a figure, links, a long table and some math.
fn create_test_document(section_count: usize) -> String {
    let mut content = String::new();

    for i in 0..section_count {
        content.push_str(&format!("\\section{{Section {}}}\n\n", i));
        content.push_str(&format!(
            "![[diagram_{}.png]]\nFigure {}: Flow for section {}.\n\n",
            i, i, i
        ));
        content.push_str(&format!(
            "See [[Setup#Install|the installer]] and [[diagram_{}.png]].\n\n",
            i
        ));
        content.push_str(&format!("Table t{}: Measurements for section {}\n", i, i));
        content.push_str(
            "\\begin{longtable}[]{@{}p{0.4\\textwidth}lr@{}}\n\\toprule\nNode & Role & Latency \\\\\n\\midrule\n\\endhead\na1 & worker & 3ms \\\\\n\\end{longtable}\n\n",
        );
        content.push_str(&format!("As Table t{} shows, a → b holds:\n\\[\nx_{} = y\n\\]\n\n", i, i));
    }

    content
}

/// Benchmark artifact detection.
fn bench_detection(c: &mut Criterion) {
    let document = create_test_document(10);
    let clean = "Plain prose with no artifacts at all.\n".repeat(200);

    c.bench_function("scan_dirty_document", |b| {
        b.iter(|| retex::scan_artifacts(black_box(&document)));
    });

    c.bench_function("scan_clean_document", |b| {
        b.iter(|| retex::scan_artifacts(black_box(&clean)));
    });
}

/// Benchmark the full pipeline at various document sizes.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for section_count in [1, 10, 50].iter() {
        let document = create_test_document(*section_count);
        let pipeline = retex::Pipeline::default();

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| pipeline.process(black_box(&document)));
        });
    }

    group.finish();
}

/// Benchmark pipeline construction (pattern compilation).
fn bench_pipeline_creation(c: &mut Criterion) {
    c.bench_function("pipeline_creation", |b| {
        b.iter(|| retex::Pipeline::new(retex::PipelineOptions::default()));
    });
}

criterion_group!(
    benches,
    bench_detection,
    bench_pipeline,
    bench_pipeline_creation,
);
criterion_main!(benches);
