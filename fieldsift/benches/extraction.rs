use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldsift::parser::FieldExtractor;

const JSON_RESPONSE: &str = r#"{"efficacy": "Drug X reduced symptoms by 40% versus placebo.", "safety": "Well tolerated with no serious adverse events.", "dosage_administration": "10 mg orally once daily.", "conclusions": "Drug X is a promising option."}"#;

// Helper to build prose responses of various sizes
fn generate_prose(paragraphs: usize) -> String {
    let labels = [
        "Efficacy",
        "Safety",
        "Dosage",
        "Study design",
        "Participants",
        "Endpoints",
        "Conclusions",
    ];

    let mut text = String::new();
    for i in 0..paragraphs {
        let label = labels[i % labels.len()];
        text.push_str(&format!(
            "\n{label}: Paragraph {i} describes findings in detail across several sentences. \
             Results were consistent with earlier reports in comparable cohorts.\n"
        ));
    }
    text
}

fn benchmark_json_path(c: &mut Criterion) {
    let extractor = FieldExtractor::clinical_trial().unwrap();
    let fenced = format!("Here is the summary:\n```json\n{JSON_RESPONSE}\n```");

    let mut group = c.benchmark_group("json_path");
    group.bench_function("strict", |b| {
        b.iter(|| black_box(extractor.extract(black_box(JSON_RESPONSE))))
    });
    group.bench_function("fenced", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&fenced))))
    });
    group.finish();
}

fn benchmark_prose_sizes(c: &mut Criterion) {
    let extractor = FieldExtractor::clinical_trial().unwrap();
    let mut group = c.benchmark_group("section_patterns");

    for paragraphs in [1, 7, 28, 112] {
        let text = generate_prose(paragraphs);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{paragraphs}_paragraphs")),
            &text,
            |b, text| b.iter(|| black_box(extractor.extract(black_box(text)))),
        );
    }

    group.finish();
}

fn benchmark_compile(c: &mut Criterion) {
    c.bench_function("compile_clinical_trial", |b| {
        b.iter(|| black_box(FieldExtractor::clinical_trial().unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_json_path,
    benchmark_prose_sizes,
    benchmark_compile
);
criterion_main!(benches);
