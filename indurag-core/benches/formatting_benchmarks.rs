use criterion::{Criterion, black_box, criterion_group, criterion_main};
use indurag_core::config::ExtractorLimits;
use indurag_core::grounding::GroundingValidator;
use indurag_core::parser::match_header;
use indurag_core::{RuleBasedExtractor, parse};

const MANUAL_PAGE: &str = "\
[Page 14 | pioneer3.pdf]
Section 6.2 Drive-end bearing maintenance
Warning: disconnect power before servicing.
Grinding noise is usually caused by a worn bearing.
Overheating due to insufficient lubrication.
Replace the bearing if axial play exceeds 0.2 mm.
Lubricate with lithium grease every 500 hours.
Inspect the seal for cracks.
Caution: housing surfaces may be hot.";

fn long_context(pages: usize) -> String {
    vec![MANUAL_PAGE; pages].join("\n\n")
}

fn bench_extractor(c: &mut Criterion) {
    let extractor = RuleBasedExtractor::new(ExtractorLimits::default());

    c.bench_function("extract_single_page", |b| {
        b.iter(|| extractor.extract(black_box(MANUAL_PAGE), black_box("grinding noise")))
    });

    let context = long_context(50);
    c.bench_function("extract_fifty_pages", |b| {
        b.iter(|| extractor.extract(black_box(&context), black_box("grinding noise")))
    });

    let no_match = "General description of the pump housing.\n".repeat(200);
    c.bench_function("extract_no_keywords", |b| {
        b.iter(|| extractor.capture(black_box(&no_match)))
    });
}

fn bench_parser(c: &mut Criterion) {
    let extractor = RuleBasedExtractor::new(ExtractorLimits::default());
    let answer = extractor.extract(MANUAL_PAGE, "grinding noise");

    c.bench_function("parse_canonical_answer", |b| {
        b.iter(|| parse(black_box(&answer)))
    });

    let noisy = format!("Sure! Here is the answer.\n\n{answer}\n\nLet me know if you need more.");
    c.bench_function("parse_with_preamble", |b| b.iter(|| parse(black_box(&noisy))));

    c.bench_function("match_header_miss", |b| {
        b.iter(|| match_header(black_box("3. Inspect the seal for cracks.")))
    });
}

fn bench_grounding(c: &mut Criterion) {
    let validator = GroundingValidator::new();
    let answer = long_context(10);

    c.bench_function("grounding_check_long_answer", |b| {
        b.iter(|| validator.is_bad(black_box(&answer)))
    });
}

criterion_group!(benches, bench_extractor, bench_parser, bench_grounding);
criterion_main!(benches);
