// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the flow layout path in the satzwerk-document crate:
// measured word wrap and pagination of a synthetic multi-page document.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use satzwerk_core::{ConversionOptions, SanitizedBlock, TextBlock};
use satzwerk_document::{BuiltinMetrics, MetricsProvider, Paginator, Sanitizer, WordWrapper};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Roughly thirty A4 pages of prose in 400 paragraphs.
fn sample_blocks() -> Vec<SanitizedBlock> {
    let sanitizer = Sanitizer::default();
    (0..400)
        .map(|i| {
            let text = format!(
                "Paragraph {i}. The quick brown fox jumps over the lazy dog while the\t\
                 typesetter measures every word against the column width, breaking lines \
                 greedily and carrying overflow onto the next page of the document."
            );
            sanitizer.sanitize_block(TextBlock::new(text))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_wrap(c: &mut Criterion) {
    let geometry = ConversionOptions::default().geometry();
    let metrics: Arc<dyn MetricsProvider> = Arc::new(BuiltinMetrics::helvetica());
    let wrapper = WordWrapper::new(metrics, geometry.font_size);
    let blocks = sample_blocks();

    c.bench_function("wrap_blocks (400 paragraphs)", |b| {
        b.iter(|| black_box(wrapper.wrap_blocks(black_box(&blocks), geometry.content_width())));
    });
}

fn bench_paginate(c: &mut Criterion) {
    let geometry = ConversionOptions::default().geometry();
    let metrics: Arc<dyn MetricsProvider> = Arc::new(BuiltinMetrics::helvetica());
    let wrapper = WordWrapper::new(Arc::clone(&metrics), geometry.font_size);
    let lines = wrapper.wrap_blocks(&sample_blocks(), geometry.content_width());
    let paginator = Paginator::new(geometry, metrics).expect("default geometry is valid");

    c.bench_function("paginate (400 paragraphs)", |b| {
        b.iter(|| black_box(paginator.paginate(Some("Benchmark"), black_box(&lines))));
    });
}

criterion_group!(benches, bench_wrap, bench_paginate);
criterion_main!(benches);
