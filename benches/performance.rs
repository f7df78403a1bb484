//! 正規化と1件あたりの判定の性能ベンチマーク。
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use news_veracity::{
    artifacts::ModelArtifacts,
    classification::{StemmerMode, TextNormalizer},
    pipeline::{NewsItem, NewsPipeline},
};

const SAMPLE_MODEL: &str = include_str!("../resources/sample_model.json");

fn synthetic_items(count: usize) -> Vec<NewsItem> {
    let titles = [
        "Breaking: Scientists Confirm Controversial Findings About Generalizations",
        "Hillary Clinton Campaign Officials React To Shocking Election Results",
        "Government Reports Reveal Secret War Plans, Sources Say",
        "President Obama Signs New Agreement With Congressional Leaders",
    ];
    let authors = ["John Doe", "New York Times", "Breitbart News", ""];
    (0..count)
        .map(|i| NewsItem::new(titles[i % titles.len()], authors[i % authors.len()]))
        .collect()
}

fn bench_normalization(c: &mut Criterion) {
    let normalizer = TextNormalizer::new(StemmerMode::Nltk);
    let texts: Vec<String> = synthetic_items(256)
        .iter()
        .map(NewsItem::combined_text)
        .collect();

    c.bench_function("normalize_256_items", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(normalizer.normalize(text));
            }
        });
    });
}

fn bench_prediction(c: &mut Criterion) {
    let artifacts = match ModelArtifacts::from_json_str(SAMPLE_MODEL) {
        Ok(artifacts) => artifacts,
        Err(error) => panic!("sample model must load: {error}"),
    };
    let pipeline = NewsPipeline::new(artifacts, StemmerMode::Nltk);
    let items = synthetic_items(256);

    c.bench_function("predict_256_items", |b| {
        b.iter(|| {
            for item in &items {
                black_box(pipeline.predict(item).ok());
            }
        });
    });
}

criterion_group!(benches, bench_normalization, bench_prediction);
criterion_main!(benches);
