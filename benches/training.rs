use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use oncorisk::cancer::ClassifierKind;
use oncorisk::inference::Predictor;
use oncorisk::preprocessing::StandardScaler;
use oncorisk::store::{features_path_for, write_artifact};
use oncorisk::training::TrainedClassifier;
use oncorisk::CancerType;
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn create_classification_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let y = Array1::from_shape_fn(n_rows, |i| (i % 2) as f64);
    let x = Array2::from_shape_fn((n_rows, n_features), |(i, j)| {
        let shift = if j < 3 { 2.0 * y[i] } else { 0.0 };
        rng.gen::<f64>() + shift
    });
    (x, y)
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for n_rows in [200, 500].iter() {
        let (x, y) = create_classification_data(*n_rows, 9);

        for (name, kind) in [
            ("svc", ClassifierKind::SupportVector),
            ("random_forest", ClassifierKind::RandomForest),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n_rows), &(&x, &y), |b, (x, y)| {
                b.iter(|| TrainedClassifier::fit(kind, black_box(x), black_box(y)).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let dir = tempfile::tempdir().unwrap();
    let (x, y) = create_classification_data(500, 8);
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&x).unwrap();
    let model = TrainedClassifier::fit(ClassifierKind::RandomForest, &scaled, &y).unwrap();

    let names: Vec<String> = [
        "age",
        "psa",
        "psa_density",
        "gleason",
        "prostate_volume",
        "dre",
        "family_history",
        "previous_biopsy",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let model_path = dir.path().join("prostate_cancer.pkl");
    let scaler_path = dir.path().join("prostate_cancer_scaler.pkl");
    write_artifact(&model_path, &model).unwrap();
    write_artifact(&scaler_path, &scaler).unwrap();
    write_artifact(&features_path_for(&model_path), &names).unwrap();

    let predictor = Predictor::load(CancerType::Prostate, &model_path, &scaler_path).unwrap();

    for n_rows in [100, 1000, 10000].iter() {
        let (test_x, _) = create_classification_data(*n_rows, 8);
        let columns: Vec<Column> = names
            .iter()
            .enumerate()
            .map(|(j, name)| Column::new(name.as_str().into(), test_x.column(j).to_vec()))
            .collect();
        let df = DataFrame::new(columns).unwrap();

        group.bench_with_input(BenchmarkId::new("predict_frame", n_rows), &df, |b, df| {
            b.iter(|| predictor.predict_frame(black_box(df)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
