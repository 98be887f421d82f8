//! End-to-end use of the facade: fit, inspect, serialize, invert and sample

use approx::assert_abs_diff_eq;
use metalog_stats::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_fit_and_query() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let gamma = Gamma::new(2.0, 3.0)?;
    let mut data: Vec<f64> = (0..1000).map(|_| gamma.sample(&mut rng)).collect();
    data.push(f64::NAN);
    data.push(-1.0);

    let model = MetalogBuilder::new().order(6).lower_bound(0.0).fit_data(&data)?;
    let report = model.report().copied().ok_or_else(|| anyhow::anyhow!("missing report"))?;
    assert_eq!(report.points_missing, 1);
    assert_eq!(report.points_excluded, 1);
    assert_eq!(report.points_used, 1000);

    // Gamma(2, 3) median is about 5.03
    assert_abs_diff_eq!(model.median(), 5.03, epsilon = 0.4);
    let p = model.cdf_at(model.median())?;
    assert_abs_diff_eq!(p, 0.5, epsilon = 1e-9);

    let draws = model.sample_with(&mut rng, 1000);
    assert!(draws.iter().all(|&x| x >= 0.0));

    let summary = model.summary();
    tracing::info!("{}", summary);
    assert!(summary.contains("semi-bounded (lower)"));
    Ok(())
}

#[test]
fn test_serialized_model() -> anyhow::Result<()> {
    let model = Metalog::from_coefficients(&[1.0, 0.5, 0.1], Bounds::bounded(0.0, 4.0))?;
    let json = serde_json::to_string(&model)?;
    assert!(json.contains("\"coefficients\":[1.0,0.5,0.1]"));

    let params: MetalogParameters = serde_json::from_str(
        r#"{"order":4,"bounds":{"lower":null,"upper":10.0},"rank_method":"Blom"}"#,
    )?;
    assert_eq!(params.bounds.boundary_type(), BoundaryType::SemiUpper);
    assert_eq!(params.rank_method, RankMethod::Blom);
    Ok(())
}

#[test]
fn test_errors_surface_through_facade() {
    let err = MetalogBuilder::new().fit_data(&[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { .. }));
    assert!(err.to_string().contains("Insufficient data"));
    assert_eq!(metalog_stats::metalog_core::VERSION, "0.1.0");
}
