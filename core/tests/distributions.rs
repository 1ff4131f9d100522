use profitsim_core::{
    distributions::{beta, gamma, normal, poisson},
    rng::LcgStream,
    SimError,
};

#[test]
fn poisson_with_zero_rate_is_zero_and_draws_nothing() {
    let mut stream = LcgStream::new(5);
    let before = stream.state();
    for _ in 0..100 {
        assert_eq!(poisson(&mut stream, 0.0), 0);
    }
    assert_eq!(poisson(&mut stream, -3.0), 0);
    assert_eq!(stream.state(), before, "a zero rate must not consume draws");
}

#[test]
fn poisson_mean_tracks_rate() {
    let mut stream = LcgStream::new(11);
    let n = 20_000;
    let total: u64 = (0..n).map(|_| poisson(&mut stream, 20.0) as u64).sum();
    let mean = total as f64 / n as f64;
    assert!((mean - 20.0).abs() < 0.5, "Poisson(20) sample mean {mean:.3}");
}

#[test]
fn poisson_handles_rates_beyond_exp_underflow() {
    let mut stream = LcgStream::new(13);
    let n = 2_000;
    let total: u64 = (0..n).map(|_| poisson(&mut stream, 800.0) as u64).sum();
    let mean = total as f64 / n as f64;
    assert!((mean - 800.0).abs() < 5.0, "Poisson(800) sample mean {mean:.3}");
}

#[test]
fn standard_normal_moments() {
    let mut stream = LcgStream::new(42);
    let n = 100_000;
    let samples: Vec<f64> = (0..n).map(|_| normal(&mut stream, 0.0, 1.0)).collect();

    let mean = samples.iter().sum::<f64>() / n as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);

    assert!(mean.abs() < 0.05, "sample mean {mean:.4} too far from 0");
    assert!((variance - 1.0).abs() < 0.1, "sample variance {variance:.4} too far from 1");
}

#[test]
fn normal_with_zero_deviation_returns_mean() {
    let mut stream = LcgStream::new(3);
    for _ in 0..1_000 {
        assert_eq!(normal(&mut stream, 250.0, 0.0), 250.0);
    }
}

#[test]
fn normal_survives_a_zero_first_draw() {
    // Identity constants pin the state, and every draw, at 0.
    let mut stream = LcgStream::with_constants(0, 1, 0, 1 << 32).expect("valid constants");
    let x = normal(&mut stream, 0.0, 1.0);
    assert!(x.is_finite(), "Box-Muller produced {x} from a zero draw");
}

#[test]
fn gamma_samples_are_positive() {
    let mut stream = LcgStream::new(17);
    for &(shape, scale) in &[(0.05, 1.0), (0.3, 2.0), (1.0, 1.0), (2.5, 0.5), (10.0, 3.0)] {
        for _ in 0..5_000 {
            let x = gamma(&mut stream, shape, scale).expect("valid shape");
            assert!(x > 0.0, "Gamma({shape}, {scale}) produced {x}");
        }
    }
}

#[test]
fn beta_samples_lie_in_unit_interval() {
    let mut stream = LcgStream::new(19);
    for &(a, b) in &[(0.01, 0.01), (0.01, 0.99), (0.5, 0.5), (1.0, 1.0), (2.0, 5.0), (5.0, 2.0)] {
        for _ in 0..5_000 {
            let x = beta(&mut stream, a, b).expect("valid shape");
            assert!((0.0..=1.0).contains(&x), "Beta({a}, {b}) produced {x}");
        }
    }
}

#[test]
fn invalid_shapes_are_rejected() {
    let mut stream = LcgStream::new(23);

    for (shape, scale) in [(0.0, 1.0), (-1.0, 1.0), (1.0, 0.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
        let err = gamma(&mut stream, shape, scale).unwrap_err();
        assert!(
            matches!(err, SimError::InvalidParameter { .. }),
            "Gamma({shape}, {scale}) gave {err:?}"
        );
    }

    for (a, b) in [(0.0, 1.0), (1.0, -2.0), (f64::NAN, 1.0)] {
        let err = beta(&mut stream, a, b).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { .. }), "Beta({a}, {b}) gave {err:?}");
    }
}
