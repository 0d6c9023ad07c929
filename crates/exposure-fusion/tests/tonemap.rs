use approx::assert_relative_eq;
use exposure_fusion::{
    RadianceStatistics, ToneMapOperator, ToneMapper, ToneMapperConfig, ToneMapperError,
    tonemapper::{Operator, keys, operator_names},
};

fn tone_mapper(config: ToneMapperConfig) -> ToneMapper {
    ToneMapper::new(&config).unwrap()
}

fn statistics(average: f32, peak: f32) -> RadianceStatistics {
    RadianceStatistics {
        minimum: 0.0,
        maximum: peak,
        average,
        log_average: average,
        peak,
    }
}

#[test]
fn reinhard_values() {
    let reinhard = tone_mapper(ToneMapperConfig::new("reinhard"));

    assert_eq!(reinhard.tone_map(0.0), 0.0);
    assert_eq!(reinhard.tone_map(1.0), 0.5);
    assert_relative_eq!(reinhard.tone_map(10.0), 10.0 / 11.0, epsilon = 1e-6);
    assert_relative_eq!(reinhard.tone_map(1000.0), 1000.0 / 1001.0, epsilon = 1e-6);
    assert_relative_eq!(reinhard.tone_map(0.1), 0.1 / 1.1, epsilon = 1e-6);
    assert_eq!(reinhard.tone_map(-1.0), 0.0);
    assert_eq!(reinhard.tone_map(f32::INFINITY), 1.0);
}

#[test]
fn reinhard_is_bounded_and_monotonic() {
    let reinhard = tone_mapper(ToneMapperConfig::new("reinhard"));

    assert_eq!(reinhard.tone_map(0.0), 0.0);

    let mut previous = 0.0;
    for step in 1..=2000 {
        let radiance = step as f32 * 0.05;
        let display = reinhard.tone_map(radiance);

        assert!((0.0..1.0).contains(&display), "{radiance} -> {display}");
        assert!(display > previous, "{radiance} -> {display} <= {previous}");
        previous = display;
    }
}

#[test]
fn drago_is_bounded_and_monotonic() {
    let drago = tone_mapper(ToneMapperConfig::new("drago"));

    let mut previous = 0.0;
    for step in 0..=2000 {
        let radiance = step as f32 * 0.5;
        let display = drago.tone_map(radiance);

        assert!((0.0..=1.0).contains(&display), "{radiance} -> {display}");
        assert!(display >= previous, "{radiance} -> {display} < {previous}");
        previous = display;
    }
}

#[test]
fn drago_edges() {
    let drago = tone_mapper(ToneMapperConfig::new("drago"));

    assert_eq!(drago.tone_map(0.0), 0.0);
    assert_eq!(drago.tone_map(-3.0), 0.0);
    assert_eq!(drago.tone_map(f32::INFINITY), 1.0);
    // At the display maximum the denominator is ln(10).
    let at_display_maximum = 2f32.ln() / 10f32.ln();
    assert_relative_eq!(drago.tone_map(100.0), at_display_maximum, epsilon = 1e-5);
}

#[test]
fn drago_rejects_invalid_bias() {
    for bias in [0.0, 1.0, 1.5, f32::NAN] {
        let result = ToneMapper::new(&ToneMapperConfig::new("drago").with_param(keys::BIAS, bias));

        assert!(
            matches!(
                result,
                Err(ToneMapperError::InvalidParameter { key: "bias", .. })
            ),
            "bias {bias} was accepted"
        );
    }
}

#[test]
fn drago_rejects_invalid_ld_max() {
    for ld_max in [0.0, -5.0] {
        let result =
            ToneMapper::new(&ToneMapperConfig::new("drago").with_param(keys::LD_MAX, ld_max));

        assert!(matches!(
            result,
            Err(ToneMapperError::InvalidParameter { key: "ldMax", .. })
        ));
    }
}

#[test]
fn drago_keeps_configured_parameters() {
    let config = ToneMapperConfig::new("drago")
        .with_param(keys::LD_MAX, 250.0)
        .with_param(keys::BIAS, 0.7);

    match tone_mapper(config).operator() {
        Operator::Drago(drago) => {
            assert_eq!(drago.ld_max(), 250.0);
            assert_eq!(drago.bias(), 0.7);
        }
        operator => panic!("built {}", operator.name()),
    }
}

#[test]
fn names_are_case_insensitive() {
    let name = |operator: &str| tone_mapper(ToneMapperConfig::new(operator)).name();

    assert_eq!(name("DRAGO03"), "drago");
    assert_eq!(name(" Reinhard "), "reinhard");
    assert_eq!(name("log"), "logarithmic");
}

#[test]
fn unsupported_operator() {
    let result = ToneMapper::new(&ToneMapperConfig::new("filmic"));

    assert_eq!(
        result,
        Err(ToneMapperError::UnsupportedOperator("filmic".to_string()))
    );
}

#[test]
fn every_registered_name_builds_with_defaults() {
    for name in operator_names() {
        let result = ToneMapper::new(&ToneMapperConfig::new(name));
        assert!(result.is_ok(), "{name}");
    }
}

#[test]
fn unknown_keys_are_ignored() {
    let config = ToneMapperConfig::new("reinhard")
        .with_param(keys::SATURATION, 3.0)
        .with_param("sharpness", -1.0);

    assert!(ToneMapper::new(&config).is_ok());
}

#[test]
fn linear_scales_and_clips() {
    let linear = tone_mapper(ToneMapperConfig::new("linear").with_param(keys::INTENSITY, 2.0));

    assert_relative_eq!(linear.tone_map(0.25), 0.5);
    assert_eq!(linear.tone_map(0.7), 1.0);
    assert_eq!(linear.tone_map(-0.2), 0.0);
}

#[test]
fn logarithmic_normalizes_to_peak() {
    let peak = statistics(1.0, 4.0);
    let logarithmic = tone_mapper(ToneMapperConfig::new("logarithmic")).adapted(&peak);

    assert_relative_eq!(logarithmic.tone_map(4.0), 1.0, epsilon = 1e-6);
    let expected = 2f32.ln() / 5f32.ln();
    assert_relative_eq!(logarithmic.tone_map(1.0), expected, epsilon = 1e-6);
    assert_eq!(logarithmic.tone_map(0.0), 0.0);
}

#[test]
fn logarithmic_survives_black_map() {
    let logarithmic = tone_mapper(ToneMapperConfig::new("log")).adapted(&statistics(0.0, 0.0));

    assert_eq!(logarithmic.tone_map(0.0), 0.0);
    assert!(logarithmic.tone_map(0.5).is_finite());
}

#[test]
fn gamma_compression_maps_peak_to_white() {
    let config = ToneMapperConfig::new("gamma-compression").with_param(keys::GAMMA, 0.5);
    let gamma_compression = tone_mapper(config).adapted(&statistics(1.0, 4.0));

    assert_relative_eq!(gamma_compression.tone_map(4.0), 1.0, epsilon = 1e-6);
    assert_relative_eq!(gamma_compression.tone_map(1.0), 0.5, epsilon = 1e-6);
}

#[test]
fn gamma_compression_rejects_gamma_above_one() {
    let result =
        ToneMapper::new(&ToneMapperConfig::new("gamma-compression").with_param(keys::GAMMA, 1.5));

    assert!(matches!(
        result,
        Err(ToneMapperError::InvalidParameter { key: "gamma", .. })
    ));
}

#[test]
fn reinhard05_midpoint_at_adaptation_level() {
    let config = ToneMapperConfig::new("reinhard05")
        .with_param(keys::CONTRAST, 0.5)
        .with_param(keys::INTENSITY, 0.0);
    let reinhard05 = tone_mapper(config).adapted(&statistics(0.5, 1.0));

    // sigma = 0.5^0.5
    assert_relative_eq!(reinhard05.tone_map(0.5f32.sqrt()), 0.5, epsilon = 1e-6);
    assert_eq!(reinhard05.tone_map(0.0), 0.0);
    assert_eq!(reinhard05.tone_map(f32::INFINITY), 1.0);
}

#[test]
fn reinhard05_is_bounded_and_monotonic() {
    let config = ToneMapperConfig::new("reinhard05")
        .with_param(keys::INTENSITY, -1.0)
        .with_param(keys::LIGHT, 0.5);
    let reinhard05 = tone_mapper(config).adapted(&statistics(0.4, 3.0));

    let mut previous = 0.0;
    for step in 0..=1000 {
        let display = reinhard05.tone_map(step as f32 * 0.01);

        assert!((0.0..=1.0).contains(&display));
        assert!(display >= previous);
        previous = display;
    }
}

#[test]
fn reinhard05_rejects_out_of_range_parameters() {
    let intensity =
        ToneMapper::new(&ToneMapperConfig::new("reinhard05").with_param(keys::INTENSITY, 9.0));
    let chromatic =
        ToneMapper::new(&ToneMapperConfig::new("reinhard05").with_param(keys::CHROMATIC, -0.1));

    assert!(intensity.is_err());
    assert!(chromatic.is_err());
}

#[test]
fn display_gamma_brightens_mid_tones() {
    let reinhard = tone_mapper(ToneMapperConfig::new("reinhard").with_param(keys::GAMMA, 2.2));

    let expected = 0.5f32.powf(1.0 / 2.2);
    assert_relative_eq!(reinhard.tone_map(1.0), expected, epsilon = 1e-6);
    assert_eq!(reinhard.tone_map(0.0), 0.0);
}

#[test]
fn display_gamma_must_be_positive() {
    let result = ToneMapper::new(&ToneMapperConfig::new("drago").with_param(keys::GAMMA, 0.0));

    assert!(matches!(
        result,
        Err(ToneMapperError::InvalidParameter { key: "gamma", .. })
    ));
}
