use exposure_fusion::{ChannelModel, Exposure, ExposureSet, ValidationError, validate};

fn exposure(size: [u32; 2], model: ChannelModel) -> Exposure {
    Exposure::solid(size, model, [100, 100, 100]).unwrap()
}

#[test]
fn too_few_exposures() {
    assert_eq!(
        validate(&[]),
        Err(ValidationError::InsufficientCount {
            minimum: 2,
            found: 0
        })
    );

    let single = exposure([4, 3], ChannelModel::RGB8);
    assert_eq!(
        validate(&[Some(&single)]),
        Err(ValidationError::InsufficientCount {
            minimum: 2,
            found: 1
        })
    );
}

#[test]
fn count_is_checked_before_missing_slots() {
    assert_eq!(
        validate(&[None]),
        Err(ValidationError::InsufficientCount {
            minimum: 2,
            found: 1
        })
    );
}

#[test]
fn missing_exposure() {
    let first = exposure([4, 3], ChannelModel::RGB8);
    let third = exposure([4, 3], ChannelModel::RGB8);

    assert_eq!(
        validate(&[Some(&first), None, Some(&third)]),
        Err(ValidationError::NilExposure { index: 1 })
    );
}

#[test]
fn missing_slots_are_checked_before_geometry() {
    let first = exposure([4, 3], ChannelModel::RGB8);
    let second = exposure([2, 2], ChannelModel::RGB8);

    assert_eq!(
        validate(&[Some(&first), Some(&second), None]),
        Err(ValidationError::NilExposure { index: 2 })
    );
}

#[test]
fn dimension_mismatch() {
    let first = exposure([4, 3], ChannelModel::RGB8);
    let second = exposure([4, 3], ChannelModel::RGB8);
    let third = exposure([3, 4], ChannelModel::RGB8);

    assert_eq!(
        validate(&[Some(&first), Some(&second), Some(&third)]),
        Err(ValidationError::DimensionMismatch {
            index: 2,
            expected: [4, 3],
            found: [3, 4]
        })
    );
}

#[test]
fn channel_model_mismatch() {
    let first = exposure([4, 3], ChannelModel::RGB8);
    let second = exposure([4, 3], ChannelModel::RGBA8);

    assert_eq!(
        validate(&[Some(&first), Some(&second)]),
        Err(ValidationError::ChannelModelMismatch {
            index: 1,
            expected: ChannelModel::RGB8,
            found: ChannelModel::RGBA8
        })
    );
}

#[test]
fn matching_set_is_accepted() {
    let exposures = vec![
        exposure([4, 3], ChannelModel::RGB16),
        exposure([4, 3], ChannelModel::RGB16),
        exposure([4, 3], ChannelModel::RGB16),
    ];

    let set = ExposureSet::from_exposures(exposures).unwrap();

    assert_eq!(set.len(), 3);
    assert_eq!(set.size(), [4, 3]);
    assert_eq!(set.model(), ChannelModel::RGB16);
}

#[test]
fn messages_count_from_one() {
    let error = ValidationError::NilExposure { index: 1 };
    assert_eq!(error.to_string(), "Exposure 2 is missing");

    let error = ValidationError::DimensionMismatch {
        index: 2,
        expected: [4, 3],
        found: [3, 4],
    };
    assert_eq!(
        error.to_string(),
        "Exposure 3 has different dimensions than the first exposure: expected 4x3, found 3x4"
    );
}
