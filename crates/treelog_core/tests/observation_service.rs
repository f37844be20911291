use treelog_core::service::observation_service::{
    LOGGED_MESSAGE, REJECTED_MESSAGE, UNCHANGED_MESSAGE,
};
use treelog_core::{
    has_changes, is_record_valid, CandidateRecord, CriteriaField, CriteriaForm, FieldError,
    FieldName, GrowthStage, ObservationService, SubmitError,
};
use uuid::Uuid;

fn seeded() -> ObservationService {
    let mut service = ObservationService::new();
    service
        .log_observation(&CandidateRecord::new("5", "-120", "45", "seedling"))
        .unwrap();
    service
        .log_observation(&CandidateRecord::new("15", "10", "50", "sapling"))
        .unwrap();
    service
        .log_observation(&CandidateRecord::new("30", "20", "-10", "mature"))
        .unwrap();
    service
}

#[test]
fn log_observation_appends_with_fresh_id() {
    let mut service = ObservationService::new();
    let created = service
        .log_observation(&CandidateRecord::new("12", "151.2", "-33.87", "sapling"))
        .unwrap();

    assert!(!created.id.is_nil());
    assert_eq!(created.tree_count, 12);
    assert_eq!(service.log().entries(), &[created.clone()]);
    assert_eq!(LOGGED_MESSAGE, "Data logged successfully!");
}

#[test]
fn log_observation_rejects_incomplete_form() {
    let mut service = ObservationService::new();
    let err = service
        .log_observation(&CandidateRecord::new("12", "151.2", "-33.87", ""))
        .unwrap_err();

    match &err {
        SubmitError::InvalidRecord(errors) => {
            assert_eq!(
                errors.get(FieldName::GrowthStage),
                Some(FieldError::MissingGrowthStage)
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), REJECTED_MESSAGE);
    assert!(service.log().is_empty());
}

#[test]
fn update_observation_replaces_fields_in_place() {
    let mut service = seeded();
    let target = service.log().entries()[1].clone();

    let mut form = CandidateRecord::from_observation(&target);
    form.set(FieldName::TreeCount, "16");
    form.set(FieldName::GrowthStage, "mature");
    let updated = service.update_observation(target.id, &form).unwrap();

    assert_eq!(updated.id, target.id);
    assert_eq!(updated.tree_count, 16);
    assert_eq!(updated.growth_stage, GrowthStage::Mature);
    assert_eq!(service.log().entries()[1], updated);
    assert_eq!(service.log().len(), 3);
}

#[test]
fn unchanged_edit_is_valid_but_not_submitted() {
    let mut service = seeded();
    let target = service.log().entries()[0].clone();
    let form = CandidateRecord::from_observation(&target);

    // Field validity and change detection are independent checks.
    assert!(is_record_valid(&form));
    assert!(!has_changes(&target, &form.parse().unwrap()));

    let err = service.update_observation(target.id, &form).unwrap_err();
    assert_eq!(err, SubmitError::NoChanges(target.id));
    assert_eq!(err.user_message(), UNCHANGED_MESSAGE);
    assert_eq!(service.log().entries()[0], target);
}

#[test]
fn update_unknown_observation_is_rejected() {
    let mut service = seeded();
    let missing = Uuid::new_v4();

    let err = service
        .update_observation(missing, &CandidateRecord::new("1", "0", "0", "mature"))
        .unwrap_err();
    assert_eq!(err, SubmitError::NotFound(missing));
    assert_eq!(err.user_message(), "Invalid data or no data selected!");
}

#[test]
fn update_with_invalid_field_keeps_log() {
    let mut service = seeded();
    let target = service.log().entries()[2].clone();
    let mut form = CandidateRecord::from_observation(&target);
    form.set(FieldName::Latitude, "-91");

    let err = service.update_observation(target.id, &form).unwrap_err();
    assert!(matches!(err, SubmitError::InvalidRecord(_)));
    assert_eq!(service.log().entries()[2], target);
}

#[test]
fn generate_report_filters_in_log_order() {
    let service = seeded();
    let form = CriteriaForm::default().with(CriteriaField::MinTreeCount, "10");

    let report = service.generate_report(&form).unwrap();
    let counts = report
        .iter()
        .map(|entry| entry.tree_count)
        .collect::<Vec<_>>();
    assert_eq!(counts, vec![15, 30]);
}

#[test]
fn generate_report_refuses_inverted_ranges() {
    let service = seeded();
    let form = CriteriaForm::default()
        .with(CriteriaField::MinLongitude, "50")
        .with(CriteriaField::MaxLongitude, "10");

    let errors = service.generate_report(&form).unwrap_err();
    assert!(errors.get(CriteriaField::MaxLongitude).is_some());
}

#[test]
fn show_all_returns_every_observation() {
    let service = seeded();
    assert_eq!(service.show_all(), service.log().entries().to_vec());
}
