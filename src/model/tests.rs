use super::*;
use serde_json::json;

#[test]
fn test_skill_level_weights_are_ordered() {
    assert_eq!(SkillLevel::Novice.weight(), 1.0);
    assert_eq!(SkillLevel::Developing.weight(), 2.0);
    assert_eq!(SkillLevel::Proficient.weight(), 3.0);
    assert_eq!(SkillLevel::Mastery.weight(), 4.0);
    assert!(SkillLevel::Novice < SkillLevel::Mastery);
}

#[test]
fn test_skill_level_label_round_trip() {
    for label in SkillLevel::LABELS {
        let level = SkillLevel::from_label(label).expect("known label");
        assert_eq!(level.as_label(), label);
    }
}

#[test]
fn test_skill_level_unknown_label_is_none() {
    assert_eq!(SkillLevel::from_label("expert"), None);
    assert_eq!(SkillLevel::from_label(""), None);
}

#[test]
fn test_skill_level_lenient_defaults_to_novice() {
    assert_eq!(SkillLevel::from_label_lenient("大师"), SkillLevel::Novice);
    assert_eq!(
        SkillLevel::from_label_lenient("登堂入室"),
        SkillLevel::Developing
    );
}

#[test]
fn test_skill_level_serde_uses_labels() {
    let json = serde_json::to_string(&SkillLevel::Proficient).unwrap();
    assert_eq!(json, "\"融会贯通\"");

    let level: SkillLevel = serde_json::from_str("\"炉火纯青\"").unwrap();
    assert_eq!(level, SkillLevel::Mastery);

    // Unknown labels deserialize leniently.
    let level: SkillLevel = serde_json::from_str("\"beginner\"").unwrap();
    assert_eq!(level, SkillLevel::Novice);
}

#[test]
fn test_person_deserializes_with_sparse_fields() {
    let person: Person = serde_json::from_value(json!({
        "id": 7,
        "name": "小明",
        "skills": [{"name": "Python", "level": "登堂入室"}]
    }))
    .unwrap();

    assert_eq!(person.id, 7);
    assert!(person.availability.is_none());
    assert!(person.embedding.is_null());
    assert!(person.skills.is_array());
}

#[test]
fn test_opportunity_ref_location_target() {
    let project = Project {
        location: Some("深圳".to_string()),
        ..Default::default()
    };
    let course = Course {
        category: Some("人工智能".to_string()),
        ..Default::default()
    };

    assert_eq!(
        OpportunityRef::Project(&project).location_target(),
        Some("深圳")
    );
    assert_eq!(
        OpportunityRef::Course(&course).location_target(),
        Some("人工智能")
    );
    assert_eq!(OpportunityRef::Project(&project).kind(), EntityKind::Project);
}
