//! Tiered geographic affinity scoring.

/// Cities recognized for the same-city tier when the free-text locations
/// differ but both mention one of them.
pub const TIER_CITIES: &[&str] = &[
    "广州", "深圳", "珠海", "佛山", "东莞", "惠州", "中山", "江门", "肇庆", "香港", "澳门",
];

/// Scores location affinity between a person and a target in `[0, 1]`.
///
/// Tiers: both unknown 0.2, one unknown 0.3, equal (case/whitespace
/// insensitive) 1.0, one containing the other 0.8, both mentioning the same
/// [`TIER_CITIES`] entry 0.6, otherwise 0.1.
pub fn score_location(person_location: Option<&str>, target_location: Option<&str>) -> f32 {
    let person = person_location.unwrap_or("").trim().to_lowercase();
    let target = target_location.unwrap_or("").trim().to_lowercase();

    if person.is_empty() && target.is_empty() {
        return 0.2;
    }
    if person.is_empty() || target.is_empty() {
        return 0.3;
    }

    if person == target {
        return 1.0;
    }

    if person.contains(&target) || target.contains(&person) {
        return 0.8;
    }

    let person_city = TIER_CITIES.iter().copied().find(|city| person.contains(city));
    let target_city = TIER_CITIES.iter().copied().find(|city| target.contains(city));

    if let (Some(a), Some(b)) = (person_city, target_city) {
        if a == b {
            return 0.6;
        }
    }

    0.1
}
