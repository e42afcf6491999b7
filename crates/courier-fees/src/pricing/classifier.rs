use tracing::debug;

use super::domain::{ClassificationCode, CodeClass, ConditionRule};
use super::repository::{ReferenceStore, ReferenceStoreError};
use crate::weather::WeatherMeasurement;

/// Evaluate a measurement against every condition rule and collect the
/// matching classification codes. Classes are evaluated independently and a
/// class is skipped entirely when its reading is absent; an empty result
/// means no severe weather and is the common case.
///
/// Output order is deterministic: classes in AT, WS, WP order, rules by id
/// within a class, duplicates collapsed.
pub(crate) fn classify<R>(
    store: &R,
    measurement: &WeatherMeasurement,
) -> Result<Vec<ClassificationCode>, ReferenceStoreError>
where
    R: ReferenceStore + ?Sized,
{
    let mut codes = Vec::new();

    collect_numeric(
        store,
        CodeClass::AirTemperature,
        measurement.air_temperature,
        &mut codes,
    )?;
    collect_numeric(
        store,
        CodeClass::WindSpeed,
        measurement.wind_speed,
        &mut codes,
    )?;
    collect_phenomenon(store, measurement.phenomenon.as_deref(), &mut codes)?;

    Ok(codes)
}

fn collect_numeric<R>(
    store: &R,
    class: CodeClass,
    reading: Option<f32>,
    codes: &mut Vec<ClassificationCode>,
) -> Result<(), ReferenceStoreError>
where
    R: ReferenceStore + ?Sized,
{
    let Some(value) = reading else {
        return Ok(());
    };

    for rule in rules_in_order(store, class)? {
        if numeric_rule_matches(&rule, value) {
            push_unique(codes, rule.code);
        }
    }

    Ok(())
}

fn collect_phenomenon<R>(
    store: &R,
    phenomenon: Option<&str>,
    codes: &mut Vec<ClassificationCode>,
) -> Result<(), ReferenceStoreError>
where
    R: ReferenceStore + ?Sized,
{
    let Some(text) = phenomenon.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(());
    };

    for rule in rules_in_order(store, CodeClass::Phenomenon)? {
        if phenomenon_rule_matches(&rule, text) {
            push_unique(codes, rule.code);
        }
    }

    Ok(())
}

fn rules_in_order<R>(
    store: &R,
    class: CodeClass,
) -> Result<Vec<ConditionRule>, ReferenceStoreError>
where
    R: ReferenceStore + ?Sized,
{
    let mut rules = store.condition_rules(class)?;
    rules.sort_by_key(|rule| rule.id);
    Ok(rules)
}

/// Bound semantics: both bounds inclusive, a lone bound exclusive. A rule
/// with neither bound is an unmatchable configuration no-op.
pub(crate) fn numeric_rule_matches(rule: &ConditionRule, value: f32) -> bool {
    match (rule.min_measurement, rule.max_measurement) {
        (Some(min), Some(max)) => min <= value && value <= max,
        (Some(min), None) => value > min,
        (None, Some(max)) => value < max,
        (None, None) => {
            debug!(rule = rule.id, code = %rule.code, "condition rule has no bounds and never matches");
            false
        }
    }
}

/// Case-insensitive substring containment against any of the rule's
/// keywords; blank keywords never match.
pub(crate) fn phenomenon_rule_matches(rule: &ConditionRule, phenomenon: &str) -> bool {
    let text = phenomenon.to_lowercase();
    rule.phenomena
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| text.contains(&keyword))
}

fn push_unique(codes: &mut Vec<ClassificationCode>, code: ClassificationCode) {
    if !codes.contains(&code) {
        codes.push(code);
    }
}
