//! Patient vitals schema: coercion, field aliases and constraint checking.
//!
//! Raw input arrives as a mapping from field name to a value that is either
//! already numeric (JSON) or a string (form submission). Validation coerces
//! string values, resolves aliases, checks every field against its range or
//! enum rule in declaration order, and stops at the first violation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw input value before coercion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A value after the string coercion pass. Strings that do not parse as
/// numbers stay text and fail the numeric type checks later.
#[derive(Debug, Clone, PartialEq)]
enum Coerced {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Coerce a raw value: trim whitespace, replace decimal-comma with
    /// decimal-point, attempt a numeric parse. Whole-number parses become
    /// integers. Already-numeric values pass through unchanged.
    fn coerce(&self) -> Coerced {
        match self {
            RawValue::Int(i) => Coerced::Int(*i),
            RawValue::Float(f) => Coerced::Float(*f),
            RawValue::Text(s) => {
                let s = s.trim().replace(',', ".");
                match s.parse::<f64>() {
                    Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                        Coerced::Int(n as i64)
                    }
                    Ok(n) => Coerced::Float(n),
                    Err(_) => Coerced::Text(s),
                }
            }
        }
    }
}

/// First constraint violation encountered during validation. `field` is the
/// externally-visible name of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Int,
    Float,
    /// 0/1 enum flag
    Flag,
}

/// Static schema entry: internal identifier, external display label, type
/// and inclusive bounds. The table is consulted both during parsing (alias
/// resolution) and serialization.
struct FieldSpec {
    name: &'static str,
    alias: &'static str,
    kind: FieldKind,
    ge: Option<f64>,
    le: Option<f64>,
}

const FIELD_SPECS: [FieldSpec; 16] = [
    FieldSpec { name: "age", alias: "age", kind: FieldKind::Int, ge: Some(0.0), le: None },
    FieldSpec { name: "cholesterol", alias: "cholesterol", kind: FieldKind::Float, ge: None, le: None },
    FieldSpec { name: "heart_rate", alias: "heart rate", kind: FieldKind::Int, ge: Some(40.0), le: Some(120.0) },
    FieldSpec { name: "diabetes", alias: "diabetes", kind: FieldKind::Flag, ge: None, le: None },
    FieldSpec { name: "smoking", alias: "smoking", kind: FieldKind::Flag, ge: None, le: None },
    FieldSpec { name: "obesity", alias: "obesity", kind: FieldKind::Flag, ge: None, le: None },
    FieldSpec { name: "alcohol_consumption", alias: "alcohol consumption", kind: FieldKind::Int, ge: Some(0.0), le: None },
    FieldSpec { name: "exercise_hours_per_week", alias: "exercise hours per week", kind: FieldKind::Float, ge: Some(0.0), le: None },
    FieldSpec { name: "stress_level", alias: "stress level", kind: FieldKind::Int, ge: Some(0.0), le: Some(10.0) },
    FieldSpec { name: "sedentary_hours_per_day", alias: "sedentary hours per day", kind: FieldKind::Float, ge: Some(0.0), le: None },
    FieldSpec { name: "bmi", alias: "bmi", kind: FieldKind::Float, ge: Some(10.0), le: None },
    FieldSpec { name: "physical_activity_days_per_week", alias: "physical activity days per week", kind: FieldKind::Int, ge: Some(0.0), le: None },
    FieldSpec { name: "sleep_hours_per_day", alias: "sleep hours per day", kind: FieldKind::Float, ge: Some(0.0), le: None },
    FieldSpec { name: "troponin", alias: "troponin", kind: FieldKind::Float, ge: Some(0.0), le: None },
    FieldSpec { name: "gender", alias: "gender", kind: FieldKind::Flag, ge: None, le: None },
    FieldSpec { name: "systolic_blood_pressure", alias: "systolic blood pressure", kind: FieldKind::Int, ge: Some(0.0), le: None },
];

/// Resolve an external key (internal name or display alias) to its position
/// in the schema table. Unknown keys are ignored by validation.
fn field_index(key: &str) -> Option<usize> {
    FIELD_SPECS.iter().position(|spec| spec.name == key || spec.alias == key)
}

fn fmt_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

impl FieldSpec {
    fn fail(&self, message: impl Into<String>) -> ValidationError {
        ValidationError { field: self.alias, message: message.into() }
    }

    /// Type-check a coerced value against this field and apply its bounds.
    /// Integer fields accept integral floats; flag fields accept only 0/1.
    fn check(&self, value: &Coerced) -> Result<f64, ValidationError> {
        let num = match (self.kind, value) {
            (FieldKind::Flag, Coerced::Int(i)) if *i == 0 || *i == 1 => *i as f64,
            (FieldKind::Flag, Coerced::Float(f)) if *f == 0.0 || *f == 1.0 => *f,
            (FieldKind::Flag, _) => return Err(self.fail("must be 0 or 1")),
            (_, Coerced::Text(_)) => return Err(self.fail("must be a number")),
            (FieldKind::Int, Coerced::Int(i)) => *i as f64,
            (FieldKind::Int, Coerced::Float(f)) if f.fract() == 0.0 => *f,
            (FieldKind::Int, Coerced::Float(_)) => return Err(self.fail("must be an integer")),
            (FieldKind::Float, Coerced::Int(i)) => *i as f64,
            (FieldKind::Float, Coerced::Float(f)) => *f,
        };
        if num.is_nan() {
            return Err(self.fail("must be a number"));
        }
        match (self.ge, self.le) {
            (Some(lo), Some(hi)) if num < lo || num > hi => {
                Err(self.fail(format!("must be between {} and {}", fmt_bound(lo), fmt_bound(hi))))
            }
            (Some(lo), None) if num < lo => {
                Err(self.fail(format!("must be greater than or equal to {}", fmt_bound(lo))))
            }
            (None, Some(hi)) if num > hi => {
                Err(self.fail(format!("must be less than or equal to {}", fmt_bound(hi))))
            }
            _ => Ok(num),
        }
    }
}

/// A fully validated patient record. Immutable; constructed once per request
/// and consumed by the model adapter. Serialized keys are the external
/// display labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    pub age: u32,
    pub cholesterol: f64,
    #[serde(rename = "heart rate")]
    pub heart_rate: u32,
    pub diabetes: u8,
    pub smoking: u8,
    pub obesity: u8,
    #[serde(rename = "alcohol consumption")]
    pub alcohol_consumption: u32,
    #[serde(rename = "exercise hours per week")]
    pub exercise_hours_per_week: f64,
    #[serde(rename = "stress level")]
    pub stress_level: u8,
    #[serde(rename = "sedentary hours per day")]
    pub sedentary_hours_per_day: f64,
    pub bmi: f64,
    #[serde(rename = "physical activity days per week")]
    pub physical_activity_days_per_week: u32,
    #[serde(rename = "sleep hours per day")]
    pub sleep_hours_per_day: f64,
    pub troponin: f64,
    pub gender: u8,
    #[serde(rename = "systolic blood pressure")]
    pub systolic_blood_pressure: u32,
}

impl PatientRecord {
    /// Validate a raw mapping into a typed record.
    ///
    /// Keys may use either the internal identifier or the display alias.
    /// Fields are checked in declaration order and the first violation is
    /// returned; a missing field counts as a violation of that field.
    /// Validation is all-or-nothing, there is no partially-valid record.
    pub fn validate(raw: &HashMap<String, RawValue>) -> Result<Self, ValidationError> {
        let mut values: [Option<Coerced>; FIELD_SPECS.len()] = std::array::from_fn(|_| None);
        for (key, value) in raw {
            if let Some(idx) = field_index(key) {
                values[idx] = Some(value.coerce());
            }
        }

        let mut typed = [0f64; FIELD_SPECS.len()];
        for (idx, spec) in FIELD_SPECS.iter().enumerate() {
            match &values[idx] {
                Some(value) => typed[idx] = spec.check(value)?,
                None => return Err(spec.fail("field is required")),
            }
        }

        // Bounds checked above make the narrowing casts lossless.
        Ok(PatientRecord {
            age: typed[0] as u32,
            cholesterol: typed[1],
            heart_rate: typed[2] as u32,
            diabetes: typed[3] as u8,
            smoking: typed[4] as u8,
            obesity: typed[5] as u8,
            alcohol_consumption: typed[6] as u32,
            exercise_hours_per_week: typed[7],
            stress_level: typed[8] as u8,
            sedentary_hours_per_day: typed[9],
            bmi: typed[10],
            physical_activity_days_per_week: typed[11] as u32,
            sleep_hours_per_day: typed[12],
            troponin: typed[13],
            gender: typed[14] as u8,
            systolic_blood_pressure: typed[15] as u32,
        })
    }

    /// Dump all 16 fields keyed by display alias, for downstream feature
    /// selection and serialization.
    pub fn to_feature_map(&self) -> HashMap<&'static str, f64> {
        HashMap::from([
            ("age", f64::from(self.age)),
            ("cholesterol", self.cholesterol),
            ("heart rate", f64::from(self.heart_rate)),
            ("diabetes", f64::from(self.diabetes)),
            ("smoking", f64::from(self.smoking)),
            ("obesity", f64::from(self.obesity)),
            ("alcohol consumption", f64::from(self.alcohol_consumption)),
            ("exercise hours per week", self.exercise_hours_per_week),
            ("stress level", f64::from(self.stress_level)),
            ("sedentary hours per day", self.sedentary_hours_per_day),
            ("bmi", self.bmi),
            ("physical activity days per week", f64::from(self.physical_activity_days_per_week)),
            ("sleep hours per day", self.sleep_hours_per_day),
            ("troponin", self.troponin),
            ("gender", f64::from(self.gender)),
            ("systolic blood pressure", f64::from(self.systolic_blood_pressure)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    /// A known-good form submission (all values strings, internal names).
    fn valid_raw() -> HashMap<String, RawValue> {
        [
            ("age", "45"),
            ("cholesterol", "200"),
            ("heart_rate", "80"),
            ("diabetes", "0"),
            ("smoking", "1"),
            ("obesity", "0"),
            ("alcohol_consumption", "2"),
            ("exercise_hours_per_week", "3.5"),
            ("stress_level", "6"),
            ("sedentary_hours_per_day", "8"),
            ("bmi", "27.5"),
            ("physical_activity_days_per_week", "3"),
            ("sleep_hours_per_day", "7"),
            ("troponin", "0.01"),
            ("gender", "1"),
            ("systolic_blood_pressure", "130"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), text(v)))
        .collect()
    }

    #[test]
    fn coercion_decimal_comma() {
        assert_eq!(text("72,5").coerce(), Coerced::Float(72.5));
    }

    #[test]
    fn coercion_whole_number_becomes_integer() {
        assert_eq!(text(" 10 ").coerce(), Coerced::Int(10));
        assert_eq!(text("45.0").coerce(), Coerced::Int(45));
    }

    #[test]
    fn coercion_non_numeric_stays_text() {
        assert_eq!(text(" abc ").coerce(), Coerced::Text("abc".to_string()));
    }

    #[test]
    fn valid_form_submission_parses() {
        let record = PatientRecord::validate(&valid_raw()).expect("record should validate");
        assert_eq!(record.age, 45);
        assert_eq!(record.heart_rate, 80);
        assert_eq!(record.smoking, 1);
        assert!((record.exercise_hours_per_week - 3.5).abs() < f64::EPSILON);
        assert!((record.troponin - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn display_aliases_resolve_to_same_fields() {
        let mut raw = valid_raw();
        let hr = raw.remove("heart_rate").unwrap();
        let sbp = raw.remove("systolic_blood_pressure").unwrap();
        raw.insert("heart rate".to_string(), hr);
        raw.insert("systolic blood pressure".to_string(), sbp);

        let by_alias = PatientRecord::validate(&raw).expect("aliased keys should validate");
        let by_name = PatientRecord::validate(&valid_raw()).unwrap();
        assert_eq!(by_alias, by_name);
    }

    #[test]
    fn numeric_json_values_accepted() {
        let mut raw = valid_raw();
        raw.insert("age".to_string(), RawValue::Int(45));
        raw.insert("bmi".to_string(), RawValue::Float(27.5));
        // Integral float for an integer field is fine
        raw.insert("heart_rate".to_string(), RawValue::Float(80.0));
        let record = PatientRecord::validate(&raw).unwrap();
        assert_eq!(record.heart_rate, 80);
    }

    #[test]
    fn fractional_value_rejected_for_integer_field() {
        let mut raw = valid_raw();
        raw.insert("age".to_string(), RawValue::Float(45.5));
        let err = PatientRecord::validate(&raw).unwrap_err();
        assert_eq!(err.field, "age");
        assert_eq!(err.message, "must be an integer");
    }

    #[test]
    fn non_numeric_string_fails_numeric_field() {
        let mut raw = valid_raw();
        raw.insert("cholesterol".to_string(), text("abc"));
        let err = PatientRecord::validate(&raw).unwrap_err();
        assert_eq!(err.field, "cholesterol");
        assert_eq!(err.message, "must be a number");
    }

    #[test]
    fn missing_field_is_a_violation_of_that_field() {
        let mut raw = valid_raw();
        raw.remove("troponin");
        let err = PatientRecord::validate(&raw).unwrap_err();
        assert_eq!(err.field, "troponin");
        assert_eq!(err.message, "field is required");
    }

    #[test]
    fn first_failing_field_wins() {
        let mut raw = valid_raw();
        // Two violations; age is declared before heart_rate.
        raw.insert("age".to_string(), text("-1"));
        raw.insert("heart_rate".to_string(), text("300"));
        let err = PatientRecord::validate(&raw).unwrap_err();
        assert_eq!(err.field, "age");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut raw = valid_raw();
        raw.insert("shoe_size".to_string(), text("44"));
        assert!(PatientRecord::validate(&raw).is_ok());
    }

    #[test_case("age", "0", true ; "age at lower bound")]
    #[test_case("age", "-1", false ; "age below lower bound")]
    #[test_case("heart_rate", "40", true ; "heart rate at minimum")]
    #[test_case("heart_rate", "39", false ; "heart rate below minimum")]
    #[test_case("heart_rate", "120", true ; "heart rate at maximum")]
    #[test_case("heart_rate", "130", false ; "heart rate above maximum")]
    #[test_case("stress_level", "0", true ; "stress level at minimum")]
    #[test_case("stress_level", "10", true ; "stress level at maximum")]
    #[test_case("stress_level", "11", false ; "stress level above maximum")]
    #[test_case("bmi", "10", true ; "bmi at lower bound")]
    #[test_case("bmi", "9.999", false ; "bmi just below lower bound")]
    #[test_case("troponin", "0", true ; "troponin at lower bound")]
    #[test_case("troponin", "-0.001", false ; "troponin below lower bound")]
    #[test_case("exercise_hours_per_week", "0", true ; "exercise at lower bound")]
    #[test_case("exercise_hours_per_week", "-0.5", false ; "exercise below lower bound")]
    #[test_case("systolic_blood_pressure", "0", true ; "systolic at lower bound")]
    #[test_case("systolic_blood_pressure", "-1", false ; "systolic below lower bound")]
    fn bound_checks(field: &str, value: &str, ok: bool) {
        let mut raw = valid_raw();
        raw.insert(field.to_string(), text(value));
        let result = PatientRecord::validate(&raw);
        assert_eq!(result.is_ok(), ok, "{field}={value}: {result:?}");
        if !ok {
            let err = result.unwrap_err();
            assert_eq!(field_index(err.field), field_index(field));
        }
    }

    #[test_case("diabetes" ; "diabetes flag")]
    #[test_case("smoking" ; "smoking flag")]
    #[test_case("obesity" ; "obesity flag")]
    #[test_case("gender" ; "gender flag")]
    fn flag_fields_accept_only_zero_or_one(field: &str) {
        for good in ["0", "1"] {
            let mut raw = valid_raw();
            raw.insert(field.to_string(), text(good));
            assert!(PatientRecord::validate(&raw).is_ok(), "{field}={good}");
        }
        for bad in ["2", "-1", "0.5", "yes"] {
            let mut raw = valid_raw();
            raw.insert(field.to_string(), text(bad));
            let err = PatientRecord::validate(&raw).unwrap_err();
            assert_eq!(err.message, "must be 0 or 1", "{field}={bad}");
        }
    }

    #[test]
    fn range_violation_message_names_both_bounds() {
        let mut raw = valid_raw();
        raw.insert("heart_rate".to_string(), text("130"));
        let err = PatientRecord::validate(&raw).unwrap_err();
        assert_eq!(err.field, "heart rate");
        assert_eq!(err.message, "must be between 40 and 120");
    }

    #[test]
    fn feature_map_uses_display_aliases() {
        let record = PatientRecord::validate(&valid_raw()).unwrap();
        let map = record.to_feature_map();
        assert_eq!(map.len(), 16);
        assert_eq!(map["heart rate"], 80.0);
        assert_eq!(map["obesity"], 0.0);
        assert_eq!(map["systolic blood pressure"], 130.0);
    }
}
