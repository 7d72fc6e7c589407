use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CK_VALUE: &str = "ck_value";
pub const TRANSAMINASE: &str = "transaminase";
pub const BILIRUBIN: &str = "bilirubin";
pub const MUSCLE_SYMPTOMS: &str = "muscle_symptoms";

/// One patient observation: CK and transaminase in U/L, bilirubin in mg/dL.
///
/// Every numeric field is finite and non-negative; the only ways to obtain a value are
/// [`ClinicalMeasurement::new`] and [`normalize`], both of which enforce that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClinicalMeasurement {
    ck_value: f64,
    transaminase: f64,
    bilirubin: f64,
    muscle_symptoms: bool,
}

impl ClinicalMeasurement {
    pub fn new(
        ck_value: f64,
        transaminase: f64,
        bilirubin: f64,
        muscle_symptoms: bool,
    ) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        for (field, value) in [
            (CK_VALUE, ck_value),
            (TRANSAMINASE, transaminase),
            (BILIRUBIN, bilirubin),
        ] {
            if let Err(message) = check_range(value) {
                violations.push(FieldViolation::new(field, message));
            }
        }

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(Self {
            ck_value,
            transaminase,
            bilirubin,
            muscle_symptoms,
        })
    }

    pub fn ck_value(&self) -> f64 {
        self.ck_value
    }

    pub fn transaminase(&self) -> f64 {
        self.transaminase
    }

    pub fn bilirubin(&self) -> f64 {
        self.bilirubin
    }

    pub fn muscle_symptoms(&self) -> bool {
        self.muscle_symptoms
    }
}

/// A single rejected request field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field-level problem found in a request, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldViolation>) -> Self {
        Self { errors }
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new("body", message)])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|violation| violation.field.as_str())
    }
}

/// Coerce a raw JSON request into a [`ClinicalMeasurement`].
///
/// Checks all four fields before failing so the caller gets the complete list of violations.
pub fn normalize(raw: &Value) -> Result<ClinicalMeasurement, ValidationError> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationError::body("must be a JSON object"));
    };

    let mut violations = Vec::new();
    let mut number = |field: &'static str| match read_number(object, field) {
        Ok(value) => Some(value),
        Err(message) => {
            violations.push(FieldViolation::new(field, message));
            None
        }
    };

    let ck_value = number(CK_VALUE);
    let transaminase = number(TRANSAMINASE);
    let bilirubin = number(BILIRUBIN);

    let muscle_symptoms = match read_flag(object, MUSCLE_SYMPTOMS) {
        Ok(value) => Some(value),
        Err(message) => {
            violations.push(FieldViolation::new(MUSCLE_SYMPTOMS, message));
            None
        }
    };

    match (ck_value, transaminase, bilirubin, muscle_symptoms) {
        (Some(ck_value), Some(transaminase), Some(bilirubin), Some(muscle_symptoms))
            if violations.is_empty() =>
        {
            Ok(ClinicalMeasurement {
                ck_value,
                transaminase,
                bilirubin,
                muscle_symptoms,
            })
        }
        _ => Err(ValidationError::new(violations)),
    }
}

fn read_number(object: &Map<String, Value>, field: &str) -> Result<f64, &'static str> {
    let value = match object.get(field) {
        None | Some(Value::Null) => return Err("is required"),
        Some(Value::Number(number)) => number.as_f64().ok_or("must be a number")?,
        Some(Value::String(text)) => text.trim().parse::<f64>().map_err(|_| "must be a number")?,
        Some(_) => return Err("must be a number"),
    };

    check_range(value)?;
    Ok(value)
}

fn read_flag(object: &Map<String, Value>, field: &str) -> Result<bool, &'static str> {
    match object.get(field) {
        None | Some(Value::Null) => Err("is required"),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err("must be a boolean"),
        },
        Some(_) => Err("must be a boolean"),
    }
}

fn check_range(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("must be finite");
    }
    if value < 0.0 {
        return Err("must be non-negative");
    }
    Ok(())
}
