use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue as RawJson;
use std::fmt;

use crate::error::{FieldIssue, FieldProblem, ValidationError};

/// Raw client attributes as submitted by the advisor's tooling.
///
/// Every field is optional here; whether a missing value is acceptable is
/// decided by the encoder table (required vs. defaulted). Unknown JSON keys
/// are ignored.
///
/// The French field names used by the first dashboard (`revenu`,
/// `anciennete`, `nb_incidents`, `score_credit`) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClientRecord {
    /// Monthly net income.
    #[serde(default, alias = "revenu", skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,

    /// Outstanding monthly debt repayments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt: Option<f64>,

    /// Years with the current employer.
    #[serde(default, alias = "anciennete", skip_serializing_if = "Option::is_none")]
    pub employment_years: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_history_months: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,

    /// Past payment incidents on record.
    #[serde(default, alias = "nb_incidents", skip_serializing_if = "Option::is_none")]
    pub incident_count: Option<f64>,

    /// Bureau credit score.
    #[serde(default, alias = "score_credit", skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<f64>,

    /// Housing situation, e.g. "owner" or "tenant".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing: Option<String>,
}

/// Attributes a [`ClientRecord`] can carry.
///
/// Encoder tables reference record fields through this enum, so an artifact
/// naming an attribute the crate does not know fails to load instead of
/// silently encoding a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Income,
    Debt,
    EmploymentYears,
    CreditHistoryMonths,
    Age,
    IncidentCount,
    CreditScore,
    Housing,
}

/// Whether an attribute holds a number or a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Numeric,
    Categorical,
}

/// A borrowed attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Income,
        Attribute::Debt,
        Attribute::EmploymentYears,
        Attribute::CreditHistoryMonths,
        Attribute::Age,
        Attribute::IncidentCount,
        Attribute::CreditScore,
        Attribute::Housing,
    ];

    /// Field name used in JSON records and as the feature name.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Income => "income",
            Attribute::Debt => "debt",
            Attribute::EmploymentYears => "employment_years",
            Attribute::CreditHistoryMonths => "credit_history_months",
            Attribute::Age => "age",
            Attribute::IncidentCount => "incident_count",
            Attribute::CreditScore => "credit_score",
            Attribute::Housing => "housing",
        }
    }

    /// Legacy field name still accepted on input.
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Attribute::Income => Some("revenu"),
            Attribute::EmploymentYears => Some("anciennete"),
            Attribute::IncidentCount => Some("nb_incidents"),
            Attribute::CreditScore => Some("score_credit"),
            _ => None,
        }
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::Housing => AttributeKind::Categorical,
            _ => AttributeKind::Numeric,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ClientRecord {
    /// Look up an attribute's value, if the record carries one.
    pub fn value(&self, attribute: Attribute) -> Option<RawValue<'_>> {
        let numeric = match attribute {
            Attribute::Income => self.income,
            Attribute::Debt => self.debt,
            Attribute::EmploymentYears => self.employment_years,
            Attribute::CreditHistoryMonths => self.credit_history_months,
            Attribute::Age => self.age,
            Attribute::IncidentCount => self.incident_count,
            Attribute::CreditScore => self.credit_score,
            Attribute::Housing => {
                return self.housing.as_deref().map(RawValue::Categorical);
            }
        };
        numeric.map(RawValue::Numeric)
    }

    /// Decode a record from a JSON object.
    ///
    /// Problems with a value (wrong type, a number no `f64` can hold, the
    /// attribute given under both its name and its alias) are reported on that
    /// attribute, all of them at once. Only input that is not a JSON object at
    /// all is reported on `record`.
    pub fn from_json(input: &str) -> Result<Self, ValidationError> {
        let Entries(entries) = serde_json::from_str(input).map_err(|e| {
            ValidationError::single("record", FieldProblem::Malformed(e.to_string()))
        })?;

        let mut record = ClientRecord::default();
        let mut issues = Vec::new();
        for attribute in Attribute::ALL {
            let given: Vec<&(String, Box<RawJson>)> = entries
                .iter()
                .filter(|(key, _)| key == attribute.name() || Some(key.as_str()) == attribute.alias())
                .collect();

            let problem = match given.as_slice() {
                [] => continue,
                [(_, raw)] => record.set(attribute, raw.get()).err(),
                _ => {
                    let keys: Vec<String> = given.iter().map(|(key, _)| format!("`{}`", key)).collect();
                    Some(FieldProblem::Malformed(format!(
                        "given more than once (as {})",
                        keys.join(", ")
                    )))
                }
            };
            if let Some(problem) = problem {
                issues.push(FieldIssue {
                    field: attribute.name().to_string(),
                    problem,
                });
            }
        }

        if issues.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Store one attribute from its JSON text. `null` leaves it unset.
    fn set(&mut self, attribute: Attribute, raw: &str) -> Result<(), FieldProblem> {
        let slot = match attribute {
            Attribute::Income => &mut self.income,
            Attribute::Debt => &mut self.debt,
            Attribute::EmploymentYears => &mut self.employment_years,
            Attribute::CreditHistoryMonths => &mut self.credit_history_months,
            Attribute::Age => &mut self.age,
            Attribute::IncidentCount => &mut self.incident_count,
            Attribute::CreditScore => &mut self.credit_score,
            Attribute::Housing => {
                self.housing = serde_json::from_str(raw).map_err(|_| {
                    FieldProblem::Malformed(format!("expected a string, got {}", raw))
                })?;
                return Ok(());
            }
        };
        *slot = serde_json::from_str(raw).map_err(|_| {
            if raw.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
                FieldProblem::Malformed(format!("number {} does not fit in a 64-bit float", raw))
            } else {
                FieldProblem::Malformed(format!("expected a number, got {}", raw))
            }
        })?;
        Ok(())
    }
}

/// Top-level keys of a JSON object in document order, values left unparsed.
///
/// Repeated keys are all kept so they can be reported.
struct Entries(Vec<(String, Box<RawJson>)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, Box<RawJson>>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
