use serde::{Deserialize, Serialize};

use crate::{CalcError, CalendarDate, DateError, RecurrenceRule, RuleError, calc, prelude::*};

/// Which input date failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DateRole {
    #[display(fmt = "date")]
    Base,
    #[display(fmt = "now")]
    Reference,
}

/// Error type for the text-level entry point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A date text is not 8 digits or names no real calendar date.
    #[error("Invalid {role}: {source}")]
    InvalidDateFormat { role: DateRole, source: DateError },

    /// Wrong token count or kind letter.
    #[error(transparent)]
    InvalidRuleFormat(RuleError),

    /// A rule value is out of its range.
    #[error(transparent)]
    InvalidRuleParameter(RuleError),

    /// No occurrence exists that can be represented.
    #[error(transparent)]
    Unsatisfiable(CalcError),

    /// Engine defect: a result was not after the reference date.
    #[error(transparent)]
    OrderingViolation(CalcError),
}

impl EngineError {
    /// True for errors caused by caller input, false for engine faults.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateFormat { .. } | Self::InvalidRuleFormat(_) | Self::InvalidRuleParameter(_)
        )
    }
}

impl From<RuleError> for EngineError {
    fn from(err: RuleError) -> Self {
        if err.is_shape() {
            Self::InvalidRuleFormat(err)
        } else {
            Self::InvalidRuleParameter(err)
        }
    }
}

impl From<CalcError> for EngineError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::OrderingViolation { .. } => Self::OrderingViolation(err),
            CalcError::InvalidDate(_) | CalcError::Unsatisfiable { .. } => Self::Unsatisfiable(err),
        }
    }
}

/// One next-occurrence computation: the base date a rule counts from, the
/// reference date the result must follow, and the rule.
///
/// Serializes with the field names the task service uses (`date`, `now`, `repeat`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecurrenceRequest {
    #[serde(rename = "date")]
    pub base:      CalendarDate,
    #[serde(rename = "now")]
    pub reference: CalendarDate,
    #[serde(rename = "repeat")]
    pub rule:      RecurrenceRule,
}

impl RecurrenceRequest {
    pub const fn new(base: CalendarDate, reference: CalendarDate, rule: RecurrenceRule) -> Self {
        Self {
            base,
            reference,
            rule,
        }
    }

    /// Parses the three text inputs, dates first.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDateFormat` for a bad date and
    /// `InvalidRuleFormat`/`InvalidRuleParameter` for a bad rule.
    pub fn parse(base_text: &str, reference_text: &str, rule_text: &str) -> Result<Self, EngineError> {
        let base = parse_date(base_text, DateRole::Base)?;
        let reference = parse_date(reference_text, DateRole::Reference)?;
        let rule = rule_text.parse::<RecurrenceRule>()?;
        Ok(Self::new(base, reference, rule))
    }

    /// # Errors
    /// See [`calc::next`].
    pub fn next(&self) -> Result<CalendarDate, CalcError> {
        calc::next(self.base, self.reference, &self.rule)
    }
}

pub(crate) fn parse_date(text: &str, role: DateRole) -> Result<CalendarDate, EngineError> {
    text.parse()
        .map_err(|source| EngineError::InvalidDateFormat { role, source })
}

/// Next occurrence of `rule_text` counted from `base_date_text` and strictly
/// after `reference_date_text`. All dates are `YYYYMMDD` text.
///
/// # Errors
/// Returns the `EngineError` for the first input that fails, or the
/// calculation error mapped to its kind.
pub fn next_occurrence(
    base_date_text: &str,
    reference_date_text: &str,
    rule_text: &str,
) -> Result<String, EngineError> {
    let request = RecurrenceRequest::parse(base_date_text, reference_date_text, rule_text)?;
    Ok(request.next()?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleField;

    #[test]
    fn test_scenarios() {
        struct TestCase {
            base:      &'static str,
            reference: &'static str,
            repeat:    &'static str,
            expected:  &'static str,
        }

        let cases = [
            TestCase { base: "20240101", reference: "20240101", repeat: "d 3", expected: "20240104" },
            TestCase { base: "20240101", reference: "20240110", repeat: "d 3", expected: "20240113" },
            TestCase { base: "20240101", reference: "20240101", repeat: "w 1,3", expected: "20240103" },
            TestCase { base: "20240115", reference: "20240101", repeat: "m -1", expected: "20240131" },
            TestCase { base: "20240201", reference: "20240201", repeat: "m -1", expected: "20240229" },
            TestCase { base: "20230201", reference: "20230201", repeat: "m -1", expected: "20230228" },
        ];

        for case in &cases {
            assert_eq!(
                next_occurrence(case.base, case.reference, case.repeat).unwrap(),
                case.expected,
                "base={} reference={} repeat={:?}",
                case.base,
                case.reference,
                case.repeat
            );
        }
    }

    /// Vectors from the task service's acceptance checks, all with now = 20240126.
    #[test]
    fn test_service_vectors() {
        let now = "20240126";
        let cases: [(&str, &str, Option<&str>); 36] = [
            ("20240126", "", None),
            ("20240126", "k 34", None),
            ("20240126", "ooo", None),
            ("15000156", "y", None),
            ("ooopp", "y", None),
            ("16890220", "y", Some("20240220")),
            ("20250701", "y", Some("20260701")),
            ("20240101", "y", Some("20250101")),
            ("20231231", "y", Some("20241231")),
            ("20240229", "y", Some("20250228")),
            ("20240301", "y", Some("20250301")),
            ("20240113", "d", None),
            ("20240113", "d 7", Some("20240127")),
            ("20240120", "d 20", Some("20240209")),
            ("20240202", "d 30", Some("20240303")),
            ("20240320", "d 401", None),
            ("20231225", "d 12", Some("20240130")),
            ("20240228", "d 1", Some("20240229")),
            ("20231106", "m 13", Some("20240213")),
            ("20240120", "m 40,11,19", None),
            ("20240116", "m 16,5", Some("20240205")),
            ("20240126", "m 25,26,7", Some("20240207")),
            ("20240409", "m 31", Some("20240531")),
            ("20240329", "m 10,17 12,8,1", Some("20240810")),
            ("20230311", "m 07,19 05,6", Some("20240507")),
            ("20230311", "m 1 1,2", Some("20240201")),
            ("20240127", "m -1", Some("20240131")),
            ("20240222", "m -2", Some("20240228")),
            ("20240222", "m -2,-3", None),
            ("20240326", "m -1,-2", Some("20240330")),
            ("20240201", "m -1,18", Some("20240218")),
            ("20240125", "w 1,2,3", Some("20240129")),
            ("20240126", "w 7", Some("20240128")),
            ("20230126", "w 4,5", Some("20240201")),
            ("20230226", "w 8,4,5", None),
            ("20240101", "w", None),
        ];

        for (date, repeat, expected) in cases {
            let result = next_occurrence(date, now, repeat);
            match expected {
                Some(want) => assert_eq!(
                    result.as_deref(),
                    Ok(want),
                    "date={date} repeat={repeat:?}"
                ),
                None => {
                    let Err(err) = result else {
                        panic!("date={date} repeat={repeat:?} should fail");
                    };
                    assert!(err.is_client_error(), "{err}");
                },
            }
        }
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            next_occurrence("2024010", "20240101", "d 1"),
            Err(EngineError::InvalidDateFormat {
                role: DateRole::Base,
                ..
            })
        ));
        assert!(matches!(
            next_occurrence("20240101", "20240230", "d 1"),
            Err(EngineError::InvalidDateFormat {
                role: DateRole::Reference,
                source: DateError::InvalidDay { .. },
            })
        ));
        assert!(matches!(
            next_occurrence("20240101", "20240101", "x 1"),
            Err(EngineError::InvalidRuleFormat(_))
        ));
        assert!(matches!(
            next_occurrence("20240101", "20240101", "d 500"),
            Err(EngineError::InvalidRuleParameter(RuleError::InvalidFormat {
                field: RuleField::Interval,
                ..
            }))
        ));
        assert!(matches!(
            next_occurrence("20240101", "20240101", "w 0"),
            Err(EngineError::InvalidRuleParameter(_))
        ));
        assert!(matches!(
            next_occurrence("20240101", "20240101", "m 1 13"),
            Err(EngineError::InvalidRuleParameter(_))
        ));
    }

    #[test]
    fn test_server_side_faults() {
        let err = next_occurrence("20240101", "20240101", "m 31 2").unwrap_err();
        assert!(matches!(err, EngineError::Unsatisfiable(CalcError::Unsatisfiable { .. })));
        assert!(!err.is_client_error());

        let err = next_occurrence("99990101", "99991231", "y").unwrap_err();
        assert!(matches!(err, EngineError::Unsatisfiable(CalcError::InvalidDate(_))));

        let fault = CalcError::OrderingViolation {
            candidate: "20240101".parse().unwrap(),
            reference: "20240101".parse().unwrap(),
        };
        let err = EngineError::from(fault);
        assert!(matches!(err, EngineError::OrderingViolation(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_messages() {
        let err = next_occurrence("2024-01-01", "20240101", "y").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid date: Invalid date format: "2024-01-01" (expected YYYYMMDD)"#
        );
        let err = next_occurrence("20240101", "20240101", "").unwrap_err();
        assert_eq!(err.to_string(), "Invalid repeat rule shape: ``");
    }

    #[test]
    fn test_request_serde() {
        let json = r#"{"date":"20240101","now":"20240110","repeat":"d 3"}"#;
        let request: RecurrenceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.base.to_string(), "20240101");
        assert_eq!(request.rule.to_string(), "d 3");
        assert_eq!(request.next().unwrap().to_string(), "20240113");
        assert_eq!(serde_json::to_string(&request).unwrap(), json);

        let bad = r#"{"date":"20240101","now":"20240110","repeat":"d 0"}"#;
        assert!(serde_json::from_str::<RecurrenceRequest>(bad).is_err());
    }

    #[test]
    fn test_request_parse_matches_facade() {
        let request = RecurrenceRequest::parse("20240201", "20240201", "m -1").unwrap();
        assert_eq!(
            request.next().unwrap().to_string(),
            next_occurrence("20240201", "20240201", "m -1").unwrap()
        );
    }
}
