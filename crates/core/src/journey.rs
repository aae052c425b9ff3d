//! The 17-step journey: module boundaries and the step↔field mapping.
//!
//! A journey walks three modules in a fixed global sequence:
//! steps 1-5 Brainstorm, 6-10 Choose, 11-17 Objectives. Each step's answer
//! is stored under a stable field name inside its module's JSON column, so
//! the mapping here is part of the wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total number of steps across all three modules.
pub const TOTAL_STEPS: u32 = 17;

/// One of the three guided-journey modules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum JourneyModule {
    Brainstorm,
    Choose,
    Objectives,
}

impl JourneyModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brainstorm => "brainstorm",
            Self::Choose => "choose",
            Self::Objectives => "objectives",
        }
    }

    /// Global step number of the module's first step.
    pub fn first_step(&self) -> u32 {
        match self {
            Self::Brainstorm => 1,
            Self::Choose => 6,
            Self::Objectives => 11,
        }
    }

    /// Number of steps in this module.
    pub fn step_count(&self) -> u32 {
        match self {
            Self::Brainstorm | Self::Choose => 5,
            Self::Objectives => 7,
        }
    }

    /// Field names for this module's steps, in step order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Brainstorm => &[
                "step1_imitate",
                "step2_ideate",
                "step3_ignore",
                "step4_integrate",
                "step5_interfere",
            ],
            Self::Choose => &[
                "step1_scenarios",
                "step2_compare",
                "step3_important",
                "step4_evaluate",
                "step5_support",
            ],
            Self::Objectives => &[
                "step1_objective",
                "step2_delegate",
                "step3_resources",
                "step4_obstacles",
                "step5_milestones",
                "step6_accountability",
                "step7_review",
            ],
        }
    }
}

impl std::fmt::Display for JourneyModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JourneyModule {
    type Err = UnknownJourneyValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brainstorm" => Ok(Self::Brainstorm),
            "choose" => Ok(Self::Choose),
            "objectives" => Ok(Self::Objectives),
            other => Err(UnknownJourneyValue(other.to_string())),
        }
    }
}

/// Error for unrecognized journey modules, steps, or field names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown journey value: {0}")]
pub struct UnknownJourneyValue(pub String);

/// A resolved global step: which module it lives in, its 1-based position
/// within that module, and the JSON field its answer is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub number: u32,
    pub module: JourneyModule,
    pub local_step: u32,
    pub field: &'static str,
}

/// Resolve a global step number (1-17).
pub fn step_info(number: u32) -> Option<StepInfo> {
    let module = match number {
        1..=5 => JourneyModule::Brainstorm,
        6..=10 => JourneyModule::Choose,
        11..=17 => JourneyModule::Objectives,
        _ => return None,
    };
    let local_step = number - module.first_step() + 1;
    let field = module.fields()[(local_step - 1) as usize];
    Some(StepInfo {
        number,
        module,
        local_step,
        field,
    })
}

/// Reverse lookup: global step number for a (module, field) pair.
pub fn step_for_field(module: JourneyModule, field: &str) -> Option<u32> {
    module
        .fields()
        .iter()
        .position(|f| *f == field)
        .map(|idx| module.first_step() + idx as u32)
}

/// The step an objective starts on: 1 with Brainstorm, 11 when jumping
/// straight to the Objectives module.
pub fn initial_step(start_with_brainstorm: bool) -> u32 {
    if start_with_brainstorm {
        JourneyModule::Brainstorm.first_step()
    } else {
        JourneyModule::Objectives.first_step()
    }
}

/// Per-module step answers keyed by field name.
///
/// Partial saves merge field-by-field: absent fields keep their previous
/// value, present fields overwrite. Unknown field names are rejected so a
/// typo never silently grows the JSON column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StepAnswers(pub BTreeMap<String, String>);

impl StepAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Verify every key is a known field of `module`.
    pub fn validate_fields(&self, module: JourneyModule) -> Result<(), UnknownJourneyValue> {
        for key in self.0.keys() {
            if !module.fields().contains(&key.as_str()) {
                return Err(UnknownJourneyValue(format!("{module}.{key}")));
            }
        }
        Ok(())
    }

    /// Merge `incoming` over `self`, field by field.
    pub fn merge(&mut self, incoming: &StepAnswers) {
        for (field, value) in &incoming.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modules_cover_all_seventeen_steps() {
        for n in 1..=TOTAL_STEPS {
            let info = step_info(n).expect("step in range");
            assert_eq!(info.number, n);
            assert_eq!(
                step_for_field(info.module, info.field),
                Some(n),
                "field mapping must round-trip for step {n}"
            );
        }
        assert!(step_info(0).is_none());
        assert!(step_info(18).is_none());
    }

    #[test]
    fn module_boundaries() {
        assert_eq!(step_info(5).unwrap().module, JourneyModule::Brainstorm);
        assert_eq!(step_info(6).unwrap().module, JourneyModule::Choose);
        assert_eq!(step_info(10).unwrap().module, JourneyModule::Choose);
        assert_eq!(step_info(11).unwrap().module, JourneyModule::Objectives);
        assert_eq!(step_info(11).unwrap().field, "step1_objective");
        assert_eq!(step_info(17).unwrap().field, "step7_review");
    }

    #[test]
    fn initial_step_skips_to_objectives() {
        assert_eq!(initial_step(true), 1);
        assert_eq!(initial_step(false), 11);
    }

    #[test]
    fn answers_merge_is_per_field() {
        let mut base = StepAnswers::default();
        base.0.insert("step1_imitate".into(), "copy the leader".into());
        base.0.insert("step2_ideate".into(), "ten ideas".into());

        let mut incoming = StepAnswers::default();
        incoming.0.insert("step2_ideate".into(), "twenty ideas".into());

        base.merge(&incoming);
        assert_eq!(base.get("step1_imitate"), Some("copy the leader"));
        assert_eq!(base.get("step2_ideate"), Some("twenty ideas"));
    }

    #[test]
    fn answers_reject_foreign_fields() {
        let mut answers = StepAnswers::default();
        answers.0.insert("step1_scenarios".into(), "a".into());
        assert!(answers.validate_fields(JourneyModule::Choose).is_ok());
        assert!(answers.validate_fields(JourneyModule::Brainstorm).is_err());
    }
}
