//! Training request types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ForgeError;

/// Kind of exercise to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingType {
    /// Multiple-choice quiz
    Qcm,
    /// True/false statements
    VraiFaux,
    /// Step-by-step case study
    CasPratique,
    /// Open questions with model answers
    QuestionsOuvertes,
}

impl TrainingType {
    pub const ALL: [TrainingType; 4] = [
        TrainingType::Qcm,
        TrainingType::VraiFaux,
        TrainingType::CasPratique,
        TrainingType::QuestionsOuvertes,
    ];

    /// Wire name, as used in requests and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingType::Qcm => "qcm",
            TrainingType::VraiFaux => "vrai_faux",
            TrainingType::CasPratique => "cas_pratique",
            TrainingType::QuestionsOuvertes => "questions_ouvertes",
        }
    }

    /// Content field that must be a non-empty array in generated content.
    pub fn required_field(&self) -> &'static str {
        match self {
            TrainingType::CasPratique => "steps",
            TrainingType::Qcm | TrainingType::VraiFaux | TrainingType::QuestionsOuvertes => {
                "questions"
            }
        }
    }
}

/// Difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Debutant,
    Intermediaire,
    Avance,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Debutant, Level::Intermediaire, Level::Avance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debutant => "debutant",
            Level::Intermediaire => "intermediaire",
            Level::Avance => "avance",
        }
    }

    /// Human-readable French label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Debutant => "débutant",
            Level::Intermediaire => "intermédiaire",
            Level::Avance => "avancé",
        }
    }
}

/// Legal or administrative domain covered by an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    DroitAdministratif,
    DroitPenal,
    ProcedurePenale,
    CodeDeLaRoute,
    PouvoirsDePoliceDuMaire,
    LibertesPubliques,
    Deontologie,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::DroitAdministratif,
        Domain::DroitPenal,
        Domain::ProcedurePenale,
        Domain::CodeDeLaRoute,
        Domain::PouvoirsDePoliceDuMaire,
        Domain::LibertesPubliques,
        Domain::Deontologie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::DroitAdministratif => "droit_administratif",
            Domain::DroitPenal => "droit_penal",
            Domain::ProcedurePenale => "procedure_penale",
            Domain::CodeDeLaRoute => "code_de_la_route",
            Domain::PouvoirsDePoliceDuMaire => "pouvoirs_de_police_du_maire",
            Domain::LibertesPubliques => "libertes_publiques",
            Domain::Deontologie => "deontologie",
        }
    }

    /// Human-readable French label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::DroitAdministratif => "droit administratif",
            Domain::DroitPenal => "droit pénal",
            Domain::ProcedurePenale => "procédure pénale",
            Domain::CodeDeLaRoute => "code de la route",
            Domain::PouvoirsDePoliceDuMaire => "pouvoirs de police du maire",
            Domain::LibertesPubliques => "libertés publiques",
            Domain::Deontologie => "déontologie",
        }
    }
}

macro_rules! impl_wire_name {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ForgeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ForgeError::InvalidInput(format!("unknown {}: {s}", $what)))
            }
        }
    };
}

impl_wire_name!(TrainingType, "training type");
impl_wire_name!(Level, "level");
impl_wire_name!(Domain, "domain");

/// A request to generate one exercise.
///
/// Immutable once constructed. The session id is opaque; a random one is
/// assigned when the caller does not provide any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    training_type: TrainingType,
    level: Level,
    domain: Domain,
    session_id: String,
}

impl GenerationRequest {
    pub fn new(training_type: TrainingType, level: Level, domain: Domain) -> Self {
        Self {
            training_type,
            level,
            domain,
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Use the caller's session id instead of a generated one.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn training_type(&self) -> TrainingType {
        self.training_type
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Deterministic cache key. The session id is deliberately not part of it.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.training_type.as_str(),
            self.level.as_str(),
            self.domain.as_str()
        )
    }
}
