//! Prompt templates per training type.

use crate::types::{GenerationRequest, TrainingType};

/// Instructions for one training type.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    /// Role and task description given to the assistant.
    pub system_prompt: &'static str,
    /// Field that must hold a non-empty array in the answer.
    pub required_field: &'static str,
    /// JSON skeleton the answer must follow.
    pub structure_hint: &'static str,
}

const QCM: PromptTemplate = PromptTemplate {
    system_prompt: "Tu es un formateur expert des concours de la police municipale. \
Génère un questionnaire à choix multiples de 5 questions. Chaque question a exactement \
4 propositions dont une seule est correcte, accompagnée d'une explication citant le texte \
de référence. Varie les thèmes et évite les répétitions.",
    required_field: "questions",
    structure_hint: r#"{"title": "...", "questions": [{"question": "...", "options": ["...", "...", "...", "..."], "correctAnswer": 0, "explanation": "..."}]}"#,
};

const VRAI_FAUX: PromptTemplate = PromptTemplate {
    system_prompt: "Tu es un formateur expert des concours de la police municipale. \
Génère 8 affirmations à classer en vrai ou faux. Mélange affirmations exactes et pièges \
fréquents, et justifie chaque réponse en une ou deux phrases.",
    required_field: "questions",
    structure_hint: r#"{"title": "...", "questions": [{"statement": "...", "answer": true, "explanation": "..."}]}"#,
};

const CAS_PRATIQUE: PromptTemplate = PromptTemplate {
    system_prompt: "Tu es un formateur expert des concours de la police municipale. \
Rédige un cas pratique réaliste d'intervention d'un agent de police municipale, découpé \
en étapes. Chaque étape pose une question au candidat et donne la réponse attendue avec \
les fondements juridiques.",
    required_field: "steps",
    structure_hint: r#"{"title": "...", "context": "...", "steps": [{"step": 1, "question": "...", "expectedAnswer": "...", "legalBasis": "..."}]}"#,
};

const QUESTIONS_OUVERTES: PromptTemplate = PromptTemplate {
    system_prompt: "Tu es un formateur expert des concours de la police municipale. \
Génère 5 questions ouvertes de révision, chacune avec une réponse modèle structurée et \
les points clés attendus par le jury.",
    required_field: "questions",
    structure_hint: r#"{"title": "...", "questions": [{"question": "...", "modelAnswer": "...", "keyPoints": ["..."]}]}"#,
};

/// Template for a training type.
pub fn template_for(training_type: TrainingType) -> &'static PromptTemplate {
    match training_type {
        TrainingType::Qcm => &QCM,
        TrainingType::VraiFaux => &VRAI_FAUX,
        TrainingType::CasPratique => &CAS_PRATIQUE,
        TrainingType::QuestionsOuvertes => &QUESTIONS_OUVERTES,
    }
}

/// Build the single prompt sent to the assistant.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let template = template_for(request.training_type());
    format!(
        "{system}\n\n\
         Niveau du candidat : {level}\n\
         Domaine : {domain}\n\n\
         Réponds uniquement avec un objet JSON valide, sans texte autour, \
         respectant exactement cette structure :\n{hint}\n\
         Le champ \"{field}\" doit contenir au moins un élément.",
        system = template.system_prompt,
        level = request.level().label(),
        domain = request.domain().label(),
        hint = template.structure_hint,
        field = template.required_field,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, Level};

    #[test]
    fn template_field_matches_training_type() {
        for tt in TrainingType::ALL {
            assert_eq!(template_for(tt).required_field, tt.required_field());
            assert!(template_for(tt).structure_hint.contains(tt.required_field()));
        }
    }

    #[test]
    fn prompt_embeds_level_and_domain() {
        let request = GenerationRequest::new(
            TrainingType::CasPratique,
            Level::Intermediaire,
            Domain::ProcedurePenale,
        );
        let prompt = build_prompt(&request);
        assert!(prompt.contains("intermédiaire"));
        assert!(prompt.contains("procédure pénale"));
        assert!(prompt.contains("\"steps\""));
    }
}
