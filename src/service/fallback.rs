//! Static exercises substituted when generation fails.
//!
//! Each payload satisfies the same structural invariant as generated
//! content (non-empty required array), so callers can render it unchanged.

use serde_json::{Value, json};

use crate::types::{GeneratedContent, GenerationRequest, TrainingType};

/// Build the fallback exercise for a request.
pub fn fallback_content(request: &GenerationRequest) -> GeneratedContent {
    let domain = request.domain().label();
    let level = request.level().label();
    let title = format!("Entraînement {domain} (niveau {level})");

    let body = match request.training_type() {
        TrainingType::Qcm => qcm(title, domain),
        TrainingType::VraiFaux => vrai_faux(title, domain),
        TrainingType::CasPratique => cas_pratique(title, domain),
        TrainingType::QuestionsOuvertes => questions_ouvertes(title, domain),
    };
    GeneratedContent::new(body)
}

fn qcm(title: String, domain: &str) -> Value {
    json!({
        "title": title,
        "questions": [
            {
                "question": format!("Quelle est la source principale des règles applicables en {domain} ?"),
                "options": [
                    "La loi et les règlements",
                    "Les usages locaux",
                    "Les consignes orales de la hiérarchie",
                    "La jurisprudence étrangère"
                ],
                "correctAnswer": 0,
                "explanation": "Les agents de police municipale agissent dans le cadre fixé par la loi et les règlements."
            }
        ]
    })
}

fn vrai_faux(title: String, domain: &str) -> Value {
    json!({
        "title": title,
        "questions": [
            {
                "statement": format!("Un agent de police municipale doit connaître les textes de base en {domain}."),
                "answer": true,
                "explanation": "La maîtrise des textes fondamentaux conditionne la régularité des interventions."
            }
        ]
    })
}

fn cas_pratique(title: String, domain: &str) -> Value {
    json!({
        "title": title,
        "context": format!("Lors d'une patrouille, vous êtes confronté à une situation relevant du {domain}."),
        "steps": [
            {
                "step": 1,
                "question": "Quelles sont vos premières constatations et qui informez-vous ?",
                "expectedAnswer": "Sécuriser les lieux, relever les faits objectivement et rendre compte à l'officier de police judiciaire territorialement compétent.",
                "legalBasis": "Article 21 du code de procédure pénale"
            }
        ]
    })
}

fn questions_ouvertes(title: String, domain: &str) -> Value {
    json!({
        "title": title,
        "questions": [
            {
                "question": format!("Présentez les principes essentiels du {domain} applicables à la police municipale."),
                "modelAnswer": "Une réponse structurée rappelle le cadre légal, les compétences des agents et leurs limites.",
                "keyPoints": ["Cadre légal", "Compétences", "Limites d'intervention"]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, Level};

    #[test]
    fn every_fallback_satisfies_the_content_invariant() {
        for tt in TrainingType::ALL {
            for domain in Domain::ALL {
                let request = GenerationRequest::new(tt, Level::Debutant, domain);
                let content = fallback_content(&request);
                assert!(content.validate(tt).is_ok(), "{tt} / {domain}");
            }
        }
    }

    #[test]
    fn fallback_mentions_domain() {
        let request =
            GenerationRequest::new(TrainingType::Qcm, Level::Avance, Domain::CodeDeLaRoute);
        let content = fallback_content(&request);
        let title = content.as_value()["title"].as_str().unwrap();
        assert!(title.contains("code de la route"));
        assert!(title.contains("avancé"));
    }
}
