use crate::error::{AnalysisError, Result};
use crate::models::PromptTemplate;

const TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        label: "neurology-MRI",
        instruction_text: include_str!("neurology_mri.md"),
    },
    PromptTemplate {
        label: "dentistry",
        instruction_text: include_str!("dentistry.md"),
    },
    PromptTemplate {
        label: "plant-pathology",
        instruction_text: include_str!("plant_pathology.md"),
    },
];

/// Exact-match lookup. Unknown labels are a configuration error; there is no fallback
/// template.
pub fn lookup(label: &str) -> Result<&'static PromptTemplate> {
    TEMPLATES
        .iter()
        .find(|template| template.label == label)
        .ok_or_else(|| {
            AnalysisError::Configuration(format!(
                "Prompt template '{}' not found. Available: {}",
                label,
                labels().collect::<Vec<_>>().join(", ")
            ))
        })
}

pub fn labels() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|template| template.label)
}

pub fn list_prompt_templates() -> &'static [PromptTemplate] {
    TEMPLATES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_resolve() {
        let mri = lookup("neurology-MRI").unwrap();
        assert!(mri.instruction_text.contains("MRI Analysis for Neurologist"));

        let dentistry = lookup("dentistry").unwrap();
        assert!(dentistry.instruction_text.starts_with("As a highly skilled dentist"));

        assert!(lookup("plant-pathology").is_ok());
    }

    #[test]
    fn unknown_label_is_configuration_error() {
        match lookup("cardiology") {
            Err(AnalysisError::Configuration(message)) => {
                assert!(message.contains("cardiology"));
                assert!(message.contains("neurology-MRI"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("neurology-mri").is_err());
        assert!(lookup(" dentistry").is_err());
    }

    #[test]
    fn every_template_has_unique_label_and_text() {
        let all = list_prompt_templates();
        assert_eq!(
            labels().collect::<Vec<_>>(),
            vec!["neurology-MRI", "dentistry", "plant-pathology"]
        );
        for template in all {
            assert!(!template.instruction_text.trim().is_empty());
            assert_eq!(all.iter().filter(|t| t.label == template.label).count(), 1);
        }
    }
}
