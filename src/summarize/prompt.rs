//! Prompt assembly for template-guided summaries.

use crate::templates::TemplateDoc;

const PREAMBLE: &str =
    "You are a clinical documentation assistant. Use the template sections to summarise the text.";

/// Build the instruction string sent to the runtime.
///
/// The note is embedded verbatim, followed by one `### name` block per
/// template section in declared order.
pub fn build_prompt(text: &str, template: &TemplateDoc) -> String {
    let guidance = template
        .sections()
        .iter()
        .map(|section| format!("### {}\n{}", section.name, section.ai_instruction))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{PREAMBLE}\nInput text:\n{text}\n\nTemplate guidance:\n{guidance}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{TemplateBody, TemplateSection};

    fn template(sections: &[(&str, &str)]) -> TemplateDoc {
        TemplateDoc {
            template: TemplateBody {
                sections: sections
                    .iter()
                    .map(|(name, ai_instruction)| TemplateSection {
                        name: name.to_string(),
                        ai_instruction: ai_instruction.to_string(),
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn prompt_layout_is_stable() {
        let prompt = build_prompt(
            "Patient reports chest pain.",
            &template(&[
                ("Chief Complaint", "Summarize presenting complaint"),
                ("Plan", "List next steps"),
            ]),
        );
        assert_eq!(
            prompt,
            "You are a clinical documentation assistant. Use the template sections to summarise the text.\n\
             Input text:\n\
             Patient reports chest pain.\n\
             \n\
             Template guidance:\n\
             ### Chief Complaint\n\
             Summarize presenting complaint\n\
             ### Plan\n\
             List next steps\n"
        );
    }

    #[test]
    fn text_is_not_altered() {
        let note = "  BP 150/90\n\n\tline with <tags> & \"quotes\"  ";
        let prompt = build_prompt(note, &template(&[]));
        assert!(prompt.contains(note));
        assert!(prompt.ends_with("Template guidance:\n\n"));
    }
}
