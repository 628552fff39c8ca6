use crate::prompts::list_prompt_templates;

pub fn list_templates() {
    for template in list_prompt_templates() {
        let summary = template
            .instruction_text
            .lines()
            .map(|line| line.trim_matches(|c: char| c == '*' || c == '#' || c.is_whitespace()))
            .find(|line| !line.is_empty())
            .unwrap_or_default();
        println!("{:<16} {}", template.label, summary);
    }
}
