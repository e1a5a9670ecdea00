// Résumé parsing LLM prompt templates.
// All prompts for the parsing module are defined here.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are a professional resume parser. \
Extract fields ONLY into valid JSON. \
Empty string/list if not present. \
Do NOT hallucinate or add explanations.";

/// Example mapping sent to the model. Advisory: the parsed output is never
/// validated against it.
pub const RESUME_SCHEMA: &str = r#"{
  "full_name": "string",
  "title": "string",
  "email": "string",
  "phone": "string",
  "location": "string",
  "summary": "string",
  "linkedin": "string",
  "portfolio": [
    {"platform": "string", "url": "string"}
  ],
  "education": [
    {"degree": "string", "institution": "string", "start_year": "string", "end_year": "string", "description": "string"}
  ],
  "experience": [
    {"company": "string", "title": "string", "start_year": "string", "end_year": "string", "description": ["string"]}
  ],
  "projects": [
    {"project_name": "string", "start_year": "string", "end_year": "string", "description": ["string"]}
  ],
  "technical_skills": ["string"],
  "certifications": ["string"],
  "languages": ["string"]
}"#;

const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following resume text into VALID JSON:

Schema:
{schema}

Resume text:
"""{resume_text}"""

Constraints:
- Return only one valid JSON object, nothing else.
- Use empty strings/lists when fields not found.
- Use YYYY for years if possible."#;

/// Embeds the schema and the extracted résumé text into the user prompt.
pub fn build_user_prompt(resume_text: &str) -> String {
    // Schema first so braces in the résumé text can never be mistaken for the placeholder.
    RESUME_PARSE_PROMPT_TEMPLATE
        .replace("{schema}", RESUME_SCHEMA)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(RESUME_SCHEMA).unwrap();
        assert!(schema.get("experience").unwrap().is_array());
        assert_eq!(schema.as_object().unwrap().len(), 14);
    }

    #[test]
    fn test_prompt_embeds_text_and_schema() {
        let prompt = build_user_prompt("Jane Doe\nRust Engineer");
        assert!(prompt.contains("\"\"\"Jane Doe\nRust Engineer\"\"\""));
        assert!(prompt.contains("\"technical_skills\": [\"string\"]"));
        assert!(!prompt.contains("{schema}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_prompt_text_containing_placeholder_is_left_alone() {
        let prompt = build_user_prompt("literal {schema} token");
        assert!(prompt.contains("literal {schema} token"));
    }
}
