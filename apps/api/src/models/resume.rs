use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured résumé as produced by the parser and edited by the client.
///
/// Every field is optional; absent values default to empty. The typed view is
/// only used for rendering. The parse endpoint hands the raw JSON object back
/// to the client untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    #[serde(deserialize_with = "text")]
    pub full_name: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub phone: String,
    #[serde(deserialize_with = "text")]
    pub location: String,
    #[serde(deserialize_with = "text")]
    pub summary: String,
    #[serde(deserialize_with = "text")]
    pub linkedin: String,
    pub portfolio: Vec<PortfolioLink>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "text_list")]
    pub technical_skills: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "text_list")]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioLink {
    #[serde(deserialize_with = "text")]
    pub platform: String,
    #[serde(deserialize_with = "text")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "text")]
    pub degree: String,
    #[serde(deserialize_with = "text")]
    pub institution: String,
    #[serde(deserialize_with = "text")]
    pub start_year: String,
    #[serde(deserialize_with = "text")]
    pub end_year: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(deserialize_with = "text")]
    pub company: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub start_year: String,
    #[serde(deserialize_with = "text")]
    pub end_year: String,
    #[serde(deserialize_with = "lines_or_list")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "text")]
    pub project_name: String,
    #[serde(deserialize_with = "text")]
    pub start_year: String,
    #[serde(deserialize_with = "text")]
    pub end_year: String,
    #[serde(deserialize_with = "lines_or_list")]
    pub description: Vec<String>,
}

impl ResumeRecord {
    /// Typed view of a parsed JSON object. `null` members are treated as absent
    /// and numbers or bools in text fields are read as their display form.
    /// Fails when a present field has the wrong JSON shape
    /// (e.g. `"experience": "ten years"`).
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let mut value = value.clone();
        strip_nulls(&mut value);
        Self::deserialize(&value)
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// A JSON scalar read as text. Models often emit years and phone numbers as
/// numbers even when the schema asks for strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(items.into_iter().map(String::from).collect())
}

/// Accepts either `["line", ...]` or a single string split into non-empty lines.
/// Older prompts asked for a plain string description; newer ones ask for a list.
fn lines_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<Scalar>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        OneOrMany::Many(lines) => lines.into_iter().map(String::from).collect(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Schema conformance (advisory only)
// ────────────────────────────────────────────────────────────────────────────

const STRING_FIELDS: [&str; 7] = [
    "full_name",
    "title",
    "email",
    "phone",
    "location",
    "summary",
    "linkedin",
];

const LIST_FIELDS: [&str; 7] = [
    "portfolio",
    "education",
    "experience",
    "projects",
    "technical_skills",
    "certifications",
    "languages",
];

/// Lists top-level schema deviations in a parsed object. Never used to reject
/// a record: the model's output is accepted as-is and these are only logged.
pub fn conformance_warnings(value: &Value) -> Vec<String> {
    let Some(object) = value.as_object() else {
        return vec!["record is not a JSON object".to_string()];
    };

    let mut warnings = Vec::new();
    for field in STRING_FIELDS {
        match object.get(field) {
            None => warnings.push(format!("missing field '{field}'")),
            Some(Value::String(_)) | Some(Value::Null) => {}
            Some(_) => warnings.push(format!("field '{field}' should be a string")),
        }
    }
    for field in LIST_FIELDS {
        match object.get(field) {
            None => warnings.push(format!("missing field '{field}'")),
            Some(Value::Array(_)) | Some(Value::Null) => {}
            Some(_) => warnings.push(format!("field '{field}' should be a list")),
        }
    }
    warnings
}
