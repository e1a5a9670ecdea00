//! Maps a `ResumeRecord` to an ordered list of layout blocks.
//!
//! Section order is fixed: name/title header, summary, work experience,
//! projects, technical skills, education. A section is emitted only when its
//! field is non-empty.

use crate::models::resume::ResumeRecord;

pub const SUMMARY_HEADING: &str = "Career Highlights";
pub const EXPERIENCE_HEADING: &str = "Work Experience";
pub const PROJECTS_HEADING: &str = "Projects";
pub const SKILLS_HEADING: &str = "Technical Skills";
pub const EDUCATION_HEADING: &str = "Education";

/// One typeset unit. Styling is decided by the PDF writer per variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Name(String),
    Title(String),
    SectionHeading(&'static str),
    Body(String),
    /// Body-size line in bold, used for project names.
    Strong(String),
    /// Experience header: "title – company (start – end)".
    EntryHeader(String),
    Bullet(String),
    /// Vertical gap in points.
    Spacer(f32),
}

pub fn build_blocks(record: &ResumeRecord) -> Vec<Block> {
    let mut blocks = vec![Block::Name(record.full_name.trim().to_string())];
    if has_text(&record.title) {
        blocks.push(Block::Title(record.title.trim().to_string()));
    }
    blocks.push(Block::Spacer(12.0));

    if has_text(&record.summary) {
        blocks.push(Block::SectionHeading(SUMMARY_HEADING));
        blocks.push(Block::Body(record.summary.trim().to_string()));
        blocks.push(Block::Spacer(12.0));
    }

    if !record.experience.is_empty() {
        blocks.push(Block::SectionHeading(EXPERIENCE_HEADING));
        for exp in &record.experience {
            blocks.push(Block::EntryHeader(format!(
                "{} – {} ({} – {})",
                exp.title, exp.company, exp.start_year, exp.end_year
            )));
            push_bullets(&mut blocks, &exp.description);
            blocks.push(Block::Spacer(6.0));
        }
    }

    if !record.projects.is_empty() {
        blocks.push(Block::SectionHeading(PROJECTS_HEADING));
        for project in &record.projects {
            blocks.push(Block::Strong(project.project_name.clone()));
            push_bullets(&mut blocks, &project.description);
            blocks.push(Block::Spacer(6.0));
        }
    }

    if !record.technical_skills.is_empty() {
        blocks.push(Block::SectionHeading(SKILLS_HEADING));
        blocks.push(Block::Body(record.technical_skills.join(", ")));
        blocks.push(Block::Spacer(12.0));
    }

    if !record.education.is_empty() {
        blocks.push(Block::SectionHeading(EDUCATION_HEADING));
        for edu in &record.education {
            blocks.push(Block::Body(format!("{} – {}", edu.degree, edu.institution)));
        }
    }

    blocks
}

fn push_bullets(blocks: &mut Vec<Block>, lines: &[String]) {
    blocks.extend(
        lines
            .iter()
            .filter(|line| has_text(line))
            .map(|line| Block::Bullet(line.trim().to_string())),
    );
}

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}
