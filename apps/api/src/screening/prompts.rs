// All LLM prompt constants for the screening module.
// System prompts come from llm_client::prompts.

use crate::screening::report::JobContext;

/// Match-report prompt template.
/// Replace: `{skill_weighting}`, `{weighting_clause}`, `{resume_text}`,
/// `{job_description}`.
///
/// The JSON shape at the end is a wire contract with the model — the
/// response parser depends on these exact field names.
const MATCH_PROMPT_TEMPLATE: &str = r#"Act as a skilled ATS (Applicant Tracking System) with a deep understanding of tech fields like software engineering, data science, data analysis, and big data engineering. Evaluate the resume against the given job description. Consider the competitive job market and provide assistance for improving resumes.
{skill_weighting}
Assign the percentage matching based on the job description{weighting_clause}. List missing keywords with high accuracy.

Resume:
{resume_text}

Job Description:
{job_description}

The response must be one single JSON object with exactly this structure:
{
    "JD Match": "%",
    "MissingKeywords": [],
    "Profile Summary": ""
}"#;

/// Renders the match-report prompt. Pure and total — always produces a
/// prompt, regardless of input content.
///
/// The skill-weighting block (and the "more weightage" clause) appears only
/// when the caller supplied at least one skill list.
pub fn build_match_prompt(resume_text: &str, job: &JobContext) -> String {
    let has_skills = !job.primary_skills.is_empty() || !job.secondary_skills.is_empty();

    let skill_weighting = if has_skills {
        format!(
            "\nPrimary Skills: {}\nSecondary Skills: {}\n",
            job.primary_skills.join(", "),
            job.secondary_skills.join(", ")
        )
    } else {
        String::new()
    };
    let weighting_clause = if has_skills {
        ", with more weightage for primary skills"
    } else {
        ""
    };

    MATCH_PROMPT_TEMPLATE
        .replace("{skill_weighting}", &skill_weighting)
        .replace("{weighting_clause}", weighting_clause)
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", &job.description)
}

/// One optional per-document analysis: a named prompt template over the
/// resume text (and job description where relevant). The result is a
/// free-form string attached to the match report under `name`.
///
/// Adding an analysis means adding a row here — callers select by name.
#[derive(Debug)]
pub struct SecondaryAnalysis {
    pub name: &'static str,
    template: &'static str,
}

impl SecondaryAnalysis {
    pub fn render(&self, resume_text: &str, job: &JobContext) -> String {
        self.template
            .replace("{resume_text}", resume_text)
            .replace("{job_description}", &job.description)
    }
}

pub const SECONDARY_ANALYSES: &[SecondaryAnalysis] = &[
    SecondaryAnalysis {
        name: "experience",
        template: "Estimate the candidate's total years of professional experience from the \
            resume below. State the estimate and the roles it is based on.\n\nResume:\n{resume_text}",
    },
    SecondaryAnalysis {
        name: "job_stability",
        template: "Assess how frequently the candidate below has changed jobs. Note whether the \
            pattern suggests short stints or long tenures.\n\nResume:\n{resume_text}",
    },
    SecondaryAnalysis {
        name: "sentiment",
        template: "Assess the overall tone of the resume below — confident, neutral, or hesitant — \
            and say what drives that impression.\n\nResume:\n{resume_text}",
    },
    SecondaryAnalysis {
        name: "skill_gaps",
        template: "Compare the resume against the job description and name the most important \
            skills the candidate is missing for this role.\n\nResume:\n{resume_text}\n\n\
            Job Description:\n{job_description}",
    },
];

/// Looks up a secondary analysis by name.
pub fn secondary_analysis(name: &str) -> Option<&'static SecondaryAnalysis> {
    SECONDARY_ANALYSES.iter().find(|a| a.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(primary: &[&str], secondary: &[&str]) -> JobContext {
        JobContext {
            description: "Senior Rust engineer, distributed systems.".to_string(),
            primary_skills: primary.iter().map(|s| s.to_string()).collect(),
            secondary_skills: secondary.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_prompt_embeds_resume_and_job_description() {
        let prompt = build_match_prompt("ten years of Rust", &job(&[], &[]));
        assert!(prompt.contains("ten years of Rust"));
        assert!(prompt.contains("Senior Rust engineer, distributed systems."));
    }

    #[test]
    fn test_prompt_carries_the_wire_contract_fields() {
        let prompt = build_match_prompt("resume", &job(&[], &[]));
        assert!(prompt.contains("\"JD Match\": \"%\""));
        assert!(prompt.contains("\"MissingKeywords\": []"));
        assert!(prompt.contains("\"Profile Summary\": \"\""));
    }

    #[test]
    fn test_skill_weighting_omitted_without_skills() {
        let prompt = build_match_prompt("resume", &job(&[], &[]));
        assert!(!prompt.contains("Primary Skills:"));
        assert!(!prompt.contains("weightage for primary skills"));
    }

    #[test]
    fn test_skill_weighting_present_with_skills() {
        let prompt = build_match_prompt("resume", &job(&["Rust", "Tokio"], &["Docker"]));
        assert!(prompt.contains("Primary Skills: Rust, Tokio"));
        assert!(prompt.contains("Secondary Skills: Docker"));
        assert!(prompt.contains("with more weightage for primary skills"));
    }

    #[test]
    fn test_prompt_builder_is_deterministic() {
        let job = job(&["Rust"], &[]);
        assert_eq!(
            build_match_prompt("resume", &job),
            build_match_prompt("resume", &job)
        );
    }

    #[test]
    fn test_secondary_analysis_lookup_and_render() {
        let analysis = secondary_analysis("skill_gaps").unwrap();
        let rendered = analysis.render("resume text", &job(&[], &[]));
        assert!(rendered.contains("resume text"));
        assert!(rendered.contains("Senior Rust engineer"));
        assert!(secondary_analysis("nonsense").is_none());
    }
}
