// Prompt templates for the analysis pipeline.
// Each template names its placeholders; `fill` substitutes them in one pass.

use crate::session::InterviewRound;

/// An immutable prompt with named `{placeholder}` slots.
#[derive(Debug)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub text: &'static str,
    pub placeholders: &'static [&'static str],
}

impl PromptTemplate {
    /// Replaces every bound `{name}` with its value, left to right.
    ///
    /// Substituted values are copied verbatim and never re-scanned. Braces that
    /// do not enclose a bound name are kept as literal text.
    pub fn fill(&self, values: &[(&str, &str)]) -> String {
        debug_assert!(
            self.placeholders
                .iter()
                .all(|p| values.iter().any(|(key, _)| key == p)),
            "unbound placeholder in '{}'",
            self.name
        );

        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let bound = after.find('}').and_then(|close| {
                let name = &after[..close];
                values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });

            match bound {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

pub const SECTION_BREAKDOWN: PromptTemplate = PromptTemplate {
    name: "section_breakdown",
    placeholders: &["resume"],
    text: r#"
Split this resume into structured sections:

- Education
- Experience
- Projects
- Technical Skills / Tech Stack
- Hobbies (if any)
- Certifications (if any)
- Top 10 keywords

Format using markdown headers. Resume:
{resume}
"#,
};

pub const ATS_EVALUATION: PromptTemplate = PromptTemplate {
    name: "ats_evaluation",
    placeholders: &["resume"],
    text: r#"
You are an ATS evaluation assistant.

Please analyze this resume and provide:

1. ATS Score (out of 100)
2. Verdict (Good, Average, Needs Improvement)
3. 🔍 Missing Sections
4. 📝 Grammar or Tone Suggestions
5. 🎯 Clarity / Accuracy Issues
6. 💡 Suggestions to Improve

Resume:
{resume}
"#,
};

pub const MOCK_INTERVIEW: PromptTemplate = PromptTemplate {
    name: "mock_interview",
    placeholders: &["resume", "interview_type"],
    text: r#"
Act as a senior interviewer conducting a {interview_type} round.

Read this resume and generate **10 thoughtful, relevant questions**.

Resume:
{resume}
"#,
};

pub const DSA_QUESTIONS: PromptTemplate = PromptTemplate {
    name: "dsa_questions",
    placeholders: &["level"],
    text: r#"
You are a DSA coding interviewer.

Generate 10 questions of level {level} difficulty (1 = easy, 5 = very hard). Include:
- Mix of topics (array, string, tree, graph, dynamic programming)
- One-line titles for each
- Label Q1, Q2... Q10
"#,
};

/// Number of questions both interview templates ask for.
pub const REQUESTED_QUESTIONS: usize = 10;

pub fn section_breakdown(resume: &str) -> String {
    SECTION_BREAKDOWN.fill(&[("resume", resume)])
}

pub fn ats_evaluation(resume: &str) -> String {
    ATS_EVALUATION.fill(&[("resume", resume)])
}

pub fn mock_interview(resume: &str, round: InterviewRound) -> String {
    MOCK_INTERVIEW.fill(&[("resume", resume), ("interview_type", round.label())])
}

/// `level` is passed through uninterpreted; the model decides what an
/// out-of-range value means.
pub fn dsa_questions(level: &str) -> String {
    DSA_QUESTIONS.fill(&[("level", level)])
}
