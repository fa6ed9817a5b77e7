// The five fixed prompt templates the engine runs. Placeholders are declared
// per task in `PromptTask::placeholders`; keep both in sync when editing.

/// Role identification from a full resume. Replace `{resume}` before sending.
pub const IDENTIFY_ROLE_TEMPLATE: &str = r#"Analyze this resume and identify the most likely job role/position this person is seeking or qualified for.
Consider their experience, skills, and background.

Resume:
{resume}

Return only the specific job role title (e.g., "Software Engineer", "Data Scientist", "Marketing Manager"):"#;

/// Interview question generation. Replace `{role}` before sending.
pub const INTERVIEW_QUESTION_TEMPLATE: &str = r#"Generate a technical interview question for a {role} position.
The question should be:
- Relevant to the role
- Moderately challenging
- Practical and realistic

Return only the question without any additional text:"#;

/// Answer evaluation. Replace `{role}`, `{question}`, and `{answer}`.
/// The "Score: X/10" shape is prompt guidance only; the engine treats the
/// completion as opaque text and never parses the score out.
pub const EVALUATE_ANSWER_TEMPLATE: &str = r#"Evaluate this interview answer for a {role} position:

Question: {question}
Answer: {answer}

Provide:
1. Score out of 10
2. Brief explanation of strengths and weaknesses
3. Suggestions for improvement

Format your response as:
Score: X/10
Evaluation: [Your detailed feedback]"#;

/// ATS compatibility feedback. Replace `{resume}` before sending.
pub const ATS_FEEDBACK_TEMPLATE: &str = r#"You are an ATS (Applicant Tracking System) analyzing this resume.

Resume:
{resume}

Provide:
1. Overall ATS score out of 100
2. Key strengths identified
3. Areas needing improvement
4. Specific recommendations to improve ATS compatibility

Format your response as:
ATS Score: X/100
Strengths: [List key strengths]
Areas for Improvement: [List improvement areas]
Recommendations: [Specific actionable recommendations]"#;

/// Professional summary. Replace `{resume}` before sending.
pub const SUMMARIZE_RESUME_TEMPLATE: &str = r#"Create a concise professional summary of this resume:

Resume:
{resume}

Provide:
1. Professional summary (2-3 sentences)
2. Key skills and expertise
3. Years of experience
4. Notable achievements

Format your response clearly and professionally."#;
