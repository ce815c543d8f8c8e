// All LLM prompt constants for the analysis pipeline. Placeholders in
// `{braces}` are substituted before sending. Structured stages rely on the
// response schema for shape; the prompt carries the analytical instructions.

/// Legacy skill extraction. Replace `{resume_text}`.
/// Output contract: a bare JSON array of skill-name strings.
pub const SKILL_EXTRACT_PROMPT: &str = r#"Analyze this resume and extract ALL skills mentioned, including:
- Technical skills (programming languages, frameworks, tools, databases)
- Software and platforms
- Methodologies and processes
- Soft skills and competencies
- Certifications and qualifications

RESUME TEXT:
{resume_text}

Return ONLY a JSON array of skill names as strings. Be comprehensive but avoid duplicates.
Example: ["JavaScript", "React", "Node.js", "Problem Solving", "Team Leadership"]"#;

/// Comprehensive resume profiling. Replace `{resume_text}`.
/// Shape is enforced by the response schema; the prompt drives depth.
pub const PROFILE_PROMPT: &str = r#"Analyze this resume comprehensively and extract detailed insights for career matching and job recommendations.

RESUME TEXT:
{resume_text}

ANALYSIS REQUIREMENTS:

1. **Personal Information**: Extract contact details, portfolio links, social profiles
2. **Career Level Assessment**:
   - Calculate years of experience
   - Determine career level (fresher/junior/mid-level/senior/lead/executive)
   - Assess career progression trajectory
3. **Comprehensive Skills Analysis**: Categorize all skills by type and proficiency
4. **Project Quality Evaluation**:
   - Assess project complexity and innovation
   - Check for team collaboration, real-world impact
   - Evaluate technology stack diversity
   - Rate overall project portfolio quality
5. **Education Context**: Academic background relevance to career goals
6. **Career Fit Analysis**:
   - Identify most suitable job roles
   - Determine primary and secondary domains
   - Assess job market readiness
7. **Work Preferences**: Infer location preferences, remote work openness
8. **Market-based Insights**: Provide salary range estimations based on skills and experience

Be thorough and analytical. Consider the global job market context and provide actionable insights."#;

/// Legacy skill-gap match. Replace `{job_html}` and `{resume_skills}`.
pub const LEGACY_MATCH_PROMPT: &str = r#"You are an expert technical recruiter. Analyze this job posting and compare it with the candidate's skills.

JOB POSTING HTML:
{job_html}

CANDIDATE'S SKILLS:
{resume_skills}

Provide a comprehensive analysis in JSON format with these exact fields:
{
  "jobRequiredSkills": ["skill1", "skill2"],
  "jobPreferredSkills": ["skill3", "skill4"],
  "matchedSkills": ["skills that match exactly or closely"],
  "missingSkills": ["important skills candidate lacks"],
  "partialSkills": ["skills candidate has partial knowledge of"],
  "matchPercentage": 85,
  "experienceLevel": "junior|mid-level|senior",
  "recommendations": {
    "strengths": ["what candidate does well"],
    "improvements": ["areas to focus on"],
    "interviewTips": ["preparation advice"],
    "applicationAdvice": ["how to position yourself"]
  },
  "skillsByCategory": {
    "technical": {"matched": ["skills"], "missing": ["skills"], "partial": ["skills"]},
    "soft": {"matched": ["skills"], "missing": ["skills"]},
    "tools": {"matched": ["skills"], "missing": ["skills"]}
  },
  "jobInsights": {
    "companyType": "startup|enterprise|agency",
    "workType": "remote|hybrid|onsite",
    "seniorityLevel": "entry|mid|senior",
    "urgency": "high|medium|low",
    "competitiveFactors": ["what makes this role competitive"],
    "redFlags": ["potential concerns"],
    "opportunities": ["growth potential"]
  }
}

Calculate match percentage based on:
- Required skills match (60% weight)
- Preferred skills match (25% weight)
- Overall profile fit (15% weight)

Be honest about gaps but also highlight transferable skills and potential."#;

/// Comprehensive job analysis. Replace `{job_html}` and `{resume_profile}`.
pub const JOB_ANALYSIS_PROMPT: &str = r#"You are an expert career consultant and technical recruiter. Analyze this job posting and provide a comprehensive match assessment against the candidate's resume profile.

JOB POSTING HTML:
{job_html}

CANDIDATE RESUME PROFILE:
{resume_profile}

COMPREHENSIVE ANALYSIS REQUIREMENTS:

1. **Job Details Extraction**: all job information, company details, industry, size, department, work culture indicators
2. **Requirements Analysis**: categorize skills by importance (mandatory/preferred/nice-to-have); assess experience requirements realistically
3. **Job Characteristics**: work arrangement (remote/hybrid/onsite), employment type, schedule flexibility, team dynamics
4. **Compensation Analysis**: salary information (be realistic about ranges), all forms of compensation, whether the role is paid (important for internships)
5. **Multi-dimensional Matching**: technical skill alignment, experience level appropriateness, geographic and lifestyle fit, compensation alignment, culture alignment
6. **Strategic Recommendation**: clear yes/no on whether to apply, priority level (high/medium/low), specific preparation advice, areas to highlight
7. **Growth and Risk Assessment**: career development potential, learning opportunities, potential red flags, long-term alignment

Consider factors like:
- Is the candidate overqualified or underqualified?
- Does the role offer appropriate challenges for growth?
- Are there any red flags in the job posting?
- How does the compensation compare to market rates?
- What are the chances of actually getting the role?

Be honest and practical in your assessment. Consider the candidate's career stage, goals, and market realities."#;

/// Report synthesis. Replace `{resume_summary}` and `{job_summary}`.
/// List sizes are bounded here by instruction, not by post-filtering: large
/// unbounded arrays cause truncated, unparseable JSON.
pub const REPORT_PROMPT: &str = r#"As a senior career strategist, create a comprehensive job application report that synthesizes the resume analysis and job matching data into actionable insights.

RESUME PROFILE (Summary):
{resume_summary}

JOB ANALYSIS (Summary):
{job_summary}

Generate a strategic report with:

1. **Executive Summary** (for quick decision-making):
   - Clear APPLY/CONSIDER/SKIP recommendation
   - Overall match score (0-100)
   - Top 3 key strengths
   - Major concerns (max 2)
   - One-line strategic advice

2. **Detailed Analysis** (keep each section under 200 words):
   - Fit assessment
   - Career impact potential
   - Compensation analysis
   - Skill gaps and opportunities
   - Interview preparation needs

3. **Action Items** (max 3 items per category):
   - Steps before applying
   - Application strategy tips
   - Interview preparation focus
   - Skills to develop

4. **Alternatives** (max 3 items per category):
   - Similar role suggestions
   - Better fit companies
   - Skill building path

5. **Timeline** (max 3 items per timeframe):
   - Immediate actions (this week)
   - Short-term goals (1-3 months)
   - Long-term development (6+ months)

Keep responses concise, actionable, and realistic. Focus on the most impactful insights."#;
