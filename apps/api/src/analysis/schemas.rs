//! Response schemas for the schema-constrained Gemini calls. These are
//! load-bearing: the server-side constraint is what guarantees every field
//! and array exists in the model output, so the typed deserializers need no
//! defensive parsing.

use serde_json::{json, Value};

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

/// Schema for the Resume Profiler output (`ResumeProfile`).
pub fn resume_profile_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "personalInfo": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "location": { "type": "string" },
                    "email": { "type": "string" },
                    "phone": { "type": "string" },
                    "linkedIn": { "type": "string" },
                    "github": { "type": "string" },
                    "portfolio": { "type": "string" }
                }
            },
            "careerLevel": {
                "type": "object",
                "properties": {
                    "experienceYears": { "type": "number" },
                    "level": {
                        "type": "string",
                        "enum": ["fresher", "junior", "mid-level", "senior", "lead", "executive"]
                    },
                    "isFresher": { "type": "boolean" },
                    "careerProgression": { "type": "string" }
                }
            },
            "skills": {
                "type": "object",
                "properties": {
                    "technical": string_array(),
                    "programming": string_array(),
                    "frameworks": string_array(),
                    "tools": string_array(),
                    "databases": string_array(),
                    "cloud": string_array(),
                    "soft": string_array(),
                    "languages": string_array(),
                    "certifications": string_array()
                }
            },
            "projectAnalysis": {
                "type": "object",
                "properties": {
                    "totalProjects": { "type": "integer" },
                    "hasGoodProjects": { "type": "boolean" },
                    "projectQuality": {
                        "type": "string",
                        "enum": ["excellent", "good", "average", "basic", "poor"]
                    },
                    "projectTypes": string_array(),
                    "technologiesUsed": string_array(),
                    "complexityLevel": {
                        "type": "string",
                        "enum": ["basic", "intermediate", "advanced", "expert"]
                    },
                    "hasTeamProjects": { "type": "boolean" },
                    "hasOpenSource": { "type": "boolean" }
                }
            },
            "education": {
                "type": "object",
                "properties": {
                    "degree": { "type": "string" },
                    "field": { "type": "string" },
                    "university": { "type": "string" },
                    "gpa": { "type": "string" },
                    "graduationYear": { "type": "integer" },
                    "additionalCourses": string_array()
                }
            },
            "careerFit": {
                "type": "object",
                "properties": {
                    "suitableRoles": string_array(),
                    "primaryDomain": { "type": "string" },
                    "secondaryDomains": string_array(),
                    "readinessLevel": {
                        "type": "string",
                        "enum": ["job-ready", "needs-improvement", "requires-training"]
                    },
                    "strengthAreas": string_array(),
                    "improvementAreas": string_array()
                }
            },
            "workPreferences": {
                "type": "object",
                "properties": {
                    "preferredLocation": { "type": "string" },
                    "openToRemote": { "type": "boolean" },
                    "willingToRelocate": { "type": "boolean" },
                    "internshipExperience": { "type": "boolean" },
                    "fullTimeReady": { "type": "boolean" }
                }
            },
            "salaryInsights": {
                "type": "object",
                "properties": {
                    "estimatedRange": { "type": "string" },
                    "currency": { "type": "string" },
                    "factorsConsidered": string_array()
                }
            }
        }
    })
}

/// Schema for the Job Analyzer output (`JobAnalysis`).
pub fn job_analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "jobDetails": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "company": { "type": "string" },
                    "location": { "type": "string" },
                    "department": { "type": "string" },
                    "industry": { "type": "string" },
                    "companySize": { "type": "string" },
                    "companyType": { "type": "string" }
                }
            },
            "requirements": {
                "type": "object",
                "properties": {
                    "experienceRequired": { "type": "string" },
                    "experienceYears": { "type": "number" },
                    "education": { "type": "string" },
                    "skills": {
                        "type": "object",
                        "properties": {
                            "mandatory": string_array(),
                            "preferred": string_array(),
                            "niceToHave": string_array()
                        }
                    },
                    "certifications": string_array()
                }
            },
            "jobCharacteristics": {
                "type": "object",
                "properties": {
                    "workType": { "type": "string", "enum": ["remote", "hybrid", "onsite"] },
                    "employmentType": { "type": "string" },
                    "workSchedule": { "type": "string" },
                    "travelRequired": { "type": "boolean" },
                    "teamSize": { "type": "string" },
                    "reportingStructure": { "type": "string" }
                }
            },
            "compensation": {
                "type": "object",
                "properties": {
                    "salaryRange": { "type": "string" },
                    "currency": { "type": "string" },
                    "isPaid": { "type": "boolean" },
                    "compensationType": { "type": "string" },
                    "benefits": string_array(),
                    "bonuses": string_array()
                }
            },
            "matchAnalysis": {
                "type": "object",
                "properties": {
                    "overallMatch": { "type": "number" },
                    "skillMatch": { "type": "number" },
                    "experienceMatch": { "type": "number" },
                    "locationMatch": { "type": "number" },
                    "compensationMatch": { "type": "number" },
                    "cultureMatch": { "type": "number" },
                    "matchedRequirements": string_array(),
                    "missingRequirements": string_array(),
                    "overqualifiedAreas": string_array()
                }
            },
            "recommendation": {
                "type": "object",
                "properties": {
                    "shouldApply": { "type": "boolean" },
                    "confidence": { "type": "number" },
                    "applicationPriority": { "type": "string", "enum": ["high", "medium", "low"] },
                    "reasonsToApply": string_array(),
                    "concernsToAddress": string_array(),
                    "preparationTips": string_array(),
                    "interviewFocus": string_array()
                }
            },
            "careerGrowth": {
                "type": "object",
                "properties": {
                    "growthPotential": { "type": "string" },
                    "skillDevelopment": string_array(),
                    "careerPath": string_array(),
                    "learningOpportunities": string_array()
                }
            },
            "riskAssessment": {
                "type": "object",
                "properties": {
                    "riskLevel": { "type": "string" },
                    "riskFactors": string_array(),
                    "mitigationStrategies": string_array()
                }
            }
        }
    })
}

/// Schema for the Report Synthesizer output (`ComprehensiveReport`).
pub fn comprehensive_report_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "executiveSummary": {
                "type": "object",
                "properties": {
                    "recommendation": { "type": "string", "enum": ["APPLY", "CONSIDER", "SKIP"] },
                    "matchScore": { "type": "number" },
                    "keyStrengths": string_array(),
                    "majorConcerns": string_array(),
                    "oneLineAdvice": { "type": "string" }
                }
            },
            "detailedAnalysis": {
                "type": "object",
                "properties": {
                    "fitAssessment": { "type": "string" },
                    "careerImpact": { "type": "string" },
                    "compensationAnalysis": { "type": "string" },
                    "skillGapAnalysis": { "type": "string" },
                    "interviewPreparation": { "type": "string" }
                }
            },
            "actionItems": {
                "type": "object",
                "properties": {
                    "beforeApplying": string_array(),
                    "applicationTips": string_array(),
                    "interviewPrep": string_array(),
                    "skillsToImprove": string_array()
                }
            },
            "alternativeOptions": {
                "type": "object",
                "properties": {
                    "similarRoles": string_array(),
                    "betterFitCompanies": string_array(),
                    "skillBuildingPath": string_array()
                }
            },
            "timeline": {
                "type": "object",
                "properties": {
                    "immediateActions": string_array(),
                    "shortTerm": string_array(),
                    "longTerm": string_array()
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_schema_lists_nine_skill_categories() {
        let schema = resume_profile_schema();
        let skills = &schema["properties"]["skills"]["properties"];
        let categories = skills.as_object().unwrap();
        assert_eq!(categories.len(), 9);
        for key in [
            "technical",
            "programming",
            "frameworks",
            "tools",
            "databases",
            "cloud",
            "soft",
            "languages",
            "certifications",
        ] {
            assert!(categories.contains_key(key), "missing category {key}");
        }
    }

    #[test]
    fn test_job_schema_constrains_work_type() {
        let schema = job_analysis_schema();
        let work_type = &schema["properties"]["jobCharacteristics"]["properties"]["workType"];
        assert_eq!(work_type["enum"], json!(["remote", "hybrid", "onsite"]));
    }

    #[test]
    fn test_report_schema_constrains_verdict() {
        let schema = comprehensive_report_schema();
        let verdict = &schema["properties"]["executiveSummary"]["properties"]["recommendation"];
        assert_eq!(verdict["enum"], json!(["APPLY", "CONSIDER", "SKIP"]));
    }
}
