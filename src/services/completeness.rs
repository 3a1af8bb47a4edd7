//! Profile completeness scoring and the status report that drives the
//! application gate.
//!
//! The scored-weight table and the missing-fields/breakdown report use
//! different field sets on purpose: `github_url` and the LinkedIn profile
//! URL are reported as missing but contribute no points. Do not unify them.

use serde::Serialize;

use crate::models::Student;

fn has_first_name(s: &Student) -> bool {
    !s.first_name.is_empty()
}

fn has_last_name(s: &Student) -> bool {
    !s.last_name.is_empty()
}

fn has_email(s: &Student) -> bool {
    !s.email.is_empty()
}

fn has_image(s: &Student) -> bool {
    s.image.as_deref().map_or(false, |i| !i.is_empty())
}

fn has_college(s: &Student) -> bool {
    s.college.is_some()
}

fn has_branch(s: &Student) -> bool {
    s.branch.as_deref().map_or(false, |b| !b.is_empty())
}

fn has_graduation_year(s: &Student) -> bool {
    s.graduation_year.is_some()
}

fn has_skills(s: &Student) -> bool {
    !s.skills.is_empty()
}

fn has_projects(s: &Student) -> bool {
    !s.projects.is_empty()
}

fn has_certifications(s: &Student) -> bool {
    !s.certifications.is_empty()
}

fn has_preferred_roles(s: &Student) -> bool {
    !s.preferred_roles.is_empty()
}

fn has_resume(s: &Student) -> bool {
    s.resume.is_some()
}

fn has_linkedin_pdf(s: &Student) -> bool {
    s.linkedin_pdf().is_some()
}

fn has_linkedin_url(s: &Student) -> bool {
    s.linkedin_url().is_some()
}

fn has_github_url(s: &Student) -> bool {
    s.github_url.as_deref().map_or(false, |u| !u.is_empty())
}

/// The weight table. Weights sum to 100; a field contributes its full
/// weight only when its presence predicate holds. `github_url` and the
/// LinkedIn URL are intentionally absent here even though the missing-field
/// report below checks them.
const SCORED_FIELDS: [(fn(&Student) -> bool, i32); 13] = [
    (has_first_name, 8),
    (has_last_name, 8),
    (has_email, 8),
    (has_image, 4),
    (has_college, 12),
    (has_branch, 10),
    (has_graduation_year, 10),
    (has_skills, 10),
    (has_projects, 10),
    (has_certifications, 5),
    (has_preferred_roles, 5),
    (has_resume, 5),
    (has_linkedin_pdf, 5),
];

/// Ordered (label, predicate) checks behind `missing_fields`. Broader than
/// the weight table: includes the LinkedIn URL and GitHub URL.
const REPORTED_FIELDS: [(&str, fn(&Student) -> bool); 11] = [
    ("college", has_college),
    ("branch", has_branch),
    ("graduation_year", has_graduation_year),
    ("skills", has_skills),
    ("projects", has_projects),
    ("certifications", has_certifications),
    ("preferred_roles", has_preferred_roles),
    ("resume", has_resume),
    ("linkedin_pdf", has_linkedin_pdf),
    ("linkedin_url", has_linkedin_url),
    ("github_url", has_github_url),
];

/// Weighted-sum completeness in [0, 100]. Pure; every mutating profile
/// endpoint recomputes and persists this in the same write.
pub fn calculate_completeness(student: &Student) -> i32 {
    SCORED_FIELDS
        .iter()
        .filter(|(present, _)| present(student))
        .map(|(_, weight)| weight)
        .sum()
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStrength {
    Strong,
    Medium,
    Weak,
}

impl ProfileStrength {
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            ProfileStrength::Strong
        } else if score >= 50 {
            ProfileStrength::Medium
        } else {
            ProfileStrength::Weak
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Complete,
    Incomplete,
}

impl SectionStatus {
    fn from_bool(complete: bool) -> Self {
        if complete {
            SectionStatus::Complete
        } else {
            SectionStatus::Incomplete
        }
    }

    pub fn is_complete(self) -> bool {
        self == SectionStatus::Complete
    }
}

/// Per-category Complete/Incomplete map. `linked_in` counts either the PDF
/// or the URL; `academic` needs both branch and graduation year.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub basic_info: SectionStatus,
    pub college: SectionStatus,
    pub academic: SectionStatus,
    pub skills: SectionStatus,
    pub projects: SectionStatus,
    pub certifications: SectionStatus,
    pub preferred_roles: SectionStatus,
    pub resume: SectionStatus,
    pub linked_in: SectionStatus,
    pub github: SectionStatus,
}

#[derive(Debug, Serialize, Clone)]
pub struct ProfileStatus {
    pub completeness: i32,
    pub strength: ProfileStrength,
    pub missing_fields: Vec<&'static str>,
    pub breakdown: Breakdown,
}

pub fn profile_status(student: &Student) -> ProfileStatus {
    let completeness = calculate_completeness(student);

    let missing_fields = REPORTED_FIELDS
        .iter()
        .filter(|(_, present)| !present(student))
        .map(|(label, _)| *label)
        .collect();

    let breakdown = Breakdown {
        basic_info: SectionStatus::from_bool(
            has_first_name(student) && has_last_name(student) && has_email(student),
        ),
        college: SectionStatus::from_bool(has_college(student)),
        academic: SectionStatus::from_bool(has_branch(student) && has_graduation_year(student)),
        skills: SectionStatus::from_bool(has_skills(student)),
        projects: SectionStatus::from_bool(has_projects(student)),
        certifications: SectionStatus::from_bool(has_certifications(student)),
        preferred_roles: SectionStatus::from_bool(has_preferred_roles(student)),
        resume: SectionStatus::from_bool(has_resume(student)),
        linked_in: SectionStatus::from_bool(
            has_linkedin_pdf(student) || has_linkedin_url(student),
        ),
        github: SectionStatus::from_bool(has_github_url(student)),
    };

    ProfileStatus {
        completeness,
        strength: ProfileStrength::from_score(completeness),
        missing_fields,
        breakdown,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use mongodb::bson::{oid::ObjectId, spec::BinarySubtype, Binary, DateTime};

    use crate::models::{Certification, DocumentBlob, LinkedInAttachment, Project, Student};

    pub fn pdf_blob(name: &str) -> DocumentBlob {
        DocumentBlob {
            data: Binary {
                subtype: BinarySubtype::Generic,
                bytes: b"%PDF-1.4 test".to_vec(),
            },
            content_type: "application/pdf".to_string(),
            file_name: name.to_string(),
            file_size: 13,
            uploaded_at: DateTime::now(),
        }
    }

    /// Fresh signup: names and email only, nothing else filled in.
    pub fn bare_student() -> Student {
        Student {
            id: Some(ObjectId::new()),
            first_name: "Asha".to_string(),
            last_name: "Nair".to_string(),
            email: "asha@example.com".to_string(),
            password: "hashed".to_string(),
            image: None,
            college: None,
            branch: None,
            graduation_year: None,
            skills: vec![],
            projects: vec![],
            certifications: vec![],
            preferred_roles: vec![],
            resume: None,
            linked_in: None,
            github_url: None,
            profile_completeness: 0,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    /// Every scored field populated; URL-only report fields set too.
    pub fn full_student() -> Student {
        let mut student = bare_student();
        student.image = Some("/uploads/avatars/asha.png".to_string());
        student.college = Some(ObjectId::new());
        student.branch = Some("Computer Science".to_string());
        student.graduation_year = Some(2026);
        student.skills = vec!["Rust".to_string(), "SQL".to_string()];
        student.projects = vec![Project {
            title: "Compiler playground".to_string(),
            description: Some("Toy language front-end".to_string()),
            link: None,
        }];
        student.certifications = vec![Certification {
            name: "AWS Cloud Practitioner".to_string(),
            issuer: Some("AWS".to_string()),
            date: None,
        }];
        student.preferred_roles = vec!["Backend Engineer".to_string()];
        student.resume = Some(pdf_blob("resume.pdf"));
        student.linked_in = Some(LinkedInAttachment {
            pdf: Some(pdf_blob("linkedin.pdf")),
            linked_in_url: "https://linkedin.com/in/asha".to_string(),
        });
        student.github_url = Some("https://github.com/asha".to_string());
        student
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{bare_student, full_student, pdf_blob};
    use super::*;
    use crate::models::LinkedInAttachment;

    #[test]
    fn score_is_deterministic_and_bounded() {
        let student = full_student();
        let first = calculate_completeness(&student);
        let second = calculate_completeness(&student);
        assert_eq!(first, second);
        assert!((0..=100).contains(&first));

        let bare = bare_student();
        assert!((0..=100).contains(&calculate_completeness(&bare)));
    }

    #[test]
    fn name_and_email_only_scores_24() {
        assert_eq!(calculate_completeness(&bare_student()), 24);
    }

    #[test]
    fn fully_populated_profile_scores_100() {
        assert_eq!(calculate_completeness(&full_student()), 100);
    }

    #[test]
    fn score_is_monotonic_per_field() {
        // Populating any single absent scored field never decreases the total.
        let base = bare_student();
        let base_score = calculate_completeness(&base);

        let mut with_college = base.clone();
        with_college.college = Some(mongodb::bson::oid::ObjectId::new());
        assert!(calculate_completeness(&with_college) >= base_score);

        let mut with_skills = base.clone();
        with_skills.skills = vec!["Rust".to_string()];
        assert!(calculate_completeness(&with_skills) >= base_score);

        let mut with_resume = base.clone();
        with_resume.resume = Some(pdf_blob("resume.pdf"));
        assert!(calculate_completeness(&with_resume) >= base_score);

        let mut with_year = base;
        with_year.graduation_year = Some(2027);
        assert!(calculate_completeness(&with_year) >= base_score);
    }

    #[test]
    fn empty_strings_are_absent() {
        let mut student = bare_student();
        student.branch = Some(String::new());
        student.image = Some(String::new());
        student.github_url = Some(String::new());
        assert_eq!(calculate_completeness(&student), 24);

        let status = profile_status(&student);
        assert!(status.missing_fields.contains(&"branch"));
        assert!(status.missing_fields.contains(&"github_url"));
    }

    #[test]
    fn non_empty_lists_count_without_deep_validation() {
        let mut student = bare_student();
        student.skills = vec![String::new()];
        assert_eq!(calculate_completeness(&student), 34);
    }

    #[test]
    fn strength_tier_boundaries() {
        assert_eq!(ProfileStrength::from_score(49), ProfileStrength::Weak);
        assert_eq!(ProfileStrength::from_score(50), ProfileStrength::Medium);
        assert_eq!(ProfileStrength::from_score(79), ProfileStrength::Medium);
        assert_eq!(ProfileStrength::from_score(80), ProfileStrength::Strong);
        assert_eq!(ProfileStrength::from_score(100), ProfileStrength::Strong);
    }

    #[test]
    fn url_fields_are_reported_but_not_scored() {
        let mut student = full_student();
        student.github_url = None;
        if let Some(linked_in) = student.linked_in.as_mut() {
            linked_in.linked_in_url.clear();
        }

        // Dropping both URLs changes nothing in the weighted score...
        assert_eq!(calculate_completeness(&student), 100);

        // ...but both reappear in the report.
        let status = profile_status(&student);
        assert_eq!(status.completeness, 100);
        assert_eq!(status.missing_fields, vec!["linkedin_url", "github_url"]);
        assert!(!status.breakdown.github.is_complete());
        // PDF alone keeps the linked_in section complete.
        assert!(status.breakdown.linked_in.is_complete());
    }

    #[test]
    fn linkedin_url_alone_completes_section_without_points() {
        let mut student = bare_student();
        student.linked_in = Some(LinkedInAttachment {
            pdf: None,
            linked_in_url: "https://linkedin.com/in/asha".to_string(),
        });

        assert_eq!(calculate_completeness(&student), 24);
        let status = profile_status(&student);
        assert!(status.breakdown.linked_in.is_complete());
        assert!(status.missing_fields.contains(&"linkedin_pdf"));
        assert!(!status.missing_fields.contains(&"linkedin_url"));
    }

    #[test]
    fn complete_profile_reports_nothing_missing() {
        let status = profile_status(&full_student());
        assert_eq!(status.completeness, 100);
        assert_eq!(status.strength, ProfileStrength::Strong);
        assert!(status.missing_fields.is_empty());
        assert!(status.breakdown.basic_info.is_complete());
        assert!(status.breakdown.academic.is_complete());
    }

    #[test]
    fn deleting_resume_drops_exactly_five() {
        let mut student = full_student();
        assert_eq!(calculate_completeness(&student), 100);

        student.resume = None;
        let status = profile_status(&student);
        assert_eq!(status.completeness, 95);
        assert_eq!(status.missing_fields, vec!["resume"]);
        assert!(!status.breakdown.resume.is_complete());
    }

    #[test]
    fn missing_field_order_is_stable() {
        let status = profile_status(&bare_student());
        assert_eq!(
            status.missing_fields,
            vec![
                "college",
                "branch",
                "graduation_year",
                "skills",
                "projects",
                "certifications",
                "preferred_roles",
                "resume",
                "linkedin_pdf",
                "linkedin_url",
                "github_url",
            ]
        );
    }
}
