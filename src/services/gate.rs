//! Application gate: referral applications are blocked until the profile
//! reaches 100% completeness, and the remediation wizard walks the student
//! through the missing sections one step at a time.
//!
//! The flow is an explicit state machine threaded through each transition.
//! Network effects (saving a step, refreshing the status, submitting the
//! deferred application) happen outside; callers report their outcome back
//! via `step_saved` / `status_refreshed` / `submission_result`. A failed
//! save or refresh simply leaves the flow where it was, so the step can be
//! retried.

use std::fmt;

use crate::models::{Certification, Project};
use crate::services::completeness::{Breakdown, ProfileStatus};
use crate::utils::validation::{validate_github_url, validate_graduation_year};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationStep {
    Academic,
    Skills,
    Projects,
    Certifications,
    PreferredRoles,
    Resume,
    LinkedIn,
    Github,
}

impl RemediationStep {
    /// Fixed wizard order; incomplete sections are collected in this order.
    pub const ORDER: [RemediationStep; 8] = [
        RemediationStep::Academic,
        RemediationStep::Skills,
        RemediationStep::Projects,
        RemediationStep::Certifications,
        RemediationStep::PreferredRoles,
        RemediationStep::Resume,
        RemediationStep::LinkedIn,
        RemediationStep::Github,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RemediationStep::Academic => "academic",
            RemediationStep::Skills => "skills",
            RemediationStep::Projects => "projects",
            RemediationStep::Certifications => "certifications",
            RemediationStep::PreferredRoles => "preferred_roles",
            RemediationStep::Resume => "resume",
            RemediationStep::LinkedIn => "linked_in",
            RemediationStep::Github => "github",
        }
    }

    fn is_complete(self, breakdown: &Breakdown) -> bool {
        match self {
            RemediationStep::Academic => breakdown.academic.is_complete(),
            RemediationStep::Skills => breakdown.skills.is_complete(),
            RemediationStep::Projects => breakdown.projects.is_complete(),
            RemediationStep::Certifications => breakdown.certifications.is_complete(),
            RemediationStep::PreferredRoles => breakdown.preferred_roles.is_complete(),
            RemediationStep::Resume => breakdown.resume.is_complete(),
            RemediationStep::LinkedIn => breakdown.linked_in.is_complete(),
            RemediationStep::Github => breakdown.github.is_complete(),
        }
    }

    /// The steps a profile still needs, in wizard order.
    pub fn required_for(breakdown: &Breakdown) -> Vec<RemediationStep> {
        Self::ORDER
            .iter()
            .copied()
            .filter(|step| !step.is_complete(breakdown))
            .collect()
    }
}

/// The minimal input each wizard step collects before its save call.
#[derive(Debug, Clone)]
pub enum StepInput {
    Academic { branch: String, graduation_year: i32 },
    Skills(Vec<String>),
    Projects(Vec<Project>),
    Certifications(Vec<Certification>),
    PreferredRoles(Vec<String>),
    Resume { file_name: String, bytes: Vec<u8> },
    LinkedIn { pdf_bytes: Vec<u8>, linked_in_url: Option<String> },
    Github { url: String },
}

impl StepInput {
    pub fn step(&self) -> RemediationStep {
        match self {
            StepInput::Academic { .. } => RemediationStep::Academic,
            StepInput::Skills(_) => RemediationStep::Skills,
            StepInput::Projects(_) => RemediationStep::Projects,
            StepInput::Certifications(_) => RemediationStep::Certifications,
            StepInput::PreferredRoles(_) => RemediationStep::PreferredRoles,
            StepInput::Resume { .. } => RemediationStep::Resume,
            StepInput::LinkedIn { .. } => RemediationStep::LinkedIn,
            StepInput::Github { .. } => RemediationStep::Github,
        }
    }

    pub fn validate(&self) -> Result<(), GateError> {
        match self {
            StepInput::Academic { branch, graduation_year } => {
                if branch.is_empty() {
                    return Err(GateError::InvalidInput("Please fill in all academic details"));
                }
                if !validate_graduation_year(*graduation_year) {
                    return Err(GateError::InvalidInput("Invalid graduation year"));
                }
                Ok(())
            }
            StepInput::Skills(skills) => {
                if skills.iter().all(|s| s.is_empty()) {
                    return Err(GateError::InvalidInput("Please add at least one skill"));
                }
                Ok(())
            }
            StepInput::Projects(projects) => {
                if projects.first().map_or(true, |p| p.title.is_empty()) {
                    return Err(GateError::InvalidInput("Please add at least one project"));
                }
                Ok(())
            }
            StepInput::Certifications(certifications) => {
                if certifications.first().map_or(true, |c| c.name.is_empty()) {
                    return Err(GateError::InvalidInput(
                        "Please add at least one certification",
                    ));
                }
                Ok(())
            }
            StepInput::PreferredRoles(roles) => {
                if roles.iter().all(|r| r.is_empty()) {
                    return Err(GateError::InvalidInput(
                        "Please add at least one preferred role",
                    ));
                }
                Ok(())
            }
            StepInput::Resume { bytes, .. } => {
                if bytes.is_empty() {
                    return Err(GateError::InvalidInput("Please upload your resume"));
                }
                Ok(())
            }
            StepInput::LinkedIn { pdf_bytes, .. } => {
                if pdf_bytes.is_empty() {
                    return Err(GateError::InvalidInput("Please upload your LinkedIn PDF"));
                }
                Ok(())
            }
            StepInput::Github { url } => {
                if url.is_empty() {
                    return Err(GateError::InvalidInput("Please add your GitHub URL"));
                }
                if !validate_github_url(url) {
                    return Err(GateError::InvalidInput(
                        "Invalid GitHub URL format. Example: https://github.com/username",
                    ));
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    InvalidInput(&'static str),
    StepMismatch {
        expected: RemediationStep,
        got: RemediationStep,
    },
    SkipNotAllowed,
    NotCollecting,
    NotAdvancing,
    NotCompleted,
    Closed,
    DeferredSubmissionFailed(String),
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::InvalidInput(message) => write!(f, "{}", message),
            GateError::StepMismatch { expected, got } => write!(
                f,
                "Expected input for the {} step, got {}",
                expected.label(),
                got.label()
            ),
            GateError::SkipNotAllowed => {
                write!(f, "The final remaining step cannot be skipped")
            }
            GateError::NotCollecting => write!(f, "The wizard is not collecting a step"),
            GateError::NotAdvancing => write!(f, "The wizard is not awaiting a status refresh"),
            GateError::NotCompleted => write!(f, "The wizard has not completed all steps"),
            GateError::Closed => write!(f, "The wizard is closed"),
            GateError::DeferredSubmissionFailed(message) => {
                write!(f, "Deferred application failed: {}", message)
            }
        }
    }
}

impl std::error::Error for GateError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the student to fill in the step at this index.
    Collecting { step: usize },
    /// Step saved; awaiting a status refresh before moving on.
    Advancing { step: usize },
    /// All steps done; the deferred application is ready for its one retry.
    Completed,
    Closed,
}

#[derive(Debug)]
pub enum GateDecision {
    /// Profile is at 100%; submit the application immediately.
    Proceed,
    /// Profile is incomplete; walk the returned wizard first.
    Remediate(GateFlow),
}

#[derive(Debug)]
pub enum GateProgress {
    NextStep(RemediationStep),
    ReadyToSubmit,
}

#[derive(Debug, Clone)]
pub struct GateFlow {
    opportunity_id: String,
    steps: Vec<RemediationStep>,
    state: GateState,
    last_completeness: i32,
}

impl GateFlow {
    /// Entry point: recompute the status for the live profile and decide
    /// whether the application may proceed.
    pub fn gate(status: &ProfileStatus, opportunity_id: impl Into<String>) -> GateDecision {
        if status.completeness == 100 {
            return GateDecision::Proceed;
        }

        let steps = RemediationStep::required_for(&status.breakdown);
        // Nothing wizard-addressable left (e.g. only the avatar is missing):
        // go straight to the deferred-submission stage.
        let state = if steps.is_empty() {
            GateState::Completed
        } else {
            GateState::Collecting { step: 0 }
        };
        GateDecision::Remediate(GateFlow {
            opportunity_id: opportunity_id.into(),
            steps,
            state,
            last_completeness: status.completeness,
        })
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn opportunity_id(&self) -> &str {
        &self.opportunity_id
    }

    pub fn steps(&self) -> &[RemediationStep] {
        &self.steps
    }

    pub fn last_completeness(&self) -> i32 {
        self.last_completeness
    }

    pub fn current_step(&self) -> Option<RemediationStep> {
        match self.state {
            GateState::Collecting { step } | GateState::Advancing { step } => {
                self.steps.get(step).copied()
            }
            _ => None,
        }
    }

    fn on_final_step(&self, step: usize) -> bool {
        step + 1 == self.steps.len()
    }

    /// Local validation before the step's save call goes out. Leaves the
    /// state untouched so a rejected input can be corrected and resubmitted.
    pub fn validate_input(&self, input: &StepInput) -> Result<(), GateError> {
        let current = match self.state {
            GateState::Collecting { step } => self.steps.get(step).copied(),
            GateState::Closed => return Err(GateError::Closed),
            _ => return Err(GateError::NotCollecting),
        };

        let expected = current.ok_or(GateError::NotCollecting)?;
        if input.step() != expected {
            return Err(GateError::StepMismatch {
                expected,
                got: input.step(),
            });
        }
        input.validate()
    }

    /// The step's update call succeeded; hold at `Advancing` until the
    /// status refresh lands.
    pub fn step_saved(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Collecting { step } => {
                self.state = GateState::Advancing { step };
                Ok(())
            }
            GateState::Closed => Err(GateError::Closed),
            _ => Err(GateError::NotCollecting),
        }
    }

    /// A fresh status report arrived after a successful save. Moves on to
    /// the next step, or to `Completed` when the saved step was the last.
    pub fn status_refreshed(&mut self, status: &ProfileStatus) -> Result<GateProgress, GateError> {
        match self.state {
            GateState::Advancing { step } => {
                self.last_completeness = status.completeness;
                if self.on_final_step(step) {
                    self.state = GateState::Completed;
                    Ok(GateProgress::ReadyToSubmit)
                } else {
                    self.state = GateState::Collecting { step: step + 1 };
                    let next = self.steps[step + 1];
                    Ok(GateProgress::NextStep(next))
                }
            }
            GateState::Closed => Err(GateError::Closed),
            _ => Err(GateError::NotAdvancing),
        }
    }

    /// Defer the current step. The final remaining step must be completed.
    pub fn skip_step(&mut self) -> Result<RemediationStep, GateError> {
        match self.state {
            GateState::Collecting { step } => {
                if self.on_final_step(step) {
                    return Err(GateError::SkipNotAllowed);
                }
                self.state = GateState::Collecting { step: step + 1 };
                Ok(self.steps[step + 1])
            }
            GateState::Closed => Err(GateError::Closed),
            _ => Err(GateError::NotCollecting),
        }
    }

    /// Close the wizard, abandoning the pending application attempt.
    pub fn cancel(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Collecting { .. } => {
                self.state = GateState::Closed;
                Ok(())
            }
            GateState::Closed => Err(GateError::Closed),
            _ => Err(GateError::NotCollecting),
        }
    }

    /// Report the outcome of the single deferred application retry. The
    /// flow closes either way; a failure is surfaced as a terminal error,
    /// never dropped.
    pub fn submission_result(&mut self, result: Result<(), String>) -> Result<(), GateError> {
        match self.state {
            GateState::Completed => {
                self.state = GateState::Closed;
                match result {
                    Ok(()) => Ok(()),
                    Err(message) => Err(GateError::DeferredSubmissionFailed(message)),
                }
            }
            GateState::Closed => Err(GateError::Closed),
            _ => Err(GateError::NotCompleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkedInAttachment, Student};
    use crate::services::completeness::test_support::{bare_student, full_student, pdf_blob};
    use crate::services::completeness::profile_status;

    /// Signup state for the wizard walk: identity plus college and avatar,
    /// so only the eight wizard sections are missing.
    fn post_signup_student() -> Student {
        let mut student = bare_student();
        student.college = Some(mongodb::bson::oid::ObjectId::new());
        student.image = Some("/uploads/avatars/asha.png".to_string());
        student
    }

    fn apply_step(student: &mut Student, input: &StepInput) {
        match input {
            StepInput::Academic { branch, graduation_year } => {
                student.branch = Some(branch.clone());
                student.graduation_year = Some(*graduation_year);
            }
            StepInput::Skills(skills) => student.skills = skills.clone(),
            StepInput::Projects(projects) => student.projects = projects.clone(),
            StepInput::Certifications(certs) => student.certifications = certs.clone(),
            StepInput::PreferredRoles(roles) => student.preferred_roles = roles.clone(),
            StepInput::Resume { file_name, .. } => {
                student.resume = Some(pdf_blob(file_name));
            }
            StepInput::LinkedIn { linked_in_url, .. } => {
                student.linked_in = Some(LinkedInAttachment {
                    pdf: Some(pdf_blob("linkedin.pdf")),
                    linked_in_url: linked_in_url.clone().unwrap_or_default(),
                });
            }
            StepInput::Github { url } => student.github_url = Some(url.clone()),
        }
    }

    fn input_for(step: RemediationStep) -> StepInput {
        match step {
            RemediationStep::Academic => StepInput::Academic {
                branch: "Computer Science".to_string(),
                graduation_year: 2026,
            },
            RemediationStep::Skills => StepInput::Skills(vec!["Rust".to_string()]),
            RemediationStep::Projects => StepInput::Projects(vec![Project {
                title: "Job board".to_string(),
                description: None,
                link: None,
            }]),
            RemediationStep::Certifications => {
                StepInput::Certifications(vec![Certification {
                    name: "CKA".to_string(),
                    issuer: None,
                    date: None,
                }])
            }
            RemediationStep::PreferredRoles => {
                StepInput::PreferredRoles(vec!["Backend Engineer".to_string()])
            }
            RemediationStep::Resume => StepInput::Resume {
                file_name: "resume.pdf".to_string(),
                bytes: b"%PDF-1.4".to_vec(),
            },
            RemediationStep::LinkedIn => StepInput::LinkedIn {
                pdf_bytes: b"%PDF-1.4".to_vec(),
                linked_in_url: Some("https://linkedin.com/in/asha".to_string()),
            },
            RemediationStep::Github => StepInput::Github {
                url: "https://github.com/asha".to_string(),
            },
        }
    }

    #[test]
    fn complete_profile_proceeds_immediately() {
        let status = profile_status(&full_student());
        match GateFlow::gate(&status, "opp-1") {
            GateDecision::Proceed => {}
            GateDecision::Remediate(_) => panic!("complete profile must not be gated"),
        }
    }

    #[test]
    fn incomplete_profile_is_gated_with_only_missing_steps() {
        let mut student = full_student();
        student.resume = None;
        student.github_url = None;

        let status = profile_status(&student);
        let flow = match GateFlow::gate(&status, "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!("incomplete profile must be gated"),
        };

        assert_eq!(
            flow.steps(),
            &[RemediationStep::Resume, RemediationStep::Github]
        );
        assert_eq!(flow.current_step(), Some(RemediationStep::Resume));
        assert_eq!(flow.last_completeness(), 95);
    }

    #[test]
    fn full_wizard_walk_reaches_complete_profile() {
        let mut student = post_signup_student();
        let status = profile_status(&student);
        assert_eq!(status.completeness, 40);

        let mut flow = match GateFlow::gate(&status, "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!("post-signup profile must be gated"),
        };
        assert_eq!(flow.steps().len(), 8);

        let mut submitted = false;
        while let Some(step) = flow.current_step() {
            let input = input_for(step);
            flow.validate_input(&input).unwrap();
            apply_step(&mut student, &input);
            flow.step_saved().unwrap();

            let refreshed = profile_status(&student);
            match flow.status_refreshed(&refreshed).unwrap() {
                GateProgress::NextStep(_) => {}
                GateProgress::ReadyToSubmit => {
                    submitted = true;
                    flow.submission_result(Ok(())).unwrap();
                }
            }
        }

        assert!(submitted);
        assert_eq!(flow.state(), GateState::Closed);

        let final_status = profile_status(&student);
        assert_eq!(final_status.completeness, 100);
        assert!(final_status.missing_fields.is_empty());
    }

    #[test]
    fn completeness_tracks_each_saved_step() {
        let mut student = post_signup_student();
        let status = profile_status(&student);
        let mut flow = match GateFlow::gate(&status, "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!(),
        };

        let input = input_for(RemediationStep::Academic);
        flow.validate_input(&input).unwrap();
        apply_step(&mut student, &input);
        flow.step_saved().unwrap();
        flow.status_refreshed(&profile_status(&student)).unwrap();

        // branch (10) + graduation year (10) on top of the signup 40
        assert_eq!(flow.last_completeness(), 60);
    }

    #[test]
    fn rejected_input_keeps_the_wizard_on_the_step() {
        let student = post_signup_student();
        let mut flow = match GateFlow::gate(&profile_status(&student), "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!(),
        };

        let bad = StepInput::Academic {
            branch: String::new(),
            graduation_year: 2026,
        };
        assert_eq!(
            flow.validate_input(&bad),
            Err(GateError::InvalidInput("Please fill in all academic details"))
        );
        assert_eq!(flow.state(), GateState::Collecting { step: 0 });

        let wrong_year = StepInput::Academic {
            branch: "ECE".to_string(),
            graduation_year: 1850,
        };
        assert_eq!(
            flow.validate_input(&wrong_year),
            Err(GateError::InvalidInput("Invalid graduation year"))
        );

        // A retry with corrected input goes through.
        flow.validate_input(&input_for(RemediationStep::Academic)).unwrap();
    }

    #[test]
    fn input_for_wrong_step_is_a_mismatch() {
        let student = post_signup_student();
        let flow = match GateFlow::gate(&profile_status(&student), "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!(),
        };

        let err = flow
            .validate_input(&input_for(RemediationStep::Skills))
            .unwrap_err();
        assert_eq!(
            err,
            GateError::StepMismatch {
                expected: RemediationStep::Academic,
                got: RemediationStep::Skills,
            }
        );
    }

    #[test]
    fn skip_defers_all_but_the_final_step() {
        let mut student = full_student();
        student.resume = None;
        student.github_url = None;

        let mut flow = match GateFlow::gate(&profile_status(&student), "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!(),
        };

        assert_eq!(flow.skip_step().unwrap(), RemediationStep::Github);
        // Github is now the final remaining step; it must be completed.
        assert_eq!(flow.skip_step(), Err(GateError::SkipNotAllowed));
        assert_eq!(flow.current_step(), Some(RemediationStep::Github));
    }

    #[test]
    fn no_addressable_steps_jumps_to_the_deferred_submission() {
        // Every wizard section is done but the avatar is missing, so the
        // score sits below 100 with nothing left for the wizard to collect.
        let mut student = full_student();
        student.image = None;

        let mut flow = match GateFlow::gate(&profile_status(&student), "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!("96% profile must still be gated"),
        };

        assert!(flow.steps().is_empty());
        assert_eq!(flow.current_step(), None);
        assert_eq!(flow.state(), GateState::Completed);

        // The single retry runs (and here fails, since the profile is still
        // short of 100) and the flow closes.
        assert!(flow
            .submission_result(Err("Profile is 96% complete".to_string()))
            .is_err());
        assert_eq!(flow.state(), GateState::Closed);
    }

    #[test]
    fn cancel_abandons_the_pending_application() {
        let student = post_signup_student();
        let mut flow = match GateFlow::gate(&profile_status(&student), "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!(),
        };

        flow.cancel().unwrap();
        assert_eq!(flow.state(), GateState::Closed);
        assert_eq!(flow.skip_step(), Err(GateError::Closed));
        assert_eq!(flow.step_saved(), Err(GateError::Closed));
    }

    #[test]
    fn failed_deferred_submission_is_a_terminal_error() {
        let mut student = full_student();
        student.github_url = None;

        let mut flow = match GateFlow::gate(&profile_status(&student), "opp-1") {
            GateDecision::Remediate(flow) => flow,
            GateDecision::Proceed => panic!(),
        };

        let input = input_for(RemediationStep::Github);
        flow.validate_input(&input).unwrap();
        apply_step(&mut student, &input);
        flow.step_saved().unwrap();
        match flow.status_refreshed(&profile_status(&student)).unwrap() {
            GateProgress::ReadyToSubmit => {}
            GateProgress::NextStep(_) => panic!("github was the only step"),
        }

        let err = flow
            .submission_result(Err("Opportunity is no longer accepting referrals".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            GateError::DeferredSubmissionFailed(
                "Opportunity is no longer accepting referrals".to_string()
            )
        );

        // The retry happens exactly once; the flow is closed afterwards.
        assert_eq!(flow.state(), GateState::Closed);
        assert_eq!(flow.submission_result(Ok(())), Err(GateError::Closed));
    }
}
