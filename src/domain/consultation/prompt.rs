//! Prompt builder - pure construction of the completion request content.
//!
//! Turns (doctor profile, patient profile, transcript) into a system
//! instruction plus role-tagged message sequence. The system instruction
//! pins the assistant to the doctor persona, states the limits of virtual
//! care, and mandates a tagged closing: a [`DIAGNOSIS_TAG`] section followed
//! by an [`END_TAG`] marker. Downstream consumers parse both tags, so they
//! must survive any reimplementation, and [`END_TAG`] doubles as the
//! generation stop sequence.

use chrono::{Datelike, NaiveDate};

use crate::domain::doctor::Doctor;
use crate::domain::identity::UserProfile;

use super::message::{Message, MessageRole};

/// Marks the mandatory assessment section at the end of a consultation.
pub const DIAGNOSIS_TAG: &str = "#DIAGNOSIS";

/// End-of-turn marker; also passed to the provider as a stop sequence.
pub const END_TAG: &str = "#END";

/// A role-tagged turn to replay to the completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: MessageRole,
    pub content: String,
}

/// Fully built prompt for one consultation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultationPrompt {
    /// System instruction (persona, limits, closing protocol, patient identity).
    pub system: String,
    /// The transcript as role-tagged turns, oldest first.
    pub turns: Vec<PromptTurn>,
}

impl ConsultationPrompt {
    /// The stop sequence the provider should honor.
    pub fn stop_sequence(&self) -> &'static str {
        END_TAG
    }
}

/// Computes age in whole years, calendar-aware.
///
/// The year difference is decremented when today's (month, day) precedes
/// the birth (month, day) - a birthday has not yet occurred this year.
pub fn patient_age(date_of_birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Builds the system instruction and role-tagged transcript for one turn.
///
/// Pure: `today` is injected so age computation is deterministic under test.
pub fn build(
    doctor: &Doctor,
    patient: &UserProfile,
    transcript: &[Message],
    today: NaiveDate,
) -> ConsultationPrompt {
    let age = patient_age(patient.date_of_birth, today);

    let system = format!(
        "You are Dr. {name}, a specialist in {specialization} with {experience} years of \
experience, providing virtual consultations through the HealthyWell telemedicine platform.

YOUR PROFESSIONAL BACKGROUND
{bio}

YOUR PERSONA
You are a knowledgeable, empathetic, and solution-oriented virtual doctor. You always aim \
to provide clear, practical recommendations during consultations, especially when asked \
directly. You understand the limitations of virtual care and never claim to perform \
physical examinations or tests.

VIRTUAL CONSULTATION LIMITATIONS
- You CANNOT perform physical examinations
- You CANNOT directly measure vital signs or view test results
- You CAN only assess based on patient-provided information
- You CAN provide specific recommendations (e.g., vitamin types, dosages, dietary \
suggestions) based on general health guidance

WHEN PATIENT REQUESTS RECOMMENDATIONS
- If the patient explicitly asks for recommendations, DO NOT explain generically.
- INSTEAD, list specific options, sources, and usage suggestions.
- You MAY remind them to confirm dosages in person but DO NOT withhold a clear \
recommendation.

ENDING THE CONSULTATION
Always conclude with:

{diagnosis_tag}
[Professional assessment based on symptoms or patient query]
[Clear, actionable recommendations as requested]
[Relevant warning signs if applicable]
Thank you for consulting with HealthyWell today. {end_tag}

IF THE PATIENT ENDS FIRST
Still provide a {diagnosis_tag} section with your best preliminary assessment and \
specific recommendations, then close with {end_tag}. DO NOT skip recommendations if \
they were requested.

IMPORTANT RULES
- ALWAYS include specific, helpful recommendations when asked directly
- NEVER give vague or non-committal answers when recommendations are requested
- DO NOT continue the conversation after {end_tag}
- DO NOT skip the {diagnosis_tag} tag - it is mandatory for all consultation closures
- You are expected to behave like a responsible, caring telehealth doctor

PATIENT INFORMATION
Patient: {patient_name}
Date of Birth: {dob}
Age: {age} years",
        name = doctor.name,
        specialization = doctor.specialization,
        experience = doctor.experience,
        bio = doctor.bio,
        diagnosis_tag = DIAGNOSIS_TAG,
        end_tag = END_TAG,
        patient_name = patient.full_name(),
        dob = patient.date_of_birth.format("%B %-d, %Y"),
        age = age,
    );

    let turns = transcript
        .iter()
        .map(|m| PromptTurn {
            role: m.role,
            content: m.content.clone(),
        })
        .collect();

    ConsultationPrompt { system, turns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{
        ConsultationId, DoctorId, MessageId, Timestamp, UserId,
    };
    use proptest::prelude::*;

    fn test_doctor() -> Doctor {
        Doctor {
            id: DoctorId::from_i64(2),
            name: "Sari Wijaya".to_string(),
            specialization: "Dermatology".to_string(),
            experience: 12,
            rating: 4.8,
            bio: "Board-certified dermatologist focusing on tropical skin conditions."
                .to_string(),
            photo_url: None,
            is_available: true,
        }
    }

    fn test_patient(dob: NaiveDate) -> UserProfile {
        UserProfile {
            id: UserId::from_i64(1),
            username: "budi".to_string(),
            email: "budi@example.com".to_string(),
            first_name: "Budi".to_string(),
            last_name: "Santoso".to_string(),
            date_of_birth: dob,
            created_at: Timestamp::now(),
        }
    }

    fn message(id: i64, role: MessageRole, content: &str) -> Message {
        Message {
            id: MessageId::from_i64(id),
            consultation_id: ConsultationId::from_i64(1),
            role,
            content: content.to_string(),
            timestamp: Timestamp::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_is_decremented_the_day_before_the_birthday() {
        assert_eq!(patient_age(date(2000, 6, 15), date(2024, 6, 14)), 23);
    }

    #[test]
    fn age_ticks_over_on_the_birthday() {
        assert_eq!(patient_age(date(2000, 6, 15), date(2024, 6, 15)), 24);
        assert_eq!(patient_age(date(2000, 6, 15), date(2024, 7, 1)), 24);
    }

    #[test]
    fn system_prompt_embeds_persona_and_patient_identity() {
        let doctor = test_doctor();
        let patient = test_patient(date(2000, 6, 15));
        let prompt = build(&doctor, &patient, &[], date(2024, 6, 15));

        assert!(prompt.system.contains("Dr. Sari Wijaya"));
        assert!(prompt.system.contains("Dermatology"));
        assert!(prompt.system.contains("12 years"));
        assert!(prompt.system.contains("tropical skin conditions"));
        assert!(prompt.system.contains("Budi Santoso"));
        assert!(prompt.system.contains("Age: 24 years"));
    }

    #[test]
    fn system_prompt_mandates_both_closing_tags() {
        let prompt = build(
            &test_doctor(),
            &test_patient(date(2000, 6, 15)),
            &[],
            date(2024, 6, 15),
        );

        assert!(prompt.system.contains(DIAGNOSIS_TAG));
        assert!(prompt.system.contains(END_TAG));
        assert_eq!(prompt.stop_sequence(), END_TAG);
    }

    #[test]
    fn transcript_becomes_role_tagged_turns_in_order() {
        let transcript = vec![
            message(1, MessageRole::User, "I have a headache"),
            message(2, MessageRole::Assistant, "How long has it lasted?"),
            message(3, MessageRole::User, "Three days"),
        ];
        let prompt = build(
            &test_doctor(),
            &test_patient(date(2000, 6, 15)),
            &transcript,
            date(2024, 6, 15),
        );

        assert_eq!(prompt.turns.len(), 3);
        assert_eq!(prompt.turns[0].role, MessageRole::User);
        assert_eq!(prompt.turns[1].role, MessageRole::Assistant);
        assert_eq!(prompt.turns[2].content, "Three days");
    }

    proptest! {
        /// The calendar-aware age is always the raw year difference, or one
        /// less when the birthday has not yet occurred.
        #[test]
        fn age_is_year_difference_or_one_less(
            birth_year in 1920i32..2020,
            birth_doy in 1u32..366,
            on_year in 2020i32..2080,
            on_doy in 1u32..366,
        ) {
            let dob = NaiveDate::from_yo_opt(birth_year, birth_doy)
                .unwrap_or_else(|| NaiveDate::from_yo_opt(birth_year, 1).unwrap());
            let on = NaiveDate::from_yo_opt(on_year, on_doy)
                .unwrap_or_else(|| NaiveDate::from_yo_opt(on_year, 1).unwrap());

            let age = patient_age(dob, on);
            let diff = on_year - birth_year;
            prop_assert!(age == diff || age == diff - 1);
            prop_assert!(age >= 0);
        }
    }
}
