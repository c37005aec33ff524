//! Instructions sent to generative providers
//!
//! Each structured instruction names the labeled output format that the
//! matching parser in [`crate::parse`] expects.

/// Readability grading and simplification (`GRADE_LEVEL` / `NOTES` / `SIMPLIFIED_TEXT`)
pub const READABILITY: &str = "Analyze this text for readability:
1. Calculate approximate grade level (1-12)
2. Identify complex sentences
3. Simplify if grade level > 6
4. FOR KOREAN TEXT: Aggressively shorten sentences. Remove all redundant adjectives and adverbs. Make it direct.
5. LOGIC CHECK: Ensure the simplified text makes sense. If the original text was broken (e.g. \"Look ants\"), correct it to be grammatical (e.g. \"Look at the ants\").

Output format:
GRADE_LEVEL: [number]
NOTES: [brief analysis]
SIMPLIFIED_TEXT: [the improved text]";

/// Clear, formal paraphrase
pub const PARAPHRASE_STANDARD: &str = "Paraphrase this text clearly. Fix any logical errors. FOR KOREAN: Use formal, standard written style (문어체). Remove ambiguity.";

/// Shortening paraphrase
pub const PARAPHRASE_SIMPLE: &str = "Simplify this text. For Korean, reduce length by 30-50%. Ensure the result makes logical sense.";

/// Paraphrase that leaves required vocabulary alone
pub const PARAPHRASE_FREEZE_VOCABULARY: &str = "Paraphrase but keep key vocabulary words unchanged. Restructure the sentences around them so the context reads naturally.";

/// Casual and lively rewrite
pub const TONE_CASUAL_LIVELY: &str = "Rewrite this text to be lively, fun, and engaging.
1. FOR KOREAN: Use a friendly, enthusiastic tone (polite '해요' style). Add emotion and vitality to the sentences.
2. Make it sound like a popular blog post or storyteller.
3. Don't be stiff. Be creative!";

/// Deep style pass (`ISSUES` / `IMPROVED_TEXT`)
pub const DEEP_STYLE: &str = "Analyze and improve this text:
1. Check for style consistency
2. Identify logical flow issues
3. Check sensitivity/bias
4. Improve sentence variety

Output format:
ISSUES: [comma-separated list of issues found]
IMPROVED_TEXT: [the corrected text]";

/// Grammar correction when no grammar checker is reachable
pub const GRAMMAR_FALLBACK: &str = "Act like a grammar checker. Correct grammar, spelling, punctuation and spacing errors only. Do not rephrase sentences that are already correct.";

/// Diagnosis request (JSON)
pub const DIAGNOSIS: &str = r#"Analyze this educational text and diagnose issues:

1. Grade Level: What school grade is this appropriate for? (E1-E6, M1-M3, H1-H3)
2. Readability Score: 1-100 (100 = very easy)
3. Text Type: Is this formal (A) or casual (B)?
4. Issues Found: List any problems
5. Case: Which scenario applies?
   - CASE_A: Too difficult for target grade
   - CASE_B: Tone too formal/stiff for casual content
   - CASE_C: Required vocabulary makes context awkward
   - CASE_D: Mechanical errors (grammar, punctuation)
   - NORMAL: No major issues

Output as JSON:
{
    "grade_level": "M1",
    "readability_score": 75,
    "text_type": "A",
    "issues": ["sentence too long", "difficult vocabulary"],
    "case": "CASE_A"
}"#;

/// Diagnosis request with a target grade line
#[must_use]
pub fn diagnosis(target_grade: Option<&str>) -> String {
    match target_grade {
        Some(grade) => format!("{DIAGNOSIS}\n\nTarget grade: {grade}"),
        None => DIAGNOSIS.to_string(),
    }
}

/// Recycling request (JSON)
#[must_use]
pub fn recycling(target_grade: &str) -> String {
    format!(
        r#"Analyze this text for grade appropriateness.
Target grade: {target_grade}

If too difficult → suggest moving to higher grade DB
If too easy → suggest moving to lower grade DB
If appropriate → keep current

Output as JSON:
{{
    "current_level": "M2",
    "target_level": "{target_grade}",
    "is_appropriate": true,
    "recommendation": "keep",
    "reason": "explanation"
}}
recommendation is one of keep, move_up, move_down."#
    )
}

// Six-stage passthrough

/// Stage 1
pub const STAGE_SIMPLIFY: &str = "You are an English textbook content expert with 30 years of experience.
Simplify the following sentences to make them clear and concise, suitable for high-quality educational material.
Keep the meaning 100% intact.
Output ONLY the simplified text without explanation.";

/// Stage 2, used when the grammar checker is unreachable
pub const STAGE_GRAMMAR: &str = "You are an English editing expert with 30 years of experience in textbook publishing.
Perfectly correct the grammar, punctuation, and usage of the input text.
It must be flawless and adhere to standard English conventions.
Double-check for any subtle errors.
Output ONLY the corrected text without explanation.";

/// Stage 3
pub const STAGE_TONE: &str = "You are an educational content creator for students (K-12).
Change the tone of this text to be 'Hopeful, Positive, and Encouraging'.
Make it inspiring and suitable for young learners while maintaining the educational value.
Output ONLY the transformed text without explanation.";

/// Stage 4
pub const STAGE_STYLE: &str = "Act like a style checker. Polish the writing style so it reads naturally and professionally. Output ONLY the text.";

/// Stage 5
pub const STAGE_SENSITIVITY: &str = "Review this text for bias, offensive language, or sensitive content based on educational publishing standards. Purify it if necessary. If safe, output the original text. Output ONLY the text.";

/// Stage 6
pub const STAGE_FINAL_REVIEW: &str = "You are a veteran English textbook editor (30+ years experience).
Paraphrase this text to make it sound as natural, fluent, and polished as a native speaker's writing in a high-quality textbook.
Ensure maximum readability and elegance.
Output ONLY the final text without explanation.";
