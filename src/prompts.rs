/// Prompt construction module
///
/// Builds the full prompt string sent to Gemini for a given content type.
/// Variant and angle selection is keyed off (day of year, run index) so the
/// same scheduled slot always produces the same prompt, while consecutive
/// runs and days rotate through different phrasings and topics.

use crate::rotation::{self, ContentType};

// Prepended to every prompt; the model kept reopening tweets with this exact
// phrase until it was banned outright.
const FORBIDDEN_OPENING: &str = "CRITICAL—FORBIDDEN: Do NOT use the phrase 'one thing that actually moved the needle' \
or 'one thing that moved the needle for our SLOs' or 'one thing that actually...' or any similar opening. \
That phrase is banned. Start with a different opening every time. ";

// Shared rules so tweets don't read like AI copy-paste.
const ANTI_AI_RULES: &str = "Never use: folks, remember, key takeaway, pro tip, here's the thing, the real culprit?, \
measure everything, moral of the story, bottom line. No sign-off that summarizes the tweet. \
Do NOT use quotation marks around phrases—only backticks for code. \
Do NOT use time references: no yesterday, today, this morning, last week, 2am, recently. Keep it timeless. ";

const HUMAN_STYLE: &str = "Write like someone thinking through a problem or lesson: punchy opening, then break it down. \
Use real technical detail (tool, command, metric). Sound like a dev posting to the timeline, not a blog. \
Output the tweet only, no quotes around it. Total length: under 280 characters. ";

// Paragraph-style layout: blank lines between sections.
const TWEET_STRUCTURE: &str = "Format (required): put a blank line (double newline) between each section so the tweet \
has clear visual paragraphs. Structure: opening hook, blank line, a section label or transition \
(e.g. 'The fix:', 'Problem:'), blank line, 2-4 short points each on its own line, blank line, \
closing line, then one valid URL and 1-2 hashtags. ";

const REFERENCE_RULES: &str = "Include exactly one REAL, valid URL that exists, from these domains only: \
https://kubernetes.io/docs/..., https://docs.github.com/..., https://prometheus.io/docs/..., \
https://docs.docker.com/..., https://cloud.google.com/docs/..., https://docs.aws.amazon.com/..., \
https://www.terraform.io/docs/..., https://github.com/... Do not invent URLs. End the tweet with the URL \
on its own line, then 1-2 real hashtags: #DevOps #SRE #Kubernetes #Docker #Cloud #K8s #CloudNative #Terraform #GitOps. ";

const VARIETY_RULES: &str = "Generate something different every time. Never repeat the same tweet or a near-copy. \
Change the opening line, the scenario, the tool, and the reference every time. Rotate: different clouds \
(AWS, GCP, k8s), different pain (builds, config, observability, cost, security). No generic filler. ";

const X_FORMATTING: &str = "Wrap code and technical identifiers in backticks (e.g. `kubectl get pods`, `livenessProbe`). \
No quotation marks for emphasis. ";

const INFO_DATA_THEORY: &str = "Include DATA or THEORY in every info tweet: define a metric, explain a concept \
(error budget, backoff, hot partition, eventual consistency), or give one concrete technical detail \
(formula, threshold, how it works). Write so readers can learn something and retain it. \
Never repeat: use a different concept, metric, or topic every time. ";

// Topic rotation so each run gets a different focus.
const TOPIC_ANGLES: [&str; 8] = [
    "Focus this tweet on: build speed or CI/CD.",
    "Focus this tweet on: config management or drift.",
    "Focus this tweet on: observability or metrics (not SLOs or 'moved the needle').",
    "Focus this tweet on: cost or resource usage.",
    "Focus this tweet on: security or supply chain.",
    "Focus this tweet on: runbooks or incident response.",
    "Focus this tweet on: probes, health checks, or rollout stability.",
    "Focus this tweet on: labels, naming, or discovery.",
];

// Info tweets additionally rotate which kind of data/theory they teach.
const INFO_CONCEPT_ANGLES: [&str; 6] = [
    "Explain or define one METRIC (what it counts, when to use it).",
    "Explain one CONCEPT (error budget, backoff, hot partition, eventual consistency).",
    "Explain HOW something works (probe order, rollout, retry logic).",
    "Give one LESSON with a concrete data point or threshold.",
    "Define or contrast two terms (SLI vs SLO, rate vs latency).",
    "Explain a failure mode and the data that would have caught it.",
];

const INFO_VARIANTS: [&str; 3] = [
    "Type: INFO/LEARNING. One tweet that TEACHES with data or theory (Kubernetes/cloud-native/SRE/DevOps). \
Use paragraph gaps. Include at least one: metric definition, concept explanation, or how-it-works detail. \
Example format (use a DIFFERENT concept and URL every time, never repeat the same topic):\n\
What does `container_memory_working_set_bytes` actually measure?\n\n\
The data:\n\n\
- Resident set + dirty memory. What the kernel could reclaim without swap.\n\
- OOMKill uses this. Not RSS alone.\n\n\
Use it for memory limits and alerts.\n\n\
https://kubernetes.io/docs/concepts/configuration/manage-resources-containers/\n\
#Kubernetes #SRE",
    "Type: INFO = LESSON LEARNED (with data). One tweet about a mistake or production lesson. Include one concrete \
data point or concept (metric, threshold, why it failed). Structure: hook, then 'The data:' or 'What we learned:', \
then 2-3 points with substance, then URL, then hashtags.",
    "Type: INFO = CONCEPT or HOW-IT-WORKS. One tweet that explains one concept: error budget, backoff, hot partition, \
SLI vs SLO, probe order, etc. Give enough detail that someone can read and understand. Different concept every time.",
];

const QUESTION_VARIANTS: [&str; 3] = [
    "Type: ASK FOR OPINION/EXPERIENCE. One tweet inviting replies (what they use, their experience). Use paragraph \
gaps. End with real URL and hashtags. \
Example format: scenario or question\\n\\nRequirement or options\\n\\n- point\\n- point\\n\\nClosing question\\n\\nURL\\n#Hashtag",
    "Type: ASK = HOW DO YOU HANDLE. One tweet: scenario, then 'Problem:' or 'Requirement:', then 2-3 points, then \
how do you solve it? Use paragraph gaps. URL + hashtags at end. \
Example format: hook\\n\\nlabel\\n\\npoints\\n\\nquestion\\n\\nURL\\n#Hashtag",
    "Type: ASK = WHAT'S YOUR TAKE. One tweet asking for opinion. Paragraph gaps. Real URL and 1-2 hashtags. Never \
repeat the same question or link. \
Example format: hook\\n\\npoints\\n\\nquestion\\n\\nURL\\n#Hashtag",
];

const CRICKET_VARIANTS: [&str; 2] = [
    "Type: CRICKET = T20 WORLD CUP 2026. One tweet about the ongoing T20 World Cup 2026: today's matches, a match \
result, key player performance, or a standout moment. Write as if matches are happening every day. Use paragraph \
gaps. End with 1-2 hashtags: #T20WorldCup2026 #T20WorldCup #Cricket #TeamIndia. Optional: valid URL (ICC, scorecard).",
    "Type: CRICKET = T20 WORLD CUP 2026 QUESTION. One tweet engaging fans: who wins today's match? your XI for the \
next game? best performance so far? prediction for the knockouts? Use paragraph gaps. End with #T20WorldCup2026 \
#T20WorldCup #Cricket or a team hashtag. Different match or angle each time.",
];

const POLL_VARIANT: &str = "Type: POLL. Generate a Twitter poll for Kubernetes/cloud-native/SRE/DevOps. \
Output format (strict): Line 1 = the poll question (under 280 chars). Lines 2-5 = exactly 2 to 4 poll options, \
one per line, each option under 25 characters. Pick a different topic every time; never repeat the same question \
or option set. No time refs. Question can use backticks. Options: short, clear. No quotes. Example format:\n\
Preferred way to run stateful workloads on k8s?\n\
StatefulSet\n\
Operator (e.g. Strimzi)\n\
External DB\n\
Depends";

/// Number of prompt variants available for a content type.
pub fn num_variants(content_type: ContentType) -> usize {
    match content_type {
        ContentType::Info => INFO_VARIANTS.len(),
        ContentType::Question => QUESTION_VARIANTS.len(),
        ContentType::Cricket => CRICKET_VARIANTS.len(),
        ContentType::Poll => 1,
    }
}

/// Build the full prompt for this content type, day, and run.
pub fn build_prompt(content_type: ContentType, day_of_year: u32, run_index: u8) -> String {
    let angle =
        TOPIC_ANGLES[(day_of_year as usize * 3 + run_index as usize) % TOPIC_ANGLES.len()];
    let variant = rotation::variant_index(day_of_year, run_index, num_variants(content_type));

    match content_type {
        ContentType::Info => {
            let concept = INFO_CONCEPT_ANGLES
                [(day_of_year as usize * 3 + run_index as usize) % INFO_CONCEPT_ANGLES.len()];
            format!(
                "{}{}{}{}{}{}{}{}{}\n\n{} Do not use the same opening or topic as a generic \
                 SLO/observability tweet. This info tweet must: {}",
                FORBIDDEN_OPENING,
                ANTI_AI_RULES,
                HUMAN_STYLE,
                INFO_DATA_THEORY,
                TWEET_STRUCTURE,
                REFERENCE_RULES,
                VARIETY_RULES,
                X_FORMATTING,
                INFO_VARIANTS[variant],
                angle,
                concept
            )
        }
        ContentType::Question => format!(
            "{}{}{}{}{}{}{}{}\n\n{} Do not use the same opening or topic as a generic \
             SLO/observability tweet.",
            FORBIDDEN_OPENING,
            ANTI_AI_RULES,
            HUMAN_STYLE,
            TWEET_STRUCTURE,
            REFERENCE_RULES,
            VARIETY_RULES,
            X_FORMATTING,
            QUESTION_VARIANTS[variant],
            angle
        ),
        ContentType::Cricket => format!(
            "{}{}{}{}{}{}\n\nBase this on T20 World Cup 2026: a specific match, result, player, \
             or moment from the ongoing tournament. Vary which match or team you talk about.",
            FORBIDDEN_OPENING,
            ANTI_AI_RULES,
            HUMAN_STYLE,
            TWEET_STRUCTURE,
            VARIETY_RULES,
            CRICKET_VARIANTS[variant]
        ),
        ContentType::Poll => format!(
            "{}{}{}{}\n\n{}",
            FORBIDDEN_OPENING, ANTI_AI_RULES, VARIETY_RULES, POLL_VARIANT, angle
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_are_deterministic() {
        for ct in crate::rotation::CONTENT_TYPES {
            assert_eq!(build_prompt(ct, 42, 2), build_prompt(ct, 42, 2));
        }
    }

    #[test]
    fn variants_rotate_across_runs() {
        // Info has 3 variants, so three consecutive runs on one day differ.
        let a = build_prompt(ContentType::Info, 100, 1);
        let b = build_prompt(ContentType::Info, 100, 2);
        let c = build_prompt(ContentType::Info, 100, 3);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn every_prompt_carries_the_banned_opening_rule() {
        for ct in crate::rotation::CONTENT_TYPES {
            let prompt = build_prompt(ct, 7, 1);
            assert!(prompt.contains("FORBIDDEN"));
        }
    }

    #[test]
    fn info_and_question_prompts_carry_example_formats() {
        // Variant 0 of each set embeds a concrete example shape.
        // Info: day 2, run 1 -> (2 + 1) % 3 == 0.
        let info = build_prompt(ContentType::Info, 2, 1);
        assert!(info.contains("container_memory_working_set_bytes"));

        let question = build_prompt(ContentType::Question, 2, 1);
        assert!(question.contains("Example format:"));
    }

    #[test]
    fn poll_prompt_requires_strict_line_format() {
        let prompt = build_prompt(ContentType::Poll, 15, 3);
        assert!(prompt.contains("Line 1 = the poll question"));
        assert!(prompt.contains("2 to 4 poll options"));
    }
}
