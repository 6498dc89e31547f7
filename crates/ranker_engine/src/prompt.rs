//! Prompt text sent to the narrative generator.

const ADVISER_BRIEF: &str = "\
You are a warm, encouraging UK careers adviser talking to a learner aged 12-14. \
Help them explore the jobs they dream about with curiosity and self-belief. \
Never judge or criticise a choice; frame every point as something they can grow into. \
Use plain, age-appropriate UK English and suggest small, practical next steps.";

const PER_JOB_ASKS: [&str; 5] = [
    "3-4 key skills",
    "a typical UK salary range (entry level to experienced)",
    "common UK routes in (GCSEs, A-levels, T Levels, college, apprenticeships)",
    "3-4 personal traits that help",
    "a short note on the current UK employment outlook",
];

/// Builds the analysis prompt for a ranked list, most preferred first.
///
/// Items are numbered `1)`, `2)`, ... so the reply can be split back into
/// per-item sections.
pub fn build_prompt(ranking: &[String], traits: Option<&str>) -> String {
    let count = ranking.len();
    let mut prompt = String::from(ADVISER_BRIEF);
    prompt.push_str("\n\n");

    if let Some(traits) = traits.map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(
            "The learner's personality type is {traits}. Where it fits, relate your advice to it.\n\n"
        ));
    }

    prompt.push_str("Their dream jobs, from most to least wanted, are:\n");
    for (index, job) in ranking.iter().enumerate() {
        prompt.push_str(&format!("{}) {}\n", index + 1, job.trim()));
    }

    prompt.push_str(
        "\nAnswer job by job, starting each one on a new line with its number and \
         name exactly as above (for example \"1) ...\"). For each job, give:\n",
    );
    for ask in PER_JOB_ASKS {
        prompt.push_str(&format!("- {ask}\n"));
    }

    prompt.push_str(&format!(
        "\nThen compare the {}: what do they have in common, and how are they different?\n",
        jobs_phrase(count)
    ));
    prompt.push_str(
        "Finish with a short, encouraging paragraph suggesting concrete next steps \
         the learner could take this month.\n",
    );
    prompt
}

/// Builds the prompt for one follow-up chat question.
pub fn build_chat_prompt(ranking: &[String], message: &str) -> String {
    let mut prompt = String::from(ADVISER_BRIEF);
    if !ranking.is_empty() {
        prompt.push_str("\n\nThe learner ranked these dream jobs: ");
        prompt.push_str(&ranking.join(", "));
        prompt.push('.');
    }
    prompt.push_str("\n\nAnswer their question in a few friendly sentences:\n");
    prompt.push_str(message.trim());
    prompt.push('\n');
    prompt
}

fn jobs_phrase(count: usize) -> String {
    const WORDS: [&str; 6] = ["zero", "one", "two", "three", "four", "five"];
    let number = WORDS
        .get(count)
        .map_or_else(|| count.to_string(), |word| word.to_string());
    if count == 1 {
        format!("{number} job")
    } else {
        format!("{number} jobs")
    }
}
