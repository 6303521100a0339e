use crate::prompt::common::{quoted_content, NO_LABELS};

/// Generate a prompt for a neutral, business-toned abstract
pub fn abstract_prompt(content: &str) -> String {
    format!(
        r#"
You are an AI summarizer that condenses lengthy documents into clear, concise, and accurate summaries, keeping only the most important details.

- Maintain neutrality and objectivity.
- Ensure readability, with a tone suitable for business professionals.
- Remove any redundant information.
{no_labels}
{content}"#,
        no_labels = NO_LABELS,
        content = quoted_content(content)
    )
}

/// Generate a prompt for a LinkedIn post summarizing the content
pub fn linkedin_post_prompt(content: &str) -> String {
    format!(
        r#"
You are a professional LinkedIn content writer. Create a LinkedIn post summarizing the following content.

- Begin with an attention-grabbing headline.
- Write 2-3 paragraphs that highlight key points.
- End with a call to action or thought-provoking conclusion.
- Write in a professional, engaging tone.
- Use relevant hashtags at the end.

Format like this example:
"""
The Growing Importance of Automatic Summarization in the Age of Information Overload

With the increasing volume of digital content, summarization tools have become essential. These systems use advanced AI to distill long documents into concise, actionable insights, saving time for busy professionals.

Automatic summarization plays a critical role in everything from search engines to research tools, ensuring that the most important information is always accessible in a fraction of the time.

#AI #MachineLearning #Summarization #BusinessEfficiency #InformationOverload
"""
{content}"#,
        content = quoted_content(content)
    )
}
