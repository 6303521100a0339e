use crate::prompt::common::quoted_content;

/// Generate a prompt for a numbered Twitter thread, returned as JSON
pub fn twitter_thread_prompt(content: &str) -> String {
    format!(
        r#"
You are a Twitter content creator. Write a Twitter thread summarizing the following content.

- Break it into 3-4 tweets.
- Number the tweets sequentially (e.g., 1/4, 2/4, etc.).
- Add relevant emojis to make the thread more engaging.
- Ensure each tweet is concise and easy to understand.

Format like this example:
"""
{{
  "twitter_thread": [
    "1/ Summarization tools are transforming how we digest vast amounts of information. 🧠📚",
    "2/ With AI, we can condense long articles into bite-sized summaries that retain key points. 🔑💡",
    "3/ From research to business intelligence, AI summarization is becoming indispensable in many fields. 🔍📊"
  ]
}}
"""
{content}"#,
        content = quoted_content(content)
    )
}
