/// Instruction appended where the model tends to prefix its answer with a label.
pub const NO_LABELS: &str = r#"- Do not add labels like "Summary:" or any markdown."#;

/// Wrap the caller's text in the delimiters every template uses.
pub fn quoted_content(content: &str) -> String {
    format!(
        r#"
Text to summarize:
"""{content}"""
"#,
        content = content
    )
}
