/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
pub fn escape_jsdoc(value: &str) -> String {
    value.replace("*/", "*\\/")
}

/// Wrap lines in a `/** ... **/` block.
pub fn doc_block(lines: &[String]) -> String {
    let mut out = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(" * ");
            out.push_str(&escape_jsdoc(line));
            out.push('\n');
        }
    }
    out.push_str(" **/");
    out
}

/// Collapse a possibly multi-line description onto one line.
pub fn inline_description(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Summary, description and deprecation lines for an operation.
pub fn summary_lines(summary: Option<&str>, description: Option<&str>, deprecated: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
        lines.extend(summary.lines().map(|l| l.trim_end().to_string()));
    }
    if let Some(description) = description.filter(|d| !d.trim().is_empty())
        && Some(description) != summary
    {
        lines.extend(description.lines().map(|l| l.trim_end().to_string()));
    }
    if deprecated {
        lines.push("@deprecated".to_string());
    }
    lines
}
