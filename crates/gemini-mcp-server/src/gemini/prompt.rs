// crates/gemini-mcp-server/src/gemini/prompt.rs
// Prompt shaping for consultations

/// Appended to context that was cut at `max_context_length`
pub const CONTEXT_TRUNCATION_MARKER: &str = "\n[Context truncated...]";

/// Characters of the query kept in a history record
pub const RECORDED_QUERY_CHARS: usize = 200;

const COMPARISON_HEADER: &str = "Please provide a technical analysis and second opinion:";

const COMPARISON_FOOTER: &[&str] = &[
    "Please structure your response with:",
    "1. Your analysis and understanding",
    "2. Recommendations or approach",
    "3. Any concerns or considerations",
    "4. Alternative approaches (if applicable)",
];

/// Build the full prompt sent to the CLI.
///
/// In comparison mode the query is wrapped in a header and a request for a
/// four-part answer. Otherwise the query goes out as-is, preceded by the
/// context when there is any.
pub fn prepare_query(
    query: &str,
    context: &str,
    comparison_mode: bool,
    max_context_length: usize,
) -> String {
    let context = truncate_context(context, max_context_length);

    let mut parts: Vec<&str> = Vec::new();
    if comparison_mode {
        parts.push(COMPARISON_HEADER);
        parts.push("");
    }

    if !context.is_empty() {
        parts.push("Context:");
        parts.push(&context);
        parts.push("");
    }

    parts.push("Question/Topic:");
    parts.push(query);

    if comparison_mode {
        parts.push("");
        parts.extend_from_slice(COMPARISON_FOOTER);
    }

    parts.join("\n")
}

/// Cut context to `max_chars` characters and mark the cut
pub fn truncate_context(context: &str, max_chars: usize) -> String {
    match context.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &context[..byte_idx], CONTEXT_TRUNCATION_MARKER),
        None => context.to_string(),
    }
}

/// Shorten a query for the consultation history
pub fn truncate_for_record(query: &str) -> String {
    match query.char_indices().nth(RECORDED_QUERY_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &query[..byte_idx]),
        None => query.to_string(),
    }
}
