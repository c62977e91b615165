//! Human-readable rendering of a [`ResolvedContext`] for logs and `portal resolve -v`.

use crate::types::ResolvedContext;

pub fn format_resolution_trace(context: &ResolvedContext) -> String {
    context.trace_lines().join("\n")
}

impl ResolvedContext {
    pub fn trace_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let resolved = self.resolved_path.as_deref().unwrap_or("nil");

        lines.push(format!(
            "ResolutionTrace app={} id={} family={} resolved={} winner={}",
            self.app_name, self.app_id, self.family, resolved, self.winning_strategy
        ));
        lines.push(format!(
            "ResolutionTrace title={:?} document={:?} source={}",
            self.raw_title.as_deref().unwrap_or(""),
            self.raw_document.as_deref().unwrap_or(""),
            self.window_source.as_deref().unwrap_or("nil")
        ));

        for (index, attempt) in self.attempts.iter().enumerate() {
            lines.push(format!(
                "ResolutionTrace attempt#{} strategy={} ok={} candidate={} detail={}",
                index + 1,
                attempt.strategy,
                attempt.succeeded,
                attempt.candidate_path.as_deref().unwrap_or("nil"),
                attempt.detail
            ));
        }

        lines
    }

    /// One line for status displays.
    pub fn summary(&self) -> String {
        match &self.resolved_path {
            Some(path) => format!("{}: {} (via {})", self.app_name, path, self.winning_strategy),
            None => {
                let tried: Vec<&str> = self.attempts.iter().map(|a| a.strategy.as_str()).collect();
                format!(
                    "{}: no project found (tried {})",
                    self.app_name,
                    if tried.is_empty() {
                        "nothing".to_string()
                    } else {
                        tried.join(", ")
                    }
                )
            }
        }
    }
}
