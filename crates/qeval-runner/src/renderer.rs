use ascii_tree::{write_tree, Tree};
use qeval_lib::results::RunSummary;

/// Renders a `RunSummary` into a human-readable ASCII tree format.
///
/// This gives a quick overview of the run directly in the terminal; the
/// full per-row detail lives in the JSON report.
pub fn render_summary_as_tree(summary: &RunSummary) -> String {
    let status_icon = if summary.scored_rows > 0 && summary.correct == summary.scored_rows {
        "✅"
    } else if summary.scored_rows > 0 {
        "📊"
    } else {
        "❌"
    };
    let accuracy_percent = summary.accuracy * 100.0;
    let root_label = format!(
        "{} Run {} [{}]: accuracy {:.2}% ({}/{} scored)",
        status_icon,
        summary.run_id,
        summary.split,
        accuracy_percent,
        summary.correct,
        summary.scored_rows
    );

    let counts_node = Tree::Leaf(vec![
        format!("Endpoint:      {}", summary.agent_endpoint),
        format!("Total rows:    {}", summary.total_rows),
        format!("Rows executed: {}", summary.rows_executed),
        format!("Scored rows:   {}", summary.scored_rows),
        format!("Correct:       {}", summary.correct),
        format!("Avg latency:   {} ms", summary.avg_latency_ms),
    ]);

    let mut children = vec![counts_node];
    if !summary.failure_counts.is_empty() {
        let failure_lines = summary
            .failure_counts
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        children.push(Tree::Node(
            "Failures".to_string(),
            vec![Tree::Leaf(failure_lines)],
        ));
    }

    let tree = Tree::Node(root_label, children);
    let mut buffer = String::new();
    write_tree(&mut buffer, &tree).unwrap();
    buffer
}
