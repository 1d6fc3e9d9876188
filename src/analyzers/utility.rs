/// Rounds half-way cases towards positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Whole-number percentage of `count` over `total`, with `total` floored at 1.
pub fn share(count: usize, total: usize) -> f64 {
    round_half_up(count as f64 / total.max(1) as f64 * 100.0)
}

/// Cuts `label` to `max_chars` characters and appends `...` when it was longer.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
