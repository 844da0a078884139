use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Formats a rupiah amount with dot thousands separators, e.g. `Rp 1.250.000`.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if amount < 0.0 && rounded > 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Shortens long identifiers for labels, keeping the head and the tail.
pub fn short_id(id: &str, max_chars: usize) -> String {
    let count = id.chars().count();
    if count <= max_chars || max_chars < 5 {
        return id.to_owned();
    }

    let keep = max_chars - 1;
    let head = keep.div_ceil(2);
    let tail = keep - head;
    let start = id.chars().take(head).collect::<String>();
    let end = id.chars().skip(count - tail).collect::<String>();
    format!("{start}…{end}")
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
