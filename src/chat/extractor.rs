// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Return the first vocabulary category contained in `message`, capitalized.
///
/// `message` is expected to be normalized already. Categories are tried in
/// declaration order, not by position in the message.
pub fn extract_category(message: &str, categories: &[String]) -> Option<String> {
    categories
        .iter()
        .find(|c| !c.is_empty() && message.contains(c.as_str()))
        .map(|c| capitalize(c))
}

// First character upper-cased, the rest lower-cased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
