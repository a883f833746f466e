// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Conversational query engine: keyword intent rules, category extraction,
//! per-intent report generators and the orchestrator tying them to history.

pub mod classifier;
pub mod engine;
pub mod extractor;
pub mod responses;
pub mod vocabulary;

pub use classifier::{Classification, classify, normalize};
pub use engine::QueryEngine;
pub use extractor::extract_category;
pub use vocabulary::Vocabulary;
