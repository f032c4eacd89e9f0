//! Rename hints
//!
//! Pairs removed and added symbols of the same kind whose signatures match
//! once the names are masked. Hints are informational and never change how a
//! removal or addition is classified.

use crate::features::snapshot::domain::SymbolInfo;
use crate::features::snapshot_diff::domain::{HintConfidence, RenameHint};
use crate::shared::utils::text::find_word;

/// Signature with the symbol's own name masked out
fn masked_signature(symbol: &SymbolInfo) -> String {
    match find_word(&symbol.signature, &symbol.name) {
        Some(pos) => format!(
            "{}\u{0}{}",
            &symbol.signature[..pos],
            &symbol.signature[pos + symbol.name.len()..]
        ),
        None => symbol.signature.clone(),
    }
}

fn bigrams(text: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Sørensen–Dice coefficient over character bigrams
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let left = bigrams(a);
    let mut right = bigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let total = left.len() + right.len();
    let mut shared = 0usize;
    for pair in &left {
        if let Some(pos) = right.iter().position(|p| p == pair) {
            right.swap_remove(pos);
            shared += 1;
        }
    }
    (2 * shared) as f64 / total as f64
}

/// Best-match pairing; each added symbol is used at most once
pub fn rename_hints(
    removed: &[&SymbolInfo],
    added: &[&SymbolInfo],
    min_similarity: f64,
) -> Vec<RenameHint> {
    let mut used = vec![false; added.len()];
    let mut hints = Vec::new();

    for old in removed {
        let old_sig = masked_signature(old);
        let best = added
            .iter()
            .enumerate()
            .filter(|(i, new)| !used[*i] && new.kind == old.kind)
            .map(|(i, new)| (i, similarity(&old_sig, &masked_signature(new))))
            .filter(|(_, score)| *score >= min_similarity)
            .fold(None::<(usize, f64)>, |best, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            });

        if let Some((index, score)) = best {
            used[index] = true;
            hints.push(RenameHint {
                kind: old.kind,
                from: old.name.clone(),
                to: added[index].name.clone(),
                similarity: score,
                confidence: HintConfidence::Low,
            });
        }
    }

    hints
}
