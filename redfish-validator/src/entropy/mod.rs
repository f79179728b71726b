pub mod bit_statistics;

use serde::Serialize;
use std::collections::HashSet;

pub use bit_statistics::{monobit_frequency, runs};

const DEFAULT_MIN_P_VALUE: f64 = 0.01;
const DEFAULT_MIN_TOKEN_BITS: usize = 32;
const MAX_REPEATING_PERIOD: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EntropyThresholds {
    pub min_p_value: f64,
    pub min_token_bits: usize,
}

impl Default for EntropyThresholds {
    fn default() -> Self {
        Self {
            min_p_value: DEFAULT_MIN_P_VALUE,
            min_token_bits: DEFAULT_MIN_TOKEN_BITS,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DegeneratePattern {
    TooShort,
    Constant,
    Sequential,
    Repeating,
    LowDiversity,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenVerdict {
    Pass,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenClassification {
    pub degenerate: Option<DegeneratePattern>,
    pub monobit_p: Option<f64>,
    pub runs_p: Option<f64>,
    pub verdict: TokenVerdict,
}

impl TokenClassification {
    pub fn is_degenerate(&self) -> bool {
        self.degenerate.is_some()
    }

    pub fn is_random(&self) -> bool {
        self.verdict == TokenVerdict::Pass
    }
}

pub fn hex_to_bits(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    let mut bits = String::with_capacity(token.len() * 4);
    for digit in token.chars() {
        let value = digit.to_digit(16)?;
        bits.push_str(&format!("{:04b}", value));
    }

    Some(bits)
}

#[derive(Debug, Clone, Default)]
pub struct TokenAnalyzer {
    thresholds: EntropyThresholds,
}

impl TokenAnalyzer {
    pub fn new(thresholds: EntropyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &EntropyThresholds {
        &self.thresholds
    }

    pub fn classify(&self, token: &str) -> Option<TokenClassification> {
        let bits = hex_to_bits(token)?;

        if let Some(pattern) = self.degenerate_pattern(token, &bits) {
            return Some(TokenClassification {
                degenerate: Some(pattern),
                monobit_p: None,
                runs_p: None,
                verdict: TokenVerdict::Warn,
            });
        }

        let monobit_p = monobit_frequency(&bits);
        let runs_p = runs(&bits);
        let verdict =
            if monobit_p >= self.thresholds.min_p_value && runs_p >= self.thresholds.min_p_value {
                TokenVerdict::Pass
            } else {
                TokenVerdict::Warn
            };

        Some(TokenClassification {
            degenerate: None,
            monobit_p: Some(monobit_p),
            runs_p: Some(runs_p),
            verdict,
        })
    }

    pub fn is_random(&self, token: &str) -> Option<bool> {
        self.classify(token)
            .map(|classification| classification.is_random())
    }

    fn degenerate_pattern(&self, token: &str, bits: &str) -> Option<DegeneratePattern> {
        let digits: Vec<u32> = token.chars().filter_map(|c| c.to_digit(16)).collect();

        if bits.len() < self.thresholds.min_token_bits {
            Some(DegeneratePattern::TooShort)
        } else if digits.windows(2).all(|pair| pair[0] == pair[1]) {
            Some(DegeneratePattern::Constant)
        } else if Self::is_sequential(&digits) {
            Some(DegeneratePattern::Sequential)
        } else if Self::is_repeating(&digits) {
            Some(DegeneratePattern::Repeating)
        } else if digits.iter().collect::<HashSet<_>>().len() < 3 {
            Some(DegeneratePattern::LowDiversity)
        } else {
            None
        }
    }

    fn is_sequential(digits: &[u32]) -> bool {
        let steps: Vec<u32> = digits
            .windows(2)
            .map(|pair| (pair[1] + 16 - pair[0]) % 16)
            .collect();

        !steps.is_empty() && (steps.iter().all(|&s| s == 1) || steps.iter().all(|&s| s == 15))
    }

    fn is_repeating(digits: &[u32]) -> bool {
        (2..=MAX_REPEATING_PERIOD)
            .filter(|period| digits.len() >= period * 2)
            .any(|period| {
                digits
                    .iter()
                    .enumerate()
                    .all(|(i, digit)| *digit == digits[i % period])
            })
    }
}
