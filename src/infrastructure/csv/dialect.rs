use crate::domain::Dialect;

// WooCommerce exports come with `;` or `,`; nothing else is sniffed
const CANDIDATES: [u8; 2] = [b';', b','];
const SAMPLE_LINES: usize = 10;

/// Detect the CSV dialect from a content sample.
///
/// Candidates are scored by per-line frequency and consistency; when the
/// sample gives no signal the semicolon default wins.
pub fn sniff_dialect(sample: &str) -> Dialect {
    let mut best = Dialect::default();
    let mut best_score = 0.0f32;

    for &delimiter in &CANDIDATES {
        let counts: Vec<usize> = sample
            .lines()
            .take(SAMPLE_LINES)
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        if counts.is_empty() {
            continue;
        }

        let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        let variance = counts
            .iter()
            .map(|&c| (c as f32 - avg).powi(2))
            .sum::<f32>()
            / counts.len() as f32;
        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best = Dialect {
                delimiter,
                quote: b'"',
            };
        }
    }

    best
}
