//! Longest-matching-block similarity, compatible with Python's
//! `difflib.SequenceMatcher` (no junk function, default autojunk).
//!
//! Sequences are compared per Unicode scalar value so Tamil input that
//! slips through translation is measured the same way as ASCII.

use std::collections::HashMap;

/// Sequences at least this long get their most frequent elements marked popular.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let b2j = chain_b(&b);
        Self { a: a.chars().collect(), b, b2j }
    }

    /// Swap the first sequence while keeping the index built over the second.
    pub fn set_seq1(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    /// Longest block with `a[alo..ahi]` and `b[blo..bhi]` equal; earliest in
    /// `a` wins, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (&self.a, &self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(ch) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }
        // Popular elements are missing from b2j; grow the block across them.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi && bestj + bestsize < bhi && a[besti + bestsize] == b[bestj + bestsize] {
            bestsize += 1;
        }
        Match { a: besti, b: bestj, size: bestsize }
    }

    /// Non-overlapping matching blocks in ascending order, adjacent blocks
    /// merged, terminated by a zero-sized sentinel.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => last.size += m.size,
                _ => merged.push(m),
            }
        }
        merged.push(Match { a: la, b: lb, size: 0 });
        merged
    }

    /// `2 * M / T`, where M counts matched elements and T is the combined length.
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from shared element counts, ignoring order.
    pub fn quick_ratio(&self) -> f64 {
        let mut avail: HashMap<char, isize> = HashMap::new();
        for ch in &self.b {
            *avail.entry(*ch).or_insert(0) += 1;
        }
        let mut matches = 0usize;
        for ch in &self.a {
            let slot = avail.entry(*ch).or_insert(0);
            if *slot > 0 {
                matches += 1;
            }
            *slot -= 1;
        }
        calculate_ratio(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from lengths alone.
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

fn chain_b(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }
    let n = b.len();
    if n >= AUTOJUNK_MIN_LEN {
        let ntest = n / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= ntest);
    }
    b2j
}

/// Best candidates for `word` scoring at least `cutoff`, highest first.
///
/// Equal scores keep the order in which `possibilities` were given, so the
/// earlier candidate wins a tie.
pub fn close_matches<'a, I>(word: &str, possibilities: I, n: usize, cutoff: f64) -> Vec<(f64, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }
    let mut matcher = SequenceMatcher::new("", word);
    let mut scored = Vec::new();
    for candidate in possibilities {
        matcher.set_seq1(candidate);
        if matcher.real_quick_ratio() >= cutoff && matcher.quick_ratio() >= cutoff {
            let score = matcher.ratio();
            if score >= cutoff {
                scored.push((score, candidate));
            }
        }
    }
    // Stable sort: ties stay in input order.
    scored.sort_by(|x, y| y.0.partial_cmp(&x.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(n);
    scored
}
