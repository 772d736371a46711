//! Word co-occurrence graphs and PageRank over them
use ndarray::prelude::*;
use serde::Deserialize;
use std::cmp::{max, min};
use std::str::FromStr;

use crate::errors::*;
use crate::farm::{new_farm, new_plain, FarmMap, PlainMap};

/// Damping factor
pub const ALPHA: f64 = 0.85;
pub const MAX_ITER: usize = 100;
/// Convergence tolerance, per node
pub const TOLERANCE: f64 = 1.0e-6;

/// How repeated co-occurrences add up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeWeighting {
    /// An edge is there or it isn't
    Binary,
    /// Edge weight is the number of co-occurrences
    Count,
}

impl FromStr for EdgeWeighting {
    type Err = Error;

    fn from_str(s: &str) -> Result<EdgeWeighting> {
        match s.to_lowercase().as_str() {
            "binary" => Ok(EdgeWeighting::Binary),
            "count" => Ok(EdgeWeighting::Count),
            _ => Err(Error::InvalidConfig(format!("unknown edge weighting '{}', expected binary or count", s))),
        }
    }
}

/// An undirected weighted graph of the distinct words in a sequence
#[derive(Debug, Clone)]
pub struct CooccurrenceGraph {
    /// Node labels, in order of first appearance
    pub nodes: Vec<String>,
    ids: FarmMap<String, usize>,
    /// Symmetric adjacency matrix
    pub weights: Array2<f64>,
}

impl CooccurrenceGraph {
    /// Connect every pair of different words that appear fewer than `window_size` positions apart
    pub fn build<S: AsRef<str>>(words: &[S], window_size: usize, weighting: EdgeWeighting) -> Self {
        let mut nodes = vec![];
        let mut ids: FarmMap<String, usize> = new_farm();
        let word_ids: Vec<usize> = words.iter()
            .map(|w| {
                let w = w.as_ref();
                if let Some(&id) = ids.get(w) {
                    return id;
                }
                ids.insert(w.to_string(), nodes.len());
                nodes.push(w.to_string());
                nodes.len() - 1
            })
            .collect();

        // Edge keys pack both node ids, smaller first
        let mut edges: PlainMap<u64, f64> = new_plain();
        for center in 0..word_ids.len() {
            for context in center + 1..min(word_ids.len(), center + window_size) {
                let (a, b) = (word_ids[center], word_ids[context]);
                if a == b {
                    continue;
                }
                let key = ((min(a, b) as u64) << 32) | max(a, b) as u64;
                let weight = edges.entry(key).or_insert(0.0);
                match weighting {
                    EdgeWeighting::Binary => *weight = 1.0,
                    EdgeWeighting::Count => *weight += 1.0,
                }
            }
        }

        let mut weights: Array2<f64> = Array2::zeros((nodes.len(), nodes.len()));
        for (key, weight) in edges {
            let (a, b) = ((key >> 32) as usize, (key & 0xffff_ffff) as usize);
            weights[[a, b]] = weight;
            weights[[b, a]] = weight;
        }
        CooccurrenceGraph { nodes, ids, weights }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn id(&self, word: &str) -> Option<usize> {
        self.ids.get(word).cloned()
    }

    pub fn weight(&self, a: &str, b: &str) -> f64 {
        match (self.id(a), self.id(b)) {
            (Some(a), Some(b)) => self.weights[[a, b]],
            _ => 0.0,
        }
    }

    /// PageRank score of every node, in node order, summing to one.
    ///
    /// `personalization` biases the random jumps (and the mass leaving nodes without edges)
    /// towards some nodes. It is normalized here, and ignored when it sums to zero.
    pub fn pagerank(&self, personalization: Option<&[f64]>) -> Vec<f64> {
        let n = self.len();
        if n == 0 {
            return vec![];
        }
        let uniform = Array1::from_elem(n, 1.0 / n as f64);
        let jump = match personalization {
            Some(p) if p.len() == n && p.iter().sum::<f64>() > 0.0 => {
                let total: f64 = p.iter().sum();
                Array1::from_iter(p.iter().map(|x| x / total))
            }
            _ => uniform.clone(),
        };

        // Rows are normalized by scaling the mass vector, not a copy of the matrix.
        // Rows with zero strength are dangling nodes.
        let strength = self.weights.sum_axis(Axis(1));
        let inverse = strength.mapv(|s| if s > 0.0 { 1.0 / s } else { 0.0 });

        let mut x = uniform;
        for iteration in 0..MAX_ITER {
            let last = x;
            let dangling: f64 = last.iter()
                .zip(strength.iter())
                .filter(|&(_, &s)| s == 0.0)
                .map(|(v, _)| v)
                .sum();
            x = (&last * &inverse).dot(&self.weights) * ALPHA + &jump * (ALPHA * dangling + 1.0 - ALPHA);
            let err: f64 = x.iter().zip(last.iter()).map(|(a, b)| (a - b).abs()).sum();
            if err < n as f64 * TOLERANCE {
                debug!("PageRank converged after {} iterations", iteration + 1);
                return x.to_vec();
            }
        }
        warn!("PageRank did not converge within {} iterations", MAX_ITER);
        x.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_connects_nearby_words() {
        let words = ["wage", "worker", "wage", "union"];
        let binary = CooccurrenceGraph::build(&words, 2, EdgeWeighting::Binary);
        assert_eq!(binary.nodes, vec!["wage", "worker", "union"]);
        assert_eq!(binary.weight("wage", "worker"), 1.0);
        assert_eq!(binary.weight("worker", "wage"), 1.0);
        assert_eq!(binary.weight("wage", "union"), 1.0);
        assert_eq!(binary.weight("worker", "union"), 0.0);
        assert_eq!(binary.weight("wage", "wage"), 0.0);

        let counted = CooccurrenceGraph::build(&words, 2, EdgeWeighting::Count);
        assert_eq!(counted.weight("wage", "worker"), 2.0);
        let wide = CooccurrenceGraph::build(&words, 4, EdgeWeighting::Count);
        assert_eq!(wide.weight("worker", "union"), 1.0);
    }

    #[test]
    fn pagerank_favours_hubs_and_sums_to_one() {
        // a star around "job"
        let words = ["job", "pay", "job", "care", "job", "union"];
        let graph = CooccurrenceGraph::build(&words, 2, EdgeWeighting::Binary);
        let ranks = graph.pagerank(None);
        assert!((ranks.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        let hub = ranks[graph.id("job").unwrap()];
        for leaf in &["pay", "care", "union"] {
            let r = ranks[graph.id(leaf).unwrap()];
            assert!(hub > r);
            assert!((r - ranks[graph.id("pay").unwrap()]).abs() < 1e-6);
        }
    }

    #[test]
    fn personalization_and_isolated_nodes() {
        let graph = CooccurrenceGraph::build(&["a", "b", "c"], 2, EdgeWeighting::Binary);
        let plain = graph.pagerank(None);
        assert!((plain[0] - plain[2]).abs() < 1e-6);
        let biased = graph.pagerank(Some(&[3.0, 0.0, 0.0][..]));
        assert!(biased[0] > biased[2]);

        let lonely = CooccurrenceGraph::build(&["solo"], 2, EdgeWeighting::Count);
        let ranks = lonely.pagerank(None);
        assert_eq!(ranks.len(), 1);
        assert!((ranks[0] - 1.0).abs() < 1e-9);
        assert!(CooccurrenceGraph::build::<&str>(&[], 2, EdgeWeighting::Count).pagerank(None).is_empty());
    }

    #[test]
    fn walks_the_row_normalized_graph() {
        let words = ["wage", "worker", "wage", "union", "worker", "pay", "wage"];
        let graph = CooccurrenceGraph::build(&words, 3, EdgeWeighting::Count);
        let n = graph.len();

        // power iteration over an explicitly normalized copy
        let mut transitions = graph.weights.clone();
        for mut row in transitions.outer_iter_mut() {
            let s = row.sum();
            if s > 0.0 {
                row.mapv_inplace(|x| x / s);
            }
        }
        let mut expected = Array1::from_elem(n, 1.0 / n as f64);
        for _ in 0..MAX_ITER {
            expected = expected.dot(&transitions) * ALPHA + (1.0 - ALPHA) / n as f64;
        }

        let ranks = graph.pagerank(None);
        for (got, want) in ranks.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-4, "{:?} vs {:?}", ranks, expected);
        }
    }
}
