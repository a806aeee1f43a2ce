// compare.rs - Result comparator: canonical ranking, fastest pick, chart series

use thiserror::Error;

use crate::error_handling::ProtocolError;
use crate::types::{Color, HeuristicResult, ResultSet};

/// Display order for the heuristics the solver service knows about.
pub const CANONICAL_ORDER: [&str; 3] = ["manhattan", "KNN", "decision_tree"];

/// Bar color for a heuristic that has no entry in the palette.
pub const UNKNOWN_COLOR: Color = Color::rgb(0x9E, 0x9E, 0x9E);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareError {
    #[error("result set is empty")]
    EmptyResultSet,
}

impl From<CompareError> for ProtocolError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::EmptyResultSet => ProtocolError::EmptyResultSet,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Every entry of the input, in canonical order.
    pub ranked: Vec<(String, HeuristicResult)>,
    /// Name with the smallest time; the earliest in `ranked` on ties.
    pub fastest: String,
}

impl Comparison {
    pub fn get(&self, name: &str) -> Option<&HeuristicResult> {
        self.ranked
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, result)| result)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ranked.iter().map(|(name, _)| name.as_str())
    }

    /// Labels, times and colors for the comparison chart, index-aligned.
    pub fn chart_series(&self) -> ChartSeries {
        let mut series = ChartSeries::default();
        for (name, result) in &self.ranked {
            series.labels.push(display_name(name));
            series.values.push(result.time);
            series.colors.push(heuristic_color(name));
        }
        series
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
}

/// Rank `results` by `canonical_order` and pick the fastest heuristic.
///
/// Names missing from `canonical_order` sort after all known names, in
/// lexicographic order among themselves. Pure: same input, same output.
pub fn compare<S: AsRef<str>>(
    results: &ResultSet,
    canonical_order: &[S],
) -> Result<Comparison, CompareError> {
    let rank_of = |name: &str| {
        canonical_order
            .iter()
            .position(|known| known.as_ref() == name)
            .unwrap_or(usize::MAX)
    };

    let mut ranked: Vec<(String, HeuristicResult)> = results
        .iter()
        .map(|(name, result)| (name.clone(), result.clone()))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| rank_of(a).cmp(&rank_of(b)).then_with(|| a.cmp(b)));

    let mut fastest: Option<(&str, f64)> = None;
    for (name, result) in &ranked {
        if fastest.map_or(true, |(_, best)| result.time < best) {
            fastest = Some((name.as_str(), result.time));
        }
    }
    let fastest = fastest.ok_or(CompareError::EmptyResultSet)?.0.to_string();

    Ok(Comparison { ranked, fastest })
}

/// `decision_tree` -> `Decision Tree`; words keep their remaining case.
pub fn display_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn heuristic_color(name: &str) -> Color {
    match name {
        "manhattan" => Color::rgb(0xFF, 0x63, 0x84),
        "KNN" => Color::rgb(0x36, 0xA2, 0xEB),
        "decision_tree" => Color::rgb(0xFF, 0xCE, 0x56),
        _ => UNKNOWN_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SolutionOverlay;
    use proptest::prelude::*;

    fn result(time: f64) -> HeuristicResult {
        HeuristicResult {
            time,
            overlay: SolutionOverlay::new(vec![vec![2]]).unwrap(),
        }
    }

    fn results(entries: &[(&str, f64)]) -> ResultSet {
        entries
            .iter()
            .map(|&(name, time)| (name.to_string(), result(time)))
            .collect()
    }

    fn ranked_names(c: &Comparison) -> Vec<&str> {
        c.names().collect()
    }

    #[test]
    fn test_canonical_order_and_fastest() {
        let set = results(&[("decision_tree", 0.003), ("manhattan", 0.002), ("KNN", 0.0015)]);
        let c = compare(&set, &CANONICAL_ORDER).unwrap();
        assert_eq!(ranked_names(&c), vec!["manhattan", "KNN", "decision_tree"]);
        assert_eq!(c.fastest, "KNN");
        assert_eq!(c.get("KNN").map(|r| r.time), Some(0.0015));
    }

    #[test]
    fn test_empty_result_set_fails() {
        assert_eq!(
            compare(&ResultSet::new(), &CANONICAL_ORDER),
            Err(CompareError::EmptyResultSet)
        );
    }

    #[test]
    fn test_tie_goes_to_first_ranked() {
        let set = results(&[("decision_tree", 0.001), ("KNN", 0.001), ("manhattan", 0.004)]);
        let c = compare(&set, &CANONICAL_ORDER).unwrap();
        assert_eq!(c.fastest, "KNN");
    }

    #[test]
    fn test_unknown_names_sort_last() {
        let set = results(&[("zeta", 0.1), ("KNN", 0.5), ("alpha", 0.2)]);
        let c = compare(&set, &CANONICAL_ORDER).unwrap();
        assert_eq!(ranked_names(&c), vec!["KNN", "alpha", "zeta"]);
        assert_eq!(c.fastest, "zeta");
    }

    #[test]
    fn test_missing_known_name_is_fine() {
        let set = results(&[("decision_tree", 0.3), ("manhattan", 0.2)]);
        let c = compare(&set, &CANONICAL_ORDER).unwrap();
        assert_eq!(ranked_names(&c), vec!["manhattan", "decision_tree"]);
    }

    #[test]
    fn test_chart_series_is_aligned() {
        let set = results(&[("KNN", 0.2), ("manhattan", 0.1), ("bfs", 0.4)]);
        let series = compare(&set, &CANONICAL_ORDER).unwrap().chart_series();
        assert_eq!(series.labels, vec!["Manhattan", "KNN", "Bfs"]);
        assert_eq!(series.values, vec![0.1, 0.2, 0.4]);
        assert_eq!(
            series.colors,
            vec![
                Color::rgb(0xFF, 0x63, 0x84),
                Color::rgb(0x36, 0xA2, 0xEB),
                UNKNOWN_COLOR
            ]
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("decision_tree"), "Decision Tree");
        assert_eq!(display_name("manhattan"), "Manhattan");
        assert_eq!(display_name("KNN"), "KNN");
        assert_eq!(display_name("a__b"), "A  B");
    }

    fn arb_results() -> impl Strategy<Value = ResultSet> {
        let name = prop_oneof![
            Just("manhattan".to_string()),
            Just("KNN".to_string()),
            Just("decision_tree".to_string()),
            "[a-z]{1,6}",
        ];
        proptest::collection::hash_map(name, 0u32..50, 1..6).prop_map(|m| {
            m.into_iter()
                .map(|(name, millis)| (name, result(f64::from(millis) / 1000.0)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn ranked_is_a_canonically_ordered_permutation(set in arb_results()) {
            let c = compare(&set, &CANONICAL_ORDER).unwrap();
            prop_assert_eq!(c.ranked.len(), set.len());
            for (name, result) in &c.ranked {
                prop_assert_eq!(set.get(name), Some(result));
            }

            let known: Vec<usize> = c
                .names()
                .filter_map(|n| CANONICAL_ORDER.iter().position(|k| *k == n))
                .collect();
            prop_assert!(known.windows(2).all(|w| w[0] < w[1]));

            // known names come before unknown ones
            let is_known = |n: &str| CANONICAL_ORDER.iter().any(|k| *k == n);
            if let Some(idx) = c.names().position(|n| !is_known(n)) {
                prop_assert!(c.names().skip(idx).all(|n| !is_known(n)));
            };
        }

        #[test]
        fn fastest_is_first_minimum(set in arb_results()) {
            let c = compare(&set, &CANONICAL_ORDER).unwrap();
            let min = c.ranked.iter().map(|(_, r)| r.time).fold(f64::INFINITY, f64::min);
            let first_min = c.ranked.iter().find(|(_, r)| r.time == min).map(|(n, _)| n.clone());
            prop_assert_eq!(Some(c.fastest.clone()), first_min);
        }

        #[test]
        fn compare_is_deterministic(set in arb_results()) {
            prop_assert_eq!(compare(&set, &CANONICAL_ORDER), compare(&set, &CANONICAL_ORDER));
        }
    }
}
