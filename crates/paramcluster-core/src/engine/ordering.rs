use super::export::Cluster;
use crate::core::models::molecule::Molecule;
use crate::core::models::residue::Terminus;
use crate::core::patterns::traits::PatternInferer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Heuristics for ordering a cluster list before inference.
///
/// Every sort is stable, and each `big`/`most` strategy is the exact reverse
/// of its ascending counterpart, ties included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingStrategy {
    Original,
    Reversed,
    Shuffle,
    SmallSize,
    BiggestSize,
    FewestMols,
    MostMols,
    SmallSmirks,
    BigSmirks,
}

impl OrderingStrategy {
    pub const ALL: [OrderingStrategy; 9] = [
        OrderingStrategy::Original,
        OrderingStrategy::Reversed,
        OrderingStrategy::Shuffle,
        OrderingStrategy::SmallSize,
        OrderingStrategy::BiggestSize,
        OrderingStrategy::FewestMols,
        OrderingStrategy::MostMols,
        OrderingStrategy::SmallSmirks,
        OrderingStrategy::BigSmirks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OrderingStrategy::Original => "original",
            OrderingStrategy::Reversed => "reversed",
            OrderingStrategy::Shuffle => "shuffle",
            OrderingStrategy::SmallSize => "small_size",
            OrderingStrategy::BiggestSize => "biggest_size",
            OrderingStrategy::FewestMols => "fewest_mols",
            OrderingStrategy::MostMols => "most_mols",
            OrderingStrategy::SmallSmirks => "small_smirks",
            OrderingStrategy::BigSmirks => "big_smirks",
        }
    }

    /// Returns `clusters` reordered by this strategy.
    pub fn apply<'c>(
        self,
        clusters: &[&'c Cluster],
        context: &mut OrderingContext<'_>,
    ) -> Vec<&'c Cluster> {
        let mut ordered = clusters.to_vec();
        match self {
            OrderingStrategy::Original => {}
            OrderingStrategy::Reversed => ordered.reverse(),
            OrderingStrategy::Shuffle => ordered.shuffle(&mut context.rng),
            OrderingStrategy::SmallSize => ordered.sort_by_key(|c| c.size()),
            OrderingStrategy::BiggestSize => {
                ordered.sort_by_key(|c| c.size());
                ordered.reverse();
            }
            OrderingStrategy::FewestMols => ordered.sort_by_key(|c| c.molecule_count()),
            OrderingStrategy::MostMols => {
                ordered.sort_by_key(|c| c.molecule_count());
                ordered.reverse();
            }
            OrderingStrategy::SmallSmirks | OrderingStrategy::BigSmirks => {
                let mut keyed: Vec<(usize, &'c Cluster)> = ordered
                    .into_iter()
                    .map(|c| (context.pattern_length(c), c))
                    .collect();
                keyed.sort_by_key(|(len, _)| *len);
                ordered = keyed.into_iter().map(|(_, c)| c).collect();
                if self == OrderingStrategy::BigSmirks {
                    ordered.reverse();
                }
            }
        }
        ordered
    }
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ordering '{0}'")]
pub struct ParseOrderingError(pub String);

impl FromStr for OrderingStrategy {
    type Err = ParseOrderingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        OrderingStrategy::ALL
            .into_iter()
            .find(|o| o.name() == lowered)
            .ok_or_else(|| ParseOrderingError(s.to_string()))
    }
}

/// What the strategies may consult: the molecules and inferer for the
/// pattern-length orderings, and the random source for `shuffle`.
pub struct OrderingContext<'a> {
    pub molecules: &'a [&'a Molecule],
    pub inferer: &'a dyn PatternInferer,
    pub rng: StdRng,
}

impl<'a> OrderingContext<'a> {
    pub fn new(
        molecules: &'a [&'a Molecule],
        inferer: &'a dyn PatternInferer,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            molecules,
            inferer,
            rng,
        }
    }

    fn pattern_length(&self, cluster: &Cluster) -> usize {
        self.inferer
            .single_pattern(self.molecules, cluster.view())
            .len()
    }
}

/// Orders charge clusters one terminus segment at a time.
///
/// Clusters are split into interior, N-terminal and C-terminal segments by the
/// terminus tag of their signature, each segment is ordered by `strategy` (or
/// left in bucket order for `None`), and the segments are concatenated in that
/// order.
pub fn order_charge_clusters<'c>(
    clusters: &[&'c Cluster],
    strategy: Option<OrderingStrategy>,
    context: &mut OrderingContext<'_>,
) -> Vec<&'c Cluster> {
    let mut ordered = Vec::with_capacity(clusters.len());
    for terminus in [Terminus::Interior, Terminus::NTerminal, Terminus::CTerminal] {
        let segment: Vec<&Cluster> = clusters
            .iter()
            .copied()
            .filter(|c| c.signature.terminus().unwrap_or_default() == terminus)
            .collect();
        match strategy {
            Some(strategy) => ordered.extend(strategy.apply(&segment, context)),
            None => ordered.extend(segment),
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patterns::traits::{ClusterRef, InferenceResult};
    use crate::engine::signature::Signature;

    /// Inferer whose single-cluster pattern is the cluster label.
    struct LabelInferer;

    impl PatternInferer for LabelInferer {
        fn infer(&self, _: &[&Molecule], clusters: &[ClusterRef<'_>]) -> InferenceResult {
            InferenceResult::new(
                true,
                clusters
                    .iter()
                    .map(|c| (c.label.to_string(), c.label.to_string()))
                    .collect(),
            )
        }

        fn single_pattern(&self, _: &[&Molecule], cluster: ClusterRef<'_>) -> String {
            cluster.label.to_string()
        }
    }

    fn cluster(label: &str, groups: Vec<Vec<Vec<usize>>>) -> Cluster {
        Cluster {
            signature: Signature::bond(1.0, 1.0),
            label: label.to_string(),
            groups,
        }
    }

    fn charge(label: &str, terminus: Terminus) -> Cluster {
        Cluster {
            signature: Signature::charge(label.len() as f64, terminus),
            label: label.to_string(),
            groups: vec![vec![vec![0]]],
        }
    }

    fn labels(clusters: &[&Cluster]) -> Vec<String> {
        clusters.iter().map(|c| c.label.clone()).collect()
    }

    fn sample() -> Vec<Cluster> {
        vec![
            cluster("aaa", vec![vec![vec![0], vec![1]], vec![]]),
            cluster("b", vec![vec![vec![2]], vec![vec![0]]]),
            cluster("cc", vec![vec![vec![3]], vec![]]),
            cluster("dddd", vec![vec![vec![4], vec![5]], vec![vec![1], vec![2]]]),
        ]
    }

    fn with_context<T>(f: impl FnOnce(&mut OrderingContext<'_>) -> T) -> T {
        let molecules: Vec<&Molecule> = Vec::new();
        let mut context = OrderingContext::new(&molecules, &LabelInferer, Some(7));
        f(&mut context)
    }

    #[test]
    fn names_parse_and_display() {
        for strategy in OrderingStrategy::ALL {
            assert_eq!(strategy.name().parse::<OrderingStrategy>().unwrap(), strategy);
            assert_eq!(strategy.to_string(), strategy.name());
        }
        assert_eq!(
            "random".parse::<OrderingStrategy>(),
            Err(ParseOrderingError("random".to_string()))
        );
    }

    #[test]
    fn original_is_identity_and_reversed_twice_is_identity() {
        let clusters = sample();
        let refs: Vec<&Cluster> = clusters.iter().collect();
        with_context(|ctx| {
            assert_eq!(labels(&OrderingStrategy::Original.apply(&refs, ctx)), labels(&refs));
            let once = OrderingStrategy::Reversed.apply(&refs, ctx);
            assert_eq!(labels(&once), vec!["dddd", "cc", "b", "aaa"]);
            let twice = OrderingStrategy::Reversed.apply(&once, ctx);
            assert_eq!(labels(&twice), labels(&refs));
        });
    }

    #[test]
    fn size_orderings_are_stable_and_exact_reverses() {
        let clusters = sample();
        let refs: Vec<&Cluster> = clusters.iter().collect();
        with_context(|ctx| {
            let small = OrderingStrategy::SmallSize.apply(&refs, ctx);
            assert_eq!(labels(&small), vec!["cc", "aaa", "b", "dddd"]);
            let mut big = OrderingStrategy::BiggestSize.apply(&refs, ctx);
            big.reverse();
            assert_eq!(labels(&big), labels(&small));
        });
    }

    #[test]
    fn molecule_count_orderings() {
        let clusters = sample();
        let refs: Vec<&Cluster> = clusters.iter().collect();
        with_context(|ctx| {
            let fewest = OrderingStrategy::FewestMols.apply(&refs, ctx);
            assert_eq!(labels(&fewest), vec!["aaa", "cc", "b", "dddd"]);
            let most = OrderingStrategy::MostMols.apply(&refs, ctx);
            assert_eq!(labels(&most), vec!["dddd", "b", "cc", "aaa"]);
        });
    }

    #[test]
    fn pattern_length_orderings_use_single_patterns() {
        let clusters = sample();
        let refs: Vec<&Cluster> = clusters.iter().collect();
        with_context(|ctx| {
            let small = OrderingStrategy::SmallSmirks.apply(&refs, ctx);
            assert_eq!(labels(&small), vec!["b", "cc", "aaa", "dddd"]);
            let big = OrderingStrategy::BigSmirks.apply(&refs, ctx);
            assert_eq!(labels(&big), vec!["dddd", "aaa", "cc", "b"]);
        });
    }

    #[test]
    fn shuffle_is_a_permutation_and_reproducible_with_a_seed() {
        let clusters = sample();
        let refs: Vec<&Cluster> = clusters.iter().collect();
        let first = with_context(|ctx| labels(&OrderingStrategy::Shuffle.apply(&refs, ctx)));
        let second = with_context(|ctx| labels(&OrderingStrategy::Shuffle.apply(&refs, ctx)));
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["aaa", "b", "cc", "dddd"]);
    }

    #[test]
    fn charge_clusters_are_grouped_interior_then_n_then_c() {
        let clusters = vec![
            charge("c1", Terminus::CTerminal),
            charge("x111", Terminus::Interior),
            charge("n1", Terminus::NTerminal),
            charge("x1", Terminus::Interior),
            charge("c22", Terminus::CTerminal),
        ];
        let refs: Vec<&Cluster> = clusters.iter().collect();
        with_context(|ctx| {
            let kept = order_charge_clusters(&refs, None, ctx);
            assert_eq!(labels(&kept), vec!["x111", "x1", "n1", "c1", "c22"]);

            let reversed = order_charge_clusters(&refs, Some(OrderingStrategy::Reversed), ctx);
            assert_eq!(labels(&reversed), vec!["x1", "x111", "n1", "c22", "c1"]);

            let small = order_charge_clusters(&refs, Some(OrderingStrategy::SmallSmirks), ctx);
            assert_eq!(labels(&small), vec!["x1", "x111", "n1", "c1", "c22"]);
        });
    }

    #[test]
    fn empty_input_stays_empty() {
        with_context(|ctx| {
            for strategy in OrderingStrategy::ALL {
                assert!(strategy.apply(&[], ctx).is_empty());
            }
            assert!(order_charge_clusters(&[], None, ctx).is_empty());
        });
    }
}
