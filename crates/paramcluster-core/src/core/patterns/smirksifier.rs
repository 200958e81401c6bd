use super::graph::ClusterGraph;
use super::traits::{ClusterRef, InferenceResult, PatternInferer};
use crate::core::models::molecule::Molecule;
use tracing::debug;

pub const DEFAULT_MAX_LAYERS: usize = 10;

/// Reference [`PatternInferer`] built on [`ClusterGraph`].
///
/// Every cluster gets a graph with the same number of neighbour layers. The
/// layer count grows from zero until the patterns, applied in list order with
/// the last match winning, type every atom group into its own cluster, or
/// until `max_layers` is reached or extra layers stop changing the graphs.
#[derive(Debug, Clone, Copy)]
pub struct ClusterSmirksifier {
    max_layers: usize,
}

impl Default for ClusterSmirksifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LAYERS)
    }
}

impl ClusterSmirksifier {
    pub fn new(max_layers: usize) -> Self {
        Self { max_layers }
    }

    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    fn types_every_group(
        molecules: &[&Molecule],
        clusters: &[ClusterRef<'_>],
        graphs: &[ClusterGraph],
    ) -> bool {
        clusters.iter().enumerate().all(|(own, cluster)| {
            cluster.iter_groups().all(|(m, group)| {
                let Some(molecule) = molecules.get(m) else {
                    return false;
                };
                graphs.iter().rposition(|g| g.matches(molecule, group)) == Some(own)
            })
        })
    }
}

impl PatternInferer for ClusterSmirksifier {
    fn infer(&self, molecules: &[&Molecule], clusters: &[ClusterRef<'_>]) -> InferenceResult {
        let mut previous: Option<Vec<ClusterGraph>> = None;
        let mut patterns = Vec::new();

        for layers in 0..=self.max_layers {
            let graphs: Vec<ClusterGraph> = clusters
                .iter()
                .map(|c| ClusterGraph::new(molecules, c.groups, layers))
                .collect();

            let grown = previous.as_ref().is_none_or(|prev| {
                prev.iter()
                    .zip(&graphs)
                    .any(|(a, b)| a.as_smirks() != b.as_smirks())
            });
            if !grown {
                debug!(layers, "Additional layers no longer change the patterns.");
                break;
            }

            patterns = clusters
                .iter()
                .zip(&graphs)
                .map(|(c, g)| (c.label.to_string(), g.as_smirks()))
                .collect();

            if Self::types_every_group(molecules, clusters, &graphs) {
                debug!(layers, clusters = clusters.len(), "Patterns type every group.");
                return InferenceResult::new(true, patterns);
            }
            previous = Some(graphs);
        }

        InferenceResult::new(false, patterns)
    }

    fn single_pattern(&self, molecules: &[&Molecule], cluster: ClusterRef<'_>) -> String {
        ClusterGraph::new(molecules, cluster.groups, 0).as_smirks()
    }
}
