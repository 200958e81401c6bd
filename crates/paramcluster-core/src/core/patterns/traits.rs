use crate::core::models::molecule::Molecule;
use serde::Serialize;

/// Ordered atom indices of one force-field term.
pub type AtomGroup = Vec<usize>;

/// A labelled cluster as an inferer sees it: one list of atom groups per
/// molecule, aligned with the molecule slice passed alongside it.
#[derive(Debug, Clone, Copy)]
pub struct ClusterRef<'a> {
    pub label: &'a str,
    pub groups: &'a [Vec<AtomGroup>],
}

impl ClusterRef<'_> {
    /// Iterates `(molecule position, group)` over every group of the cluster.
    pub fn iter_groups(&self) -> impl Iterator<Item = (usize, &AtomGroup)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(m, groups)| groups.iter().map(move |g| (m, g)))
    }
}

/// Outcome of one inference attempt. The pattern list is present even when
/// the attempt failed, possibly derived from the last unsuccessful layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceResult {
    #[serde(rename = "checked")]
    pub passed: bool,
    #[serde(rename = "type_list")]
    pub patterns: Vec<(String, String)>,
}

impl InferenceResult {
    pub fn new(passed: bool, patterns: Vec<(String, String)>) -> Self {
        Self { passed, patterns }
    }
}

/// Derives one chemical pattern per cluster from an ordered cluster list.
pub trait PatternInferer {
    /// Attempts to derive patterns that, applied in list order with the last
    /// match winning, assign every atom group to its own cluster.
    fn infer(&self, molecules: &[&Molecule], clusters: &[ClusterRef<'_>]) -> InferenceResult;

    /// The pattern derived for `cluster` on its own, without refinement.
    fn single_pattern(&self, molecules: &[&Molecule], cluster: ClusterRef<'_>) -> String;
}
