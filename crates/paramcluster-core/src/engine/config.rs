use super::ordering::{OrderingStrategy, ParseOrderingError};
use super::store::ParameterType;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Unknown ordering '{0}'")]
    UnknownOrdering(String),
}

impl From<ParseOrderingError> for ConfigError {
    fn from(err: ParseOrderingError) -> Self {
        ConfigError::UnknownOrdering(err.0)
    }
}

/// Named ordering runs in request order.
///
/// The first occurrence of a strategy keeps its name; later duplicates are
/// named `<name>_1`, `<name>_2`, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderingPlan {
    runs: Vec<(String, OrderingStrategy)>,
}

impl OrderingPlan {
    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashMap<OrderingStrategy, usize> = HashMap::new();
        let mut runs = Vec::new();
        for name in names {
            let strategy: OrderingStrategy = name.as_ref().parse()?;
            let count = seen.entry(strategy).or_insert(0);
            let run_name = match *count {
                0 => strategy.name().to_string(),
                n => format!("{}_{}", strategy.name(), n),
            };
            *count += 1;
            runs.push((run_name, strategy));
        }
        Ok(Self { runs })
    }

    pub fn runs(&self) -> &[(String, OrderingStrategy)] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub orderings: OrderingPlan,
    pub parameter_types: Vec<ParameterType>,
    /// Seed for `shuffle`; fresh entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Default)]
pub struct RunConfigBuilder {
    orderings: Option<Vec<String>>,
    parameter_types: Option<Vec<ParameterType>>,
    seed: Option<u64>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orderings<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.orderings = Some(names.into_iter().map(Into::into).collect());
        self
    }
    pub fn parameter_types(mut self, types: Vec<ParameterType>) -> Self {
        self.parameter_types = Some(types);
        self
    }
    pub fn all_parameter_types(mut self) -> Self {
        self.parameter_types = Some(ParameterType::ALL.to_vec());
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let names = self
            .orderings
            .ok_or(ConfigError::MissingParameter("orderings"))?;
        Ok(RunConfig {
            orderings: OrderingPlan::from_names(&names)?,
            parameter_types: self
                .parameter_types
                .ok_or(ConfigError::MissingParameter("parameter_types"))?,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_orderings_get_numeric_suffixes() {
        let plan = OrderingPlan::from_names(["original", "shuffle", "shuffle", "shuffle"]).unwrap();
        let names: Vec<&str> = plan.runs().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["original", "shuffle", "shuffle_1", "shuffle_2"]);
        assert!(plan.runs()[3].1 == OrderingStrategy::Shuffle);
    }

    #[test]
    fn unknown_ordering_is_rejected() {
        let err = OrderingPlan::from_names(["original", "by_charge"]).unwrap_err();
        assert_eq!(err, ConfigError::UnknownOrdering("by_charge".to_string()));
    }

    #[test]
    fn builder_requires_orderings_and_parameter_types() {
        let missing = RunConfigBuilder::new().all_parameter_types().build();
        assert_eq!(missing, Err(ConfigError::MissingParameter("orderings")));

        let missing = RunConfigBuilder::new().orderings(["original"]).build();
        assert_eq!(missing, Err(ConfigError::MissingParameter("parameter_types")));
    }

    #[test]
    fn builder_produces_config() {
        let config = RunConfigBuilder::new()
            .orderings(["biggest_size", "most_mols"])
            .parameter_types(vec![ParameterType::Bond])
            .seed(Some(42))
            .build()
            .unwrap();
        assert_eq!(config.orderings.len(), 2);
        assert_eq!(config.parameter_types, vec![ParameterType::Bond]);
        assert_eq!(config.seed, Some(42));
    }
}
