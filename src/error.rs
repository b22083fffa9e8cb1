/// Errors from tree learning operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when the candidate feature count exceeds the dataset dimensionality.
    #[error("requested {requested} candidate features, but the dataset has only {dimensionality} dimensions")]
    TooManyFeatures {
        /// The resolved number of candidate features per split.
        requested: usize,
        /// The dataset dimensionality.
        dimensionality: usize,
    },

    /// Returned when the online feature count is outside `[1, D]`.
    #[error("n_features must be in [1, {dimensionality}], got {n_features}")]
    InvalidFeatureCount {
        /// The invalid n_features value provided.
        n_features: usize,
        /// The dataset dimensionality.
        dimensionality: usize,
    },

    /// Returned when the threshold generator covers a different feature space
    /// than the dataset it is used with.
    #[error("threshold generator covers {generator} dimensions, dataset has {dataset}")]
    ThresholdDimensionMismatch {
        /// Dimensionality reported by the threshold generator.
        generator: usize,
        /// Dimensionality reported by the dataset.
        dataset: usize,
    },

    /// Returned when the online-bootstrap rate is not a positive finite number.
    #[error("bootstrap_lambda must be positive and finite, got {lambda}")]
    InvalidBootstrapLambda {
        /// The invalid rate provided.
        lambda: f64,
    },

    /// Returned when the training dataset has zero examples.
    #[error("training dataset has zero examples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when an example has a different number of features than expected.
    #[error("example {example_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the example.
        got: usize,
        /// The zero-based index of the offending example.
        example_index: usize,
    },

    /// Returned when the label vector length differs from the example count.
    #[error("got {got} labels for {expected} examples")]
    LabelCountMismatch {
        /// The number of examples.
        expected: usize,
        /// The number of labels provided.
        got: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at example {example_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending example.
        example_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when a point handed to the tree has the wrong dimensionality.
    #[error("input point has {got} features, expected {expected}")]
    DimensionMismatch {
        /// The dimensionality the tree was grown on.
        expected: usize,
        /// The dimensionality of the input point.
        got: usize,
    },
}
