pub mod cache;
pub mod features;
pub mod indicators;
pub mod model;
pub mod predictor;

pub use cache::Cache;
pub use features::build_features;
pub use model::{ForestConfig, ModelError, RandomForestRegressor, ScaledForest, StandardScaler};
pub use predictor::{design_matrix, predict_next, FeatureOutcome, PredictionService};
