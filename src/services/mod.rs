pub mod blueprint_service;
pub mod thread_dataset;

pub use blueprint_service::{
    BlueprintOptions, BlueprintOutput, BlueprintService, ImageInput, SampleOutput,
};
pub use thread_dataset::{load_catalog, parse_catalog, DatasetError};
