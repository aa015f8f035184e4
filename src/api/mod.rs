pub mod blueprint;
pub mod cache;
pub mod extract;
pub mod images;
pub mod sample;
pub mod threads;

pub use blueprint::{
    handle_blueprint, BBoxBody, BlueprintRequest, BlueprintResponse, PaletteColorBody,
    RegionBody, __path_handle_blueprint,
};
pub use extract::ApiJson;
pub use cache::{handle_cache_stats, CacheStatsResponse, __path_handle_cache_stats};
pub use images::{
    handle_register_image, ImageRef, RegisterImageRequest, RegisterImageResponse,
    __path_handle_register_image,
};
pub use sample::{handle_sample, SampleRequest, SampleResponse, __path_handle_sample};
pub use threads::{
    handle_match_thread, MatchThreadRequest, ThreadCandidateBody, ThreadMatchBody,
    __path_handle_match_thread,
};
