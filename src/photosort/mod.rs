pub mod audit;
pub mod config;
pub mod execute;
pub mod metadata;
pub mod offset;
pub mod organize;
pub mod pairing;
pub mod paths;
pub mod plan;
pub mod reconcile;
pub mod scan;
pub mod target;
pub mod util;
pub mod warn;
