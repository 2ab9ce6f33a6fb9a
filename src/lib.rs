// keyword-pipeline: brand keyword volumes, store competitor audit and
// capped rankings per country.
//
// This is the library root. Each module corresponds to a stage of the
// pipeline or one of the upstream services it talks to.

pub mod appstorespy;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod keyapp;
pub mod keywordtool;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod play;
pub mod rate_limit;
pub mod status;
