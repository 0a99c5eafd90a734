pub mod cipher_service;
pub mod profile_service;
pub mod query_builder;
pub mod similarity;
