pub mod profile_dto;
