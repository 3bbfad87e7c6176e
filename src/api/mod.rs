pub mod topology_dto;
