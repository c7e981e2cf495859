pub mod auth_dto;
pub mod common;
pub mod consignment_dto;
pub mod region_dto;
pub mod voucher_dto;
