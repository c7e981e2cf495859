pub mod consignment_repository;
pub mod region_repository;
pub mod status_log_repository;
pub mod user_repository;
pub mod voucher_repository;
