pub mod auth_controller;
pub mod consignment_controller;
pub mod region_controller;
pub mod voucher_controller;
